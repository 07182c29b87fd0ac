#![forbid(unsafe_code)]

//! Named reorderable lists on one page.
//!
//! Detail and report pages host several independent lists (text fields,
//! cards, action buttons, folders, ...). Each list is a [`ReorderZone`] with
//! its own [`DragSessionMachine`]; a page-wide [`DragKindGate`] keeps drags
//! of different kinds from overlapping.
//!
//! [`ReorderZones::handle`] routes a drag input to the right zone, applies
//! the resulting effect to that zone's items, and keeps the gate in sync
//! with the session lifecycle.

use crmdeck_core::geometry::Point;
use crmdeck_core::permission::PermissionCheck;
use rustc_hash::FxHashMap;

use crate::drag::{
    DragAffordance, DragEffect, DragInput, DragInputKind, DragKind, DragNoopReason,
    DragSessionMachine, DragTransition,
};
use crate::drag_kind::DragKindGate;
use crate::hover::HoverPolicy;
use crate::reorder::{OrderedItem, ReorderOutcome, reindex, reorder_items};

/// One reorderable list and its drag session.
#[derive(Debug, Clone)]
pub struct ReorderZone<T: OrderedItem> {
    items: Vec<T>,
    machine: DragSessionMachine<T::Id>,
}

impl<T: OrderedItem> ReorderZone<T> {
    #[must_use]
    pub fn new(items: Vec<T>, hover_policy: HoverPolicy) -> Self {
        let mut items = items;
        reindex(&mut items);
        Self {
            items,
            machine: DragSessionMachine::new(hover_policy),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn machine(&self) -> &DragSessionMachine<T::Id> {
        &self.machine
    }

    fn apply_effect(&mut self, effect: &DragEffect<T::Id>) {
        match effect {
            DragEffect::Reordered { from, to } => {
                reorder_items(&mut self.items, *from, *to);
            }
            DragEffect::Cancelled {
                source,
                current_index,
                ..
            } => {
                reorder_items(&mut self.items, *current_index, source.origin_index);
            }
            _ => {}
        }
    }
}

/// All reorderable lists of a page, keyed by drag kind.
#[derive(Debug, Clone)]
pub struct ReorderZones<T: OrderedItem> {
    zones: FxHashMap<DragKind, ReorderZone<T>>,
    gate: DragKindGate,
}

impl<T: OrderedItem> Default for ReorderZones<T> {
    fn default() -> Self {
        Self {
            zones: FxHashMap::default(),
            gate: DragKindGate::new(),
        }
    }
}

impl<T: OrderedItem> ReorderZones<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the list for `kind`.
    pub fn insert_zone(&mut self, kind: impl Into<DragKind>, items: Vec<T>, hover_policy: HoverPolicy) {
        let kind = kind.into();
        self.gate.release(&kind);
        self.zones.insert(kind, ReorderZone::new(items, hover_policy));
    }

    #[must_use]
    pub fn zone(&self, kind: &DragKind) -> Option<&ReorderZone<T>> {
        self.zones.get(kind)
    }

    /// Items of the list for `kind`, in display order.
    #[must_use]
    pub fn items(&self, kind: &DragKind) -> Option<&[T]> {
        self.zones.get(kind).map(ReorderZone::items)
    }

    #[must_use]
    pub const fn gate(&self) -> &DragKindGate {
        &self.gate
    }

    /// Whether a drop target of `kind` accepts the current drag.
    #[must_use]
    pub fn accepts_drop(&self, kind: &DragKind) -> bool {
        self.gate.active() == Some(kind)
    }

    /// Rendering hints for `item` in the list for `kind`.
    #[must_use]
    pub fn affordance(
        &self,
        kind: &DragKind,
        item: &T::Id,
        permissions: &dyn PermissionCheck,
    ) -> Option<DragAffordance> {
        self.zones
            .get(kind)
            .map(|zone| zone.machine.affordance(item, permissions))
    }

    /// Move within the list for `kind` outside a drag session.
    ///
    /// Returns `None` when no list is registered for `kind`.
    pub fn move_within(&mut self, kind: &DragKind, from: usize, to: usize) -> Option<ReorderOutcome> {
        let zone = self.zones.get_mut(kind)?;
        Some(reorder_items(&mut zone.items, from, to))
    }

    /// Start dragging the item at `index` of the list for `kind`.
    pub fn begin(
        &mut self,
        kind: &DragKind,
        index: usize,
        pointer: Point,
        sequence: u64,
        permissions: &dyn PermissionCheck,
    ) -> Option<DragTransition<T::Id>> {
        let item = self.zones.get(kind)?.items.get(index)?.id();
        self.handle(
            DragInput::new(
                sequence,
                DragInputKind::Start {
                    kind: kind.clone(),
                    item,
                    index,
                    pointer,
                },
            ),
            permissions,
        )
    }

    /// Route one input and apply its effect.
    ///
    /// `Start` goes to the list named by its kind; every other input goes to
    /// the list holding the active drag. Returns `None` when no list matches.
    pub fn handle(
        &mut self,
        input: DragInput<T::Id>,
        permissions: &dyn PermissionCheck,
    ) -> Option<DragTransition<T::Id>> {
        let kind = match &input.kind {
            DragInputKind::Start { kind, .. } => kind.clone(),
            _ => self.gate.active()?.clone(),
        };
        let zone = self.zones.get_mut(&kind)?;

        if matches!(input.kind, DragInputKind::Start { .. }) && !self.gate.try_acquire(&kind) {
            #[cfg(feature = "tracing")]
            tracing::debug!(kind = %kind, active = ?self.gate.active(), "drag refused, another kind is active");
            return Some(zone.machine.reject(input.sequence, DragNoopReason::KindLocked));
        }

        let transition = zone.machine.apply_event(&input, permissions);
        zone.apply_effect(&transition.effect);
        if !zone.machine.is_active() {
            self.gate.release(&kind);
        }
        Some(transition)
    }

    /// Cancel whatever drag is active and restore its list.
    pub fn cancel_active(&mut self) -> Option<DragTransition<T::Id>> {
        let kind = self.gate.active()?.clone();
        let zone = self.zones.get_mut(&kind)?;
        let transition = zone.machine.reset();
        if let Some(transition) = &transition {
            zone.apply_effect(&transition.effect);
        }
        self.gate.release(&kind);
        transition
    }
}
