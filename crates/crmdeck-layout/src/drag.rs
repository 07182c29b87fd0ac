#![forbid(unsafe_code)]

//! Drag session lifecycle for reorderable lists.
//!
//! ```text
//! Idle -> Dragging <-> Hovering -> Dropped   -> Idle
//!                              \-> Cancelled -> Idle
//! ```
//!
//! The machine does not own the list it reorders. It emits a
//! [`DragEffect`] per input; owners apply `Reordered` effects to their list as
//! they arrive and undo the net move when a session ends `Cancelled`.
//!
//! Terminal states (`Dropped`, `Cancelled`) are observable until the next
//! input or [`DragSessionMachine::reset`], after which the machine is `Idle`.

use std::fmt;

use crmdeck_core::geometry::{Point, Rect};
use crmdeck_core::permission::{Capabilities, PermissionCheck};
use serde::{Deserialize, Serialize};

use crate::hover::{HoverDecision, HoverHoldReason, HoverPolicy, HoverSample};

/// Kind used by dashboard widget grids.
pub const WIDGET_KIND: &str = "widget";
/// Kind used by template component palettes.
pub const COMPONENT_KIND: &str = "component";
/// Kind used by detail-page text fields.
pub const TEXT_FIELD_KIND: &str = "text-field";

/// Category of a draggable. Drop targets only accept their own kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragKind(String);

impl DragKind {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DragKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for DragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The element being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSource<Id> {
    pub kind: DragKind,
    pub item: Id,
    /// Index of the item when the drag began.
    pub origin_index: usize,
}

/// Lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragSessionState<Id> {
    Idle,
    Dragging {
        source: DragSource<Id>,
        origin: Point,
        current: Point,
        /// Index of the dragged item after the hover reorders so far.
        current_index: usize,
        started_sequence: u64,
    },
    Hovering {
        source: DragSource<Id>,
        origin: Point,
        current: Point,
        current_index: usize,
        target_index: usize,
        started_sequence: u64,
    },
    Dropped {
        source: DragSource<Id>,
        final_index: usize,
    },
    Cancelled {
        source: DragSource<Id>,
        reason: DragCancelReason,
    },
}

impl<Id> DragSessionState<Id> {
    /// Whether a drag is in progress (`Dragging` or `Hovering`).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Hovering { .. })
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Dropped { .. } | Self::Cancelled { .. })
    }

    /// Source of the active drag, if any.
    #[must_use]
    pub const fn active_source(&self) -> Option<&DragSource<Id>> {
        match self {
            Self::Dragging { source, .. } | Self::Hovering { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Why a drag ended without committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancelReason {
    /// Released outside any target accepting this kind.
    DroppedOutsideTarget,
    EscapeKey,
    Blur,
    Programmatic,
}

/// One input delivered to the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum DragInputKind<Id> {
    Start {
        kind: DragKind,
        item: Id,
        index: usize,
        pointer: Point,
    },
    /// Pointer moved while not over any drop target.
    Move { pointer: Point },
    /// Pointer moved over a drop target.
    Hover {
        target_kind: DragKind,
        target_index: usize,
        target_bounds: Rect,
        pointer: Point,
    },
    /// Pointer left the hovered target.
    Leave,
    /// Pointer released; `target_kind` is `None` outside every drop target.
    Drop { target_kind: Option<DragKind> },
    Cancel { reason: DragCancelReason },
}

/// Sequenced input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragInput<Id> {
    pub sequence: u64,
    pub kind: DragInputKind<Id>,
}

impl<Id> DragInput<Id> {
    #[must_use]
    pub const fn new(sequence: u64, kind: DragInputKind<Id>) -> Self {
        Self { sequence, kind }
    }
}

/// Explicit diagnostics for inputs that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    PermissionDenied,
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    KindMismatch,
    KindLocked,
    NotHovering,
}

/// Effect emitted by one transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect<Id> {
    Started {
        source: DragSource<Id>,
    },
    Moved {
        pointer: Point,
    },
    /// Pointer is over `target_index` without triggering a reorder.
    Hovered {
        target_index: usize,
        hold: HoverHoldReason,
    },
    /// Owner must apply `reorder(list, from, to)`.
    Reordered {
        from: usize,
        to: usize,
    },
    Left,
    Dropped {
        source: DragSource<Id>,
        final_index: usize,
    },
    /// Owner must restore the item from `current_index` to
    /// `source.origin_index`.
    Cancelled {
        source: DragSource<Id>,
        current_index: usize,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One transition with diagnostic fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition<Id> {
    pub transition_id: u64,
    pub sequence: u64,
    pub from: DragSessionState<Id>,
    pub to: DragSessionState<Id>,
    pub effect: DragEffect<Id>,
}

/// Cursor affordance for a draggable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCursor {
    Default,
    Grab,
    Grabbing,
}

/// Visual hints for rendering a draggable element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragAffordance {
    pub cursor: DragCursor,
    pub opacity: f32,
}

/// Opacity of the element being dragged.
pub const DRAGGING_OPACITY: f32 = 0.5;

/// Lifecycle machine for one drag-reorderable list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSessionMachine<Id> {
    state: DragSessionState<Id>,
    hover_policy: HoverPolicy,
    required: Capabilities,
    transition_counter: u64,
}

impl<Id> Default for DragSessionMachine<Id> {
    fn default() -> Self {
        Self::new(HoverPolicy::Midpoint)
    }
}

impl<Id> DragSessionMachine<Id> {
    /// Machine gated on [`Capabilities::REORDER`].
    #[must_use]
    pub const fn new(hover_policy: HoverPolicy) -> Self {
        Self::with_required(hover_policy, Capabilities::REORDER)
    }

    /// Machine gated on an explicit capability set.
    #[must_use]
    pub const fn with_required(hover_policy: HoverPolicy, required: Capabilities) -> Self {
        Self {
            state: DragSessionState::Idle,
            hover_policy,
            required,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragSessionState<Id> {
        &self.state
    }

    #[must_use]
    pub const fn hover_policy(&self) -> HoverPolicy {
        self.hover_policy
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Capability required to start a drag.
    #[must_use]
    pub const fn required(&self) -> Capabilities {
        self.required
    }
}

impl<Id: Clone + PartialEq + fmt::Debug> DragSessionMachine<Id> {
    /// Rendering hints for `item`.
    ///
    /// Cursor shows grab/grabbing only when `permissions` allows dragging.
    #[must_use]
    pub fn affordance(&self, item: &Id, permissions: &dyn PermissionCheck) -> DragAffordance {
        let dragging_this = self
            .state
            .active_source()
            .is_some_and(|source| &source.item == item);
        let cursor = if !permissions.permits(self.required) {
            DragCursor::Default
        } else if dragging_this {
            DragCursor::Grabbing
        } else {
            DragCursor::Grab
        };
        DragAffordance {
            cursor,
            opacity: if dragging_this { DRAGGING_OPACITY } else { 1.0 },
        }
    }

    /// Return to `Idle`, cancelling any active drag.
    pub fn reset(&mut self) -> Option<DragTransition<Id>> {
        if !self.state.is_active() {
            self.state = DragSessionState::Idle;
            return None;
        }
        let from = std::mem::replace(&mut self.state, DragSessionState::Idle);
        let (DragSessionState::Dragging {
            source,
            current_index,
            ..
        }
        | DragSessionState::Hovering {
            source,
            current_index,
            ..
        }) = from.clone()
        else {
            return None;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %source.kind, "drag force-cancelled");
        self.transition_counter = self.transition_counter.saturating_add(1);
        Some(DragTransition {
            transition_id: self.transition_counter,
            sequence: 0,
            from,
            to: DragSessionState::Idle,
            effect: DragEffect::Cancelled {
                source,
                current_index,
                reason: DragCancelReason::Programmatic,
            },
        })
    }

    /// Record an input refused before it reached the machine.
    pub fn reject(&mut self, sequence: u64, reason: DragNoopReason) -> DragTransition<Id> {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            sequence,
            from: self.state.clone(),
            to: self.state.clone(),
            effect: DragEffect::Noop { reason },
        }
    }

    /// Apply one input and emit the transition it caused.
    pub fn apply_event(
        &mut self,
        event: &DragInput<Id>,
        permissions: &dyn PermissionCheck,
    ) -> DragTransition<Id> {
        if self.state.is_terminal() {
            self.state = DragSessionState::Idle;
        }
        let from = self.state.clone();

        let effect = match (&self.state, &event.kind) {
            (
                DragSessionState::Idle,
                DragInputKind::Start {
                    kind,
                    item,
                    index,
                    pointer,
                },
            ) => {
                if permissions.permits(self.required) {
                    let source = DragSource {
                        kind: kind.clone(),
                        item: item.clone(),
                        origin_index: *index,
                    };
                    self.state = DragSessionState::Dragging {
                        source: source.clone(),
                        origin: *pointer,
                        current: *pointer,
                        current_index: *index,
                        started_sequence: event.sequence,
                    };
                    #[cfg(feature = "tracing")]
                    tracing::debug!(kind = %kind, item = ?item, index, "drag started");
                    DragEffect::Started { source }
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(kind = %kind, "drag denied by permission check");
                    DragEffect::Noop {
                        reason: DragNoopReason::PermissionDenied,
                    }
                }
            }
            (DragSessionState::Idle, _) => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            (
                DragSessionState::Dragging { .. } | DragSessionState::Hovering { .. },
                DragInputKind::Start { .. },
            ) => DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            },
            (
                DragSessionState::Dragging {
                    source,
                    origin,
                    current_index,
                    started_sequence,
                    ..
                }
                | DragSessionState::Hovering {
                    source,
                    origin,
                    current_index,
                    started_sequence,
                    ..
                },
                DragInputKind::Move { pointer },
            ) => {
                self.state = DragSessionState::Dragging {
                    source: source.clone(),
                    origin: *origin,
                    current: *pointer,
                    current_index: *current_index,
                    started_sequence: *started_sequence,
                };
                DragEffect::Moved { pointer: *pointer }
            }
            (
                DragSessionState::Dragging {
                    source,
                    origin,
                    current_index,
                    started_sequence,
                    ..
                }
                | DragSessionState::Hovering {
                    source,
                    origin,
                    current_index,
                    started_sequence,
                    ..
                },
                DragInputKind::Hover {
                    target_kind,
                    target_index,
                    target_bounds,
                    pointer,
                },
            ) => {
                if *target_kind != source.kind {
                    DragEffect::Noop {
                        reason: DragNoopReason::KindMismatch,
                    }
                } else {
                    let sample = HoverSample {
                        drag_index: *current_index,
                        hover_index: *target_index,
                        target_bounds: *target_bounds,
                        origin: *origin,
                        pointer: *pointer,
                    };
                    let (next_index, effect) = match self.hover_policy.evaluate(&sample) {
                        HoverDecision::Reorder { from, to } => {
                            (to, DragEffect::Reordered { from, to })
                        }
                        HoverDecision::Hold { reason } => (
                            *current_index,
                            DragEffect::Hovered {
                                target_index: *target_index,
                                hold: reason,
                            },
                        ),
                    };
                    self.state = DragSessionState::Hovering {
                        source: source.clone(),
                        origin: *origin,
                        current: *pointer,
                        current_index: next_index,
                        target_index: *target_index,
                        started_sequence: *started_sequence,
                    };
                    effect
                }
            }
            (DragSessionState::Dragging { .. }, DragInputKind::Leave) => DragEffect::Noop {
                reason: DragNoopReason::NotHovering,
            },
            (
                DragSessionState::Hovering {
                    source,
                    origin,
                    current,
                    current_index,
                    started_sequence,
                    ..
                },
                DragInputKind::Leave,
            ) => {
                self.state = DragSessionState::Dragging {
                    source: source.clone(),
                    origin: *origin,
                    current: *current,
                    current_index: *current_index,
                    started_sequence: *started_sequence,
                };
                DragEffect::Left
            }
            (
                DragSessionState::Dragging {
                    source,
                    current_index,
                    ..
                }
                | DragSessionState::Hovering {
                    source,
                    current_index,
                    ..
                },
                DragInputKind::Drop { target_kind },
            ) => {
                let source = source.clone();
                let current_index = *current_index;
                if target_kind.as_ref() == Some(&source.kind) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        kind = %source.kind,
                        origin_index = source.origin_index,
                        final_index = current_index,
                        "drag dropped"
                    );
                    self.state = DragSessionState::Dropped {
                        source: source.clone(),
                        final_index: current_index,
                    };
                    DragEffect::Dropped {
                        source,
                        final_index: current_index,
                    }
                } else {
                    self.cancel_with(source, current_index, DragCancelReason::DroppedOutsideTarget)
                }
            }
            (
                DragSessionState::Dragging {
                    source,
                    current_index,
                    ..
                }
                | DragSessionState::Hovering {
                    source,
                    current_index,
                    ..
                },
                DragInputKind::Cancel { reason },
            ) => {
                let source = source.clone();
                let current_index = *current_index;
                self.cancel_with(source, current_index, *reason)
            }
            (DragSessionState::Dropped { .. } | DragSessionState::Cancelled { .. }, _) => {
                // Normalized to Idle above.
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                }
            }
        };

        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            sequence: event.sequence,
            from,
            to: self.state.clone(),
            effect,
        }
    }

    fn cancel_with(
        &mut self,
        source: DragSource<Id>,
        current_index: usize,
        reason: DragCancelReason,
    ) -> DragEffect<Id> {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %source.kind, ?reason, "drag cancelled");
        self.state = DragSessionState::Cancelled {
            source: source.clone(),
            reason,
        };
        DragEffect::Cancelled {
            source,
            current_index,
            reason,
        }
    }
}
