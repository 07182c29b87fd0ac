#![forbid(unsafe_code)]

//! Hover evaluation for list drop targets.
//!
//! While an item is dragged across siblings, each hovered sibling decides
//! whether the pointer has travelled far enough to trigger a reorder. The
//! midpoint rule provides hysteresis: the dragged item only swaps past a
//! sibling once the pointer crosses that sibling's midpoint along the
//! dominant axis of motion, so a pointer resting near a boundary does not
//! flicker the order back and forth.

use crmdeck_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Axis of pointer travel since the drag began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragAxis {
    Horizontal,
    Vertical,
}

impl DragAxis {
    /// Horizontal iff the absolute x displacement strictly exceeds the y
    /// displacement. Ties resolve to vertical.
    #[must_use]
    pub fn dominant(origin: Point, current: Point) -> Self {
        let (dx, dy) = current.delta_from(origin);
        if dx.unsigned_abs() > dy.unsigned_abs() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

/// How a drop target reacts to hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverPolicy {
    /// Reorder only after crossing the target midpoint on the dominant axis.
    #[default]
    Midpoint,
    /// Reorder as soon as the hovered index differs from the drag index.
    Immediate,
}

/// Pointer state sampled on one hover event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverSample {
    /// Current index of the dragged item.
    pub drag_index: usize,
    /// Index of the hovered drop target.
    pub hover_index: usize,
    /// Bounding box of the hovered target.
    pub target_bounds: Rect,
    /// Pointer position when the drag began.
    pub origin: Point,
    /// Pointer position now.
    pub pointer: Point,
}

/// Outcome of evaluating one hover sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum HoverDecision {
    Reorder { from: usize, to: usize },
    Hold { reason: HoverHoldReason },
}

/// Why a hover did not trigger a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverHoldReason {
    /// Hovering the dragged item's own slot.
    SameIndex,
    /// Pointer has not crossed the target midpoint yet.
    MidpointNotCrossed,
}

impl HoverPolicy {
    /// Decide whether `sample` should reorder the list.
    #[must_use]
    pub fn evaluate(self, sample: &HoverSample) -> HoverDecision {
        let HoverSample {
            drag_index,
            hover_index,
            target_bounds,
            origin,
            pointer,
        } = *sample;

        if drag_index == hover_index {
            return HoverDecision::Hold {
                reason: HoverHoldReason::SameIndex,
            };
        }

        if self == Self::Midpoint {
            let (local, middle) = match DragAxis::dominant(origin, pointer) {
                DragAxis::Horizontal => (
                    pointer.x.saturating_sub(target_bounds.x),
                    target_bounds.width / 2,
                ),
                DragAxis::Vertical => (
                    pointer.y.saturating_sub(target_bounds.y),
                    target_bounds.height / 2,
                ),
            };
            let moving_forward = drag_index < hover_index;
            if (moving_forward && local < middle) || (!moving_forward && local > middle) {
                return HoverDecision::Hold {
                    reason: HoverHoldReason::MidpointNotCrossed,
                };
            }
        }

        HoverDecision::Reorder {
            from: drag_index,
            to: hover_index,
        }
    }
}
