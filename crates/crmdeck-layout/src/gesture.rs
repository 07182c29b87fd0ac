#![forbid(unsafe_code)]

//! Pointer gestures on placed components.
//!
//! A gesture captures the component rectangle and pointer position at
//! press time. Every pointer move maps to a new rectangle directly from
//! those anchors, so updates are continuous and never accumulate drift.

use crmdeck_core::config::GestureLimits;
use crmdeck_core::geometry::{Point, Rect, Size, clamp_span};
use serde::{Deserialize, Serialize};

/// What the pointer is doing to the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Move,
    /// Bottom-right grip; the top-left corner stays fixed.
    Resize,
}

/// An in-flight move or resize of one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentGesture {
    pub component_id: String,
    pub kind: GestureKind,
    pub start_pointer: Point,
    pub start_rect: Rect,
}

impl ComponentGesture {
    #[must_use]
    pub fn new(component_id: impl Into<String>, kind: GestureKind, start_rect: Rect, pointer: Point) -> Self {
        Self {
            component_id: component_id.into(),
            kind,
            start_pointer: pointer,
            start_rect,
        }
    }

    /// Rectangle for the pointer at `pointer`, clamped to `page`.
    ///
    /// Moves keep the component inside the page and below
    /// `limits.move_min_y`. Resizes keep at least `limits.min_size` and never
    /// extend past the page edge.
    #[must_use]
    pub fn rect_at(&self, pointer: Point, page: Size, limits: &GestureLimits) -> Rect {
        let (dx, dy) = pointer.delta_from(self.start_pointer);
        let start = self.start_rect;
        match self.kind {
            GestureKind::Move => Rect::new(
                clamp_span(
                    start.x.saturating_add(dx),
                    0,
                    page.width.saturating_sub(start.width),
                ),
                clamp_span(
                    start.y.saturating_add(dy),
                    limits.move_min_y,
                    page.height.saturating_sub(start.height),
                ),
                start.width,
                start.height,
            ),
            GestureKind::Resize => Rect::new(
                start.x,
                start.y,
                clamp_span(
                    start.width.saturating_add(dx),
                    limits.min_size.width,
                    page.width.saturating_sub(start.x),
                ),
                clamp_span(
                    start.height.saturating_add(dy),
                    limits.min_size.height,
                    page.height.saturating_sub(start.y),
                ),
            ),
        }
    }
}
