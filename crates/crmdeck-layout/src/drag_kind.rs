#![forbid(unsafe_code)]

//! Page-wide active drag kind.
//!
//! A page may host several reorderable lists of different kinds. While an
//! item of one kind is being dragged, items of every other kind refuse to
//! start. The gate holds at most one kind at a time.

use serde::{Deserialize, Serialize};

use crate::drag::DragKind;

/// Token naming the kind currently being dragged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragKindGate {
    active: Option<DragKind>,
}

impl DragKindGate {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    #[must_use]
    pub const fn active(&self) -> Option<&DragKind> {
        self.active.as_ref()
    }

    /// Whether a drag of `kind` may start or be dropped now.
    #[must_use]
    pub fn accepts(&self, kind: &DragKind) -> bool {
        self.active.as_ref().is_none_or(|active| active == kind)
    }

    /// Claim the gate for `kind`. Re-acquiring the held kind succeeds.
    pub fn try_acquire(&mut self, kind: &DragKind) -> bool {
        if !self.accepts(kind) {
            return false;
        }
        self.active = Some(kind.clone());
        true
    }

    /// Release the gate if `kind` holds it. Returns whether it was released.
    pub fn release(&mut self, kind: &DragKind) -> bool {
        if self.active.as_ref() == Some(kind) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
