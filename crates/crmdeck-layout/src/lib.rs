#![forbid(unsafe_code)]

//! Arrangement engines: list reordering, drag sessions, and free-form
//! placement.
//!
//! # Role in crmdeck
//! `crmdeck-layout` turns pointer input into arrangement changes. It never
//! renders and never talks to a backend; hosts feed it pointer positions and
//! element bounds and read back outcomes.
//!
//! # Primary responsibilities
//! - **Reorder**: splice-move lists, dashboard grid recompute, hover
//!   hysteresis, named reorder zones with a page-wide drag kind token.
//! - **Drag sessions**: an explicit state machine with typed effects and a
//!   permission gate evaluated when a drag starts.
//! - **Placement**: first-fit search for a free rectangle on an A4 page.
//! - **Templates**: a multi-page document of placed components with
//!   move/resize gestures and bounded undo/redo.
//! - **Descriptors**: dashboard page configs and the widget registry.

pub mod dashboard;
pub mod descriptor;
pub mod drag;
pub mod drag_kind;
pub mod gesture;
pub mod history;
pub mod hover;
pub mod placement;
pub mod registry;
pub mod reorder;
pub mod template;
pub mod zones;

pub use crmdeck_core::geometry::{Point, Rect, Size};

pub use dashboard::{BoardWidget, DashboardBoard, assign_grid_positions, grid_position_for};
pub use descriptor::{
    DescriptorError, GridPosition, GridSpec, PageConfig, PageLayout, Widget, WidgetPlacement,
    WidgetSize,
};
pub use drag::{
    COMPONENT_KIND, DragAffordance, DragCancelReason, DragCursor, DragEffect, DragInput,
    DragInputKind, DragKind, DragNoopReason, DragSessionMachine, DragSessionState, DragSource,
    DragTransition, TEXT_FIELD_KIND, WIDGET_KIND,
};
pub use drag_kind::DragKindGate;
pub use gesture::{ComponentGesture, GestureKind};
pub use history::{DEFAULT_HISTORY_CAPACITY, History};
pub use hover::{DragAxis, HoverDecision, HoverHoldReason, HoverPolicy, HoverSample};
pub use placement::{
    Obstacle, PageRect, Placement, PlacementError, PlacementRequest, PlacementStrategy, Placer,
};
pub use registry::{WidgetKind, WidgetRegistry};
pub use reorder::{
    OrderedItem, ReorderNoopReason, ReorderOutcome, position_of, reindex, reorder, reorder_items,
};
pub use template::{
    COMPONENT_CATALOG, ComponentIdAllocator, ComponentKind, DocumentError, DropOutcome,
    PlacedComponent, TemplateData, TemplateDocument, TextStyle,
};
pub use zones::{ReorderZone, ReorderZones};
