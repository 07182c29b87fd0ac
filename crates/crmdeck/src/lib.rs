#![forbid(unsafe_code)]

//! crmdeck public facade crate.
//!
//! This crate provides the stable surface area for hosts. It re-exports the
//! common types of the internal crates, offers a prelude, and wraps a
//! validated [`EngineConfig`] in an [`Engine`] that builds dashboard boards
//! and template documents.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use crmdeck_core::config::{
    ConfigError, EngineConfig, GestureLimits, GridWrap, PageGeometry, PlacementTuning,
};
pub use crmdeck_core::geometry::{Point, Rect, Sides, Size};
#[cfg(feature = "tracing-json")]
pub use crmdeck_core::logging::init_json_logging;
pub use crmdeck_core::permission::{ADMIN_ROLE, Capabilities, PermissionCheck, Session};

// --- Layout re-exports -----------------------------------------------------

pub use crmdeck_layout::dashboard::{BoardWidget, DashboardBoard};
pub use crmdeck_layout::descriptor::{DescriptorError, PageConfig, Widget};
pub use crmdeck_layout::drag::{
    DragAffordance, DragCancelReason, DragCursor, DragEffect, DragInput, DragInputKind, DragKind,
    DragNoopReason, DragSessionMachine, DragSessionState, DragTransition,
};
pub use crmdeck_layout::drag_kind::DragKindGate;
pub use crmdeck_layout::history::History;
pub use crmdeck_layout::hover::HoverPolicy;
pub use crmdeck_layout::placement::{
    Obstacle, PageRect, Placement, PlacementError, PlacementRequest, PlacementStrategy, Placer,
};
pub use crmdeck_layout::registry::{WidgetKind, WidgetRegistry};
pub use crmdeck_layout::reorder::{OrderedItem, ReorderOutcome, reorder};
pub use crmdeck_layout::template::{
    ComponentKind, DocumentError, PlacedComponent, TemplateData, TemplateDocument, TextStyle,
};
pub use crmdeck_layout::zones::ReorderZones;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for crmdeck hosts.
#[derive(Debug)]
pub enum Error {
    /// Invalid engine configuration.
    Config(ConfigError),
    /// Dashboard page descriptor rejected.
    Descriptor(DescriptorError),
    /// Placement request rejected.
    Placement(PlacementError),
    /// Template edit or load rejected.
    Document(DocumentError),
    /// Engine configuration JSON could not be parsed.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Descriptor(err) => write!(f, "{err}"),
            Self::Placement(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Descriptor(err) => Some(err),
            Self::Placement(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DescriptorError> for Error {
    fn from(err: DescriptorError) -> Self {
        Self::Descriptor(err)
    }
}

impl From<PlacementError> for Error {
    fn from(err: PlacementError) -> Self {
        Self::Placement(err)
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Standard result type for crmdeck APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Engine ---------------------------------------------------------------

/// A validated configuration and the factories that depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Wrap `config` after validating it.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Defaults overridden by `CRMDECK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    /// Parse a JSON engine configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Self::new(config)
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn placer(&self) -> Placer {
        Placer::new(self.config.page, self.config.placement)
    }

    /// Empty single-page template.
    #[must_use]
    pub fn new_template(&self, title: impl Into<String>) -> TemplateDocument {
        TemplateDocument::new(title, &self.config)
    }

    /// Load a saved template payload.
    pub fn load_template(&self, json: &str) -> Result<TemplateDocument> {
        Ok(TemplateDocument::from_json(json, &self.config)?)
    }

    /// Parse a dashboard page descriptor into a reorderable board.
    pub fn dashboard(&self, json: &str) -> Result<DashboardBoard> {
        let page = PageConfig::from_json(json)?;
        Ok(DashboardBoard::from_page(&page, self.config.grid_wrap))
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    //! Common imports for hosts.

    pub use crate::{
        Capabilities, ComponentKind, DashboardBoard, DragEffect, DragInput, DragInputKind,
        DragKind, Engine, EngineConfig, Error, HoverPolicy, OrderedItem, PermissionCheck,
        Placement, PlacementStrategy, Point, Rect, ReorderOutcome, ReorderZones, Result, Session,
        Size, TemplateDocument,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "title": "Home",
        "widgets": [
            {"type": "bar-chart", "id": "a", "dataKey": "k1"},
            {"type": "chat", "id": "b", "dataKey": "k2"}
        ]
    }"#;

    #[test]
    fn engine_builds_boards_and_templates() {
        let engine = Engine::default();
        let mut board = engine.dashboard(PAGE).unwrap();
        assert!(board.move_widget(1, 0).is_moved());
        assert_eq!(board.widgets()[0].widget.id, "b");

        let mut doc = engine.new_template("Quote");
        let dropped = doc
            .drop_component(ComponentKind::Calculation, Point::new(300, 300), 1)
            .unwrap();
        assert_eq!(dropped.placement.strategy, PlacementStrategy::Direct);
        let reloaded = engine.load_template(&doc.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.components().len(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.history_capacity = 0;
        assert!(matches!(Engine::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn engine_loads_partial_json_config() {
        let engine = Engine::from_json(r#"{"history_capacity": 7}"#).unwrap();
        assert_eq!(engine.config().history_capacity, 7);
        assert_eq!(engine.config().placement, PlacementTuning::default());

        let err = Engine::from_json("{history").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(std::error::Error::source(&err).is_some());

        let err = Engine::from_json(r#"{"history_capacity": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotPositive { .. })));
    }

    #[test]
    fn errors_convert_and_chain() {
        let err: Error = Engine::default().dashboard("nope").unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = PlacementError::PageZero.into();
        assert_eq!(err.to_string(), "page numbers start at 1");
    }
}
