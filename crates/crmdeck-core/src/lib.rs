#![forbid(unsafe_code)]

//! Core: geometry, capabilities, configuration, and logging for crmdeck.
//!
//! # Role in crmdeck
//! `crmdeck-core` holds the host-independent vocabulary shared by the
//! arrangement engines. It has no notion of lists, pages, or drags.
//!
//! # Primary responsibilities
//! - **Geometry**: pixel `Point`/`Size`/`Rect` with tolerance-aware collision.
//! - **Permissions**: `Capabilities` flags and the injected `PermissionCheck`.
//! - **Configuration**: `EngineConfig` defaults plus `CRMDECK_*` overrides.
//! - **Logging**: `tracing` re-exports and JSON subscriber setup.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod permission;

pub use config::{ConfigError, EngineConfig, GestureLimits, GridWrap, PageGeometry, PlacementTuning};
pub use geometry::{Point, Rect, Sides, Size};
pub use permission::{Capabilities, PermissionCheck, Session};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
