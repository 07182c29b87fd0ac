#![forbid(unsafe_code)]

//! Page descriptors supplied by the backend.
//!
//! The JSON shape matches the page-config payload: camelCase keys, widget
//! grid metadata nested under `xl`. Missing grid settings fall back to a
//! 12-column grid with 250px rows; missing widget sizes fall back to a 4×1
//! span.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of grid columns when the descriptor omits them.
pub const DEFAULT_GRID_COLUMNS: u32 = 12;
/// Default grid row height in pixels.
pub const DEFAULT_ROW_HEIGHT_PX: u32 = 250;
/// Default widget span in grid columns.
pub const DEFAULT_WIDGET_WIDTH: u32 = 4;
/// Default widget span in grid rows.
pub const DEFAULT_WIDGET_HEIGHT: u32 = 1;

/// Span of a widget in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSize {
    #[serde(default = "default_widget_width")]
    pub width: u32,
    #[serde(default = "default_widget_height")]
    pub height: u32,
}

impl Default for WidgetSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDGET_WIDTH,
            height: DEFAULT_WIDGET_HEIGHT,
        }
    }
}

/// 1-based grid coordinates of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub row: u32,
    pub col: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
}

impl GridPosition {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            col_span: None,
            row_span: None,
        }
    }
}

/// Grid metadata for the extra-large breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetPlacement {
    #[serde(default)]
    pub size: WidgetSize,
    #[serde(default)]
    pub position: GridPosition,
}

/// One dashboard widget descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(rename = "type")]
    pub widget_type: String,
    pub id: String,
    pub data_key: String,
    #[serde(default)]
    pub xl: WidgetPlacement,
}

/// Column layout hints for the page body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<String>,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub gutter: u32,
}

/// Widget grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    #[serde(default = "default_grid_columns")]
    pub columns: u32,
    #[serde(default = "default_row_height")]
    pub row_height: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            row_height: DEFAULT_ROW_HEIGHT_PX,
        }
    }
}

/// A server-supplied dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    pub title: String,
    #[serde(default)]
    pub layout: PageLayout,
    #[serde(default)]
    pub grid: GridSpec,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl PageConfig {
    /// Parse a page-config payload.
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        let config: Self = serde_json::from_str(json).map_err(DescriptorError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject duplicate widget ids; reorder keys on them.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for widget in &self.widgets {
            if !seen.insert(widget.id.as_str()) {
                return Err(DescriptorError::DuplicateWidgetId {
                    id: widget.id.clone(),
                });
            }
        }
        if self.grid.columns == 0 {
            return Err(DescriptorError::ZeroGridColumns);
        }
        Ok(())
    }
}

/// Descriptor parsing failures.
#[derive(Debug)]
pub enum DescriptorError {
    Malformed(serde_json::Error),
    DuplicateWidgetId { id: String },
    ZeroGridColumns,
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(source) => write!(f, "malformed page descriptor: {source}"),
            Self::DuplicateWidgetId { id } => write!(f, "duplicate widget id {id:?}"),
            Self::ZeroGridColumns => write!(f, "grid must have at least one column"),
        }
    }
}

impl std::error::Error for DescriptorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(source) => Some(source),
            Self::DuplicateWidgetId { .. } | Self::ZeroGridColumns => None,
        }
    }
}

fn default_widget_width() -> u32 {
    DEFAULT_WIDGET_WIDTH
}

fn default_widget_height() -> u32 {
    DEFAULT_WIDGET_HEIGHT
}

fn default_grid_columns() -> u32 {
    DEFAULT_GRID_COLUMNS
}

fn default_row_height() -> u32 {
    DEFAULT_ROW_HEIGHT_PX
}
