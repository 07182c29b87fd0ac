#![forbid(unsafe_code)]

//! Widget type registry.
//!
//! Maps the `type` string of a widget descriptor to a renderer-agnostic
//! [`WidgetKind`]. Hosts register extra kinds at startup; unknown types
//! resolve to `None` and are skipped by the renderer.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Renderer-agnostic widget category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    BarChart,
    LineChart,
    Table,
    Calendar,
    Chat,
    /// Host-registered kind, carrying the renderer key the host chose.
    Custom(String),
}

/// Lookup table from descriptor `type` strings to widget kinds.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    kinds: FxHashMap<String, WidgetKind>,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl WidgetRegistry {
    /// Registry holding no kinds at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kinds: FxHashMap::default(),
        }
    }

    /// Registry preloaded with the stock dashboard widgets.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("bar-chart", WidgetKind::BarChart);
        registry.register("line-chart", WidgetKind::LineChart);
        registry.register("table", WidgetKind::Table);
        registry.register("calendar", WidgetKind::Calendar);
        registry.register("chat", WidgetKind::Chat);
        registry
    }

    /// Register or replace the kind for `widget_type`. Returns the previous kind.
    pub fn register(&mut self, widget_type: impl Into<String>, kind: WidgetKind) -> Option<WidgetKind> {
        self.kinds.insert(widget_type.into(), kind)
    }

    #[must_use]
    pub fn get(&self, widget_type: &str) -> Option<&WidgetKind> {
        self.kinds.get(widget_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
