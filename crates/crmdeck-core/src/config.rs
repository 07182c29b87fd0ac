#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every tunable of the arrangement engines lives here with defaults that
//! reproduce the dashboard's stock behavior: an A4 page at 96 DPI, a 10px
//! collision tolerance, a 20px spiral step out to 200px, a 25px grid scan,
//! and a 50-entry undo history.
//!
//! Overrides come from `CRMDECK_*` environment variables. Detection is
//! deterministic given an environment lookup, so tests pass a closure instead
//! of mutating the process environment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Sides, Size};

/// A4 width in pixels at 96 DPI.
pub const A4_WIDTH_PX: i32 = 816;
/// A4 height in pixels at 96 DPI.
pub const A4_HEIGHT_PX: i32 = 1056;

const ENV_PAGE_WIDTH: &str = "CRMDECK_PAGE_WIDTH";
const ENV_PAGE_HEIGHT: &str = "CRMDECK_PAGE_HEIGHT";
const ENV_COLLISION_TOLERANCE: &str = "CRMDECK_COLLISION_TOLERANCE";
const ENV_HISTORY_CAPACITY: &str = "CRMDECK_HISTORY_CAPACITY";
const ENV_SPIRAL_STEP: &str = "CRMDECK_SPIRAL_STEP";
const ENV_SPIRAL_MAX_RADIUS: &str = "CRMDECK_SPIRAL_MAX_RADIUS";
const ENV_GRID_STEP: &str = "CRMDECK_GRID_STEP";
const ENV_GRID_PER_ROW: &str = "CRMDECK_GRID_PER_ROW";

/// Canvas page dimensions and the margins placement respects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub size: Size,
    /// Margins applied when searching a crowded page. `top` reserves room for
    /// the page header.
    pub search_margins: Sides,
    /// Roomier margins used on an empty page and by the stacking fallback.
    pub safe_margins: Sides,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            size: Size::new(A4_WIDTH_PX, A4_HEIGHT_PX),
            search_margins: Sides::new(80, 10, 10, 10),
            safe_margins: Sides::new(100, 20, 20, 20),
        }
    }
}

/// Search parameters for free-form placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementTuning {
    /// Overlap slack in pixels before two rectangles count as colliding.
    pub collision_tolerance: i32,
    /// Radius increment of the spiral search.
    pub spiral_step: i32,
    /// Largest spiral radius tried before falling back to the grid scan.
    pub spiral_max_radius: i32,
    /// Cell pitch of the grid scan.
    pub grid_step: i32,
    /// Gap left between the rightmost component and a stacked one.
    pub stack_gap: i32,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            collision_tolerance: 10,
            spiral_step: 20,
            spiral_max_radius: 200,
            grid_step: 25,
            stack_gap: 20,
        }
    }
}

/// Clamps applied while a placed component is being moved or resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureLimits {
    /// Topmost `y` a component may be dragged to.
    pub move_min_y: i32,
    pub min_size: Size,
}

impl Default for GestureLimits {
    fn default() -> Self {
        Self {
            move_min_y: 60,
            min_size: Size::new(100, 50),
        }
    }
}

/// Wrapping rule used to derive dashboard `(row, col)` from list position.
///
/// Position `i` lands in column `i % per_row + 1` of row
/// `first_row + (i / per_row) * row_stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWrap {
    pub per_row: u32,
    pub first_row: u32,
    pub row_stride: u32,
}

impl Default for GridWrap {
    fn default() -> Self {
        Self {
            per_row: 4,
            first_row: 1,
            row_stride: 2,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub page: PageGeometry,
    pub placement: PlacementTuning,
    pub gestures: GestureLimits,
    pub grid_wrap: GridWrap,
    /// Maximum number of undo snapshots retained.
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            placement: PlacementTuning::default(),
            gestures: GestureLimits::default(),
            grid_wrap: GridWrap::default(),
            history_capacity: 50,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `CRMDECK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom environment lookup (for tests).
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_env::<i32, _>(&get_env, ENV_PAGE_WIDTH)? {
            config.page.size.width = value;
        }
        if let Some(value) = parse_env::<i32, _>(&get_env, ENV_PAGE_HEIGHT)? {
            config.page.size.height = value;
        }
        if let Some(value) = parse_env::<i32, _>(&get_env, ENV_COLLISION_TOLERANCE)? {
            config.placement.collision_tolerance = value;
        }
        if let Some(value) = parse_env::<usize, _>(&get_env, ENV_HISTORY_CAPACITY)? {
            config.history_capacity = value;
        }
        if let Some(value) = parse_env::<i32, _>(&get_env, ENV_SPIRAL_STEP)? {
            config.placement.spiral_step = value;
        }
        if let Some(value) = parse_env::<i32, _>(&get_env, ENV_SPIRAL_MAX_RADIUS)? {
            config.placement.spiral_max_radius = value;
        }
        if let Some(value) = parse_env::<i32, _>(&get_env, ENV_GRID_STEP)? {
            config.placement.grid_step = value;
        }
        if let Some(value) = parse_env::<u32, _>(&get_env, ENV_GRID_PER_ROW)? {
            config.grid_wrap.per_row = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the engines loop forever or divide by zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("page.size.width", i64::from(self.page.size.width)),
            ("page.size.height", i64::from(self.page.size.height)),
            ("placement.spiral_step", i64::from(self.placement.spiral_step)),
            ("placement.grid_step", i64::from(self.placement.grid_step)),
            ("grid_wrap.per_row", i64::from(self.grid_wrap.per_row)),
            ("grid_wrap.first_row", i64::from(self.grid_wrap.first_row)),
            ("grid_wrap.row_stride", i64::from(self.grid_wrap.row_stride)),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let non_negative = [
            (
                "placement.collision_tolerance",
                self.placement.collision_tolerance,
            ),
            ("placement.spiral_max_radius", self.placement.spiral_max_radius),
            ("placement.stack_gap", self.placement.stack_gap),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        let span = self.page.size.width.saturating_add(self.page.size.height);
        if self.placement.spiral_max_radius > span {
            return Err(ConfigError::TooLarge {
                field: "placement.spiral_max_radius",
                value: self.placement.spiral_max_radius,
                max: span,
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::NotPositive {
                field: "history_capacity",
                value: 0,
            });
        }
        Ok(())
    }
}

fn parse_env<T, F>(get_env: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = get_env(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}

/// Configuration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
    NotPositive { field: &'static str, value: i64 },
    Negative { field: &'static str, value: i32 },
    /// Spiral radius reaching past the page entirely.
    TooLarge { field: &'static str, value: i32, max: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "environment variable {key} has unparsable value {value:?}")
            }
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::TooLarge { field, value, max } => {
                write!(f, "{field} must be at most {max}, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
