#![forbid(unsafe_code)]

//! Free-form placement on a fixed-size canvas page.
//!
//! Given a target top-left corner and a component size, [`Placer::place`]
//! finds a position on the page that does not overlap any other component on
//! the same page by more than the collision tolerance. Strategies run in
//! order and the first one that yields a position wins:
//!
//! 1. [`PlacementStrategy::Direct`]: the target, clamped into the page.
//! 2. [`PlacementStrategy::Spiral`]: rings of growing radius around the
//!    target, eight probes per ring.
//! 3. [`PlacementStrategy::GridScan`]: row-major scan of the whole page.
//! 4. [`PlacementStrategy::Stack`]: beside the rightmost component. This one
//!    always answers and may overlap; [`Placement::collision_free`] says
//!    whether it did.
//!
//! An empty page short-circuits the chain with the roomier safe margins.

use std::fmt;

use crmdeck_core::config::{PageGeometry, PlacementTuning};
use crmdeck_core::geometry::{Point, Rect, Size, clamp_span};
use serde::{Deserialize, Serialize};

/// Something already occupying space on a page.
pub trait Obstacle {
    fn obstacle_id(&self) -> &str;

    /// 1-based page number.
    fn page(&self) -> u32;

    fn bounds(&self) -> Rect;
}

/// Minimal [`Obstacle`] for callers that only track rectangles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRect {
    pub id: String,
    pub page: u32,
    pub rect: Rect,
}

impl PageRect {
    #[must_use]
    pub fn new(id: impl Into<String>, page: u32, rect: Rect) -> Self {
        Self {
            id: id.into(),
            page,
            rect,
        }
    }
}

impl Obstacle for PageRect {
    fn obstacle_id(&self) -> &str {
        &self.id
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// A validated placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    target: Point,
    size: Size,
    page: u32,
}

impl PlacementRequest {
    /// Validate a request. Sizes must be positive and pages start at 1.
    pub fn new(target: Point, size: Size, page: u32) -> Result<Self, PlacementError> {
        if size.width <= 0 || size.height <= 0 {
            return Err(PlacementError::NonPositiveSize { size });
        }
        if page == 0 {
            return Err(PlacementError::PageZero);
        }
        Ok(Self { target, size, page })
    }

    #[must_use]
    pub const fn target(&self) -> Point {
        self.target
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }
}

/// Which strategy produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    Direct,
    Spiral,
    GridScan,
    Stack,
}

/// Result of a placement search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Point,
    pub strategy: PlacementStrategy,
    /// `false` only when the stacking fallback landed on another component,
    /// which signals a full page.
    pub collision_free: bool,
}

/// Invalid placement requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    NonPositiveSize { size: Size },
    PageZero,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveSize { size } => write!(
                f,
                "component size must be positive, got {}x{}",
                size.width, size.height
            ),
            Self::PageZero => write!(f, "page numbers start at 1"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Everything a strategy may look at.
struct SearchContext<'a> {
    geometry: &'a PageGeometry,
    tuning: &'a PlacementTuning,
    request: PlacementRequest,
    obstacles: &'a [Rect],
}

impl SearchContext<'_> {
    fn clamp_search(&self, point: Point) -> Point {
        clamp_with(self.geometry, self.request.size, point, false)
    }

    fn clamp_safe(&self, point: Point) -> Point {
        clamp_with(self.geometry, self.request.size, point, true)
    }

    fn is_free(&self, position: Point) -> bool {
        is_free_among(
            self.obstacles,
            Rect::from_parts(position, self.request.size),
            self.tuning.collision_tolerance,
        )
    }
}

type StrategyFn = fn(&SearchContext<'_>) -> Option<Point>;

const STRATEGY_CHAIN: [(PlacementStrategy, StrategyFn); 4] = [
    (PlacementStrategy::Direct, direct),
    (PlacementStrategy::Spiral, spiral),
    (PlacementStrategy::GridScan, grid_scan),
    (PlacementStrategy::Stack, stack),
];

const SPIRAL_DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

fn direct(ctx: &SearchContext<'_>) -> Option<Point> {
    let candidate = ctx.clamp_search(ctx.request.target);
    ctx.is_free(candidate).then_some(candidate)
}

fn spiral(ctx: &SearchContext<'_>) -> Option<Point> {
    let step = ctx.tuning.spiral_step;
    if step <= 0 {
        return None;
    }
    let target = ctx.request.target;
    let mut radius = step;
    while radius <= ctx.tuning.spiral_max_radius {
        for (dx, dy) in SPIRAL_DIRECTIONS {
            let candidate = ctx.clamp_search(target.offset(dx * radius, dy * radius));
            if ctx.is_free(candidate) {
                return Some(candidate);
            }
        }
        let Some(next) = radius.checked_add(step) else {
            break;
        };
        radius = next;
    }
    None
}

fn grid_scan(ctx: &SearchContext<'_>) -> Option<Point> {
    let step = ctx.tuning.grid_step;
    if step <= 0 {
        return None;
    }
    let page = ctx.geometry.size;
    let size = ctx.request.size;
    let max_x = page
        .width
        .saturating_sub(size.width)
        .saturating_sub(ctx.geometry.safe_margins.right);
    let max_y = page
        .height
        .saturating_sub(size.height)
        .saturating_sub(ctx.geometry.safe_margins.bottom);

    let mut y = ctx.geometry.search_margins.top;
    while y <= max_y {
        let mut x = ctx.geometry.search_margins.left;
        while x <= max_x {
            let candidate = Point::new(x, y);
            if ctx.is_free(candidate) {
                return Some(candidate);
            }
            x = x.saturating_add(step);
        }
        y = y.saturating_add(step);
    }
    None
}

/// Beside the rightmost component at the target row, or at the left margin
/// below the lowest component when that column is past the page edge.
fn stack(ctx: &SearchContext<'_>) -> Option<Point> {
    let safe = ctx.geometry.safe_margins;
    let gap = ctx.tuning.stack_gap;
    let max_x = ctx
        .geometry
        .size
        .width
        .saturating_sub(ctx.request.size.width)
        .saturating_sub(safe.right);
    let rightmost = ctx
        .obstacles
        .iter()
        .map(Rect::right)
        .max()
        .unwrap_or(safe.left);
    let beside = rightmost.saturating_add(gap);
    if beside <= max_x {
        return Some(Point::new(beside, ctx.clamp_safe(ctx.request.target).y));
    }
    let lowest = ctx
        .obstacles
        .iter()
        .map(Rect::bottom)
        .max()
        .unwrap_or(safe.top);
    Some(ctx.clamp_safe(Point::new(safe.left, lowest.saturating_add(gap))))
}

fn clamp_with(geometry: &PageGeometry, size: Size, point: Point, safe: bool) -> Point {
    let margins = if safe {
        geometry.safe_margins
    } else {
        geometry.search_margins
    };
    let page = geometry.size;
    Point::new(
        clamp_span(
            point.x,
            margins.left,
            page.width.saturating_sub(size.width).saturating_sub(margins.right),
        ),
        clamp_span(
            point.y,
            margins.top,
            page.height.saturating_sub(size.height).saturating_sub(margins.bottom),
        ),
    )
}

fn is_free_among(obstacles: &[Rect], candidate: Rect, tolerance: i32) -> bool {
    !obstacles
        .iter()
        .any(|other| candidate.collides_with(other, tolerance))
}

/// Placement engine for one page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placer {
    geometry: PageGeometry,
    tuning: PlacementTuning,
}

impl Placer {
    #[must_use]
    pub const fn new(geometry: PageGeometry, tuning: PlacementTuning) -> Self {
        Self { geometry, tuning }
    }

    #[must_use]
    pub const fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn tuning(&self) -> &PlacementTuning {
        &self.tuning
    }

    /// Clamp `point` so a `size` component stays within the search margins.
    #[must_use]
    pub fn clamp_to_page(&self, point: Point, size: Size) -> Point {
        clamp_with(&self.geometry, size, point, false)
    }

    /// Top-left corner that centers a `size` component on `pointer`,
    /// clamped into the page.
    #[must_use]
    pub fn target_for_drop(&self, pointer: Point, size: Size) -> Point {
        self.clamp_to_page(
            pointer.offset(-(size.width / 2), -(size.height / 2)),
            size,
        )
    }

    /// Whether `rect` on `page` is free of every obstacle except `exclude_id`.
    #[must_use]
    pub fn is_free<O: Obstacle>(
        &self,
        rect: Rect,
        page: u32,
        existing: &[O],
        exclude_id: Option<&str>,
    ) -> bool {
        let obstacles = obstacles_on_page(existing, page, exclude_id);
        is_free_among(&obstacles, rect, self.tuning.collision_tolerance)
    }

    /// Find a position for `request` among `existing`.
    ///
    /// Obstacles on other pages and the one named `exclude_id` are ignored.
    #[must_use]
    pub fn place<O: Obstacle>(
        &self,
        request: &PlacementRequest,
        existing: &[O],
        exclude_id: Option<&str>,
    ) -> Placement {
        let obstacles = obstacles_on_page(existing, request.page, exclude_id);
        let ctx = SearchContext {
            geometry: &self.geometry,
            tuning: &self.tuning,
            request: *request,
            obstacles: &obstacles,
        };

        if obstacles.is_empty() {
            return Placement {
                position: ctx.clamp_safe(request.target),
                strategy: PlacementStrategy::Direct,
                collision_free: true,
            };
        }

        let found = STRATEGY_CHAIN
            .iter()
            .find_map(|(strategy, run)| run(&ctx).map(|position| (*strategy, position)));
        let (strategy, position) = found.unwrap_or_else(|| {
            (PlacementStrategy::Stack, ctx.clamp_safe(request.target))
        });
        let collision_free = strategy != PlacementStrategy::Stack || ctx.is_free(position);

        #[cfg(feature = "tracing")]
        {
            if strategy == PlacementStrategy::Stack {
                tracing::warn!(
                    page = request.page,
                    x = position.x,
                    y = position.y,
                    collision_free,
                    "placement search exhausted, stacking component"
                );
            } else {
                tracing::trace!(page = request.page, ?strategy, x = position.x, y = position.y, "placed");
            }
        }

        Placement {
            position,
            strategy,
            collision_free,
        }
    }

    /// Place a component dropped with its center at `pointer`.
    ///
    /// The centered target is used as-is when free; the search chain only
    /// runs on a collision.
    pub fn place_at_pointer<O: Obstacle>(
        &self,
        pointer: Point,
        size: Size,
        page: u32,
        existing: &[O],
    ) -> Result<Placement, PlacementError> {
        let target = self.target_for_drop(pointer, size);
        let request = PlacementRequest::new(target, size, page)?;
        if self.is_free(Rect::from_parts(target, size), page, existing, None) {
            return Ok(Placement {
                position: target,
                strategy: PlacementStrategy::Direct,
                collision_free: true,
            });
        }
        Ok(self.place(&request, existing, None))
    }
}

fn obstacles_on_page<O: Obstacle>(existing: &[O], page: u32, exclude_id: Option<&str>) -> Vec<Rect> {
    existing
        .iter()
        .filter(|item| item.page() == page && Some(item.obstacle_id()) != exclude_id)
        .map(Obstacle::bounds)
        .collect()
}
