#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels in page-local coordinates (origin at top-left,
//! `y` grows downward). Coordinates are signed so pointer positions that
//! wander outside a page can be represented before clamping.

use serde::{Deserialize, Serialize};

/// A pointer position or rectangle origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Signed displacement from `origin` to `self`.
    #[inline]
    #[must_use]
    pub const fn delta_from(self, origin: Point) -> (i32, i32) {
        (
            self.x.saturating_sub(origin.x),
            self.y.saturating_sub(origin.y),
        )
    }

    /// Return the point shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Width and height of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero or negative.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned rectangle used for bounding boxes, hit testing, and
/// collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Half-extent of the rectangle, relative to its own origin.
    #[inline]
    #[must_use]
    pub const fn half_extent(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    /// Whether the two rectangles overlap on both axes by more than
    /// `tolerance` pixels.
    ///
    /// A tolerance of `0` is the strict open-interval overlap test; edges that
    /// merely touch never collide.
    #[inline]
    #[must_use]
    pub const fn collides_with(&self, other: &Rect, tolerance: i32) -> bool {
        self.x < other.right().saturating_sub(tolerance)
            && self.right() > other.x.saturating_add(tolerance)
            && self.y < other.bottom().saturating_sub(tolerance)
            && self.bottom() > other.y.saturating_add(tolerance)
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    #[must_use]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle inside the current one with the given margin.
    #[must_use]
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x.saturating_add(margin.left),
            y: self.y.saturating_add(margin.top),
            width: self.width.saturating_sub(margin.horizontal_sum()).max(0),
            height: self.height.saturating_sub(margin.vertical_sum()).max(0),
        }
    }
}

/// Sides for page margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Create new sides with equal values.
    #[must_use]
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    #[must_use]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    #[must_use]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    #[must_use]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

/// Clamp `value` into `[min, max]`, preferring `min` when the range is empty.
///
/// A component larger than the usable span pins to the leading margin rather
/// than panicking like `i32::clamp` would.
#[inline]
#[must_use]
pub fn clamp_span(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Sides, Size, clamp_span};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 7)));
        assert!(!rect.contains(Point::new(6, 3)));
        assert!(!rect.contains(Point::new(2, 8)));
    }

    #[test]
    fn collision_respects_tolerance() {
        let a = Rect::new(0, 100, 200, 100);
        // Overlaps by exactly the tolerance on y: not a collision.
        assert!(!Rect::new(50, 190, 200, 100).collides_with(&a, 10));
        // One pixel deeper is.
        assert!(Rect::new(50, 189, 200, 100).collides_with(&a, 10));
        // Strict mode treats touching edges as free.
        assert!(!Rect::new(200, 100, 10, 10).collides_with(&a, 0));
        assert!(Rect::new(199, 100, 10, 10).collides_with(&a, 0));
    }

    #[test]
    fn collision_is_symmetric() {
        let a = Rect::new(10, 10, 50, 50);
        let b = Rect::new(40, 45, 30, 30);
        assert_eq!(a.collides_with(&b, 10), b.collides_with(&a, 10));
        assert_eq!(a.collides_with(&b, 0), b.collides_with(&a, 0));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection_opt(&b), Some(Rect::new(2, 2, 2, 2)));
        assert_eq!(a.intersection_opt(&Rect::new(4, 4, 1, 1)), None);
    }

    #[test]
    fn rect_inner_reduces_and_never_goes_negative() {
        let rect = Rect::new(0, 0, 816, 1056);
        let inner = rect.inner(Sides::new(80, 10, 10, 10));
        assert_eq!(inner, Rect::new(10, 80, 796, 966));
        assert_eq!(Rect::new(0, 0, 5, 5).inner(Sides::all(10)).size(), Size::new(0, 0));
    }

    #[test]
    fn point_delta_and_offset() {
        let origin = Point::new(10, 20);
        let moved = origin.offset(-15, 5);
        assert_eq!(moved, Point::new(-5, 25));
        assert_eq!(moved.delta_from(origin), (-15, 5));
    }

    #[test]
    fn clamp_span_handles_inverted_range() {
        assert_eq!(clamp_span(50, 10, 600), 50);
        assert_eq!(clamp_span(-5, 10, 600), 10);
        assert_eq!(clamp_span(900, 10, 600), 600);
        assert_eq!(clamp_span(300, 10, -4), 10);
    }
}
