//! Geometric primitives for floor-plan layout and positioning.
//!
//! This module provides the integer geometry used throughout Floorplan for
//! placing, moving and resizing rooms and facilities on a floor.
//!
//! # Overview
//!
//! - [`Point`] - A 2D pixel coordinate on a floor plan
//! - [`Size`] - Width and height dimensions
//! - [`Rect`] - An axis-aligned rectangle anchored at its top-left corner
//! - [`SizeLimits`] - Inclusive bounds applied to each dimension of a [`Size`]
//! - [`snap`] / [`snap_to`] - Grid snapping
//!
//! # Coordinate System
//!
//! Floorplan uses screen coordinates:
//!
//! ```text
//!   (0,0) ────────► +X (right)
//!     │
//!     │
//!     │
//!     ▼
//!    +Y (down)
//! ```
//!
//! All values are whole pixels. Every coordinate the editor commits is a
//! multiple of the grid unit ([`GRID_SIZE`]).

use serde::{Deserialize, Serialize};

/// The grid unit, in pixels, that all committed coordinates and sizes snap to.
pub const GRID_SIZE: i32 = 20;

/// Rounds `value` to the nearest multiple of [`GRID_SIZE`].
///
/// Ties round toward positive infinity.
///
/// # Examples
///
/// ```
/// # use floorplan_core::geometry::snap;
/// assert_eq!(snap(0), 0);
/// assert_eq!(snap(9), 0);
/// assert_eq!(snap(10), 20);
/// assert_eq!(snap(123), 120);
/// assert_eq!(snap(-10), 0);
/// assert_eq!(snap(-11), -20);
/// ```
pub fn snap(value: i32) -> i32 {
    snap_to(value, GRID_SIZE)
}

/// Rounds `value` to the nearest multiple of `grid`.
///
/// A non-positive `grid` disables snapping and returns `value` unchanged.
pub fn snap_to(value: i32, grid: i32) -> i32 {
    if grid <= 0 {
        return value;
    }

    // floor(value / grid + 1/2), computed exactly in integers.
    let grid = i64::from(grid);
    let cells = (2 * i64::from(value) + grid).div_euclid(2 * grid);
    (cells * grid).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// A 2D point on a floor plan, in pixels.
///
/// # Examples
///
/// ```
/// # use floorplan_core::geometry::Point;
/// let start = Point::new(100, 40);
/// let delta = Point::new(23, -7);
///
/// let moved = start.add_point(delta);
/// assert_eq!(moved, Point::new(123, 33));
/// assert_eq!(moved.snap(20), Point::new(120, 40));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> i32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> i32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: i32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: i32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, saturating at the `i32` range.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }

    /// Subtracts another point from this point, saturating at the `i32` range.
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x.saturating_sub(other.x),
            y: self.y.saturating_sub(other.y),
        }
    }

    /// Snaps both coordinates to the given grid.
    pub fn snap(self, grid: i32) -> Self {
        Self {
            x: snap_to(self.x, grid),
            y: snap_to(self.y, grid),
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> i32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> i32 {
        self.height
    }

    /// Grows or shrinks both dimensions by a pointer delta.
    pub fn add_delta(self, delta: Point) -> Self {
        Self {
            width: self.width.saturating_add(delta.x()),
            height: self.height.saturating_add(delta.y()),
        }
    }

    /// Snaps both dimensions to the given grid.
    pub fn snap(self, grid: i32) -> Self {
        Self {
            width: snap_to(self.width, grid),
            height: snap_to(self.height, grid),
        }
    }

    /// Clamps both dimensions into `limits`.
    pub fn clamp(self, limits: SizeLimits) -> Self {
        Self {
            width: limits.clamp(self.width),
            height: limits.clamp(self.height),
        }
    }
}

/// Inclusive lower and upper bound applied to each dimension of a [`Size`].
///
/// # Examples
///
/// ```
/// # use floorplan_core::geometry::{Size, SizeLimits};
/// let limits = SizeLimits::new(60, 400);
/// assert_eq!(limits.clamp(20), 60);
/// assert_eq!(limits.clamp(500), 400);
/// assert_eq!(Size::new(10, 1000).clamp(limits), Size::new(60, 400));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    min: i32,
    max: i32,
}

impl SizeLimits {
    /// Creates new limits. If `max < min`, `max` is raised to `min`.
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn min(self) -> i32 {
        self.min
    }

    pub fn max(self) -> i32 {
        self.max
    }

    /// Clamps a single dimension into `[min, max]`.
    pub fn clamp(self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Returns true if both dimensions of `size` lie within the limits.
    pub fn contains(self, size: Size) -> bool {
        let range = self.min..=self.max;
        range.contains(&size.width()) && range.contains(&size.height())
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
///
/// The right and bottom edges are exclusive: two rectangles that share an
/// edge do not overlap.
///
/// # Examples
///
/// ```
/// # use floorplan_core::geometry::Rect;
/// let a = Rect::new(0, 0, 100, 100);
/// let touching = Rect::new(100, 0, 80, 80);
/// let crossing = Rect::new(80, 20, 80, 80);
///
/// assert!(!a.overlaps(&touching));
/// assert!(a.overlaps(&crossing));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and dimensions.
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a rectangle from a top-left point and a size.
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x(), origin.y(), size.width(), size.height())
    }

    pub fn left(self) -> i32 {
        self.left
    }

    pub fn top(self) -> i32 {
        self.top
    }

    pub fn width(self) -> i32 {
        self.width
    }

    pub fn height(self) -> i32 {
        self.height
    }

    /// Returns the exclusive right edge.
    pub fn right(self) -> i32 {
        self.left.saturating_add(self.width)
    }

    /// Returns the exclusive bottom edge.
    pub fn bottom(self) -> i32 {
        self.top.saturating_add(self.height)
    }

    /// Returns the top-left corner.
    pub fn origin(self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns a copy moved so that its top-left corner is at `origin`.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.left = origin.x();
        self.top = origin.y();
        self
    }

    /// Returns a copy with the same top-left corner and a new size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.width = size.width();
        self.height = size.height();
        self
    }

    /// Axis-aligned bounding-box overlap test.
    ///
    /// Two rectangles do not overlap when one lies entirely to the left,
    /// right, above or below the other.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.left
            || self.left >= other.right()
            || self.bottom() <= other.top
            || self.top >= other.bottom())
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn coordinate_strategy() -> impl Strategy<Value = i32> {
        -100_000i32..100_000
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-1000i32..1000, -1000i32..1000, 1i32..500, 1i32..500)
            .prop_map(|(left, top, width, height)| Rect::new(left, top, width, height))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Snapping an already snapped value changes nothing.
    fn check_snap_is_idempotent(value: i32) -> Result<(), TestCaseError> {
        prop_assert_eq!(snap(snap(value)), snap(value));
        Ok(())
    }

    /// Snapping never reverses the order of two values.
    fn check_snap_is_monotonic(a: i32, b: i32) -> Result<(), TestCaseError> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(snap(low) <= snap(high));
        Ok(())
    }

    /// The snapped value is a grid multiple at most half a cell away.
    fn check_snap_is_nearest_multiple(value: i32) -> Result<(), TestCaseError> {
        let snapped = snap(value);
        prop_assert_eq!(snapped.rem_euclid(GRID_SIZE), 0);
        prop_assert!((snapped - value).abs() <= GRID_SIZE / 2);
        Ok(())
    }

    /// Overlap is a symmetric relation.
    fn check_overlap_is_symmetric(a: Rect, b: Rect) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        Ok(())
    }

    /// A non-empty rectangle always overlaps itself.
    fn check_rect_overlaps_itself(rect: Rect) -> Result<(), TestCaseError> {
        prop_assert!(rect.overlaps(&rect));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn snap_is_idempotent(value in coordinate_strategy()) {
            check_snap_is_idempotent(value)?;
        }

        #[test]
        fn snap_is_monotonic(a in coordinate_strategy(), b in coordinate_strategy()) {
            check_snap_is_monotonic(a, b)?;
        }

        #[test]
        fn snap_is_nearest_multiple(value in coordinate_strategy()) {
            check_snap_is_nearest_multiple(value)?;
        }

        #[test]
        fn overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            check_overlap_is_symmetric(a, b)?;
        }

        #[test]
        fn rect_overlaps_itself(rect in rect_strategy()) {
            check_rect_overlaps_itself(rect)?;
        }
    }
}
