//! Placement of new entities on a floor.
//!
//! Two strategies are provided:
//!
//! - [`find_free_rect`] scans the canvas in row-major order and returns the
//!   first grid-aligned corner where a rectangle of the requested size does
//!   not overlap anything already on the floor.
//! - [`PlacementFinder::seed_position`] lays entities out on a fixed
//!   row/column grid by their index. It ignores occupancy and is only used
//!   to give a first position to entities loaded without one.
//!
//! Both are deterministic: identical inputs always yield the identical point.

use log::{trace, warn};

use floorplan_core::geometry::{Point, Rect, Size};

use crate::config::{AppConfig, SeedingConfig};

/// The region and stepping used by [`find_free_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementBounds {
    canvas: Rect,
    scan_origin: Point,
    step: i32,
}

impl PlacementBounds {
    /// Creates bounds scanning `canvas` from one grid cell in from its
    /// top-left corner, stepping by `step` on both axes.
    pub fn new(canvas: Rect, step: i32) -> Self {
        let step = step.max(1);
        Self {
            canvas,
            scan_origin: canvas.origin().add_point(Point::new(step, step)),
            step,
        }
    }

    /// Sets the first candidate corner of the scan (builder style).
    pub fn with_scan_origin(mut self, scan_origin: Point) -> Self {
        self.scan_origin = scan_origin;
        self
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub fn scan_origin(&self) -> Point {
        self.scan_origin
    }

    pub fn step(&self) -> i32 {
        self.step
    }
}

/// Finds the first free top-left corner for a rectangle of `size`.
///
/// Candidates are visited row by row, left to right, starting at the scan
/// origin and stepping by the grid unit. A candidate is accepted when its
/// right and bottom edges stay strictly inside the canvas and it overlaps
/// none of the `occupied` rectangles. A rectangle ending exactly on the
/// canvas edge is rejected.
///
/// When no candidate fits, the scan origin is returned; the new rectangle
/// then overlaps something instead of failing to be placed.
///
/// # Examples
///
/// ```
/// # use floorplan::placement::{PlacementBounds, find_free_rect};
/// # use floorplan_core::geometry::{Point, Rect, Size};
/// let occupied = [Rect::new(0, 0, 100, 100)];
/// let bounds = PlacementBounds::new(Rect::new(0, 0, 400, 400), 20)
///     .with_scan_origin(Point::new(0, 0));
///
/// let corner = find_free_rect(Size::new(80, 80), &occupied, &bounds);
/// assert_eq!(corner, Point::new(100, 0));
/// ```
pub fn find_free_rect(size: Size, occupied: &[Rect], bounds: &PlacementBounds) -> Point {
    let canvas = bounds.canvas();
    let origin = bounds.scan_origin();
    let step = bounds.step() as usize;

    let last_top = canvas.bottom().saturating_sub(size.height());
    let last_left = canvas.right().saturating_sub(size.width());

    for top in (origin.y()..last_top).step_by(step) {
        for left in (origin.x()..last_left).step_by(step) {
            let candidate = Rect::from_origin(Point::new(left, top), size);
            if !fits_inside(&candidate, &canvas) {
                continue;
            }
            if occupied.iter().all(|other| !candidate.overlaps(other)) {
                trace!(left, top, occupied_count = occupied.len(); "Found free slot");
                return candidate.origin();
            }
        }
    }

    warn!(
        width = size.width(),
        height = size.height(),
        occupied_count = occupied.len();
        "No free slot on canvas, falling back to scan origin"
    );
    origin
}

/// Left and top may touch the canvas edge; right and bottom may not.
fn fits_inside(candidate: &Rect, canvas: &Rect) -> bool {
    candidate.left() >= canvas.left()
        && candidate.top() >= canvas.top()
        && candidate.right() < canvas.right()
        && candidate.bottom() < canvas.bottom()
}

/// Placement strategies configured from an [`AppConfig`].
#[derive(Debug, Clone)]
pub struct PlacementFinder {
    bounds: PlacementBounds,
    seeding: SeedingConfig,
}

impl PlacementFinder {
    /// Creates a finder scanning the configured canvas on the configured grid.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            bounds: PlacementBounds::new(config.canvas().to_rect(), config.grid().size()),
            seeding: *config.seeding(),
        }
    }

    pub fn bounds(&self) -> &PlacementBounds {
        &self.bounds
    }

    /// Finds the first free corner for `size` among `occupied`.
    ///
    /// See [`find_free_rect`].
    pub fn find_free(&self, size: Size, occupied: &[Rect]) -> Point {
        find_free_rect(size, occupied, &self.bounds)
    }

    /// Returns the seeding position of the entity at `index` in a loaded list.
    ///
    /// # Examples
    ///
    /// ```
    /// # use floorplan::{config::AppConfig, placement::PlacementFinder};
    /// # use floorplan_core::geometry::Point;
    /// let finder = PlacementFinder::new(&AppConfig::default());
    ///
    /// assert_eq!(finder.seed_position(0), Point::new(20, 20));
    /// assert_eq!(finder.seed_position(3), Point::new(920, 20));
    /// assert_eq!(finder.seed_position(4), Point::new(20, 260));
    /// ```
    pub fn seed_position(&self, index: usize) -> Point {
        let columns = self.seeding.columns();
        let col = to_coordinate(index % columns);
        let row = to_coordinate(index / columns);

        Point::new(
            col.saturating_mul(self.seeding.cell_width())
                .saturating_add(self.seeding.origin()),
            row.saturating_mul(self.seeding.cell_height())
                .saturating_add(self.seeding.origin()),
        )
    }
}

fn to_coordinate(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
