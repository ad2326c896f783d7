//! Configuration types for the floor-plan editor.
//!
//! This module provides configuration structures that control grid snapping,
//! the canvas scanned for free space, the default grid used to seed
//! positions and the resize limits of each entity kind. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources, and
//! every field falls back to its default when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`GridConfig`] - The snapping grid unit.
//! - [`CanvasConfig`] - The area the placement finder scans on every floor.
//! - [`SeedingConfig`] - Row/column pitch for entities without a stored position.
//! - [`LimitsConfig`] - Minimum and maximum entity dimensions.
//!
//! # Example
//!
//! ```
//! # use floorplan::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.grid().size(), 20);
//! assert_eq!(config.seeding().columns(), 4);
//! ```

use serde::Deserialize;

use floorplan_core::{
    entity::{EntityKind, FACILITY_MIN_SIZE, MAX_SIZE, ROOM_MIN_SIZE},
    geometry::{GRID_SIZE, Rect, SizeLimits},
};

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Grid configuration section.
    #[serde(default)]
    grid: GridConfig,

    /// Canvas configuration section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Seeding configuration section.
    #[serde(default)]
    seeding: SeedingConfig,

    /// Size limits configuration section.
    #[serde(default)]
    limits: LimitsConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        grid: GridConfig,
        canvas: CanvasConfig,
        seeding: SeedingConfig,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            grid,
            canvas,
            seeding,
            limits,
        }
    }

    /// Returns the grid configuration.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Returns the seeding configuration.
    pub fn seeding(&self) -> &SeedingConfig {
        &self.seeding
    }

    /// Returns the size limits configuration.
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }
}

/// Snapping grid configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    size: i32,
}

impl GridConfig {
    pub fn new(size: i32) -> Self {
        Self { size }
    }

    /// Returns the grid unit in pixels.
    pub fn size(&self) -> i32 {
        self.size
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: GRID_SIZE }
    }
}

/// The drawable area of one floor.
///
/// The placement finder only proposes rectangles that fit entirely inside
/// the canvas. Dragging is not constrained by it.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: i32,
    height: i32,
}

impl CanvasConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns the canvas as a rectangle anchored at the origin.
    pub fn to_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

/// Row-major grid used to seed entities that have no stored position.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    columns: usize,
    cell_width: i32,
    cell_height: i32,
    origin: i32,
}

impl SeedingConfig {
    /// Creates a new [`SeedingConfig`].
    ///
    /// # Arguments
    ///
    /// * `columns` - Entities per row.
    /// * `cell_width` - Horizontal pitch between seeded entities.
    /// * `cell_height` - Vertical pitch between seeded rows.
    /// * `origin` - Offset of the first cell from the canvas corner, on both axes.
    pub fn new(columns: usize, cell_width: i32, cell_height: i32, origin: i32) -> Self {
        Self {
            columns,
            cell_width,
            cell_height,
            origin,
        }
    }

    /// Returns the number of entities per row; never zero.
    pub fn columns(&self) -> usize {
        self.columns.max(1)
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_height
    }

    pub fn origin(&self) -> i32 {
        self.origin
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            cell_width: 300,
            cell_height: 240,
            origin: 20,
        }
    }
}

/// Minimum and maximum entity dimensions applied while resizing.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    room_min: i32,
    facility_min: i32,
    max: i32,
}

impl LimitsConfig {
    pub fn new(room_min: i32, facility_min: i32, max: i32) -> Self {
        Self {
            room_min,
            facility_min,
            max,
        }
    }

    /// Returns the smallest width or height of a room.
    pub fn room_min(&self) -> i32 {
        self.room_min
    }

    /// Returns the smallest width or height of a facility.
    pub fn facility_min(&self) -> i32 {
        self.facility_min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Returns the [`SizeLimits`] that apply to entities of `kind`.
    pub fn for_kind(&self, kind: EntityKind) -> SizeLimits {
        match kind {
            EntityKind::Room => SizeLimits::new(self.room_min, self.max),
            EntityKind::Facility => SizeLimits::new(self.facility_min, self.max),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            room_min: ROOM_MIN_SIZE,
            facility_min: FACILITY_MIN_SIZE,
            max: MAX_SIZE,
        }
    }
}
