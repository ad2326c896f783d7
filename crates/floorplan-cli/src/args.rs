//! Command-line argument definitions for the Floorplan CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every invocation names a layout file and one editing
//! command; global options select the configuration file and logging
//! verbosity.

use clap::{Parser, Subcommand};

use floorplan::entity::{EntityId, EntityKey, EntityKind};

/// Command-line arguments for the Floorplan layout editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the layout snapshot (JSON)
    #[arg(help = "Path to the layout file")]
    pub layout: String,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Editing commands applied to the layout file
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the layout from an entity listing
    ///
    /// Entities already in the layout file keep their saved rectangle.
    Seed {
        /// Path to the entity listing (JSON array)
        #[arg(long)]
        listing: String,

        /// Ignore rectangles saved in the layout file
        #[arg(long)]
        fresh: bool,
    },

    /// Place a new entity in the first free slot of its floor
    Place {
        #[command(flatten)]
        entity: EntityArg,

        /// Entity type, e.g. "双人间" or "elevator"
        #[arg(long = "type")]
        entity_type: String,

        /// Floor number, starting at 1
        #[arg(long)]
        floor: i64,
    },

    /// Drag an entity by a pointer offset; the result snaps to the grid
    Move {
        #[command(flatten)]
        entity: EntityArg,

        #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
        dx: i32,

        #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
        dy: i32,
    },

    /// Drag an entity's resize handle by a pointer offset
    Resize {
        #[command(flatten)]
        entity: EntityArg,

        #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
        dw: i32,

        #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
        dh: i32,

        /// Apply the new size to every entity of the same type on this floor
        #[arg(long, conflicts_with = "all_floors")]
        same_floor: bool,

        /// Apply the new size to every entity of the same type on any floor
        #[arg(long)]
        all_floors: bool,
    },

    /// Rotate an entity by a quarter turn
    Rotate {
        #[command(flatten)]
        entity: EntityArg,
    },

    /// Remove an entity from the layout
    Remove {
        #[command(flatten)]
        entity: EntityArg,
    },

    /// Put every entity back on the seeding grid with its default size
    Reset,

    /// Print the layout, one floor at a time
    Show {
        /// Only print this floor
        #[arg(long)]
        floor: Option<i64>,
    },

    /// Write the bulk position update for one entity kind
    ExportBatch {
        /// Entity kind (room, facility)
        #[arg(long)]
        kind: EntityKind,

        /// Path to the output file
        #[arg(short, long, default_value = "batch.json")]
        output: String,
    },
}

/// Selects one entity of the layout
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct EntityArg {
    /// Entity kind (room, facility)
    #[arg(long)]
    pub kind: EntityKind,

    /// Entity id
    #[arg(long)]
    pub id: u64,
}

impl EntityArg {
    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind, EntityId::new(self.id))
    }
}
