//! Error types for Floorplan operations.
//!
//! This module provides the main error type [`FloorplanError`] which wraps
//! the error conditions that can occur while loading, editing and saving a
//! layout. Pure geometry never fails: placement always yields a point and
//! out-of-range sizes are clamped rather than rejected.

use std::io;

use thiserror::Error;

use floorplan_core::{entity::EntityKey, error::EntityError};

use crate::resize::ResizeError;

/// The main error type for Floorplan operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the JSON document that failed to parse, so the
/// line and column reported by `serde_json` can be shown in context.
#[derive(Debug, Error)]
pub enum FloorplanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid entity data: {0}")]
    Entity(#[from] EntityError),

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityKey),

    #[error("Entity already exists: {0}")]
    DuplicateEntity(EntityKey),

    #[error("Resize error: {0}")]
    Resize(#[from] ResizeError),
}

impl FloorplanError {
    /// Create a new `Parse` error with the document that failed to parse.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
