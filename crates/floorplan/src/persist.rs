//! Serialized forms exchanged with the outside world.
//!
//! - [`EntityRecord`] - One row of an entity listing as returned by the
//!   hotel backend. Fields are raw and validated by [`EntityRecord::parse`].
//! - [`LayoutSnapshot`] - A saved layout. Loading a snapshot reproduces the
//!   exact rectangles it was saved with.
//! - [`BatchUpdateRequest`] - The bulk position update payload accepted by
//!   the backend, one request per entity kind.

use std::{fs, path::Path};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use floorplan_core::{
    entity::{EntityKind, EntityType, Floor, PlacedEntity, Rotation},
    geometry::{Point, Size},
};

use crate::FloorplanError;

/// A raw entity as listed by the backend.
///
/// Position and size are optional: entities created without a layout have
/// none, and partial values are completed from defaults at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: u64,
    pub kind: EntityKind,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub floor: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
}

/// The validated content of an [`EntityRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRecord {
    pub id: u64,
    pub entity_type: EntityType,
    pub floor: Floor,
    pub origin: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Rotation,
}

impl EntityRecord {
    /// Validates the record's type, floor and rotation.
    ///
    /// A position is only reported when both `left` and `top` are present,
    /// and a size only when both `width` and `height` are.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Entity`] when the type is unknown or belongs
    /// to the other kind, when the floor is not positive, or when the
    /// rotation is not a multiple of 90 degrees.
    pub fn parse(&self) -> Result<ParsedRecord, FloorplanError> {
        let entity_type = EntityType::parse_for_kind(self.kind, &self.entity_type)?;
        let floor = Floor::new(self.floor)?;
        let rotation = Rotation::from_degrees(self.rotation.unwrap_or_default())?;

        let origin = self.left.zip(self.top).map(|(x, y)| Point::new(x, y));
        let size = self
            .width
            .zip(self.height)
            .map(|(width, height)| Size::new(width, height));

        Ok(ParsedRecord {
            id: self.id,
            entity_type,
            floor,
            origin,
            size,
            rotation,
        })
    }

    /// Parses a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Json`] when `json` is not an array of records.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, FloorplanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a listing from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Io`] if the file cannot be read and
    /// [`FloorplanError::Parse`] if it does not hold a listing.
    pub fn read_listing(path: impl AsRef<Path>) -> Result<Vec<Self>, FloorplanError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let records: Vec<Self> = serde_json::from_str(&content)
            .map_err(|err| FloorplanError::new_parse_error(err, content.as_str()))?;
        debug!(
            path = path.display().to_string(),
            record_count = records.len();
            "Listing read"
        );
        Ok(records)
    }
}

/// A saved layout: every entity with its rectangle and rotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    entities: Vec<PlacedEntity>,
}

impl LayoutSnapshot {
    pub fn new(entities: Vec<PlacedEntity>) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &[PlacedEntity] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<PlacedEntity> {
        self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, FloorplanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Json`] for malformed JSON or invalid entity
    /// fields (unknown type, non-positive floor, bad rotation).
    pub fn from_json(json: &str) -> Result<Self, FloorplanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Io`] if the file cannot be read and
    /// [`FloorplanError::Parse`] if it does not hold a snapshot.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, FloorplanError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&content)
            .map_err(|err| FloorplanError::new_parse_error(err, content.as_str()))?;
        debug!(
            path = path.display().to_string(),
            entity_count = snapshot.entities.len();
            "Snapshot read"
        );
        Ok(snapshot)
    }

    /// Writes the snapshot to a JSON file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Io`] if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), FloorplanError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!(
            path = path.display().to_string(),
            entity_count = self.entities.len();
            "Snapshot written"
        );
        Ok(())
    }
}

/// One entry of a [`BatchUpdateRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdateItem {
    pub id: u64,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub rotation: i32,
}

impl From<&PlacedEntity> for BatchUpdateItem {
    fn from(entity: &PlacedEntity) -> Self {
        let rect = entity.rect();
        Self {
            id: entity.id().get(),
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
            rotation: entity.rotation().degrees(),
        }
    }
}

/// Bulk position update for every entity of one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdateRequest {
    pub items: Vec<BatchUpdateItem>,
}

impl BatchUpdateRequest {
    /// Serializes the request as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FloorplanError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, FloorplanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
