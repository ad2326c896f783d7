//! Errors raised when validating entity data at the crate boundary.

use thiserror::Error;

use crate::entity::EntityKind;

/// Errors produced while converting raw values into entity model types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("Unknown entity type: {0:?}")]
    UnknownType(String),

    #[error("Unknown entity kind: {0:?}")]
    UnknownKind(String),

    #[error("Invalid floor {0}: floors are numbered from 1")]
    InvalidFloor(i64),

    #[error("Invalid rotation {0}: rotation must be a multiple of 90 degrees")]
    InvalidRotation(i32),

    #[error("Type {entity_type:?} does not belong to kind {kind}")]
    KindMismatch {
        kind: EntityKind,
        entity_type: String,
    },
}
