//! Floorplan Core Types and Definitions
//!
//! This crate provides the foundational types for hotel floor-plan layouts.
//! It includes:
//!
//! - **Geometry**: Integer points, sizes, rectangles and grid snapping ([`geometry`] module)
//! - **Entities**: Rooms and facilities placed on a floor ([`entity`] module)
//! - **Errors**: Validation errors for raw entity data ([`error::EntityError`])

pub mod entity;
pub mod error;
pub mod geometry;
