use std::io;

use thiserror::Error;

use crate::sim::ShapeKind;

#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Frame needs at least 2 vertices, got {vertices}")]
    DegenerateFrame { vertices: usize },
    #[error("No collision handler for {first:?}-{second:?} pairs")]
    UnsupportedPair { first: ShapeKind, second: ShapeKind },
}
