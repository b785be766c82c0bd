//! Error types surfaced where the physics engine or image decoder is fallible.

use thiserror::Error;

/// Failures reported while building a collision shape.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// The engine could not compute a convex hull (too few or coplanar points).
    #[error("convex hull of {points} points is degenerate")]
    DegenerateHull { points: usize },
    /// The index buffer does not describe whole triangles.
    #[error("index count {0} is not a multiple of 3")]
    InvalidIndexCount(usize),
    /// The engine rejected the triangle mesh.
    #[error("triangle mesh rejected: {0}")]
    TriMesh(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("height field image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
