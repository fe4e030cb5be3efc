//! Error types for the conversion pipeline
//!
//! Every failure aborts the run. Errors carry enough context (file, shape index,
//! label) for the top-level diagnostic to name the offending input.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a single shape into a bounding box and segmentation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("unsupported shape type `{0}` (expected `rectangle` or `polygon`)")]
    UnsupportedShapeType(String),

    #[error("shape has no points")]
    EmptyPoints,

    /// The rasterized mask has no set pixels, so no bounding box exists.
    #[error("degenerate geometry: rasterized mask has no set pixels")]
    EmptyMask,
}

/// A label was resolved that the finalized category registry never saw
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("label: {label} not in categories: {categories:?}")]
pub struct UnknownCategory {
    pub label: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed labelme record {}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: shape #{index} (label `{label}`): {source}", .path.display())]
    Shape {
        path: PathBuf,
        index: usize,
        label: String,
        #[source]
        source: GeometryError,
    },

    #[error(transparent)]
    Category(#[from] UnknownCategory),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to serialize COCO dataset: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
