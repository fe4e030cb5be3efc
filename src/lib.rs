//! LabelMe to COCO format converter
//!
//! This library converts a directory of LabelMe JSON annotations into a single
//! COCO object-detection dataset plus a sorted label list.

pub mod bbox;
pub mod category;
pub mod coco;
pub mod coco_dataset;
pub mod config;
pub mod error;
pub mod io;
pub mod raster;
pub mod shape;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use category::{CategoryRegistry, CategoryTable};
pub use coco::{Annotation, Category, CocoFile, Image, ProvisionalAnnotation};
pub use coco_dataset::{assemble_dataset, process_coco_dataset, CocoDataset, ScanAccumulator};
pub use config::Args;
pub use error::{Error, GeometryError, Result, UnknownCategory};
pub use shape::{normalize_shape, NormalizedShape};
pub use types::{ImageAnnotation, Shape, ShapeType};
