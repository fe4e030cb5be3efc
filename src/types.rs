use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GeometryError;

// The Shape struct representing one annotated region of a LabelMe file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Shape {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub shape_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Shape {
    pub fn new(label: &str, shape_type: &str, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.to_string(),
            points,
            shape_type: shape_type.to_string(),
            group_id: None,
            description: None,
        }
    }

    /// Parse the raw `shape_type` string into one of the supported kinds
    pub fn kind(&self) -> Result<ShapeType, GeometryError> {
        self.shape_type.parse()
    }
}

// The ImageAnnotation struct representing one LabelMe JSON file.
// Keys we do not use (flags, imageData, ...) are skipped by serde.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub shapes: Vec<Shape>,
    pub image_path: String,
    pub image_height: u32,
    pub image_width: u32,
}

/// Shape kinds that can be converted to COCO annotations
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Rectangle,
    Polygon,
}

impl FromStr for ShapeType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" => Ok(ShapeType::Rectangle),
            "polygon" => Ok(ShapeType::Polygon),
            other => Err(GeometryError::UnsupportedShapeType(other.to_string())),
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeType::Rectangle => f.write_str("rectangle"),
            ShapeType::Polygon => f.write_str("polygon"),
        }
    }
}
