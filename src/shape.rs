//! Shape normalization
//!
//! Turns a LabelMe rectangle or polygon into a COCO bounding box and segmentation.
//! Both kinds go through the rasterizer so that rotated or degenerate "rectangles"
//! get the same pixel-inclusive box a polygon would.

use crate::bbox::mask_to_bbox;
use crate::error::GeometryError;
use crate::raster::polygon_to_mask;
use crate::types::{Shape, ShapeType};

/// Bounding box and segmentation of one shape
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedShape {
    /// `[x, y, width, height]`
    pub bbox: [f64; 4],
    /// One flat `x0, y0, x1, y1, ...` polygon
    pub segmentation: Vec<Vec<f64>>,
}

/// Normalize a shape drawn on an image of `height` x `width` pixels
pub fn normalize_shape(
    shape: &Shape,
    height: u32,
    width: u32,
) -> Result<NormalizedShape, GeometryError> {
    let kind = shape.kind()?;
    normalize_points(&shape.points, kind, height, width)
}

pub fn normalize_points(
    points: &[(f64, f64)],
    kind: ShapeType,
    height: u32,
    width: u32,
) -> Result<NormalizedShape, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::EmptyPoints);
    }

    let mask = polygon_to_mask(height as usize, width as usize, points);
    let bbox = mask_to_bbox(&mask)?;

    let segmentation = match kind {
        ShapeType::Rectangle => rectangle_to_polygon(&bbox),
        ShapeType::Polygon => points.iter().flat_map(|&(x, y)| [x, y]).collect(),
    };

    Ok(NormalizedShape {
        bbox,
        segmentation: vec![segmentation],
    })
}

/// Corners of an `[x, y, w, h]` box, clockwise from the top-left
pub fn rectangle_to_polygon(bbox: &[f64; 4]) -> Vec<f64> {
    let [x, y, w, h] = *bbox;
    vec![x, y, x + w, y, x + w, y + h, x, y + h]
}
