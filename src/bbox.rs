use crate::error::GeometryError;
use crate::raster::Mask;

/// Compute the minimal `[x, y, width, height]` box enclosing the set pixels of a mask.
///
/// `width` and `height` are `max - min` over pixel indices, so a single pixel has
/// a zero-sized box. An all-zero mask is invalid input and yields
/// [`GeometryError::EmptyMask`].
pub fn mask_to_bbox(mask: &Mask) -> Result<[f64; 4], GeometryError> {
    let mut pixels = mask.set_pixels();
    let (row, col) = pixels.next().ok_or(GeometryError::EmptyMask)?;

    let (min_row, max_row, min_col, max_col) = pixels.fold(
        (row, row, col, col),
        |(min_row, max_row, min_col, max_col), (r, c)| {
            (min_row.min(r), max_row.max(r), min_col.min(c), max_col.max(c))
        },
    );

    Ok([
        min_col as f64,
        min_row as f64,
        (max_col - min_col) as f64,
        (max_row - min_row) as f64,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::polygon_to_mask;

    #[test]
    fn test_bbox_of_square() {
        let mask = polygon_to_mask(10, 10, &[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        assert_eq!(mask_to_bbox(&mask), Ok([0.0, 0.0, 4.0, 4.0]));
    }

    #[test]
    fn test_bbox_of_diagonal_line() {
        let mask = polygon_to_mask(100, 100, &[(10.0, 10.0), (50.0, 40.0)]);
        assert_eq!(mask_to_bbox(&mask), Ok([10.0, 10.0, 40.0, 30.0]));
    }

    #[test]
    fn test_bbox_of_single_pixel() {
        let mask = polygon_to_mask(10, 10, &[(7.0, 3.0)]);
        assert_eq!(mask_to_bbox(&mask), Ok([7.0, 3.0, 0.0, 0.0]));
    }

    #[test]
    fn test_bbox_is_clipped_to_canvas() {
        let mask = polygon_to_mask(20, 30, &[(25.0, 15.0), (40.0, 15.0), (40.0, 25.0), (25.0, 25.0)]);
        assert_eq!(mask_to_bbox(&mask), Ok([25.0, 15.0, 4.0, 4.0]));
    }

    #[test]
    fn test_empty_mask_is_rejected() {
        let mask = Mask::new(5, 5);
        assert_eq!(mask_to_bbox(&mask), Err(GeometryError::EmptyMask));
    }
}
