//! Canonical orientation of quadrant cells.
//!
//! The four quadrants of a block carry their symbol mirrored outward from the
//! block center. Flipping each quadrant back yields an upright symbol for the
//! classifier.

use image::{imageops, RgbImage};

use crate::error::GeometryError;
use crate::geometry::Quadrant;

/// Bring a cropped quadrant cell into classifier orientation.
///
/// - `TopLeft`: unchanged
/// - `TopRight`: columns reversed
/// - `BottomLeft`: rows reversed
/// - `BottomRight`: columns then rows reversed (180° rotation)
pub fn normalize_cell(cell: &RgbImage, quadrant: Quadrant) -> Result<RgbImage, GeometryError> {
    let (width, height) = cell.dimensions();
    if width == 0 || height == 0 {
        return Err(GeometryError::EmptyCell { width, height });
    }
    Ok(match quadrant {
        Quadrant::TopLeft => cell.clone(),
        Quadrant::TopRight => imageops::flip_horizontal(cell),
        Quadrant::BottomLeft => imageops::flip_vertical(cell),
        Quadrant::BottomRight => imageops::flip_vertical(&imageops::flip_horizontal(cell)),
    })
}

/// Index-based variant of [`normalize_cell`] for callers holding raw slots.
pub fn normalize_cell_at(cell: &RgbImage, quadrant_index: usize) -> Result<RgbImage, GeometryError> {
    normalize_cell(cell, Quadrant::from_index(quadrant_index)?)
}
