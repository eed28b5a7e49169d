//! Cell geometry of the glyph code.
//!
//! A code of side `S` is divided into 34 line units:
//!
//! ```text
//! | edge (2) | block (10) | block (10) | block (10) | edge (2) |
//! ```
//!
//! Each block holds a 2x2 arrangement of quadrant cells (5 units each).
//! Eight one-unit border markers sit inside the edge band, one between each
//! pair of adjacent perimeter blocks, ordered clockwise starting above the
//! boundary between block 0 and block 1.
//!
//! All positions are evaluated with the same floating-point operation order
//! as the reference encoder so existing codes sample identically.

use crate::error::GeometryError;

/// Number of line units across the code.
pub const LINE_UNITS: u32 = 34;
/// Smallest frame for which one line unit covers at least one pixel.
pub const MIN_FRAME_SIZE: u32 = LINE_UNITS;
/// Number of macro blocks (3x3).
pub const N_BLOCKS: usize = 9;
/// Number of quadrant cells per block.
pub const N_QUADRANTS: usize = 4;
/// Number of border marker cells.
pub const N_BORDER: usize = 8;

/// Axis-aligned cell rectangle in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    fn square(x: f64, y: f64, side: f64) -> Self {
        Self {
            x,
            y,
            w: side,
            h: side,
        }
    }

    /// True when the rect lies entirely within `[0, size]` on both axes.
    pub fn is_within(&self, size: f64) -> bool {
        [self.x, self.y, self.w, self.h]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0 && *v <= size)
            && self.x + self.w <= size
            && self.y + self.h <= size
    }

    /// Integer output size `(w, h)` used when resampling this rect.
    pub fn pixel_dims(&self) -> (u32, u32) {
        (self.w as u32, self.h as u32)
    }
}

/// Position of a quadrant cell within its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; N_QUADRANTS] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Convert a `0..4` slot index.
    pub fn from_index(index: usize) -> Result<Self, GeometryError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GeometryError::QuadrantIndex(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// `(row, col)` of a block index in the 3x3 layout.
pub fn block_row_col(index: usize) -> (usize, usize) {
    (index / 3, index % 3)
}

/// Unit lengths derived from the frame dimension.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryParams {
    /// Frame side `S` in pixels.
    pub size: u32,
    /// `S / 34`.
    pub line_width: f64,
    /// `2 * line_width`.
    pub edge_width: f64,
    /// `10 * line_width`.
    pub block_size: f64,
    /// `5 * line_width`.
    pub quadrant_size: f64,
}

impl GeometryParams {
    /// Derive the unit lengths for a square frame of side `size`.
    pub fn from_size(size: u32) -> Result<Self, GeometryError> {
        if size == 0 {
            return Err(GeometryError::ZeroSize);
        }
        if size < MIN_FRAME_SIZE {
            return Err(GeometryError::TooSmall {
                size,
                min: MIN_FRAME_SIZE,
            });
        }
        let line_width = size as f64 / LINE_UNITS as f64;
        Ok(Self {
            size,
            line_width,
            edge_width: line_width * 2.0,
            block_size: line_width * 10.0,
            quadrant_size: line_width * 5.0,
        })
    }

    /// Top-left corner of block `index`.
    pub fn block_origin(&self, index: usize) -> [f64; 2] {
        let (row, col) = block_row_col(index);
        [
            self.edge_width + self.block_size * col as f64,
            self.edge_width + self.block_size * row as f64,
        ]
    }

    fn check(&self, rect: Rect) -> Result<Rect, GeometryError> {
        if rect.is_within(self.size as f64) {
            Ok(rect)
        } else {
            Err(GeometryError::RectOutOfBounds {
                rect,
                size: self.size,
            })
        }
    }
}

/// Rects of the 8 border markers, clockwise from above the block 0/1 seam.
pub fn border_rects(size: u32) -> Result<[Rect; N_BORDER], GeometryError> {
    let p = GeometryParams::from_size(size)?;
    let (line, edge, block) = (p.line_width, p.edge_width, p.block_size);
    let positions = [
        (edge + block, line),
        (edge + block * 2.0, line),
        (edge + block * 3.0, edge + block),
        (edge + block * 3.0, edge + block * 2.0),
        (edge + block * 2.0, edge + block * 3.0),
        (edge + block, edge + block * 3.0),
        (line, edge + block * 2.0),
        (line, edge + block),
    ];

    let mut out = [Rect::square(0.0, 0.0, 0.0); N_BORDER];
    for (slot, (x, y)) in out.iter_mut().zip(positions) {
        *slot = p.check(Rect::square(x, y, line))?;
    }
    Ok(out)
}

/// Rects of the 4 quadrant cells of every block, in block order.
pub fn quadrant_rects(size: u32) -> Result<[[Rect; N_QUADRANTS]; N_BLOCKS], GeometryError> {
    let p = GeometryParams::from_size(size)?;
    let wh = p.quadrant_size;

    let mut out = [[Rect::square(0.0, 0.0, 0.0); N_QUADRANTS]; N_BLOCKS];
    for (index, block) in out.iter_mut().enumerate() {
        let [x, y] = p.block_origin(index);
        let corners = [(x, y), (x + wh, y), (x, y + wh), (x + wh, y + wh)];
        for (slot, (qx, qy)) in block.iter_mut().zip(corners) {
            *slot = p.check(Rect::square(qx, qy, wh))?;
        }
    }
    Ok(out)
}

/// Every cell rect of a code, computed once per frame size.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CodeLayout {
    pub params: GeometryParams,
    pub border: [Rect; N_BORDER],
    pub quadrants: [[Rect; N_QUADRANTS]; N_BLOCKS],
}

impl CodeLayout {
    pub fn new(size: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            params: GeometryParams::from_size(size)?,
            border: border_rects(size)?,
            quadrants: quadrant_rects(size)?,
        })
    }

    /// Rect of one quadrant cell, or `None` when `block` is past the grid.
    pub fn quadrant(&self, block: usize, quadrant: Quadrant) -> Option<Rect> {
        self.quadrants.get(block).map(|rects| rects[quadrant.index()])
    }
}
