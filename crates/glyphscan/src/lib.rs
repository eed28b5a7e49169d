//! glyphscan — pure-Rust decoder for 3x3 glyph codes.
//!
//! A glyph code is a square image holding a 3x3 grid of blocks, each split
//! into four quadrant symbols, ringed by eight binary border markers. The
//! decoder turns classifier output for the 36 quadrants plus the border
//! readings into a 40-digit hex seed.
//!
//! The pipeline stages are:
//!
//! 1. **Geometry** – pixel rects of every border and quadrant cell, derived
//!    from the frame side in units of `S / 34`.
//! 2. **Extraction** – bilinear crop-and-resize of each rect.
//! 3. **Orientation** – mirror each quadrant upright before classification.
//! 4. **Classification** – external [`CellClassifier`]; only the top-ranked
//!    label of each cell is used.
//! 5. **Border sampling** – channel-sum threshold per border cell.
//! 6. **Assembly** – rotation bits, border bits and per-block nibbles.
//!
//! # Public API
//! - [`Scanner`] as the primary entry point, configured by [`ScanConfig`]
//! - [`assemble`] for callers that classify cells themselves
//! - geometry helpers ([`CodeLayout`], [`border_rects`], [`quadrant_rects`])
//!   and the per-stage primitives

mod api;
mod assemble;
mod border;
mod classify;
mod config;
mod error;
mod frame;
mod geometry;
mod orient;

#[cfg(test)]
mod test_utils;

pub use api::{ExtractedCells, Scanner};
pub use assemble::{assemble, decode_block, pack_bits, DecodeResult, DecodedBlock};
pub use border::{channel_sum, is_marked, to_opaque_rgba, BORDER_MARK_THRESHOLD};
pub use classify::{
    top_prediction, CellClassifier, CellLabel, ClassifierError, LabelScheme, Prediction,
    MAX_SYMBOL_VALUE,
};
pub use config::{AssembleOptions, CodeVersion, ScanConfig};
pub use error::{DecodeError, DecodeInput, GeometryError, InvalidLabelError, InvalidLabelKind};
pub use frame::{sample_pixels, ImageFrame};
pub use geometry::{
    block_row_col, border_rects, quadrant_rects, CodeLayout, GeometryParams, Quadrant, Rect,
    LINE_UNITS, MIN_FRAME_SIZE, N_BLOCKS, N_BORDER, N_QUADRANTS,
};
pub use orient::{normalize_cell, normalize_cell_at};
