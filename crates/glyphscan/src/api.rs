//! High-level scanning API.
//!
//! [`Scanner`] is the primary entry point. It wires the stages together for
//! one frame: layout -> cell extraction -> orientation -> classification ->
//! border sampling -> seed assembly. Each call is independent; the scanner
//! holds only its configuration.

use image::{RgbImage, RgbaImage};
use std::path::Path;

use crate::assemble::{assemble, DecodeResult};
use crate::border::{is_marked, to_opaque_rgba};
use crate::classify::{top_prediction, CellClassifier, CellLabel};
use crate::config::ScanConfig;
use crate::error::DecodeError;
use crate::frame::{sample_pixels, ImageFrame};
use crate::geometry::{CodeLayout, Quadrant, N_QUADRANTS};
use crate::orient::normalize_cell;

/// Cropped cells of one frame, ready for classification.
#[derive(Debug, Clone)]
pub struct ExtractedCells {
    /// Quadrant crops per block, upright when normalization is enabled.
    pub quadrants: Vec<[RgbImage; N_QUADRANTS]>,
    /// Border crops as opaque RGBA.
    pub border: Vec<RgbaImage>,
}

impl ExtractedCells {
    /// Marker state of every border crop.
    pub fn border_marks(&self) -> Vec<bool> {
        self.border.iter().map(is_marked).collect()
    }
}

/// Primary decode interface.
///
/// # Examples
///
/// ```
/// use glyphscan::{CellLabel, Scanner};
///
/// let scanner = Scanner::default();
/// let labels = vec![[CellLabel::new('a', 0), CellLabel::new('a', 1),
///                    CellLabel::new('a', 0), CellLabel::new('a', 0)]; 9];
/// let result = scanner.assemble(&labels, &[false; 8]).unwrap();
/// assert_eq!(result.seed(), "0000100010001000100010001000100010001000");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Load a JSON config and create a scanner in one step.
    pub fn from_config_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(ScanConfig::from_json_file(path)?))
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ScanConfig {
        &mut self.config
    }

    /// Cell layout for the frame's dimension.
    pub fn layout(&self, frame: &ImageFrame) -> Result<CodeLayout, DecodeError> {
        Ok(CodeLayout::new(frame.size())?)
    }

    /// Crop every quadrant and border cell of `frame`.
    pub fn extract(&self, frame: &ImageFrame) -> Result<ExtractedCells, DecodeError> {
        let layout = self.layout(frame)?;

        let mut quadrants = Vec::with_capacity(layout.quadrants.len());
        for rects in &layout.quadrants {
            let mut cells: [RgbImage; N_QUADRANTS] = std::array::from_fn(|_| RgbImage::new(0, 0));
            for (q, cell) in Quadrant::ALL.into_iter().zip(cells.iter_mut()) {
                let crop = sample_pixels(frame, &rects[q.index()])?;
                *cell = if self.config.normalize_quadrants {
                    normalize_cell(&crop, q)?
                } else {
                    crop
                };
            }
            quadrants.push(cells);
        }

        let border = if self.config.version.has_border_ring() {
            layout
                .border
                .iter()
                .map(|rect| sample_pixels(frame, rect).map(to_opaque_rgba))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        tracing::debug!(
            "extracted {} quadrant cells and {} border cells from {}px frame",
            quadrants.len() * N_QUADRANTS,
            border.len(),
            frame.size()
        );
        Ok(ExtractedCells { quadrants, border })
    }

    /// Marker state of the 8 border cells (empty for codes without a ring).
    pub fn border_marks(&self, frame: &ImageFrame) -> Result<Vec<bool>, DecodeError> {
        if !self.config.version.has_border_ring() {
            return Ok(Vec::new());
        }
        let layout = self.layout(frame)?;
        layout
            .border
            .iter()
            .map(|rect| Ok(is_marked(&to_opaque_rgba(sample_pixels(frame, rect)?))))
            .collect()
    }

    /// Classify every quadrant crop and keep the top-ranked label.
    pub fn classify_cells(
        &self,
        cells: &ExtractedCells,
        classifier: &dyn CellClassifier,
    ) -> Result<Vec<[CellLabel; N_QUADRANTS]>, DecodeError> {
        let mut labels = Vec::with_capacity(cells.quadrants.len());
        for (block, crops) in cells.quadrants.iter().enumerate() {
            let mut out = [CellLabel::new(self.config.labels.normal_prefix, 0); N_QUADRANTS];
            for (quadrant, (crop, slot)) in crops.iter().zip(out.iter_mut()).enumerate() {
                *slot = classify_one(classifier, crop, block, quadrant)?;
            }
            labels.push(out);
        }
        Ok(labels)
    }

    /// Assemble a seed from labels and border marks using this scanner's options.
    pub fn assemble(
        &self,
        labels: &[[CellLabel; N_QUADRANTS]],
        border_marks: &[bool],
    ) -> Result<DecodeResult, DecodeError> {
        assemble(labels, border_marks, &self.config.assemble_options())
    }

    /// Decode one frame end to end.
    ///
    /// Waits for all 36 classifications and the border pass before
    /// assembling; any failure aborts the decode with no partial result.
    pub fn scan(
        &self,
        frame: &ImageFrame,
        classifier: &dyn CellClassifier,
    ) -> Result<DecodeResult, DecodeError> {
        let cells = self.extract(frame)?;
        let labels = self.classify_cells(&cells, classifier)?;
        let marks = cells.border_marks();
        let result = self.assemble(&labels, &marks)?;
        tracing::info!(
            "decoded seed 0x{} (rotation={}, border={})",
            result.seed(),
            result.rotation_bitstring(),
            result.border_bitstring()
        );
        Ok(result)
    }
}

fn classify_one(
    classifier: &dyn CellClassifier,
    crop: &RgbImage,
    block: usize,
    quadrant: usize,
) -> Result<CellLabel, DecodeError> {
    let classifier_error = |message: String| DecodeError::Classifier {
        block,
        quadrant,
        message,
    };

    let predictions = classifier
        .classify(crop)
        .map_err(|e| classifier_error(e.to_string()))?;
    if predictions.iter().any(|p| !p.probability.is_finite()) {
        tracing::warn!(
            "block {} quadrant {}: classifier returned non-finite probabilities",
            block,
            quadrant
        );
    }
    let top = top_prediction(&predictions)
        .ok_or_else(|| classifier_error("no usable predictions".to_string()))?;
    CellLabel::parse(&top.class_name).map_err(|e| e.at(block, quadrant).into())
}
