//! Error types for geometry, label validation and the decode pipeline.

use crate::geometry::Rect;

// ── Geometry ───────────────────────────────────────────────────────────────

/// Errors raised while deriving cell geometry or handling cell images.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Frame dimension is zero.
    ZeroSize,
    /// Frame is too small for every cell to cover at least one pixel.
    TooSmall {
        /// Provided frame dimension.
        size: u32,
        /// Minimum supported frame dimension.
        min: u32,
    },
    /// Frame is not square.
    NonSquare {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
    },
    /// A computed rect left the `[0, S]` frame range.
    RectOutOfBounds {
        /// Offending rect.
        rect: Rect,
        /// Frame dimension.
        size: u32,
    },
    /// Quadrant index outside `0..4`.
    QuadrantIndex(usize),
    /// A cell image with a zero dimension.
    EmptyCell {
        /// Cell width in pixels.
        width: u32,
        /// Cell height in pixels.
        height: u32,
    },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroSize => f.write_str("frame size must be > 0"),
            Self::TooSmall { size, min } => {
                write!(f, "frame size {} is below the minimum of {} px", size, min)
            }
            Self::NonSquare { width, height } => {
                write!(f, "frame must be square, got {}x{}", width, height)
            }
            Self::RectOutOfBounds { rect, size } => write!(
                f,
                "rect (x={}, y={}, w={}, h={}) exceeds frame bounds [0, {}]",
                rect.x, rect.y, rect.w, rect.h, size
            ),
            Self::QuadrantIndex(i) => write!(f, "quadrant index {} out of range 0..4", i),
            Self::EmptyCell { width, height } => {
                write!(f, "cell image has an empty dimension ({}x{})", width, height)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

// ── Labels ─────────────────────────────────────────────────────────────────

/// What made a classifier label unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidLabelKind {
    /// Numeric value outside `0..=31`.
    ValueOutOfRange(i64),
    /// Prefix is neither the rotated nor the normal marker.
    UnknownPrefix(char),
    /// Class name could not be split into prefix and integer.
    Unparseable(String),
    /// A combined nibble left `0..=15`.
    NibbleOverflow {
        /// Output nibble slot (0..4) within the block.
        slot: usize,
        /// Computed value.
        value: i32,
    },
}

/// A label that cannot be assembled into a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLabelError {
    /// Block index (0..9).
    pub block: usize,
    /// Quadrant index (0..4), or `None` for block-level failures.
    pub quadrant: Option<usize>,
    /// Failure detail.
    pub kind: InvalidLabelKind,
}

impl InvalidLabelError {
    pub(crate) fn detached(kind: InvalidLabelKind) -> Self {
        Self {
            block: 0,
            quadrant: None,
            kind,
        }
    }

    pub(crate) fn at(mut self, block: usize, quadrant: usize) -> Self {
        self.block = block;
        self.quadrant = Some(quadrant);
        self
    }

    pub(crate) fn in_block(mut self, block: usize) -> Self {
        self.block = block;
        self
    }
}

impl std::fmt::Display for InvalidLabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.quadrant {
            Some(q) => write!(f, "invalid label at block {} quadrant {}: ", self.block, q)?,
            None => write!(f, "invalid label in block {}: ", self.block)?,
        }
        match &self.kind {
            InvalidLabelKind::ValueOutOfRange(v) => {
                write!(f, "value {} outside 0..=31", v)
            }
            InvalidLabelKind::UnknownPrefix(c) => write!(f, "unrecognized symbol prefix '{}'", c),
            InvalidLabelKind::Unparseable(name) => write!(f, "cannot parse class name '{}'", name),
            InvalidLabelKind::NibbleOverflow { slot, value } => {
                write!(f, "nibble {} evaluates to {} (outside 0..=15)", slot, value)
            }
        }
    }
}

impl std::error::Error for InvalidLabelError {}

// ── Decode ─────────────────────────────────────────────────────────────────

/// Which decode input was short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeInput {
    /// Per-block quadrant labels.
    CellLabels,
    /// Border marker booleans.
    BorderMarks,
}

impl std::fmt::Display for DecodeInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::CellLabels => "cell labels",
            Self::BorderMarks => "border marks",
        })
    }
}

/// Terminal failure of one decode attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Invalid frame dimension or cell image.
    Geometry(GeometryError),
    /// Classifier output that cannot be assembled.
    InvalidLabel(InvalidLabelError),
    /// Wrong number of labels or border marks.
    IncompleteInput {
        /// Which input was short.
        input: DecodeInput,
        /// Expected element count.
        expected: usize,
        /// Provided element count.
        got: usize,
    },
    /// The classifier failed or returned no predictions.
    Classifier {
        /// Block index (0..9).
        block: usize,
        /// Quadrant index (0..4).
        quadrant: usize,
        /// Classifier-provided message.
        message: String,
    },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geometry(e) => write!(f, "geometry error: {}", e),
            Self::InvalidLabel(e) => e.fmt(f),
            Self::IncompleteInput {
                input,
                expected,
                got,
            } => write!(f, "incomplete input: expected {} {}, got {}", expected, input, got),
            Self::Classifier {
                block,
                quadrant,
                message,
            } => write!(
                f,
                "classifier failed at block {} quadrant {}: {}",
                block, quadrant, message
            ),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(e) => Some(e),
            Self::InvalidLabel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for DecodeError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<InvalidLabelError> for DecodeError {
    fn from(e: InvalidLabelError) -> Self {
        Self::InvalidLabel(e)
    }
}
