//! Classifier boundary and typed cell labels.
//!
//! The symbol classifier is an external capability. It sees one upright
//! quadrant cell and returns ranked class predictions named
//! `<prefix><value>`, e.g. `a12` or `b7`. Only the top prediction is used.

use image::RgbImage;

use crate::error::{InvalidLabelError, InvalidLabelKind};

/// Largest symbol value a quadrant may carry.
pub const MAX_SYMBOL_VALUE: i32 = 31;

/// Error type returned by classifier implementations.
pub type ClassifierError = Box<dyn std::error::Error + Send + Sync>;

/// One ranked classifier output.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Prediction {
    /// Class name, `<prefix><value>`.
    #[serde(alias = "className")]
    pub class_name: String,
    /// Classifier score; higher ranks first.
    pub probability: f32,
}

impl Prediction {
    pub fn new(class_name: impl Into<String>, probability: f32) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// Highest-probability prediction. Ties keep the earliest entry; NaN scores
/// never win.
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    let mut best: Option<&Prediction> = None;
    for p in predictions.iter().filter(|p| !p.probability.is_nan()) {
        match best {
            Some(b) if p.probability <= b.probability => {}
            _ => best = Some(p),
        }
    }
    best
}

/// Classifies one upright quadrant cell.
///
/// Implemented for closures, so a model wrapper or a lookup table can be
/// passed directly:
///
/// ```
/// use glyphscan::{CellClassifier, ClassifierError, Prediction};
/// use image::RgbImage;
///
/// let always_zero = |_: &RgbImage| -> Result<Vec<Prediction>, ClassifierError> {
///     Ok(vec![Prediction::new("a0", 1.0)])
/// };
/// let preds = always_zero.classify(&RgbImage::new(4, 4)).unwrap();
/// assert_eq!(preds[0].class_name, "a0");
/// ```
pub trait CellClassifier {
    /// Ranked predictions for `cell`, in any order.
    fn classify(&self, cell: &RgbImage) -> Result<Vec<Prediction>, ClassifierError>;
}

impl<F> CellClassifier for F
where
    F: Fn(&RgbImage) -> Result<Vec<Prediction>, ClassifierError>,
{
    fn classify(&self, cell: &RgbImage) -> Result<Vec<Prediction>, ClassifierError> {
        self(cell)
    }
}

/// Prefix characters distinguishing rotated from normal symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LabelScheme {
    pub rotated_prefix: char,
    pub normal_prefix: char,
}

impl LabelScheme {
    pub const DEFAULT_ROTATED_PREFIX: char = 'b';
    pub const DEFAULT_NORMAL_PREFIX: char = 'a';

    /// `Some(true)` for the rotated marker, `Some(false)` for the normal one.
    pub fn is_rotated(&self, prefix: char) -> Option<bool> {
        if prefix == self.rotated_prefix {
            Some(true)
        } else if prefix == self.normal_prefix {
            Some(false)
        } else {
            None
        }
    }
}

impl Default for LabelScheme {
    fn default() -> Self {
        Self {
            rotated_prefix: Self::DEFAULT_ROTATED_PREFIX,
            normal_prefix: Self::DEFAULT_NORMAL_PREFIX,
        }
    }
}

/// Classifier label for one quadrant, unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellLabel {
    pub prefix: char,
    pub value: i32,
}

impl CellLabel {
    pub fn new(prefix: char, value: i32) -> Self {
        Self { prefix, value }
    }

    /// Split a class name into its prefix character and decimal value.
    pub fn parse(class_name: &str) -> Result<Self, InvalidLabelError> {
        let unparseable =
            || InvalidLabelError::detached(InvalidLabelKind::Unparseable(class_name.to_string()));
        let mut chars = class_name.chars();
        let prefix = chars.next().ok_or_else(unparseable)?;
        let value: i64 = chars.as_str().parse().map_err(|_| unparseable())?;
        let value = i32::try_from(value)
            .map_err(|_| InvalidLabelError::detached(InvalidLabelKind::ValueOutOfRange(value)))?;
        Ok(Self { prefix, value })
    }

    /// Parse the top-ranked prediction, or `None` when there is none.
    pub fn from_predictions(
        predictions: &[Prediction],
    ) -> Option<Result<Self, InvalidLabelError>> {
        top_prediction(predictions).map(|p| Self::parse(&p.class_name))
    }

    pub(crate) fn checked_value(&self) -> Result<i32, InvalidLabelError> {
        if (0..=MAX_SYMBOL_VALUE).contains(&self.value) {
            Ok(self.value)
        } else {
            Err(InvalidLabelError::detached(
                InvalidLabelKind::ValueOutOfRange(i64::from(self.value)),
            ))
        }
    }
}

impl std::fmt::Display for CellLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix, self.value)
    }
}
