//! Scan configuration.

use std::path::Path;

use crate::classify::LabelScheme;

/// Glyph code revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeVersion {
    /// 3x3 symbol grid only; border bits decode as zero.
    V1,
    /// Symbol grid plus the 8-cell border ring.
    #[default]
    V2,
}

impl CodeVersion {
    pub fn has_border_ring(self) -> bool {
        matches!(self, Self::V2)
    }
}

/// Options consumed by the seed assembler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssembleOptions {
    pub version: CodeVersion,
    pub labels: LabelScheme,
}

/// Full scan configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Code revision to decode.
    pub version: CodeVersion,
    /// Class-name prefixes produced by the classifier.
    pub labels: LabelScheme,
    /// Flip quadrant crops upright before classification.
    /// Default: [`ScanConfig::DEFAULT_NORMALIZE_QUADRANTS`].
    pub normalize_quadrants: bool,
}

impl ScanConfig {
    pub const DEFAULT_NORMALIZE_QUADRANTS: bool = true;

    /// Load a configuration from JSON; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            version: self.version,
            labels: self.labels,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            version: CodeVersion::default(),
            labels: LabelScheme::default(),
            normalize_quadrants: Self::DEFAULT_NORMALIZE_QUADRANTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg: ScanConfig = serde_json::from_str("{}").expect("valid json");
        assert_eq!(cfg, ScanConfig::default());
        assert!(cfg.version.has_border_ring());
        assert!(cfg.normalize_quadrants);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let raw = r#"{
            "version": "v1",
            "labels": { "rotated_prefix": "r" },
            "normalize_quadrants": false
        }"#;
        let cfg: ScanConfig = serde_json::from_str(raw).expect("valid json");
        assert_eq!(cfg.version, CodeVersion::V1);
        assert!(!cfg.version.has_border_ring());
        assert_eq!(cfg.labels.rotated_prefix, 'r');
        assert_eq!(cfg.labels.normal_prefix, 'a');
        assert!(!cfg.normalize_quadrants);
    }

    #[test]
    fn loads_partial_config_from_file() {
        let path =
            std::env::temp_dir().join(format!("glyphscan-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "version": "v1" }"#).expect("write config");
        let cfg = ScanConfig::from_json_file(&path).expect("loads");
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.version, CodeVersion::V1);
        assert_eq!(cfg.labels, LabelScheme::default());
        assert!(cfg.normalize_quadrants);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let path = std::env::temp_dir().join("glyphscan-config-does-not-exist.json");
        assert!(ScanConfig::from_json_file(&path).is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = ScanConfig {
            version: CodeVersion::V1,
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: ScanConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cfg);
    }
}
