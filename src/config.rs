use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Reasons a filter configuration cannot be turned into zones and bins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("saturation limit {saturation} must be smaller than faint limit {faint}")]
    NonMonotonicLimits { saturation: f64, faint: f64 },
    #[error("magnitude limits {saturation} and {faint} must be non-zero and share a sign")]
    MixedSignLimits { saturation: f64, faint: f64 },
    #[error("zone count must be positive")]
    NoZones,
    #[error("at least two bin edges are required, got {0}")]
    TooFewBinEdges(usize),
    #[error("quality ceilings must satisfy 0 < floor ({floor}) < ceiling ({ceiling}) < 1")]
    InvalidQualityRange { floor: f64, ceiling: f64 },
    #[error("sigma-clip width must be positive, got {0}")]
    InvalidClipWidth(f64),
    #[error("bimodality threshold must be positive, got {0}")]
    InvalidBimodalityThreshold(f64),
}

/// Decimal places written for each output column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Precision {
    pub x: u32,
    pub y: u32,
    pub magnitude: u32,
    pub quality: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            x: 3,
            y: 3,
            magnitude: 4,
            quality: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Bright end of the critical range (instrumental magnitude)
    pub saturation_limit: f64,
    /// Faint end of the critical range
    pub faint_limit: f64,
    /// Number of geometric admission zones
    pub zone_count: usize,
    /// Quality ceiling of the brightest zone
    pub quality_floor: f64,
    /// Quality ceiling of the faintest zone
    pub quality_ceiling: f64,
    /// Number of linear bin boundaries (bins = edges - 1)
    pub bin_edges: usize,
    /// Half-width of the sigma-clip window, in standard deviations
    pub clip_sigma: f64,
    /// Median at or above which a bin is treated as contaminated
    pub bimodality_threshold: f64,
    pub precision: Precision,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            saturation_limit: -13.7,
            faint_limit: -6.5,
            zone_count: 15,
            quality_floor: 0.1,
            quality_ceiling: 0.9,
            bin_edges: 100,
            clip_sigma: 2.0,
            bimodality_threshold: 0.5,
            precision: Precision::default(),
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (saturation, faint) = (self.saturation_limit, self.faint_limit);
        // Negated comparison so NaN limits are rejected too
        if !(saturation < faint) {
            return Err(ConfigError::NonMonotonicLimits { saturation, faint });
        }
        if saturation == 0.0 || faint == 0.0 || saturation.signum() != faint.signum() {
            return Err(ConfigError::MixedSignLimits { saturation, faint });
        }
        if self.zone_count == 0 {
            return Err(ConfigError::NoZones);
        }
        if self.bin_edges < 2 {
            return Err(ConfigError::TooFewBinEdges(self.bin_edges));
        }
        let (floor, ceiling) = (self.quality_floor, self.quality_ceiling);
        if !(0.0 < floor && floor < ceiling && ceiling < 1.0) {
            return Err(ConfigError::InvalidQualityRange { floor, ceiling });
        }
        if !(self.clip_sigma > 0.0) {
            return Err(ConfigError::InvalidClipWidth(self.clip_sigma));
        }
        if !(self.bimodality_threshold > 0.0) {
            return Err(ConfigError::InvalidBimodalityThreshold(
                self.bimodality_threshold,
            ));
        }
        Ok(())
    }

    /// True when the magnitude lies outside the critical range and bypasses filtering.
    pub fn is_out_of_band(&self, magnitude: f64) -> bool {
        magnitude < self.saturation_limit || magnitude > self.faint_limit
    }
}

/// Text layout of catalog files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogFormat {
    pub comment_marker: String,
    /// Token written by the photometry pipeline in place of an invalid quality fit
    pub sentinel: String,
    pub output_suffix: String,
    pub output_extension: String,
}

impl Default for CatalogFormat {
    fn default() -> Self {
        Self {
            comment_marker: "#".to_string(),
            sentinel: "*********".to_string(),
            output_suffix: "_s".to_string(),
            output_extension: "xym".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub catalog: CatalogFormat,
}

impl Config {
    /// Load a JSON configuration; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
