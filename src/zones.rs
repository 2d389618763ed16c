use crate::catalog::CatalogEntry;
use crate::config::{ConfigError, FilterConfig};
use crate::spacing::geomspace;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zone {
    pub index: usize,
    /// Exclusive bright boundary
    pub lower: f64,
    /// Inclusive faint boundary
    pub upper: f64,
    pub quality_ceiling: f64,
}

impl Zone {
    pub fn contains_magnitude(&self, magnitude: f64) -> bool {
        magnitude > self.lower && magnitude <= self.upper
    }

    pub fn admits(&self, entry: &CatalogEntry) -> bool {
        self.contains_magnitude(entry.magnitude) && entry.quality <= self.quality_ceiling
    }
}

/// Geometric zones over `(saturation_limit, faint_limit]`, each with its own
/// quality ceiling taken from an independent progression.
#[derive(Debug, Clone)]
pub struct ZonePartition {
    zones: Vec<Zone>,
}

impl ZonePartition {
    pub fn new(config: &FilterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mixed_sign = || ConfigError::MixedSignLimits {
            saturation: config.saturation_limit,
            faint: config.faint_limit,
        };
        let boundaries = geomspace(
            config.saturation_limit,
            config.faint_limit,
            config.zone_count + 1,
        )
        .ok_or_else(mixed_sign)?;
        let ceilings = geomspace(config.quality_floor, config.quality_ceiling, config.zone_count)
            .ok_or(ConfigError::InvalidQualityRange {
                floor: config.quality_floor,
                ceiling: config.quality_ceiling,
            })?;

        let zones = boundaries
            .windows(2)
            .zip(ceilings)
            .enumerate()
            .map(|(index, (bounds, quality_ceiling))| Zone {
                index,
                lower: bounds[0],
                upper: bounds[1],
                quality_ceiling,
            })
            .collect();

        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_for(&self, magnitude: f64) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains_magnitude(magnitude))
    }

    /// Entries admitted by their zone, grouped zone by zone in catalog order.
    pub fn select_candidates(&self, entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
        let mut candidates = Vec::new();
        for zone in &self.zones {
            let before = candidates.len();
            candidates.extend(entries.iter().filter(|entry| zone.admits(entry)).copied());
            tracing::debug!(
                "Zone {} ({:.4}, {:.4}] ceiling {:.4}: {} candidates",
                zone.index,
                zone.lower,
                zone.upper,
                zone.quality_ceiling,
                candidates.len() - before
            );
        }
        candidates
    }
}
