use crate::bins::{BinOutcome, BinPartition};
use crate::catalog::CatalogEntry;
use crate::config::{ConfigError, FilterConfig};
use crate::zones::ZonePartition;

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Critical-range survivors followed by out-of-band entries, rounded
    pub entries: Vec<CatalogEntry>,
    pub candidates: usize,
    pub critical_survivors: usize,
    pub out_of_band: usize,
    pub bins: Vec<BinOutcome>,
}

impl FilterOutcome {
    pub fn empty_bins(&self) -> usize {
        self.bins.iter().filter(|b| b.stats.count == 0).count()
    }

    /// Bins holding candidates but no usable statistic; all their candidates are lost.
    pub fn undefined_bins(&self) -> usize {
        self.bins
            .iter()
            .filter(|b| b.stats.count > 0 && !b.stats.is_defined())
            .count()
    }

    pub fn corrected_bins(&self) -> usize {
        self.bins.iter().filter(|b| b.stats.corrected).count()
    }

    pub fn discarded_by_undefined_bins(&self) -> usize {
        self.bins
            .iter()
            .filter(|b| !b.stats.is_defined())
            .map(|b| b.stats.count)
            .sum()
    }
}

/// Zone admission followed by per-bin sigma clipping. Entries outside the
/// critical range are passed through.
#[derive(Debug, Clone)]
pub struct QualityFilter {
    config: FilterConfig,
    zones: ZonePartition,
    bins: BinPartition,
}

impl QualityFilter {
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        let zones = ZonePartition::new(&config)?;
        let bins = BinPartition::new(&config)?;
        Ok(Self {
            config,
            zones,
            bins,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn zones(&self) -> &ZonePartition {
        &self.zones
    }

    pub fn bins(&self) -> &BinPartition {
        &self.bins
    }

    pub fn apply(&self, entries: &[CatalogEntry]) -> FilterOutcome {
        let candidates = self.zones.select_candidates(entries);
        let (survivors, bins) = self.bins.clip(&candidates);

        let critical_survivors = survivors.len();
        let mut assembled = survivors;
        assembled.extend(
            entries
                .iter()
                .filter(|entry| self.config.is_out_of_band(entry.magnitude))
                .copied(),
        );
        let out_of_band = assembled.len() - critical_survivors;

        let precision = self.config.precision;
        let entries = assembled
            .iter()
            .map(|entry| entry.rounded(&precision))
            .collect();

        FilterOutcome {
            entries,
            candidates: candidates.len(),
            critical_survivors,
            out_of_band,
            bins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn filter() -> QualityFilter {
        QualityFilter::new(FilterConfig::default()).unwrap()
    }

    /// Synthetic catalog: a tight low-quality locus plus a scattered secondary population.
    fn synthetic_catalog(seed: u64, count: usize) -> Vec<CatalogEntry> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let magnitude = rng.gen_range(-16.0..-4.0);
                let quality = if rng.gen_bool(0.8) {
                    rng.gen_range(0.01..0.08)
                } else {
                    rng.gen_range(0.3..1.0)
                };
                CatalogEntry::new(
                    rng.gen_range(0.0..4096.0),
                    rng.gen_range(0.0..4096.0),
                    magnitude,
                    quality,
                )
            })
            .collect()
    }

    #[test]
    fn test_out_of_band_entries_pass_through() {
        let config = FilterConfig::default();
        let entries = synthetic_catalog(7, 4000);
        let outcome = filter().apply(&entries);

        let expected: Vec<CatalogEntry> = entries
            .iter()
            .filter(|e| config.is_out_of_band(e.magnitude))
            .map(|e| e.rounded(&config.precision))
            .collect();
        assert_eq!(outcome.out_of_band, expected.len());
        assert_eq!(&outcome.entries[outcome.critical_survivors..], expected.as_slice());
    }

    #[test]
    fn test_survivors_satisfy_zone_and_bin_thresholds() {
        let engine = filter();
        let entries = synthetic_catalog(11, 4000);
        let candidates = engine.zones().select_candidates(&entries);
        let (survivors, bins) = engine.bins().clip(&candidates);

        assert!(!survivors.is_empty());
        for entry in &survivors {
            let zone = engine.zones().zone_for(entry.magnitude).unwrap();
            assert!(entry.quality <= zone.quality_ceiling);

            let bin = engine.bins().bin_for(entry.magnitude).unwrap();
            let (low, high) = bins[bin.index].stats.clip_window(2.0).unwrap();
            assert!(entry.quality >= low && entry.quality <= high);
        }
        assert!(survivors.len() <= candidates.len());
    }

    #[test]
    fn test_contaminated_bin_keeps_dominant_mode() {
        let magnitude = -6.6;
        let entries: Vec<CatalogEntry> = [0.6, 0.7, 0.05, 0.65, 0.8, 0.06, 0.75, 0.04]
            .iter()
            .enumerate()
            .map(|(i, &q)| CatalogEntry::new(i as f64, 0.0, magnitude, q))
            .collect();

        let outcome = filter().apply(&entries);
        assert_eq!(outcome.candidates, 8);
        assert_eq!(outcome.corrected_bins(), 1);
        let kept: Vec<f64> = outcome.entries.iter().map(|e| e.quality).collect();
        assert_eq!(kept, vec![0.05, 0.06, 0.04]);
    }

    #[test]
    fn test_second_pass_is_fixed_point() {
        let mut entries = Vec::new();
        let bins = filter().bins().bins().to_vec();
        for (i, bin) in bins.iter().enumerate() {
            let magnitude = crate::catalog::round_to((bin.lower + bin.upper) / 2.0, 4);
            for quality in [0.02, 0.03, 0.04] {
                entries.push(CatalogEntry::new(i as f64, 1.5, magnitude, quality));
            }
        }
        entries.push(CatalogEntry::new(1.0, 2.0, -15.0, 0.9));
        entries.push(CatalogEntry::new(3.0, 4.0, -5.0, 2.5));

        let first = filter().apply(&entries);
        assert_eq!(first.entries.len(), entries.len());

        let second = filter().apply(&first.entries);
        assert_eq!(second.entries, first.entries);
        assert_eq!(first.out_of_band, 2);
        assert_eq!(first.candidates, entries.len() - 2);
    }

    #[test]
    fn test_range_edges_are_dropped() {
        let mut entries = vec![
            CatalogEntry::new(0.0, 0.0, -13.7, 0.01),
            CatalogEntry::new(0.0, 0.0, -6.5, 0.01),
        ];
        // Enough company in the last bin for a defined statistic
        entries.push(CatalogEntry::new(1.0, 0.0, -6.52, 0.02));
        entries.push(CatalogEntry::new(2.0, 0.0, -6.53, 0.02));

        let outcome = filter().apply(&entries);
        // -13.7 is in no zone; -6.5 is a candidate but lies past the last bin
        assert_eq!(outcome.candidates, 3);
        assert_eq!(outcome.critical_survivors, 2);
        assert_eq!(outcome.out_of_band, 0);
        assert!(outcome.entries.iter().all(|e| e.magnitude != -13.7 && e.magnitude != -6.5));
    }

    #[test]
    fn test_rounding_applied_after_filtering() {
        let entries = vec![
            CatalogEntry::new(1.23456, 2.34567, -10.000049, 0.0999994),
            CatalogEntry::new(1.0, 2.0, -10.00001, 0.1),
            CatalogEntry::new(5.55555, 6.66666, -3.123456, 0.7777777),
        ];
        let outcome = filter().apply(&entries);
        assert_eq!(outcome.critical_survivors, 2);
        assert_eq!(
            outcome.entries,
            vec![
                CatalogEntry::new(1.235, 2.346, -10.0, 0.1),
                CatalogEntry::new(1.0, 2.0, -10.0, 0.1),
                CatalogEntry::new(5.556, 6.667, -3.1235, 0.77778),
            ]
        );
    }

    #[test]
    fn test_sparse_bins_reported() {
        let entries = vec![
            CatalogEntry::new(0.0, 0.0, -10.0, 0.05),
            CatalogEntry::new(0.0, 0.0, -8.0, 0.05),
            CatalogEntry::new(0.0, 0.0, -8.0, 0.06),
        ];
        let outcome = filter().apply(&entries);
        assert_eq!(outcome.critical_survivors, 2);
        assert_eq!(outcome.undefined_bins(), 1);
        assert_eq!(outcome.discarded_by_undefined_bins(), 1);
        assert_eq!(outcome.empty_bins(), 97);
        assert_eq!(outcome.corrected_bins(), 0);
    }

    #[test]
    fn test_invalid_configuration() {
        let config = FilterConfig {
            bin_edges: 0,
            ..Default::default()
        };
        assert_eq!(
            QualityFilter::new(config).unwrap_err(),
            ConfigError::TooFewBinEdges(0)
        );
    }
}
