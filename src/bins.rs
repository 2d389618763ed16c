use crate::catalog::CatalogEntry;
use crate::config::{ConfigError, FilterConfig};
use crate::spacing::linspace;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub index: usize,
    /// Inclusive bright boundary
    pub lower: f64,
    /// Exclusive faint boundary
    pub upper: f64,
}

impl Bin {
    pub fn contains_magnitude(&self, magnitude: f64) -> bool {
        magnitude >= self.lower && magnitude < self.upper
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinStatistics {
    /// Candidates in the bin before any correction
    pub count: usize,
    pub median: Option<f64>,
    pub std: Option<f64>,
    /// Statistics were recomputed on the sub-threshold population
    pub corrected: bool,
}

impl BinStatistics {
    pub fn compute(qualities: &[f64], bimodality_threshold: f64) -> Self {
        let median_raw = median(qualities);
        let contaminated = median_raw.is_some_and(|m| m >= bimodality_threshold);

        if contaminated {
            let dominant: Vec<f64> = qualities
                .iter()
                .copied()
                .filter(|&q| q < bimodality_threshold)
                .collect();
            Self {
                count: qualities.len(),
                median: median(&dominant),
                std: sample_std(&dominant),
                corrected: true,
            }
        } else {
            Self {
                count: qualities.len(),
                median: median_raw,
                std: sample_std(qualities),
                corrected: false,
            }
        }
    }

    pub fn is_defined(&self) -> bool {
        self.median.is_some() && self.std.is_some()
    }

    /// Inclusive acceptance window `median ± k·std`, if the statistic exists.
    pub fn clip_window(&self, clip_sigma: f64) -> Option<(f64, f64)> {
        let (median, std) = (self.median?, self.std?);
        Some((median - clip_sigma * std, median + clip_sigma * std))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinOutcome {
    pub bin: Bin,
    pub stats: BinStatistics,
    pub survivors: usize,
}

/// Equal-width bins over the critical range. Candidates within `median ± k·std`
/// of their bin survive; a bin without a defined statistic keeps none.
#[derive(Debug, Clone)]
pub struct BinPartition {
    bins: Vec<Bin>,
    clip_sigma: f64,
    bimodality_threshold: f64,
}

impl BinPartition {
    pub fn new(config: &FilterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let edges = linspace(config.saturation_limit, config.faint_limit, config.bin_edges);
        let bins = edges
            .windows(2)
            .enumerate()
            .map(|(index, bounds)| Bin {
                index,
                lower: bounds[0],
                upper: bounds[1],
            })
            .collect();

        Ok(Self {
            bins,
            clip_sigma: config.clip_sigma,
            bimodality_threshold: config.bimodality_threshold,
        })
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bin_for(&self, magnitude: f64) -> Option<&Bin> {
        self.bins.iter().find(|bin| bin.contains_magnitude(magnitude))
    }

    /// Sigma-clip candidates bin by bin; survivors keep candidate order within a bin.
    pub fn clip(&self, candidates: &[CatalogEntry]) -> (Vec<CatalogEntry>, Vec<BinOutcome>) {
        let mut survivors = Vec::new();
        let mut outcomes = Vec::with_capacity(self.bins.len());

        for bin in &self.bins {
            let members: Vec<&CatalogEntry> = candidates
                .iter()
                .filter(|entry| bin.contains_magnitude(entry.magnitude))
                .collect();
            let qualities: Vec<f64> = members.iter().map(|entry| entry.quality).collect();
            let stats = BinStatistics::compute(&qualities, self.bimodality_threshold);

            let before = survivors.len();
            match stats.clip_window(self.clip_sigma) {
                Some((low, high)) => survivors.extend(
                    members
                        .iter()
                        .filter(|entry| entry.quality >= low && entry.quality <= high)
                        .map(|entry| **entry),
                ),
                None if !members.is_empty() => tracing::debug!(
                    "Bin {} [{:.4}, {:.4}) has no defined statistic; discarding {} candidates",
                    bin.index,
                    bin.lower,
                    bin.upper,
                    members.len()
                ),
                None => {}
            }

            outcomes.push(BinOutcome {
                bin: *bin,
                stats,
                survivors: survivors.len() - before,
            });
        }

        (survivors, outcomes)
    }
}
