use crate::config::{Config, FilterConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "phot-reduce")]
#[command(about = "Clean photometry catalogs with adaptive quality-metric filtering", long_about = None)]
pub struct Cli {
    /// JSON configuration file (missing fields keep their defaults)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter catalogs by magnitude and quality metric, writing <name>_s.xym files
    Filter {
        /// Input catalogs (x y magnitude quality)
        #[arg(required = true)]
        input_files: Vec<String>,

        /// Directory for the filtered catalogs
        #[arg(short, long, default_value = ".")]
        output_dir: String,

        /// Run the filter and report without writing files
        #[arg(long)]
        dry_run: bool,

        /// Summary format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        #[command(flatten)]
        filter_options: FilterOptions,
    },

    /// Show the zone and bin partitions for the active configuration
    Zones {
        /// Also list the linear bins
        #[arg(long)]
        bins: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        #[command(flatten)]
        filter_options: FilterOptions,
    },

    /// Keep well-matched stars from a cross-match master list
    MatchFilter {
        /// Master list file
        input_file: String,

        /// Output file
        #[arg(short, long, default_value = "FINAL_MASTER.xym")]
        output: String,

        /// Maximum match offset in pixels (exclusive)
        #[arg(long, default_value = "0.5")]
        max_separation: f64,
    },

    /// Count catalog stars inside saved diagram regions
    CountRegions {
        /// Regions CSV (Region_ID,X,Y)
        regions_file: String,

        /// Point catalog with colour and magnitude columns
        points_file: String,

        /// Zero-based column holding the colour
        #[arg(long, default_value = "0")]
        color_col: usize,

        /// Zero-based column holding the magnitude
        #[arg(long, default_value = "1")]
        mag_col: usize,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Per-run overrides of the filter configuration.
#[derive(Parser, Debug, Clone, Default)]
pub struct FilterOptions {
    /// Bright end of the critical magnitude range
    #[arg(long, allow_hyphen_values = true)]
    pub saturation_limit: Option<f64>,

    /// Faint end of the critical magnitude range
    #[arg(long, allow_hyphen_values = true)]
    pub faint_limit: Option<f64>,

    /// Number of geometric admission zones
    #[arg(long)]
    pub zones: Option<usize>,

    /// Quality ceiling of the brightest zone
    #[arg(long)]
    pub quality_floor: Option<f64>,

    /// Quality ceiling of the faintest zone
    #[arg(long)]
    pub quality_ceiling: Option<f64>,

    /// Number of linear bin boundaries
    #[arg(long)]
    pub bin_edges: Option<usize>,

    /// Sigma-clip half-width in standard deviations
    #[arg(long)]
    pub clip_sigma: Option<f64>,

    /// Median at or above which a bin is recomputed on its low-quality population
    #[arg(long)]
    pub bimodality_threshold: Option<f64>,
}

impl FilterOptions {
    pub fn apply_to(&self, mut config: FilterConfig) -> FilterConfig {
        if let Some(v) = self.saturation_limit {
            config.saturation_limit = v;
        }
        if let Some(v) = self.faint_limit {
            config.faint_limit = v;
        }
        if let Some(v) = self.zones {
            config.zone_count = v;
        }
        if let Some(v) = self.quality_floor {
            config.quality_floor = v;
        }
        if let Some(v) = self.quality_ceiling {
            config.quality_ceiling = v;
        }
        if let Some(v) = self.bin_edges {
            config.bin_edges = v;
        }
        if let Some(v) = self.clip_sigma {
            config.clip_sigma = v;
        }
        if let Some(v) = self.bimodality_threshold {
            config.bimodality_threshold = v;
        }
        config
    }

    pub fn resolve(&self, base: &Config) -> Config {
        Config {
            filter: self.apply_to(base.filter.clone()),
            catalog: base.catalog.clone(),
        }
    }
}
