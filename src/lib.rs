pub mod bins;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crossmatch;
pub mod models;
pub mod quality_filter;
pub mod regions;
pub mod spacing;
pub mod utils;
pub mod zones;

// Re-export commonly used items
pub use catalog::{CatalogEntry, LoadSummary};
pub use config::{CatalogFormat, Config, ConfigError, FilterConfig};
pub use quality_filter::{FilterOutcome, QualityFilter};
