pub mod count_regions;
pub mod filter_catalog;
pub mod match_filter;
pub mod show_zones;

pub use count_regions::count_regions;
pub use filter_catalog::filter_catalogs;
pub use match_filter::match_filter;
pub use show_zones::show_zones;
