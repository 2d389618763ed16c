use crate::config::FilterConfig;
use crate::quality_filter::QualityFilter;
use anyhow::Result;

pub fn show_zones(config: &FilterConfig, show_bins: bool, format: &str) -> Result<()> {
    let filter = QualityFilter::new(config.clone())?;

    match format {
        "json" => {
            let mut value = serde_json::json!({
                "saturation_limit": config.saturation_limit,
                "faint_limit": config.faint_limit,
                "zones": filter.zones().zones(),
            });
            if show_bins {
                value["bins"] = serde_json::to_value(filter.bins().bins())?;
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            println!(
                "Critical range: {} to {} ({} zones, {} bins)",
                config.saturation_limit,
                config.faint_limit,
                filter.zones().zones().len(),
                filter.bins().bins().len()
            );
            println!();
            println!(
                "{:<6} {:>12} {:>12} {:>12}",
                "Zone", "From (excl)", "To (incl)", "Max quality"
            );
            println!("{:-<45}", "");
            for zone in filter.zones().zones() {
                println!(
                    "{:<6} {:>12.4} {:>12.4} {:>12.5}",
                    zone.index, zone.lower, zone.upper, zone.quality_ceiling
                );
            }

            if show_bins {
                println!();
                println!("{:<6} {:>12} {:>12}", "Bin", "From (incl)", "To (excl)");
                println!("{:-<32}", "");
                for bin in filter.bins().bins() {
                    println!("{:<6} {:>12.4} {:>12.4}", bin.index, bin.lower, bin.upper);
                }
            }
        }
    }

    Ok(())
}
