use crate::models::RegionCount;
use crate::regions::{load_regions, parse_points};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn count_regions(
    regions_file: &str,
    points_file: &str,
    color_col: usize,
    mag_col: usize,
    comment_marker: &str,
    format: &str,
) -> Result<Vec<RegionCount>> {
    let regions = load_regions(Path::new(regions_file))?;
    let text = fs::read_to_string(points_file)
        .with_context(|| format!("Failed to read points file: {}", points_file))?;
    let points = parse_points(&text, color_col, mag_col, comment_marker);
    tracing::debug!(
        "Loaded {} regions and {} points",
        regions.len(),
        points.len()
    );

    let counts: Vec<RegionCount> = regions
        .iter()
        .map(|region| RegionCount {
            region_id: region.id,
            vertices: region.vertices.len(),
            stars: region.count_inside(&points),
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&counts)?),
        _ => {
            if counts.is_empty() {
                println!("No regions found in {}", regions_file);
            } else {
                println!("{:<10} {:>10} {:>10}", "Region_ID", "Vertices", "Stars");
                println!("{:-<32}", "");
                for count in &counts {
                    println!(
                        "{:<10} {:>10} {:>10}",
                        count.region_id, count.vertices, count.stars
                    );
                }
                println!("\nTotal points: {}", points.len());
            }
        }
    }

    Ok(counts)
}
