use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Polygon saved from a colour-magnitude diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: u32,
    /// Polygon vertices in (colour, magnitude) space, implicitly closed
    pub vertices: Vec<(f64, f64)>,
}

impl Region {
    /// Even-odd ray casting; points exactly on an edge may fall either way.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn count_inside(&self, points: &[(f64, f64)]) -> usize {
        points.iter().filter(|&&(x, y)| self.contains(x, y)).count()
    }
}

#[derive(Debug, Deserialize)]
struct RegionRecord {
    #[serde(rename = "Region_ID")]
    id: u32,
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
}

/// Read a `Region_ID,X,Y` CSV. Columns are matched by header name and regions keep
/// the order their first vertex appears in.
pub fn read_regions<R: Read>(reader: R) -> Result<Vec<Region>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut regions: Vec<Region> = Vec::new();

    for result in rdr.deserialize() {
        let record: RegionRecord = result.context("Invalid region row")?;
        match regions.iter_mut().find(|r| r.id == record.id) {
            Some(region) => region.vertices.push((record.x, record.y)),
            None => regions.push(Region {
                id: record.id,
                vertices: vec![(record.x, record.y)],
            }),
        }
    }

    Ok(regions)
}

pub fn parse_regions(text: &str) -> Result<Vec<Region>> {
    read_regions(text.as_bytes())
}

pub fn load_regions(path: &Path) -> Result<Vec<Region>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to read regions file: {}", path.display()))?;
    read_regions(file).with_context(|| format!("Invalid regions file: {}", path.display()))
}

/// Read (colour, magnitude) pairs from whitespace columns, skipping rows that lack them.
pub fn parse_points(
    text: &str,
    color_col: usize,
    mag_col: usize,
    comment_marker: &str,
) -> Vec<(f64, f64)> {
    text.lines()
        .filter_map(|line| {
            let content = match line.find(comment_marker) {
                Some(pos) if !comment_marker.is_empty() => &line[..pos],
                _ => line,
            };
            let fields: Vec<&str> = content.split_whitespace().collect();
            let color = fields.get(color_col)?.parse::<f64>().ok()?;
            let magnitude = fields.get(mag_col)?.parse::<f64>().ok()?;
            (color.is_finite() && magnitude.is_finite()).then_some((color, magnitude))
        })
        .collect()
}
