use crate::config::{CatalogFormat, Precision};
use crate::utils::format_value;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One detection from the photometry pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub x: f64,
    pub y: f64,
    /// Instrumental magnitude; more negative is brighter
    pub magnitude: f64,
    /// Fit-quality residual; lower is better
    pub quality: f64,
}

impl CatalogEntry {
    pub fn new(x: f64, y: f64, magnitude: f64, quality: f64) -> Self {
        Self {
            x,
            y,
            magnitude,
            quality,
        }
    }

    pub fn rounded(&self, precision: &Precision) -> Self {
        Self {
            x: round_to(self.x, precision.x),
            y: round_to(self.y, precision.y),
            magnitude: round_to(self.magnitude, precision.magnitude),
            quality: round_to(self.quality, precision.quality),
        }
    }
}

/// Round half to even at the given number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Row counts gathered while loading a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Non-blank, non-comment rows seen
    pub rows: usize,
    pub accepted: usize,
    pub sentinel: usize,
    pub malformed: usize,
    pub negative_quality: usize,
}

impl LoadSummary {
    pub fn rejected(&self) -> usize {
        self.sentinel + self.malformed + self.negative_quality
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
    pub summary: LoadSummary,
}

#[derive(Debug, PartialEq)]
enum RowOutcome {
    Entry(CatalogEntry),
    Blank,
    Sentinel,
    Malformed,
    NegativeQuality,
}

fn parse_row(line: &str, format: &CatalogFormat) -> RowOutcome {
    let content = if format.comment_marker.is_empty() {
        line
    } else {
        match line.find(format.comment_marker.as_str()) {
            Some(pos) => &line[..pos],
            None => line,
        }
    };

    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.is_empty() {
        return RowOutcome::Blank;
    }
    if fields.len() < 4 {
        return RowOutcome::Malformed;
    }
    if fields[3] == format.sentinel {
        return RowOutcome::Sentinel;
    }

    let finite = |field: &str| field.parse::<f64>().ok().filter(|v| v.is_finite());
    let (Some(x), Some(y), Some(magnitude)) =
        (finite(fields[0]), finite(fields[1]), finite(fields[2]))
    else {
        return RowOutcome::Malformed;
    };
    let Ok(quality) = fields[3].parse::<f64>() else {
        return RowOutcome::Malformed;
    };

    // NaN fails this comparison and is dropped along with negative values
    if !(quality >= 0.0) {
        return RowOutcome::NegativeQuality;
    }

    RowOutcome::Entry(CatalogEntry::new(x, y, magnitude, quality))
}

/// Parse a catalog stream, silently excluding rows that cannot be used.
pub fn parse_catalog<R: BufRead>(reader: R, format: &CatalogFormat) -> Result<Catalog> {
    let mut catalog = Catalog::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let outcome = parse_row(&line, format);
        if outcome != RowOutcome::Blank {
            catalog.summary.rows += 1;
        }
        match outcome {
            RowOutcome::Entry(entry) => {
                catalog.summary.accepted += 1;
                catalog.entries.push(entry);
            }
            RowOutcome::Blank => {}
            RowOutcome::Sentinel => catalog.summary.sentinel += 1,
            RowOutcome::Malformed => {
                tracing::debug!("Skipping malformed row {}: {:?}", line_no + 1, line);
                catalog.summary.malformed += 1;
            }
            RowOutcome::NegativeQuality => catalog.summary.negative_quality += 1,
        }
    }

    Ok(catalog)
}

pub fn read_catalog(path: &Path, format: &CatalogFormat) -> Result<Catalog> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open catalog: {}", path.display()))?;
    parse_catalog(BufReader::new(file), format)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))
}

/// Write entries space-separated, one per line, without a header.
pub fn write_catalog<W: Write>(writer: &mut W, entries: &[CatalogEntry]) -> std::io::Result<()> {
    for entry in entries {
        writeln!(
            writer,
            "{} {} {} {}",
            format_value(entry.x),
            format_value(entry.y),
            format_value(entry.magnitude),
            format_value(entry.quality)
        )?;
    }
    Ok(())
}

/// Write rows to `path` atomically: a sibling temp file is renamed into place
/// only after every row was written.
pub fn save_rows<F>(path: &Path, write_rows: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let result = (|| -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(tmp_path)?);
        write_rows(&mut writer)?;
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(tmp_path);
        return Err(e).with_context(|| format!("Failed to write {}", path.display()));
    }

    fs::rename(tmp_path, path)
        .with_context(|| format!("Failed to move output into place: {}", path.display()))
}

pub fn save_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    save_rows(path, |writer| write_catalog(writer, entries))
}
