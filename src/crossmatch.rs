use crate::catalog::round_to;
use crate::utils::format_value;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

// Zero-based columns of a master list row
const DX_COL: usize = 2;
const DY_COL: usize = 3;
const X_COL: usize = 4;
const Y_COL: usize = 5;
const REFERENCE_COL: usize = 6;
const TARGET_COL: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchedStar {
    pub dx: f64,
    pub dy: f64,
    pub x: f64,
    pub y: f64,
    pub reference_mag: f64,
    pub target_mag: f64,
}

impl MatchedStar {
    pub fn separation(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub rows: usize,
    pub incomplete: usize,
    pub mismatched: usize,
    pub kept: usize,
}

fn parse_match_row(line: &str) -> Option<MatchedStar> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let value = |col: usize| -> Option<f64> {
        fields
            .get(col)
            .and_then(|f| f.parse::<f64>().ok())
            .filter(|v| !v.is_nan())
    };

    Some(MatchedStar {
        dx: value(DX_COL)?,
        dy: value(DY_COL)?,
        x: value(X_COL)?,
        y: value(Y_COL)?,
        reference_mag: value(REFERENCE_COL)?,
        target_mag: value(TARGET_COL)?,
    })
}

/// Keep rows with a complete set of columns and a match offset below `max_separation`.
pub fn filter_matches<R: BufRead>(
    reader: R,
    max_separation: f64,
) -> Result<(Vec<MatchedStar>, MatchSummary)> {
    let mut summary = MatchSummary::default();
    let mut kept = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.rows += 1;

        match parse_match_row(&line) {
            None => summary.incomplete += 1,
            Some(star) if star.separation() < max_separation => kept.push(star),
            Some(_) => summary.mismatched += 1,
        }
    }

    summary.kept = kept.len();
    Ok((kept, summary))
}

pub fn read_matches(path: &Path, max_separation: f64) -> Result<(Vec<MatchedStar>, MatchSummary)> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open master list: {}", path.display()))?;
    filter_matches(BufReader::new(file), max_separation)
        .with_context(|| format!("Failed to read master list: {}", path.display()))
}

/// Write `x y target_mag` rows rounded to 3, 3 and 4 decimals.
pub fn write_matches<W: Write>(writer: &mut W, stars: &[MatchedStar]) -> std::io::Result<()> {
    for star in stars {
        writeln!(
            writer,
            "{} {} {}",
            format_value(round_to(star.x, 3)),
            format_value(round_to(star.y, 3)),
            format_value(round_to(star.target_mag, 4))
        )?;
    }
    Ok(())
}
