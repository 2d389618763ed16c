use crate::catalog::save_rows;
use crate::crossmatch::{read_matches, write_matches};
use anyhow::Result;
use std::path::Path;

pub fn match_filter(input_file: &str, output: &str, max_separation: f64) -> Result<()> {
    if !(max_separation > 0.0) {
        anyhow::bail!("Maximum separation must be positive, got {}", max_separation);
    }

    println!("Processing file: {}", input_file);
    let (stars, summary) = read_matches(Path::new(input_file), max_separation)?;

    save_rows(Path::new(output), |writer| write_matches(writer, &stars))?;

    println!("  Rows read: {}", summary.rows);
    println!("  Incomplete rows: {}", summary.incomplete);
    println!("  Mismatched (offset >= {}): {}", max_separation, summary.mismatched);
    println!("Data filtered and saved as {}", output);

    Ok(())
}
