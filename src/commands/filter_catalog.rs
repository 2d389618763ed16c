use crate::catalog::{read_catalog, save_catalog};
use crate::config::Config;
use crate::models::{FileReport, FileStatus};
use crate::quality_filter::QualityFilter;
use crate::utils::{filtered_file_name, truncate_string};
use anyhow::Result;
use std::path::Path;

/// Filter each input catalog independently; a failing file is reported and the
/// batch moves on. Returns an error after the batch if any file failed.
pub fn filter_catalogs(
    input_files: &[String],
    config: &Config,
    output_dir: &str,
    dry_run: bool,
    format: &str,
) -> Result<()> {
    let mut reports = Vec::with_capacity(input_files.len());

    for input in input_files {
        if format != "json" {
            println!("Processing file: {}", input);
        }

        let report = match process_file(input, config, Path::new(output_dir), dry_run) {
            Ok(report) => {
                if format != "json" {
                    match (&report.output, report.status) {
                        (Some(output), FileStatus::Written) => println!("File saved as: {}", output),
                        (Some(output), _) => println!("  [DRY RUN] would write: {}", output),
                        _ => {}
                    }
                }
                report
            }
            Err(e) => {
                tracing::warn!("Failed to filter {}: {:#}", input, e);
                if format != "json" {
                    println!("  ERROR: {:#}", e);
                }
                FileReport::failed(input.clone(), format!("{:#}", e))
            }
        };
        reports.push(report);
    }

    match format {
        "json" => output_json(&reports)?,
        _ => output_table(&reports, dry_run),
    }

    let failed = reports
        .iter()
        .filter(|r| r.status == FileStatus::Failed)
        .count();
    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, reports.len());
    }

    Ok(())
}

/// Load, filter and write one catalog. Nothing is written unless every step succeeds.
pub fn process_file(
    input: &str,
    config: &Config,
    output_dir: &Path,
    dry_run: bool,
) -> Result<FileReport> {
    let filter = QualityFilter::new(config.filter.clone())?;

    let input_path = Path::new(input);
    let catalog = read_catalog(input_path, &config.catalog)?;
    tracing::debug!(
        "{}: {} rows, {} accepted, {} sentinel, {} malformed, {} negative quality",
        input,
        catalog.summary.rows,
        catalog.summary.accepted,
        catalog.summary.sentinel,
        catalog.summary.malformed,
        catalog.summary.negative_quality
    );

    let outcome = filter.apply(&catalog.entries);

    let discarded = outcome.discarded_by_undefined_bins();
    if discarded > 0 {
        tracing::warn!(
            "{}: {} candidates discarded in {} bins without a defined statistic",
            input,
            discarded,
            outcome.undefined_bins()
        );
    }

    let output_path = output_dir.join(filtered_file_name(
        input_path,
        &config.catalog.output_suffix,
        &config.catalog.output_extension,
    ));

    let status = if dry_run {
        FileStatus::Checked
    } else {
        save_catalog(&output_path, &outcome.entries)?;
        FileStatus::Written
    };

    tracing::info!(
        "{}: kept {} of {} entries ({} in critical range, {} out of band)",
        input,
        outcome.entries.len(),
        catalog.entries.len(),
        outcome.critical_survivors,
        outcome.out_of_band
    );

    Ok(FileReport::from_outcome(
        input.to_string(),
        Some(output_path.display().to_string()),
        status,
        catalog.summary,
        &outcome,
    ))
}

fn output_table(reports: &[FileReport], dry_run: bool) {
    println!();
    println!(
        "{:<40} {:<8} {:>8} {:>8} {:>10} {:>8} {:>8} {:>10}",
        "File", "Status", "Loaded", "Dropped", "Candidates", "Kept", "Outside", "Undefined"
    );
    println!("{:-<108}", "");

    for report in reports {
        println!(
            "{:<40} {:<8} {:>8} {:>8} {:>10} {:>8} {:>8} {:>10}",
            truncate_string(&report.input, 40),
            report.status.as_str(),
            report.loaded.accepted,
            report.loaded.rejected(),
            report.candidates,
            report.critical_kept,
            report.out_of_band,
            report.undefined_bins
        );
    }

    let written = reports
        .iter()
        .filter(|r| r.status == FileStatus::Written)
        .count();
    let failed: Vec<&FileReport> = reports
        .iter()
        .filter(|r| r.status == FileStatus::Failed)
        .collect();

    println!("\nSummary:");
    println!("  Files written: {}", written);
    if !failed.is_empty() {
        println!("  Failures: {}", failed.len());
        for report in failed {
            println!(
                "    {}: {}",
                report.input,
                report.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if dry_run {
        println!("\nThis was a dry run. Use without --dry-run to write filtered catalogs.");
    }
}

fn output_json(reports: &[FileReport]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(reports)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use std::fs;

    const SAMPLE: &str = "# x y mag qfit\n\
        10.0 20.0 -15.2 0.4\n\
        11.0 21.0 -10.0 0.05\n\
        12.0 22.0 -10.01 0.06\n\
        13.0 23.0 -10.02 *********\n\
        14.0 24.0 -5.0 1.7\n";

    #[test]
    fn test_process_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("field.xym");
        fs::write(&input, SAMPLE).unwrap();

        let report =
            process_file(input.to_str().unwrap(), &Config::default(), dir.path(), false).unwrap();

        assert_eq!(report.status, FileStatus::Written);
        assert_eq!(report.loaded.sentinel, 1);
        assert_eq!(report.written, 4);
        let output = dir.path().join("field_s.xym");
        assert_eq!(report.output.as_deref(), Some(output.to_str().unwrap()));
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "11.0 21.0 -10.0 0.05\n12.0 22.0 -10.01 0.06\n10.0 20.0 -15.2 0.4\n14.0 24.0 -5.0 1.7\n"
        );
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("field.xym");
        fs::write(&input, SAMPLE).unwrap();

        let report =
            process_file(input.to_str().unwrap(), &Config::default(), dir.path(), true).unwrap();
        assert_eq!(report.status, FileStatus::Checked);
        assert!(!dir.path().join("field_s.xym").exists());
    }

    #[test]
    fn test_invalid_configuration_fails_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("field.xym");
        fs::write(&input, SAMPLE).unwrap();
        let config = Config {
            filter: FilterConfig {
                zone_count: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let err = process_file(input.to_str().unwrap(), &config, dir.path(), false).unwrap_err();
        assert!(format!("{err}").contains("zone count"));
        assert!(!dir.path().join("field_s.xym").exists());
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.xym");
        fs::write(&good, SAMPLE).unwrap();
        let missing = dir.path().join("missing.xym");

        let inputs = vec![
            missing.to_str().unwrap().to_string(),
            good.to_str().unwrap().to_string(),
        ];
        let result = filter_catalogs(
            &inputs,
            &Config::default(),
            dir.path().to_str().unwrap(),
            false,
            "json",
        );

        assert!(result.is_err());
        assert!(dir.path().join("good_s.xym").exists());
        assert!(!dir.path().join("missing_s.xym").exists());
    }
}
