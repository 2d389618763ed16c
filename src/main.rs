use clap::Parser;
use phot_reduce::cli::{Cli, Commands};
use phot_reduce::commands;
use phot_reduce::config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_config = match &cli.config {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Filter {
            input_files,
            output_dir,
            dry_run,
            format,
            filter_options,
        } => {
            let config = filter_options.resolve(&base_config);
            commands::filter_catalogs(&input_files, &config, &output_dir, dry_run, &format)?;
        }
        Commands::Zones {
            bins,
            format,
            filter_options,
        } => {
            let config = filter_options.resolve(&base_config);
            commands::show_zones(&config.filter, bins, &format)?;
        }
        Commands::MatchFilter {
            input_file,
            output,
            max_separation,
        } => {
            commands::match_filter(&input_file, &output, max_separation)?;
        }
        Commands::CountRegions {
            regions_file,
            points_file,
            color_col,
            mag_col,
            format,
        } => {
            commands::count_regions(
                &regions_file,
                &points_file,
                color_col,
                mag_col,
                &base_config.catalog.comment_marker,
                &format,
            )?;
        }
    }

    Ok(())
}
