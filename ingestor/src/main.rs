use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sweepcore::telemetry::RunSummary;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod external;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "ADRAD sweep ingest driver")]
struct Args {
    /// Load a workflow config from YAML; relative paths resolve next to it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Convert every file in the archive input directory into UF and L2, then delete it
    Archive {
        /// Use the azimuth-corrected parameter profiles
        #[arg(long = "correct-az", default_value_t = false)]
        correct_az: bool,
    },
    /// Process the newest real-time files and refresh the display catalog
    Realtime {
        /// Root directory for the catalog; products go under <root>/<site>
        output_root: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

fn print_summary(mode: &str, summary: &RunSummary) {
    println!(
        "{} run -> considered {}, dispatched {} ({} joined), skipped {}, failed {}, already processed {}",
        mode,
        summary.considered,
        summary.dispatched,
        summary.merged,
        summary.skipped,
        summary.failed,
        summary.already_processed
    );
    if summary.catalog_retained > 0 || summary.catalog_removed > 0 {
        println!(
            "catalog -> {} products listed, {} rotated out",
            summary.catalog_retained, summary.catalog_removed
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let (workflow_config, base_dir) = if let Some(path) = args.config {
        let config = WorkflowConfig::load(&path)?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        (config, base)
    } else {
        let base = std::env::current_dir().context("resolving working directory")?;
        (WorkflowConfig::default(), base)
    };

    let runner = Runner::new(workflow_config, base_dir);
    match args.mode {
        Mode::Archive { correct_az } => {
            let summary = runner.archive(correct_az)?;
            print_summary("Archive", &summary);
        }
        Mode::Realtime { output_root } => {
            let summary = runner.realtime(output_root.as_deref())?;
            print_summary("Real-time", &summary);
        }
    }

    Ok(())
}
