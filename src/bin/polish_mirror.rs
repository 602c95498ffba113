//! Command-line entry point for mirror post-processing.
//!
//! Two effective options: override the mirror root, and disable the pre-run
//! backup. The rule catalog is compiled-in configuration, not runtime input.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use mirror_polish::{Options, Pipeline};

/// Log file written into the current working directory.
const LOG_FILE: &str = "polish-mirror.log";

#[derive(Debug, Parser)]
#[command(
    name = "polish-mirror",
    version,
    about = "Post-process a mirrored wiki site for offline browsing"
)]
struct Cli {
    /// Path to the mirror root directory.
    #[arg(long, value_name = "PATH")]
    mirror_root: Option<PathBuf>,

    /// Skip creating the pre-run backup copy.
    #[arg(long)]
    no_backup: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut options = cli.mirror_root.map_or_else(Options::default, Options::new);
    options.skip_backup = cli.no_backup;
    info!("mirror root: {}", options.mirror_root.display());

    let report = Pipeline::new(options).run()?;
    info!(
        "run summary: {} documents, {} rewritten, {} unchanged, {} failed",
        report.discovered, report.rewritten, report.unchanged, report.failed
    );
    Ok(())
}

/// Console echo at info level plus a debug-level file sink.
fn init_logging() {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    match File::create(LOG_FILE) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
        Err(err) => eprintln!("Warning: could not create log file {LOG_FILE}: {err}"),
    }

    let _ = CombinedLogger::init(loggers);
}
