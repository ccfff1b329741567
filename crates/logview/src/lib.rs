//! Command-line front end: parses arguments, loads configuration, sets up logging and hands the
//! viewer to the GUI.

pub mod cli_args;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context as _;
use logview_core::{
    LogRecord, LogViewer, LoggingDestination, Severity, init_logging, load_config,
    load_config_from, save_config_to,
};
use tracing::{info, warn};

pub use cli_args::Cli;

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Run the viewer for parsed arguments. Blocks until the window closes.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config_file = cli
        .config
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(logview_core::config_path);
    let load = if cli.config.is_some() {
        load_config_from(&config_file)
    } else {
        load_config()
    };

    let mut config = load.config;
    cli.apply_overrides(&mut config);

    if cli.save_config {
        save_config_to(&config, &config_file)
            .with_context(|| format!("failed to write {}", config_file.display()))?;
        println!("Configuration written to {}", config_file.display());
        return Ok(());
    }

    let viewer = LogViewer::with_bottom_tolerance(config.viewer.bottom_tolerance);
    let mirror = config.viewer.mirror_tracing.then(|| viewer.handle());
    match init_logging(LoggingDestination::FileOnly, mirror) {
        Ok(Some(path)) => info!(path = %path.display(), source = ?load.source, "logview starting"),
        Ok(None) => {}
        Err(err) => eprintln!("Warning: failed to initialize logging: {err}"),
    }

    for warning in &load.warnings {
        warn!(%warning, "configuration issue");
        viewer.add_log_entry(LogRecord::new(format!("Config: {warning}")), Severity::Warning);
    }

    let producer = cli.producer_kind(&config, std::io::stdin().is_terminal());
    logview_gui::run(viewer, config, producer)
}
