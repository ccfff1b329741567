use std::time::Duration;

use clap::{ArgAction, Parser, ValueHint};
use logview_core::FileConfig;
use logview_gui::ProducerKind;

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about = "Live, color-coded log viewer", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, value_hint = ValueHint::FilePath, value_name = "PATH")]
    pub config: Option<String>,

    /// Read log lines from standard input (default when stdin is piped).
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "demo")]
    pub stdin: bool,

    /// Feed the viewer with simulated build output (default when stdin is a terminal).
    #[arg(long, action = ArgAction::SetTrue)]
    pub demo: bool,

    /// Number of concurrent demo producers.
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..=64)
    )]
    pub producers: Option<u16>,

    /// Delay between lines of one demo producer.
    #[arg(
        long = "interval-ms",
        value_name = "MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: Option<u64>,

    /// Window title.
    #[arg(long)]
    pub title: Option<String>,

    /// Mirror the viewer's own diagnostics into the log.
    #[arg(long, action = ArgAction::SetTrue)]
    pub mirror_tracing: bool,

    /// Write the effective configuration to the config file and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    pub save_config: bool,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut FileConfig) {
        if let Some(producers) = self.producers {
            config.demo.producers = usize::from(producers);
        }
        if let Some(interval_ms) = self.interval_ms {
            config.demo.interval_ms = interval_ms;
        }
        if let Some(title) = self.title.as_ref() {
            config.window.title = title.clone();
        }
        if self.mirror_tracing {
            config.viewer.mirror_tracing = true;
        }
    }

    /// Pick the producer: explicit flags win, otherwise piped stdin is read and an interactive
    /// terminal gets the demo.
    pub fn producer_kind(&self, config: &FileConfig, stdin_is_terminal: bool) -> ProducerKind {
        let demo = ProducerKind::Demo {
            producers: config.demo.producers,
            interval: Duration::from_millis(config.demo.interval_ms),
        };
        if self.stdin {
            ProducerKind::Stdin
        } else if self.demo || stdin_is_terminal {
            demo
        } else {
            ProducerKind::Stdin
        }
    }
}
