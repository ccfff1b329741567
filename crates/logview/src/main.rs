//! Main entry point for logview

use clap::Parser;
use logview::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = logview::run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
