//! Log viewer GUI using eframe/egui
//!
//! The rendering layer for `logview-core`: the window, the log list and the producers that feed it.

pub mod app;
pub mod producer_bridge;
pub mod producers;
pub mod scroll_surface;
pub mod ui_state;
pub mod widgets;

use anyhow::Context as _;
use logview_core::{FileConfig, LogViewer};

pub use producers::ProducerKind;

/// Main entry point for the GUI. Blocks until the window is closed.
pub fn run(viewer: LogViewer, config: FileConfig, producer: ProducerKind) -> anyhow::Result<()> {
    let mut producers =
        producer_bridge::ProducerBridge::new().context("failed to start producer runtime")?;
    producers.start(&producer, &viewer.handle());

    let window = config.window;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_min_inner_size([320.0, 200.0])
            .with_resizable(true)
            .with_title(window.title.clone()),
        ..Default::default()
    };

    let preferences = config.viewer;
    eframe::run_native(
        &window.title,
        native_options,
        Box::new(move |cc| {
            let app = app::LogViewApp::new(cc, viewer, preferences, producers)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run GUI: {err}"))?;

    Ok(())
}
