//! Main application structure for the log viewer GUI

use std::sync::Arc;

use logview_core::{CapabilityError, LogRecord, LogViewer, Severity, ViewerPreferences};
use tracing::error;

use crate::producer_bridge::ProducerBridge;
use crate::ui_state::UiState;
use crate::widgets::header::{self, HeaderAction};
use crate::widgets::log_view::LogView;

/// Main application struct implementing eframe::App
pub struct LogViewApp {
    /// Log records and auto-scroll state, owned by the UI thread
    viewer: LogViewer,

    /// Rendering surface for the records
    log_view: LogView,

    /// UI state
    ui_state: UiState,

    /// Viewer preferences from config.toml
    preferences: ViewerPreferences,

    /// Background producers; dropped with the app
    _producers: ProducerBridge,

    /// Set when rendering hit an unrecoverable error
    fatal: Option<String>,
}

impl LogViewApp {
    /// Create a new LogViewApp. Fails if log lines cannot be made selectable.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut viewer: LogViewer,
        preferences: ViewerPreferences,
        producers: ProducerBridge,
    ) -> Result<Self, CapabilityError> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let log_view = LogView::new()?;

        // Producers wake the UI loop instead of it polling every frame
        let ctx = cc.egui_ctx.clone();
        viewer.install_wake_hook(Arc::new(move || ctx.request_repaint()));

        let ui_state = UiState::new();
        viewer.subscribe(ui_state.observer());

        viewer.add_log_entry(LogRecord::new("Viewer started"), Severity::Info);

        Ok(Self {
            viewer,
            log_view,
            ui_state,
            preferences,
            _producers: producers,
            fatal: None,
        })
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let pinned = self.viewer.is_pinned();
            if header::render(ui, &mut self.ui_state, pinned) == HeaderAction::Clear {
                self.viewer.clear_all_logs();
            }
        });
    }

    fn render_log(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.fatal {
                ui.colored_label(egui::Color32::RED, message);
                return;
            }

            let result = self.log_view.render(
                ui,
                &mut self.viewer,
                &self.preferences,
                self.ui_state.show_timestamps,
            );
            if let Err(err) = result {
                error!(error = %err, "log view cannot render selectable lines");
                self.fatal = Some(format!("Log view failed: {err}"));
            }
        });
    }
}

impl eframe::App for LogViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply everything producers queued since the last frame
        self.viewer.pump();
        if self.ui_state.take_cleared() {
            self.log_view.reset_lines();
        }

        self.render_header(ctx);
        self.render_log(ctx);
    }
}
