//! Header row: entry count badge, follow indicator and the Clear button

use crate::ui_state::UiState;

/// What the user asked for in the header this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    None,
    Clear,
}

/// Render the header
pub fn render(ui: &mut egui::Ui, ui_state: &mut UiState, pinned: bool) -> HeaderAction {
    let mut action = HeaderAction::None;

    ui.horizontal(|ui| {
        ui.heading("Log");
        ui.label(format!("Entries: {}", ui_state.entry_count.get()));

        ui.separator();

        let (color, status) = if pinned {
            (egui::Color32::GREEN, "Following")
        } else {
            (egui::Color32::GRAY, "Paused")
        };
        ui.colored_label(color, status)
            .on_hover_text("Scroll to the bottom to follow new entries");

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Clear").clicked() {
                action = HeaderAction::Clear;
            }
            ui.checkbox(&mut ui_state.show_timestamps, "Timestamps");
        });
    });

    action
}
