//! Scrolling list of log records

use logview_core::{CapabilityError, LogColor, LogViewer, ViewerPreferences};
use tracing::trace;

use crate::scroll_surface::EguiScrollSurface;
use crate::widgets::log_line::{self, LineCache};

const ID_SALT: &str = "logview-list";

pub fn to_color32(color: LogColor) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn line_id(row: usize) -> egui::Id {
    egui::Id::new((ID_SALT, row))
}

/// Rendering surface of the viewer: owns the scroll adapter and the selectable lines.
#[derive(Debug)]
pub struct LogView {
    surface: EguiScrollSurface,
    lines: LineCache,
}

impl LogView {
    /// Fails when selectable lines cannot be built; the viewer must not start without them.
    pub fn new() -> Result<Self, CapabilityError> {
        let mut lines = LineCache::new();
        lines.get_or_attach(0, "", line_id(0))?;
        lines.clear();

        Ok(Self {
            surface: EguiScrollSurface::new(),
            lines,
        })
    }

    /// Forget cached lines, e.g. after the stream was cleared.
    pub fn reset_lines(&mut self) {
        self.lines.clear();
    }

    pub fn render(
        &mut self,
        ui: &mut egui::Ui,
        viewer: &mut LogViewer,
        preferences: &ViewerPreferences,
        show_timestamps: bool,
    ) -> Result<(), CapabilityError> {
        let font = if preferences.monospace {
            egui::TextStyle::Monospace
        } else {
            egui::TextStyle::Body
        };
        let row_height = ui.text_style_height(&font);

        let mut area = egui::ScrollArea::vertical()
            .id_salt(ID_SALT)
            .auto_shrink([false, false]);
        if let Some(offset) = self.surface.take_pending() {
            area = area.vertical_scroll_offset(offset);
        }

        let records = viewer.records();
        let lines = &mut self.lines;
        let output = area.show_rows(ui, row_height, records.len(), |ui, rows| {
            for row in rows.clone() {
                let record = &records[row];
                let color = to_color32(record.color());
                let line = lines.get_or_attach(row, &record.message, line_id(row))?;

                ui.horizontal(|ui| {
                    if show_timestamps {
                        ui.label(
                            egui::RichText::new(
                                record.formatted_timestamp(&preferences.timestamp_format),
                            )
                            .text_style(font.clone())
                            .weak(),
                        );
                    }
                    if preferences.show_severity {
                        ui.label(
                            egui::RichText::new(record.severity().label())
                                .text_style(font.clone())
                                .color(color),
                        );
                    }
                    log_line::render(ui, line, color, font.clone());
                });
            }
            Ok::<_, CapabilityError>(rows)
        });
        let visible = output.inner?;
        self.lines.retain_visible(visible);

        let viewport = output.inner_rect.height();
        if let Some(event) =
            self.surface
                .observe(output.state.offset.y, output.content_size.y, viewport)
        {
            let decision = viewer.handle_scroll(&event, Some(&mut self.surface));
            trace!(?event, ?decision, "scroll surface changed");
        }

        if self.surface.has_pending() {
            ui.ctx().request_repaint();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_convert_exactly() {
        assert_eq!(to_color32(LogColor::RED), egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(to_color32(LogColor::GOLD), egui::Color32::from_rgb(255, 215, 0));
    }

    #[test]
    fn log_view_builds_when_lines_are_selectable() {
        assert!(LogView::new().is_ok());
    }
}
