//! Selectable, read-only log line.
//!
//! egui draws the message through a `TextEdit` over an immutable `&str`, which gives native drag
//! selection and Ctrl+C without allowing edits. The line's egui `Id` is the text view the
//! selection controller binds to, so the context menu and the native selection act on one galley.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use logview_core::{
    CapabilityError, Clipboard, CommandOutcome, Selectable, SelectableText, TextCommand, TextViewId,
};

/// Display type for one rendered log message.
#[derive(Debug)]
pub struct LogLine {
    text: String,
    view: Option<egui::Id>,
}

impl LogLine {
    pub fn new(text: impl Into<String>, view: Option<egui::Id>) -> Self {
        Self {
            text: text.into(),
            view,
        }
    }

    pub fn id(&self) -> Option<egui::Id> {
        self.view
    }
}

impl SelectableText for LogLine {
    fn text(&self) -> &str {
        &self.text
    }

    fn text_view(&self) -> Option<TextViewId> {
        self.view.map(|id| TextViewId(id.value()))
    }
}

/// Copies through egui's platform clipboard integration.
pub struct EguiClipboard<'a>(pub &'a egui::Context);

impl Clipboard for EguiClipboard<'_> {
    fn set_text(&mut self, text: String) {
        self.0.copy_text(text);
    }
}

/// Selectable lines built so far, keyed by row index.
#[derive(Debug, Default)]
pub struct LineCache {
    lines: HashMap<usize, Selectable<LogLine>>,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The line for `row`, attaching selection the first time it is shown.
    pub fn get_or_attach(
        &mut self,
        row: usize,
        text: &str,
        view: egui::Id,
    ) -> Result<&mut Selectable<LogLine>, CapabilityError> {
        match self.lines.entry(row) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let line = Selectable::attach(LogLine::new(text, Some(view)))?;
                Ok(entry.insert(line))
            }
        }
    }

    /// Drop lines outside `visible` so the cache stays proportional to the viewport.
    pub fn retain_visible(&mut self, visible: std::ops::Range<usize>) {
        self.lines.retain(|row, _| visible.contains(row));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Show the message of one row and its context menu.
pub fn render(
    ui: &mut egui::Ui,
    line: &mut Selectable<LogLine>,
    color: egui::Color32,
    font: egui::TextStyle,
) {
    let Some(id) = line.display().id() else {
        return;
    };
    let mut text: &str = line.display().text();
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .id(id)
            .font(font)
            .text_color(color)
            .frame(false)
            .margin(egui::Margin::ZERO)
            .desired_width(f32::INFINITY)
            .clip_text(false),
    );

    if let Some(state) = egui::text_edit::TextEditState::load(ui.ctx(), id) {
        if let Some(range) = state.cursor.char_range() {
            line.set_selection(range.secondary.index, range.primary.index);
        }
    }

    response.context_menu(|ui| {
        let ctx = ui.ctx().clone();
        let mut clipboard = EguiClipboard(&ctx);
        let has_selection = !line.selected_text().is_empty();

        if ui
            .add_enabled(has_selection, egui::Button::new("Copy selection"))
            .clicked()
        {
            line.execute(TextCommand::Copy, &mut clipboard);
            ui.close();
        }
        if ui.button("Copy line").clicked() {
            copy_whole_line(line, &mut clipboard);
            ui.close();
        }
        if ui.button("Select all").clicked() {
            line.execute(TextCommand::SelectAll, &mut clipboard);
            show_selection(&ctx, id, line.controller().selection());
            ui.close();
        }
    });
}

/// Mirror the controller's selection into the text field so the highlight matches.
fn show_selection(ctx: &egui::Context, id: egui::Id, selection: std::ops::Range<usize>) {
    let mut state = egui::text_edit::TextEditState::load(ctx, id).unwrap_or_default();
    state
        .cursor
        .set_char_range(Some(egui::text::CCursorRange::two(
            egui::text::CCursor::new(selection.start),
            egui::text::CCursor::new(selection.end),
        )));
    state.store(ctx, id);
}

/// Select everything and copy it, as the "Copy line" menu entry does.
pub fn copy_whole_line(
    line: &mut Selectable<LogLine>,
    clipboard: &mut dyn Clipboard,
) -> CommandOutcome {
    match line.execute(TextCommand::SelectAll, clipboard) {
        CommandOutcome::Handled => line.execute(TextCommand::Copy, clipboard),
        other => other,
    }
}
