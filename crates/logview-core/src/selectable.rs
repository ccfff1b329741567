//! Text selection for otherwise static text displays.
//!
//! A display type implements [`SelectableText`] to expose its text and the text view it already
//! renders into. [`Selectable::attach`] binds a read-only [`SelectionController`] to that view, so
//! the display gains selection and copy without becoming editable and without a second render
//! path. Command handlers live in a process-wide [`CommandRegistry`], installed once per display
//! type no matter how many instances get built or from how many threads.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use thiserror::Error;
use tracing::{debug, trace};

/// Identity of the text view (layout/render surface) a display draws its text into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextViewId(pub u64);

/// Attaching selection failed. Construction of the display must fail with it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("{display} exposes no text view to bind a selection controller to")]
    MissingTextView { display: &'static str },
}

/// Capability a rendering layer implements for its text display primitives.
pub trait SelectableText: 'static {
    /// Current text, as displayed.
    fn text(&self) -> &str;

    /// The view this display already renders into, if the host can locate it.
    fn text_view(&self) -> Option<TextViewId>;
}

/// Destination for copied text.
pub trait Clipboard {
    fn set_text(&mut self, text: String);
}

impl Clipboard for String {
    fn set_text(&mut self, text: String) {
        *self = text;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextCommand {
    Copy,
    SelectAll,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    ExtendLeft,
    ExtendRight,
    ExtendHome,
    ExtendEnd,
    // Editing commands; a read-only table rejects all of them.
    Cut,
    Paste,
    Delete,
    Backspace,
    InsertText,
}

impl TextCommand {
    pub const NAVIGATION: [TextCommand; 8] = [
        TextCommand::MoveLeft,
        TextCommand::MoveRight,
        TextCommand::MoveHome,
        TextCommand::MoveEnd,
        TextCommand::ExtendLeft,
        TextCommand::ExtendRight,
        TextCommand::ExtendHome,
        TextCommand::ExtendEnd,
    ];

    pub const EDITING: [TextCommand; 5] = [
        TextCommand::Cut,
        TextCommand::Paste,
        TextCommand::Delete,
        TextCommand::Backspace,
        TextCommand::InsertText,
    ];
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{command:?} rejected: text is read-only")]
pub struct EditRejected {
    pub command: TextCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Handled,
    Rejected(EditRejected),
    /// No handler is registered for the command.
    Unhandled,
}

type CommandHandler =
    fn(&mut SelectionController, TextCommand, &str, &mut dyn Clipboard) -> CommandOutcome;

/// Handlers for one display type.
pub struct CommandTable {
    display: &'static str,
    read_only: bool,
    handlers: HashMap<TextCommand, CommandHandler>,
}

impl CommandTable {
    fn build(display: &'static str, read_only: bool) -> Self {
        let mut handlers: HashMap<TextCommand, CommandHandler> = HashMap::new();
        handlers.insert(TextCommand::Copy, copy_selection);
        handlers.insert(TextCommand::SelectAll, select_all);
        for command in TextCommand::NAVIGATION {
            handlers.insert(command, navigate);
        }
        let edit: CommandHandler = if read_only { reject_edit } else { unsupported_edit };
        for command in TextCommand::EDITING {
            handlers.insert(command, edit);
        }
        Self {
            display,
            read_only,
            handlers,
        }
    }

    pub fn display(&self) -> &'static str {
        self.display
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn handles(&self, command: TextCommand) -> bool {
        self.handlers.contains_key(&command)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTable")
            .field("display", &self.display)
            .field("read_only", &self.read_only)
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn copy_selection(
    controller: &mut SelectionController,
    _: TextCommand,
    text: &str,
    clipboard: &mut dyn Clipboard,
) -> CommandOutcome {
    let selected = controller.selected_text(text);
    if !selected.is_empty() {
        clipboard.set_text(selected.to_string());
    }
    CommandOutcome::Handled
}

fn select_all(
    controller: &mut SelectionController,
    _: TextCommand,
    text: &str,
    _: &mut dyn Clipboard,
) -> CommandOutcome {
    controller.anchor = 0;
    controller.cursor = char_len(text);
    CommandOutcome::Handled
}

fn navigate(
    controller: &mut SelectionController,
    command: TextCommand,
    text: &str,
    _: &mut dyn Clipboard,
) -> CommandOutcome {
    let len = char_len(text);
    controller.clamp(len);
    let range = controller.selection();
    let (target, extend) = match command {
        TextCommand::MoveLeft if !range.is_empty() => (range.start, false),
        TextCommand::MoveRight if !range.is_empty() => (range.end, false),
        TextCommand::MoveLeft => (controller.cursor.saturating_sub(1), false),
        TextCommand::MoveRight => ((controller.cursor + 1).min(len), false),
        TextCommand::MoveHome => (0, false),
        TextCommand::MoveEnd => (len, false),
        TextCommand::ExtendLeft => (controller.cursor.saturating_sub(1), true),
        TextCommand::ExtendRight => ((controller.cursor + 1).min(len), true),
        TextCommand::ExtendHome => (0, true),
        TextCommand::ExtendEnd => (len, true),
        _ => return CommandOutcome::Unhandled,
    };
    controller.cursor = target;
    if !extend {
        controller.anchor = target;
    }
    CommandOutcome::Handled
}

fn reject_edit(
    _: &mut SelectionController,
    command: TextCommand,
    _: &str,
    _: &mut dyn Clipboard,
) -> CommandOutcome {
    trace!(?command, "edit rejected on read-only text");
    CommandOutcome::Rejected(EditRejected { command })
}

fn unsupported_edit(
    _: &mut SelectionController,
    _: TextCommand,
    _: &str,
    _: &mut dyn Clipboard,
) -> CommandOutcome {
    CommandOutcome::Unhandled
}

/// Process-wide table of command handlers keyed by display type.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    tables: Mutex<HashMap<TypeId, Arc<CommandTable>>>,
}

static GLOBAL_REGISTRY: OnceLock<CommandRegistry> = OnceLock::new();

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static CommandRegistry {
        GLOBAL_REGISTRY.get_or_init(CommandRegistry::new)
    }

    /// Table for `D`, built and stored on first use. Later calls, from any thread, get the same
    /// table back.
    pub fn ensure_registered<D: SelectableText>(&self) -> Arc<CommandTable> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(TypeId::of::<D>()).or_insert_with(|| {
            debug!(display = type_name::<D>(), "registering text command handlers");
            Arc::new(CommandTable::build(type_name::<D>(), true))
        });
        Arc::clone(table)
    }

    pub fn is_registered<D: SelectableText>(&self) -> bool {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<D>())
    }

    /// Number of display types registered so far.
    pub fn len(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hidden, read-only editing controller bound to one display's text view.
#[derive(Debug)]
pub struct SelectionController {
    view: TextViewId,
    table: Arc<CommandTable>,
    anchor: usize,
    cursor: usize,
}

impl SelectionController {
    fn bind(view: TextViewId, table: Arc<CommandTable>) -> Self {
        Self {
            view,
            table,
            anchor: 0,
            cursor: 0,
        }
    }

    pub fn view(&self) -> TextViewId {
        self.view
    }

    pub fn is_read_only(&self) -> bool {
        self.table.is_read_only()
    }

    pub fn table(&self) -> &Arc<CommandTable> {
        &self.table
    }

    /// Selected range in characters, normalized so `start <= end`.
    pub fn selection(&self) -> Range<usize> {
        self.anchor.min(self.cursor)..self.anchor.max(self.cursor)
    }

    /// Set the selection from character positions reported by the host, clamped to `text`.
    pub fn set_selection(&mut self, anchor: usize, cursor: usize, text: &str) {
        self.anchor = anchor;
        self.cursor = cursor;
        self.clamp(char_len(text));
    }

    pub fn clear_selection(&mut self) {
        self.anchor = self.cursor;
    }

    pub fn selected_text<'t>(&self, text: &'t str) -> &'t str {
        let range = self.selection();
        let start = byte_offset(text, range.start);
        let end = byte_offset(text, range.end);
        &text[start..end]
    }

    pub fn execute(
        &mut self,
        command: TextCommand,
        text: &str,
        clipboard: &mut dyn Clipboard,
    ) -> CommandOutcome {
        self.clamp(char_len(text));
        let Some(handler) = self.table.handlers.get(&command).copied() else {
            return CommandOutcome::Unhandled;
        };
        handler(self, command, text, clipboard)
    }

    fn clamp(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.cursor = self.cursor.min(len);
    }
}

/// A display together with the selection controller bound to it. The controller lives exactly as
/// long as the display.
#[derive(Debug)]
pub struct Selectable<D: SelectableText> {
    display: D,
    controller: SelectionController,
}

impl<D: SelectableText> Selectable<D> {
    /// Attach selection using the process-wide registry.
    pub fn attach(display: D) -> Result<Self, CapabilityError> {
        Self::attach_with(display, CommandRegistry::global())
    }

    pub fn attach_with(display: D, registry: &CommandRegistry) -> Result<Self, CapabilityError> {
        let view = display.text_view().ok_or(CapabilityError::MissingTextView {
            display: type_name::<D>(),
        })?;
        let table = registry.ensure_registered::<D>();
        Ok(Self {
            display,
            controller: SelectionController::bind(view, table),
        })
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display; the selection is clamped on the next command.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn set_selection(&mut self, anchor: usize, cursor: usize) {
        self.controller
            .set_selection(anchor, cursor, self.display.text());
    }

    pub fn selected_text(&self) -> &str {
        self.controller.selected_text(self.display.text())
    }

    pub fn execute(&mut self, command: TextCommand, clipboard: &mut dyn Clipboard) -> CommandOutcome {
        self.controller
            .execute(command, self.display.text(), clipboard)
    }

    pub fn into_display(self) -> D {
        self.display
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
