//! UI-specific state (ephemeral)

use std::cell::Cell;
use std::rc::Rc;

use logview_core::{ChangeEvent, CollectionChange, LEN_PROPERTY};

/// UI-specific state that doesn't need to be persisted
#[derive(Clone, Default)]
pub struct UiState {
    /// Entry count shown in the header badge, fed by change notifications.
    pub entry_count: Rc<Cell<usize>>,

    /// Set when the stream was cleared since the last frame.
    pub cleared: Rc<Cell<bool>>,

    /// Whether the timestamp column is visible.
    pub show_timestamps: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            show_timestamps: true,
            ..Self::default()
        }
    }

    /// Observer to subscribe on the viewer; keeps the badge and the cleared flag current.
    pub fn observer(&self) -> impl FnMut(&ChangeEvent) + 'static {
        let count = Rc::clone(&self.entry_count);
        let cleared = Rc::clone(&self.cleared);
        let mut pending = 0usize;
        move |event| match event {
            ChangeEvent::CollectionChanged(CollectionChange::Appended { index }) => {
                pending = index + 1;
            }
            ChangeEvent::CollectionChanged(CollectionChange::Cleared { .. }) => {
                pending = 0;
                cleared.set(true);
            }
            ChangeEvent::PropertyChanged { property } if *property == LEN_PROPERTY => {
                count.set(pending);
            }
            ChangeEvent::PropertyChanged { .. } => {}
        }
    }

    /// Returns and resets the cleared flag.
    pub fn take_cleared(&self) -> bool {
        self.cleared.replace(false)
    }
}
