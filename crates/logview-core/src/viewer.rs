//! Composition root: the stream, the palette and the auto-scroll controller behind two
//! operations, `add_log_entry` and `clear_all_logs`.

use crate::autoscroll::{AutoScrollController, ScrollChanged, ScrollDecision, ScrollSurface};
use crate::notify::{ChangeEvent, SubscriptionId};
use crate::palette::Severity;
use crate::record::LogRecord;
use crate::stream::{LogStream, LogStreamHandle, PumpSummary, WakeHook};

/// The two viewer operations, usable from any thread.
#[derive(Debug, Clone)]
pub struct LogViewerHandle {
    stream: LogStreamHandle,
}

impl LogViewerHandle {
    /// Resolve the record's color from `severity` and queue it for the tail of the log.
    pub fn add_log_entry(&self, mut record: LogRecord, severity: Severity) {
        record.resolve(severity);
        self.stream.append(record);
    }

    pub fn clear_all_logs(&self) {
        self.stream.clear();
    }
}

/// Owned by the UI thread.
#[derive(Debug)]
pub struct LogViewer {
    stream: LogStream,
    autoscroll: AutoScrollController,
    handle: LogViewerHandle,
}

impl LogViewer {
    pub fn new() -> Self {
        Self::with_bottom_tolerance(crate::autoscroll::DEFAULT_BOTTOM_TOLERANCE)
    }

    pub fn with_bottom_tolerance(tolerance: f32) -> Self {
        let stream = LogStream::new();
        let autoscroll = AutoScrollController::with_tolerance(stream.handle(), tolerance);
        let handle = LogViewerHandle {
            stream: stream.handle(),
        };
        Self {
            stream,
            autoscroll,
            handle,
        }
    }

    /// Handle for producer threads.
    pub fn handle(&self) -> LogViewerHandle {
        self.handle.clone()
    }

    pub fn add_log_entry(&self, record: LogRecord, severity: Severity) {
        self.handle.add_log_entry(record, severity);
    }

    pub fn clear_all_logs(&self) {
        self.handle.clear_all_logs();
    }

    /// Run after every queued request, e.g. to request a repaint. First hook wins.
    pub fn install_wake_hook(&self, hook: WakeHook) -> bool {
        self.stream.install_wake_hook(hook)
    }

    /// Apply queued requests. Call once per UI frame before rendering.
    pub fn pump(&mut self) -> PumpSummary {
        self.stream.pump()
    }

    pub fn records(&self) -> &[LogRecord] {
        self.stream.records()
    }

    pub fn len(&self) -> usize {
        self.stream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.stream.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.stream.unsubscribe(id)
    }

    pub fn is_pinned(&self) -> bool {
        self.autoscroll.is_pinned()
    }

    /// Forward a scroll-surface event to the auto-scroll controller.
    pub fn handle_scroll(
        &mut self,
        event: &ScrollChanged,
        surface: Option<&mut dyn ScrollSurface>,
    ) -> ScrollDecision {
        self.autoscroll.on_scroll_changed(event, surface)
    }
}

impl Default for LogViewer {
    fn default() -> Self {
        Self::new()
    }
}
