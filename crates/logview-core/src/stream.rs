//! Append-only log sequence owned by the UI thread.
//!
//! [`LogStream`] holds the records and is never shared. Producers get a [`LogStreamHandle`] that
//! queues append/clear requests on a channel; the owner applies them in [`LogStream::pump`].

use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::notify::{ChangeEvent, ChangeNotifier, CollectionChange, SubscriptionId};
use crate::record::LogRecord;

/// Name of the property raised after every change in length.
pub const LEN_PROPERTY: &str = "len";

/// Callback run after every queued request so an idle event loop can wake up.
pub type WakeHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
enum StreamOp {
    Append(LogRecord),
    Clear,
}

/// Cheap, cloneable, `Send` entry point for producers on any thread.
#[derive(Clone)]
pub struct LogStreamHandle {
    tx: mpsc::UnboundedSender<StreamOp>,
    wake: Arc<OnceLock<WakeHook>>,
}

impl LogStreamHandle {
    /// Queue `record` for the tail of the stream and return immediately.
    pub fn append(&self, record: LogRecord) {
        self.submit(StreamOp::Append(record));
    }

    /// Queue removal of every record, ordered after anything this thread queued before.
    pub fn clear(&self) {
        self.submit(StreamOp::Clear);
    }

    fn submit(&self, op: StreamOp) {
        if self.tx.send(op).is_err() {
            trace!("log stream dropped; request discarded");
            return;
        }
        if let Some(wake) = self.wake.get() {
            wake();
        }
    }
}

impl std::fmt::Debug for LogStreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStreamHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// What a single [`LogStream::pump`] applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpSummary {
    pub appended: usize,
    pub clears: usize,
    pub notifications: usize,
}

impl PumpSummary {
    pub fn changed(&self) -> bool {
        self.appended > 0 || self.clears > 0
    }
}

pub struct LogStream {
    records: Vec<LogRecord>,
    tx: mpsc::UnboundedSender<StreamOp>,
    rx: mpsc::UnboundedReceiver<StreamOp>,
    wake: Arc<OnceLock<WakeHook>>,
    notifier: ChangeNotifier,
}

impl LogStream {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            records: Vec::new(),
            tx,
            rx,
            wake: Arc::new(OnceLock::new()),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn handle(&self) -> LogStreamHandle {
        LogStreamHandle {
            tx: self.tx.clone(),
            wake: Arc::clone(&self.wake),
        }
    }

    /// Install the wake hook shared by every handle, including ones already cloned.
    /// Only the first hook sticks; returns `false` if one was already installed.
    pub fn install_wake_hook(&self, hook: WakeHook) -> bool {
        self.wake.set(hook).is_ok()
    }

    /// Apply every queued request in arrival order, then deliver the resulting notifications.
    pub fn pump(&mut self) -> PumpSummary {
        let mut summary = PumpSummary::default();

        while let Ok(op) = self.rx.try_recv() {
            match op {
                StreamOp::Append(record) => {
                    let index = self.records.len();
                    self.records.push(record);
                    self.notifier
                        .raise(ChangeEvent::CollectionChanged(CollectionChange::Appended { index }));
                    summary.appended += 1;
                }
                StreamOp::Clear => {
                    let removed = self.records.len();
                    self.records.clear();
                    self.notifier
                        .raise(ChangeEvent::CollectionChanged(CollectionChange::Cleared { removed }));
                    summary.clears += 1;
                }
            }
            self.notifier.raise(ChangeEvent::PropertyChanged {
                property: LEN_PROPERTY,
            });
        }

        summary.notifications = self.notifier.dispatch_pending();
        if summary.changed() {
            debug!(
                appended = summary.appended,
                clears = summary.clears,
                len = self.records.len(),
                "log stream updated"
            );
        }
        summary
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&LogRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.records.iter()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

impl Default for LogStream {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a LogStream {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStream")
            .field("len", &self.records.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}
