//! `tracing` layer that mirrors the process's own events into a log viewer.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::palette::Severity;
use crate::record::LogRecord;
use crate::viewer::LogViewerHandle;

/// Events from the viewer's own internals are never mirrored, or every pump would feed itself.
const SELF_TARGET: &str = "logview_core";

#[derive(Debug, Clone)]
pub struct ViewerLayer {
    viewer: LogViewerHandle,
}

impl ViewerLayer {
    pub fn new(viewer: LogViewerHandle) -> Self {
        Self { viewer }
    }
}

impl<S: Subscriber> Layer<S> for ViewerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_self_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let severity = Severity::from(*metadata.level());
        self.viewer
            .add_log_entry(LogRecord::new(visitor.finish(metadata.target())), severity);
    }
}

fn is_self_target(target: &str) -> bool {
    target
        .strip_prefix(SELF_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self, target: &str) -> String {
        let mut line = format!("{target}: {}", self.message);
        if !self.fields.is_empty() {
            line.push_str(&self.fields);
        }
        line
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::LogColor;
    use crate::viewer::LogViewer;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn mirrors_events_with_fields_and_severity() {
        let mut viewer = LogViewer::new();
        let subscriber = tracing_subscriber::registry().with(ViewerLayer::new(viewer.handle()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "build", step = 3, "cache miss");
            tracing::error!(target: "build", "link failed");
        });
        viewer.pump();

        let records = viewer.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "build: cache miss step=3");
        assert_eq!(records[0].color(), LogColor::GOLD);
        assert_eq!(records[1].severity(), Severity::Error);
    }

    #[test]
    fn skips_viewer_internal_events() {
        let mut viewer = LogViewer::new();
        let subscriber = tracing_subscriber::registry().with(ViewerLayer::new(viewer.handle()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "logview_core::stream", "log stream updated");
        });
        viewer.pump();
        assert!(viewer.is_empty());
    }

    #[test]
    fn mirrors_targets_that_only_share_the_crate_prefix() {
        let mut viewer = LogViewer::new();
        let subscriber = tracing_subscriber::registry().with(ViewerLayer::new(viewer.handle()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "logview_core", "root target");
            tracing::info!(target: "logview_core_ext::sink", "flushed");
        });
        viewer.pump();

        assert_eq!(viewer.len(), 1);
        assert_eq!(viewer.records()[0].message, "logview_core_ext::sink: flushed");
    }
}
