//! Log producers that feed the viewer from background tasks

use std::time::Duration;

use logview_core::{LogRecord, LogViewerHandle, Severity, classify_line};
use rand::Rng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// Where log lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerKind {
    /// Simulated build output from `producers` concurrent tasks.
    Demo { producers: usize, interval: Duration },
    /// Lines read from standard input.
    Stdin,
    /// Nothing; lines only arrive through the viewer handle.
    None,
}

const CRATES: [&str; 8] = [
    "serde", "tokio", "regex", "chrono", "egui", "tracing", "clap", "toml",
];

/// One simulated build line. Kept synchronous so the thread-local RNG never lives across an await.
fn demo_line(producer: usize, seq: usize) -> (Severity, String) {
    let mut rng = rand::rng();
    let krate = CRATES[rng.random_range(0..CRATES.len())];
    let roll = rng.random_range(0..100);
    match roll {
        0..=59 => (
            Severity::Info,
            format!("[worker {producer}] Compiling {krate} v0.{}.{}", seq % 10, roll),
        ),
        60..=84 => (
            Severity::Debug,
            format!("[worker {producer}] fingerprint of {krate} is fresh ({seq})"),
        ),
        85..=96 => (
            Severity::Warning,
            format!("[worker {producer}] warning: unused import in {krate}/src/lib.rs:{roll}"),
        ),
        _ => (
            Severity::Error,
            format!("[worker {producer}] error[E0308]: mismatched types in {krate}"),
        ),
    }
}

/// Emit simulated build lines every `interval`, forever or until `limit` lines were sent.
pub async fn run_demo(
    viewer: LogViewerHandle,
    producer: usize,
    interval: Duration,
    limit: Option<usize>,
) {
    let mut ticker = tokio::time::interval(interval);
    let mut seq = 0;
    while limit.is_none_or(|limit| seq < limit) {
        ticker.tick().await;
        let (severity, message) = demo_line(producer, seq);
        viewer.add_log_entry(LogRecord::new(message), severity);
        seq += 1;
    }
    debug!(producer, lines = seq, "demo producer finished");
}

/// Forward every line of `reader` into the viewer, inferring severity from a level prefix.
/// Returns the number of lines forwarded.
pub async fn forward_lines<R>(reader: R, viewer: LogViewerHandle) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let (severity, message) = classify_line(&line);
                viewer.add_log_entry(LogRecord::new(message), severity);
                forwarded += 1;
            }
            Ok(None) => {
                info!(lines = forwarded, "input closed");
                viewer.add_log_entry(
                    LogRecord::new(format!("Input closed after {forwarded} lines")),
                    Severity::Debug,
                );
                break;
            }
            Err(err) => {
                viewer.add_log_entry(
                    LogRecord::new(format!("Failed to read input: {err}")),
                    Severity::Error,
                );
                break;
            }
        }
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use logview_core::LogViewer;

    #[tokio::test]
    async fn demo_producer_emits_requested_number_of_lines() {
        let mut viewer = LogViewer::new();
        run_demo(viewer.handle(), 3, Duration::from_millis(1), Some(5)).await;
        viewer.pump();

        assert_eq!(viewer.len(), 5);
        assert!(viewer
            .records()
            .iter()
            .all(|record| record.message.starts_with("[worker 3]")));
    }

    #[tokio::test]
    async fn forwarded_lines_keep_order_and_severity() {
        let mut viewer = LogViewer::new();
        let input: &[u8] = b"Compiling app\nwarning: unused variable\n[ERROR] link failed\n";

        let forwarded = forward_lines(input, viewer.handle()).await;
        viewer.pump();

        assert_eq!(forwarded, 3);
        let seen: Vec<_> = viewer
            .records()
            .iter()
            .map(|record| (record.severity(), record.message.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Severity::Info, "Compiling app"),
                (Severity::Warning, "unused variable"),
                (Severity::Error, "link failed"),
                (Severity::Debug, "Input closed after 3 lines"),
            ]
        );
    }

    #[test]
    fn demo_lines_are_tagged_with_their_producer() {
        for seq in 0..20 {
            let (_, message) = demo_line(7, seq);
            assert!(message.starts_with("[worker 7]"));
        }
    }
}
