//! Async runtime bridge for running log producers next to the egui loop

use std::io;

use logview_core::LogViewerHandle;
use tokio::io::BufReader;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::info;

use crate::producers::{self, ProducerKind};

/// Owns the runtime producers run on; the UI thread never blocks on it.
pub struct ProducerBridge {
    /// Tokio runtime for producer tasks (wrapped in Option for clean shutdown)
    runtime: Option<Runtime>,

    /// Handles of the tasks spawned so far
    tasks: Vec<JoinHandle<()>>,
}

impl ProducerBridge {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("logview-producer")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime: Some(runtime),
            tasks: Vec::new(),
        })
    }

    /// Spawn the producers described by `kind`, all feeding `viewer`.
    pub fn start(&mut self, kind: &ProducerKind, viewer: &LogViewerHandle) {
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };

        match kind {
            ProducerKind::Demo {
                producers: count,
                interval,
            } => {
                info!(
                    producers = *count,
                    interval_ms = interval.as_millis() as u64,
                    "starting demo producers"
                );
                for producer in 0..*count {
                    let task =
                        runtime.spawn(producers::run_demo(viewer.clone(), producer, *interval, None));
                    self.tasks.push(task);
                }
            }
            ProducerKind::Stdin => {
                info!("reading log lines from stdin");
                let viewer = viewer.clone();
                let task = runtime.spawn(async move {
                    producers::forward_lines(BufReader::new(tokio::io::stdin()), viewer).await;
                });
                self.tasks.push(task);
            }
            ProducerKind::None => {}
        }
    }

    /// Number of producer tasks still running.
    pub fn running(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for ProducerBridge {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        // Shutdown the runtime without blocking
        // This prevents the "Cannot drop a runtime in a context where blocking is not allowed" panic
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logview_core::LogViewer;
    use std::time::{Duration, Instant};

    #[test]
    fn demo_producers_feed_viewer_from_background_threads() {
        let mut viewer = LogViewer::new();
        let mut bridge = ProducerBridge::new().expect("runtime");
        bridge.start(
            &ProducerKind::Demo {
                producers: 2,
                interval: Duration::from_millis(1),
            },
            &viewer.handle(),
        );
        assert_eq!(bridge.tasks.len(), 2);

        let deadline = Instant::now() + Duration::from_secs(5);
        while viewer.len() < 10 && Instant::now() < deadline {
            viewer.pump();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(viewer.len() >= 10);
        drop(bridge);
    }

    #[test]
    fn none_spawns_nothing() {
        let viewer = LogViewer::new();
        let mut bridge = ProducerBridge::new().expect("runtime");
        bridge.start(&ProducerKind::None, &viewer.handle());
        assert_eq!(bridge.running(), 0);
    }
}
