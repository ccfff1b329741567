use std::cell::Cell;
use std::rc::Rc;
use std::thread;

use logview_core::autoscroll::APPLICATION_ERROR_PREFIX;
use logview_core::{
    ChangeEvent, LEN_PROPERTY, LogRecord, LogViewer, ScrollChanged, ScrollDecision, ScrollSurface,
    Severity, SurfaceError,
};

const ROW_HEIGHT: f32 = 20.0;
const VIEWPORT: f32 = 100.0;

/// Scroll surface whose extent grows with the number of rows, like a list view.
#[derive(Debug)]
struct ListSurface {
    rows: usize,
    offset: f32,
}

impl ListSurface {
    fn new(rows: usize) -> Self {
        let mut surface = Self { rows, offset: 0.0 };
        surface.offset = surface.max();
        surface
    }

    fn extent(&self) -> f32 {
        self.rows as f32 * ROW_HEIGHT
    }

    fn max(&self) -> f32 {
        (self.extent() - VIEWPORT).max(0.0)
    }

    fn grow(&mut self, rows: usize) -> ScrollChanged {
        self.rows += rows;
        ScrollChanged::content_changed(self.offset, self.max(), self.extent())
    }

    fn user_scroll_to(&mut self, offset: f32) -> ScrollChanged {
        self.offset = offset;
        ScrollChanged::user_scroll(self.offset, self.max(), self.extent())
    }
}

impl ScrollSurface for ListSurface {
    fn offset(&self) -> Result<f32, SurfaceError> {
        Ok(self.offset)
    }

    fn max_offset(&self) -> Result<f32, SurfaceError> {
        Ok(self.max())
    }

    fn scroll_to(&mut self, offset: f32) -> Result<(), SurfaceError> {
        self.offset = offset.clamp(0.0, self.max());
        Ok(())
    }
}

struct ExplodingSurface;

impl ScrollSurface for ExplodingSurface {
    fn offset(&self) -> Result<f32, SurfaceError> {
        panic!("layout not ready")
    }

    fn max_offset(&self) -> Result<f32, SurfaceError> {
        panic!("layout not ready")
    }

    fn scroll_to(&mut self, _offset: f32) -> Result<(), SurfaceError> {
        Err(SurfaceError::Other("unreachable".to_string()))
    }
}

#[test]
fn per_thread_order_survives_concurrent_producers() {
    let mut viewer = LogViewer::new();
    let producers = 6;
    let per_producer = 200;

    let joins: Vec<_> = (0..producers)
        .map(|producer| {
            let handle = viewer.handle();
            thread::spawn(move || {
                for seq in 0..per_producer {
                    handle.add_log_entry(LogRecord::new(format!("{producer}:{seq}")), Severity::Info);
                }
            })
        })
        .collect();
    for join in joins {
        join.join().expect("producer thread");
    }

    viewer.pump();
    assert_eq!(viewer.len(), producers * per_producer);

    let mut next = vec![0usize; producers];
    for record in viewer.records() {
        let (producer, seq) = record.message.split_once(':').expect("tagged message");
        let producer: usize = producer.parse().expect("producer id");
        let seq: usize = seq.parse().expect("sequence");
        assert_eq!(seq, next[producer], "producer {producer} out of order");
        next[producer] += 1;
    }
}

#[test]
fn clear_from_another_thread_is_observed_on_pump() {
    let mut viewer = LogViewer::new();
    let handle = viewer.handle();

    thread::spawn(move || {
        for i in 0..5 {
            handle.add_log_entry(LogRecord::new(format!("line {i}")), Severity::Debug);
        }
        handle.clear_all_logs();
    })
    .join()
    .expect("producer thread");

    viewer.pump();
    assert!(viewer.is_empty());
}

#[test]
fn count_badge_tracks_len_notifications() {
    let mut viewer = LogViewer::new();
    let notifications = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&notifications);
    viewer.subscribe(move |event| {
        if matches!(event, ChangeEvent::PropertyChanged { property } if *property == LEN_PROPERTY) {
            sink.set(sink.get() + 1);
        }
    });

    viewer.add_log_entry(LogRecord::new("a"), Severity::Info);
    viewer.add_log_entry(LogRecord::new("b"), Severity::Info);
    viewer.pump();

    assert_eq!(notifications.get(), 2);
    assert_eq!(viewer.len(), 2);
}

#[test]
fn appending_while_pinned_at_bottom_follows_tail() {
    let mut viewer = LogViewer::new();
    let mut surface = ListSurface::new(10);
    assert_eq!(surface.offset, surface.max());

    for i in 0..3 {
        viewer.add_log_entry(LogRecord::new(format!("entry {i}")), Severity::Info);
    }
    viewer.pump();

    let event = surface.grow(3);
    let decision = viewer.handle_scroll(&event, Some(&mut surface));

    assert_eq!(decision, ScrollDecision::FollowTail { offset: surface.max() });
    assert_eq!(surface.offset, surface.max());
    assert!(viewer.is_pinned());
}

#[test]
fn scrolling_to_middle_stops_following() {
    let mut viewer = LogViewer::new();
    let mut surface = ListSurface::new(10);
    assert_eq!(surface.max(), 100.0);

    let event = surface.user_scroll_to(50.0);
    viewer.handle_scroll(&event, Some(&mut surface));
    assert!(!viewer.is_pinned());

    viewer.add_log_entry(LogRecord::new("late line"), Severity::Warning);
    viewer.pump();
    let event = surface.grow(1);
    let decision = viewer.handle_scroll(&event, Some(&mut surface));

    assert_eq!(decision, ScrollDecision::Hold);
    assert_eq!(surface.offset, 50.0);
}

#[test]
fn stopping_a_fraction_above_bottom_stops_following() {
    let mut viewer = LogViewer::new();
    let mut surface = ListSurface::new(10);

    let event = surface.user_scroll_to(99.8);
    assert_eq!(
        viewer.handle_scroll(&event, Some(&mut surface)),
        ScrollDecision::UserScroll { pinned: false }
    );

    viewer.add_log_entry(LogRecord::new("one more"), Severity::Info);
    viewer.pump();
    let event = surface.grow(1);
    assert_eq!(viewer.handle_scroll(&event, Some(&mut surface)), ScrollDecision::Hold);
    assert_eq!(surface.offset, 99.8);
    assert!(!viewer.is_pinned());
}

#[test]
fn panicking_surface_yields_one_error_record() {
    let mut viewer = LogViewer::new();
    let mut surface = ExplodingSurface;

    let decision = viewer.handle_scroll(
        &ScrollChanged::user_scroll(0.0, 10.0, 110.0),
        Some(&mut surface),
    );
    assert_eq!(decision, ScrollDecision::Failed);

    viewer.pump();
    assert_eq!(viewer.len(), 1);
    let record = &viewer.records()[0];
    assert_eq!(record.severity(), Severity::Error);
    assert_eq!(record.message, format!("{APPLICATION_ERROR_PREFIX}layout not ready"));

    // The controller keeps working after the failure.
    let mut list = ListSurface::new(10);
    let event = list.user_scroll_to(20.0);
    assert_eq!(
        viewer.handle_scroll(&event, Some(&mut list)),
        ScrollDecision::UserScroll { pinned: false }
    );
}
