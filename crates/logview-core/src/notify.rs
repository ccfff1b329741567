//! Change notification delivered on the UI-owning thread.
//!
//! Any thread may raise an event through a [`NotifySender`]; events are queued and observers only
//! run when the owner calls [`ChangeNotifier::dispatch_pending`] from its event loop.

use tokio::sync::mpsc;
use tracing::trace;

/// Structural change to an observable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    /// A record landed at `index`.
    Appended { index: usize },
    /// The sequence was emptied; `removed` records were dropped.
    Cleared { removed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    CollectionChanged(CollectionChange),
    PropertyChanged { property: &'static str },
}

/// Observers are plain closures owned by the UI thread, so they need not be `Send`.
pub type Observer = Box<dyn FnMut(&ChangeEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Thread-safe handle for raising events.
#[derive(Debug, Clone)]
pub struct NotifySender {
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl NotifySender {
    /// Queue `event` for delivery on the owner's thread. Events raised after the notifier is
    /// dropped are discarded.
    pub fn raise(&self, event: ChangeEvent) {
        if self.tx.send(event).is_err() {
            trace!("change notifier dropped; event discarded");
        }
    }

    pub fn property_changed(&self, property: &'static str) {
        self.raise(ChangeEvent::PropertyChanged { property });
    }
}

pub struct ChangeNotifier {
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
    tx: mpsc::UnboundedSender<ChangeEvent>,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            observers: Vec::new(),
            next_id: 0,
            tx,
            rx,
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn sender(&self) -> NotifySender {
        NotifySender {
            tx: self.tx.clone(),
        }
    }

    /// Queue an event from the owning thread. Delivery still waits for the next dispatch.
    pub fn raise(&self, event: ChangeEvent) {
        // The receiver lives in `self`, so this cannot fail.
        let _ = self.tx.send(event);
    }

    /// Deliver every queued event to every observer, in the order raised.
    /// Returns the number of events delivered.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.rx.try_recv() {
            for (_, observer) in self.observers.iter_mut() {
                observer(&event);
            }
            delivered += 1;
        }
        delivered
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::thread;

    #[test]
    fn events_wait_for_dispatch() {
        let mut notifier = ChangeNotifier::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        notifier.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        notifier.raise(ChangeEvent::PropertyChanged { property: "len" });
        assert!(seen.borrow().is_empty());

        assert_eq!(notifier.dispatch_pending(), 1);
        assert_eq!(
            seen.borrow().as_slice(),
            &[ChangeEvent::PropertyChanged { property: "len" }]
        );
    }

    #[test]
    fn cross_thread_events_arrive_in_raise_order() {
        let mut notifier = ChangeNotifier::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        notifier.subscribe(move |event| {
            if let ChangeEvent::CollectionChanged(CollectionChange::Appended { index }) = event {
                sink.borrow_mut().push(*index);
            }
        });

        let sender = notifier.sender();
        thread::spawn(move || {
            for index in 0..50 {
                sender.raise(ChangeEvent::CollectionChanged(CollectionChange::Appended {
                    index,
                }));
            }
        })
        .join()
        .expect("producer thread");

        notifier.dispatch_pending();
        assert_eq!(*seen.borrow(), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let mut notifier = ChangeNotifier::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = notifier.subscribe(move |_| *sink.borrow_mut() += 1);

        notifier.raise(ChangeEvent::PropertyChanged { property: "len" });
        notifier.dispatch_pending();
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));

        notifier.raise(ChangeEvent::PropertyChanged { property: "len" });
        notifier.dispatch_pending();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn sender_outliving_notifier_is_harmless() {
        let notifier = ChangeNotifier::new();
        let sender = notifier.sender();
        drop(notifier);
        sender.property_changed("len");
    }
}
