//! In-process publish/subscribe bus: per-topic ordered delivery, bounded
//! queues, drop-on-overflow, panic-isolated handlers.
//!
//! Grounded on two teacher patterns: the RwLock-guarded shared map with a
//! background consumer in `tools/registry.rs`, and the mpsc-channel
//! consumer-task pattern in `whatsapp/events.rs`. Here the two merge: a
//! `RwLock<HashMap<Topic, Worker>>` for lazy per-topic worker creation, and
//! one `mpsc` channel + `tokio::spawn`ed consumer per topic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::warn;

use crate::events::Event;

/// Default per-topic bounded queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// A subscribed callback. Invoked with the event payload; must not panic
/// across an unwind boundary the bus can't catch (it can, via
/// `catch_unwind`, but a handler that panics every time silently loses
/// its own work every time).
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Worker {
    sender: mpsc::Sender<(Event, Vec<Handler>)>,
}

/// The in-process event bus.
///
/// Cloning a `Bus` is cheap and shares the same subscriber table, worker
/// map, and drop counter (the fields are all behind `Arc`/atomics) — the
/// teacher's codebase reaches for a process-shared singleton of exactly
/// this type; a singleton is an instantiation choice the caller makes,
/// not something this type imposes.
#[derive(Clone)]
pub struct Bus {
    handlers: Arc<RwLock<HashMap<String, Vec<Handler>>>>,
    workers: Arc<RwLock<HashMap<String, Worker>>>,
    queue_capacity: usize,
    dropped: Arc<AtomicU64>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl Bus {
    /// Create a bus with the given per-topic queue capacity (clamped to a
    /// minimum of 1).
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            workers: Arc::new(RwLock::new(HashMap::new())),
            queue_capacity: queue_capacity.max(1),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Append `handler` to `topic`'s handler list.
    ///
    /// Handlers added after a publish are not guaranteed to see that (or
    /// earlier) publishes — only the handler snapshot taken at publish
    /// time is delivered to.
    pub fn subscribe(&self, topic: &str, handler: Handler) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        handlers
            .entry(topic.to_string())
            .or_default()
            .push(handler);
    }

    /// Publish `event` onto its topic. Never blocks: on a full queue the
    /// event is dropped and the drop counter is incremented.
    ///
    /// If no handlers are subscribed to the topic, this is a no-op (no
    /// worker is created for a topic nobody listens to).
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        let snapshot: Vec<Handler> = {
            let handlers = self
                .handlers
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            match handlers.get(topic) {
                Some(list) if !list.is_empty() => list.clone(),
                _ => return,
            }
        };

        let sender = self.get_or_create_worker(topic);
        if let Err(mpsc::error::TrySendError::Full(_)) = sender.try_send((event, snapshot)) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(topic, "event dropped: topic queue is full");
        }
    }

    /// Total number of events dropped due to queue overflow since this
    /// bus was constructed.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Close every worker's channel.
    ///
    /// Dropping the bus's own sender handle lets each worker drain its
    /// remaining buffered payloads (still invoking handlers for them)
    /// before its loop exits on the next `recv()`. `subscribe`/`publish`
    /// after `shutdown` behave as if talking to a bus with no workers:
    /// `publish` will spin up a fresh worker for any topic it's called on
    /// again, since the handler table itself is untouched.
    pub fn shutdown(&self) {
        let mut workers = self
            .workers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        workers.clear();
    }

    fn get_or_create_worker(&self, topic: &str) -> mpsc::Sender<(Event, Vec<Handler>)> {
        {
            let workers = self
                .workers
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(worker) = workers.get(topic) {
                return worker.sender.clone();
            }
        }

        let mut workers = self
            .workers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(worker) = workers.get(topic) {
            return worker.sender.clone();
        }

        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let topic_owned = topic.to_string();
        tokio::spawn(worker_loop(topic_owned, receiver));
        workers.insert(
            topic.to_string(),
            Worker {
                sender: sender.clone(),
            },
        );
        sender
    }
}

/// Drain `receiver` in order, invoking every handler in each snapshot.
/// Handler panics are trapped and logged; they never stop delivery to
/// the remaining handlers for that payload, nor to later payloads.
async fn worker_loop(topic: String, mut receiver: mpsc::Receiver<(Event, Vec<Handler>)>) {
    while let Some((event, handlers)) = receiver.recv().await {
        for handler in &handlers {
            let handler = Arc::clone(handler);
            let event_ref = &event;
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(event_ref);
            }));
            if let Err(panic) = result {
                let message = panic_message(&panic);
                warn!(topic = %topic, error = %message, "event handler panicked");
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
