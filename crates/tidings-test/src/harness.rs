//! Recording handlers and logging setup for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tidings_events::Event;
use tracing_subscriber::EnvFilter;

/// Set up test logging.
///
/// Safe to call from every test; only the first call installs a subscriber.
///
/// # Example
///
/// ```rust
/// use tidings_test::setup_test_logging;
///
/// setup_test_logging("tidings_events=trace");
/// ```
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Set up test logging with the default filter (warn level).
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}

/// Collects clones of every event handed to its handlers.
///
/// Clones share the same log, so a recorder can be kept by the test while
/// its handler is moved into a hub.
#[derive(Debug)]
pub struct Recorder<E> {
    log: Arc<Mutex<Vec<E>>>,
}

impl<E> Clone for Recorder<E> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

impl<E> Default for Recorder<E> {
    fn default() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E: Event + Clone> Recorder<E> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that appends each event to this recorder's log.
    #[must_use]
    pub fn handler(&self) -> impl FnMut(&E) + Send + 'static {
        let log = Arc::clone(&self.log);
        move |event: &E| {
            log.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        }
    }

    /// Snapshot of the events recorded so far, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<E> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts invocations without keeping the events.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    hits: Arc<AtomicUsize>,
}

impl Counter {
    /// Create a counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler for `E` that increments this counter.
    #[must_use]
    pub fn handler<E: Event>(&self) -> impl FnMut(&E) + Send + 'static {
        let hits = Arc::clone(&self.hits);
        move |_: &E| {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Current count.
    #[must_use]
    pub fn get(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
