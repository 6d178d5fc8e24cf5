//! Memory Pressure Task
//!
//! Low-memory notifications are modelled as an injected broadcast signal; the
//! responder task reacts to each one by shedding Low entries and expired
//! entries.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::IntelligentCache;

/// Capacity of the signal's buffer. Warnings that pile up beyond it are
/// collapsed into a single response.
const SIGNAL_CAPACITY: usize = 16;

/// A single low-memory notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWarning;

// == Memory Pressure Signal ==
/// Source of low-memory notifications.
///
/// Clones share one channel. Subscriptions end when every clone is dropped.
#[derive(Debug, Clone)]
pub struct MemoryPressureSignal {
    sender: broadcast::Sender<MemoryWarning>,
}

impl MemoryPressureSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MemoryWarning> {
        self.sender.subscribe()
    }

    /// Fires a warning. Returns how many subscribers will see it.
    pub fn notify(&self) -> usize {
        match self.sender.send(MemoryWarning) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("Memory warning raised with no subscribers");
                0
            }
        }
    }
}

impl Default for MemoryPressureSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns a task that calls [`IntelligentCache::handle_memory_warning`] for
/// every warning received on `warnings`.
///
/// The task ends when the signal is closed; abort the handle to unsubscribe
/// early.
pub fn spawn_memory_pressure_responder<V>(
    cache: IntelligentCache<V>,
    mut warnings: broadcast::Receiver<MemoryWarning>,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Memory pressure responder started");

        loop {
            match warnings.recv().await {
                Ok(MemoryWarning) => {}
                Err(RecvError::Lagged(missed)) => {
                    debug!("Collapsed {} queued memory warnings", missed);
                }
                Err(RecvError::Closed) => break,
            }

            warn!("Memory warning received, shedding low-priority entries");
            let shed = cache.clone();
            match tokio::task::spawn_blocking(move || shed.handle_memory_warning()).await {
                Ok(report) => info!(
                    "Memory warning cleanup: removed {} entries ({} bytes)",
                    report.removed(),
                    report.bytes_freed
                ),
                Err(err) => warn!("Memory warning cleanup failed: {}", err),
            }
        }

        info!("Memory pressure responder stopped");
    })
}
