use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::metrics::MetricsTable;

/// A single-writer, many-reader publication point.  The simulation thread
/// publishes immutable snapshots and display threads take cheap `Arc`
/// clones.  A published value is never mutated in place.
#[derive(Debug, Default)]
pub struct SnapshotCell<T> {
    current: Mutex<Arc<T>>,
}

impl<T> SnapshotCell<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: Mutex::new(Arc::new(initial)),
        }
    }

    /// Replaces the current snapshot.  Readers holding the previous one keep
    /// a consistent view until they load again.
    pub fn publish(&self, snapshot: T) {
        let snapshot = Arc::new(snapshot);
        // The guarded value is only ever swapped whole, so a poisoned lock
        // still holds a complete snapshot.
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current = snapshot;
    }

    pub fn load(&self) -> Arc<T> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// The runtime state that decisions and displays read between events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
    pub global_time: f64,
    #[serde(default)]
    pub metrics: MetricsTable,
    #[serde(default)]
    pub free_resources: BTreeMap<String, usize>,
}

impl SnapshotCell<RuntimeSnapshot> {
    pub fn publish_runtime(&self, snapshot: RuntimeSnapshot) {
        trace!(time = snapshot.global_time, "publishing runtime snapshot");
        self.publish(snapshot);
    }
}
