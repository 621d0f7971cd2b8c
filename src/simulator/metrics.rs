use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Live per-station counters supplied by the simulation runtime.  `None`
/// means the runtime does not track the metric for that station.
pub trait StationMetrics {
    /// Number of clients waiting in the queue of the station
    fn queue_length(&self, station: &str) -> Option<usize>;
    /// Number of clients anywhere at the station, waiting or in service
    fn clients_at_station(&self, station: &str) -> Option<usize>;
}

/// Free units per resource group, supplied by the simulation runtime.
pub trait ResourceAvailability {
    fn available(&self, group: &str) -> usize;
}

impl ResourceAvailability for HashMap<String, usize> {
    fn available(&self, group: &str) -> usize {
        self.get(group).copied().unwrap_or(0)
    }
}

impl ResourceAvailability for BTreeMap<String, usize> {
    fn available(&self, group: &str) -> usize {
        self.get(group).copied().unwrap_or(0)
    }
}

/// A plain table of station counters, as published by a runtime snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsTable {
    #[serde(default)]
    queue_lengths: BTreeMap<String, usize>,
    #[serde(default)]
    clients_at_station: BTreeMap<String, usize>,
}

impl MetricsTable {
    pub fn set(&mut self, station: &str, queue_length: usize, clients_at_station: usize) {
        self.queue_lengths
            .insert(station.to_string(), queue_length);
        self.clients_at_station
            .insert(station.to_string(), clients_at_station);
    }
}

impl StationMetrics for MetricsTable {
    fn queue_length(&self, station: &str) -> Option<usize> {
        self.queue_lengths.get(station).copied()
    }

    fn clients_at_station(&self, station: &str) -> Option<usize> {
        self.clients_at_station.get(station).copied()
    }
}
