//! The simulator module holds the station graph of a model and the boundary
//! to the simulation runtime that executes it.  The graph keeps stations and
//! edges mutually consistent while the model is edited, validates the
//! configuration, and answers routing requests of the runtime.
//!
//! `StationGraph` and `WebStationGraph` are used for Rust- and npm-based
//! projects, respectively.  The `StationGraph` methods use the associated
//! struct types directly, while the `WebStationGraph` provides an interface
//! with better JS/WASM compatibility.
//!
//! The runtime supplies random numbers, the clock and global variables
//! through `Services`, live station counters through `StationMetrics`, and
//! free resource units through `ResourceAvailability`.  The configuration
//! never calls back into the runtime.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::expression::ExpressionEngine;
use crate::presentation::edge_labels;
use crate::stations::{
    Connectable, DecisionContext, MetricTarget, Routing, RoutingState, Station, StationBehavior,
};
use crate::utils::errors::{ConfigurationError, RuntimeDataError, ValidationReport};

pub mod client;
pub mod metrics;
pub mod services;
pub mod snapshot;
pub mod web;

pub use self::client::{Client, ClientEnvironment};
pub use self::metrics::{MetricsTable, ResourceAvailability, StationMetrics};
pub use self::services::Services;
pub use self::snapshot::{RuntimeSnapshot, SnapshotCell};
pub use self::web::WebStationGraph;

/// Edges carry clients from one station to another.  An edge is registered
/// exactly once in the outgoing list of its source and the incoming list of
/// its target.  The label is derived from the source configuration and is
/// not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: String,
    #[serde(rename = "sourceID")]
    source_id: String,
    #[serde(rename = "targetID")]
    target_id: String,
    #[serde(skip)]
    label: String,
}

impl Edge {
    pub fn new(id: &str, source_id: &str, target_id: &str) -> Self {
        Self {
            id: id.to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            label: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The `StationGraph` struct is the editable model: stations and the edges
/// between them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationGraph {
    stations: Vec<Station>,
    edges: Vec<Edge>,
}

impl StationGraph {
    /// This constructor method creates a graph from a supplied
    /// configuration (stations and edges).  Identifiers must be unique.
    pub fn post(stations: Vec<Station>, edges: Vec<Edge>) -> Result<Self, ConfigurationError> {
        let mut graph = Self::default();
        graph.put(stations, edges)?;
        Ok(graph)
    }

    /// This method replaces the stations and edges of an existing graph.
    /// The graph is left untouched if an identifier is duplicated.
    pub fn put(&mut self, stations: Vec<Station>, edges: Vec<Edge>) -> Result<(), ConfigurationError> {
        check_unique(stations.iter().map(Station::id))?;
        check_unique(edges.iter().map(Edge::id))?;
        self.stations = stations;
        self.edges = edges;
        self.relink();
        Ok(())
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn station(&self, station_id: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.id() == station_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == edge_id)
    }

    fn station_index(&self, station_id: &str) -> Result<usize, ConfigurationError> {
        self.stations
            .iter()
            .position(|station| station.id() == station_id)
            .ok_or_else(|| ConfigurationError::StationNotFound(station_id.to_string()))
    }

    fn edge_index(&self, edge_id: &str) -> Result<usize, ConfigurationError> {
        self.edges
            .iter()
            .position(|edge| edge.id == edge_id)
            .ok_or_else(|| ConfigurationError::EdgeNotFound(edge_id.to_string()))
    }

    pub fn add_station(&mut self, station: Station) -> Result<(), ConfigurationError> {
        if self.station(station.id()).is_some() {
            return Err(ConfigurationError::DuplicateId(station.id().to_string()));
        }
        debug!(station = station.id(), station_type = station.get_type(), "station added");
        self.stations.push(station);
        Ok(())
    }

    /// Applies a configuration change to a station, then re-aligns its
    /// per-edge parameters and re-projects the labels of its outgoing edges.
    pub fn configure<F>(&mut self, station_id: &str, update: F) -> Result<(), ConfigurationError>
    where
        F: FnOnce(&mut dyn StationBehavior),
    {
        let index = self.station_index(station_id)?;
        update(self.stations[index].behavior_mut());
        self.stations[index].behavior_mut().reconcile();
        self.refresh_labels(station_id);
        Ok(())
    }

    /// Connects two stations with a new edge and returns its identifier.
    pub fn connect(&mut self, source_id: &str, target_id: &str) -> Result<String, ConfigurationError> {
        let edge_id = self.next_edge_id();
        self.connect_with_id(&edge_id, source_id, target_id)?;
        Ok(edge_id)
    }

    /// Connects two stations with an edge of the given identifier.  Both
    /// endpoints are checked before either is modified.
    pub fn connect_with_id(
        &mut self,
        edge_id: &str,
        source_id: &str,
        target_id: &str,
    ) -> Result<(), ConfigurationError> {
        if self.edge(edge_id).is_some() {
            return Err(ConfigurationError::DuplicateId(edge_id.to_string()));
        }
        if source_id == target_id {
            return Err(ConfigurationError::IncompatibleOptions {
                station: source_id.to_string(),
                message: "a station cannot be connected to itself".to_string(),
            });
        }
        let source = self.station_index(source_id)?;
        let target = self.station_index(target_id)?;
        if !self.stations[source].behavior().can_add_edge_out() {
            return Err(ConfigurationError::CapacityExceeded {
                station: source_id.to_string(),
                direction: "outgoing".to_string(),
            });
        }
        if !self.stations[target].behavior().can_add_edge_in() {
            return Err(ConfigurationError::CapacityExceeded {
                station: target_id.to_string(),
                direction: "incoming".to_string(),
            });
        }
        self.stations[source].behavior_mut().add_edge_out(edge_id);
        self.stations[target].behavior_mut().add_edge_in(edge_id);
        self.edges.push(Edge::new(edge_id, source_id, target_id));
        self.refresh_labels(source_id);
        debug!(edge = edge_id, source = source_id, target = target_id, "stations connected");
        Ok(())
    }

    /// Removes an edge from the graph and from both of its endpoints.  A
    /// Process station losing its success edge also loses its cancel edge,
    /// which is removed here as well.
    pub fn remove_edge(&mut self, edge_id: &str) -> Result<Edge, ConfigurationError> {
        let index = self.edge_index(edge_id)?;
        let edge = self.edges.remove(index);
        let registered = self.outgoing(&edge.source_id);
        self.detach(&edge);
        debug!(edge = edge_id, "edge removed");
        // The source may release further outgoing edges along with this one
        let kept = self.outgoing(&edge.source_id);
        let released: Vec<Edge> = self
            .edges
            .iter()
            .filter(|other| {
                other.source_id == edge.source_id
                    && registered.contains(&other.id)
                    && !kept.contains(&other.id)
            })
            .cloned()
            .collect();
        for other in released.iter() {
            self.edges.retain(|existing| existing.id != other.id);
            self.detach(other);
            debug!(edge = other.id.as_str(), with = edge_id, "edge removed");
        }
        self.refresh_labels(&edge.source_id);
        Ok(edge)
    }

    fn outgoing(&self, station_id: &str) -> Vec<String> {
        self.station(station_id)
            .map(|station| {
                station
                    .behavior()
                    .edges_out()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn detach(&mut self, edge: &Edge) {
        for station in self.stations.iter_mut() {
            if station.id() == edge.source_id || station.id() == edge.target_id {
                station.behavior_mut().remove_edge(&edge.id);
            }
        }
    }

    /// Removes a station together with every edge attached to it.
    pub fn remove_station(&mut self, station_id: &str) -> Result<Station, ConfigurationError> {
        let index = self.station_index(station_id)?;
        let attached: Vec<String> = self
            .edges
            .iter()
            .filter(|edge| edge.source_id == station_id || edge.target_id == station_id)
            .map(|edge| edge.id.clone())
            .collect();
        for edge_id in attached.iter() {
            if self.edge(edge_id).is_some() {
                self.remove_edge(edge_id)?;
            }
        }
        debug!(station = station_id, edges = attached.len(), "station removed");
        Ok(self.stations.remove(index))
    }

    /// True if the edge exists and is registered exactly once on both of its
    /// endpoints.
    pub fn connection_ok(&self, edge_id: &str) -> bool {
        let edge = match self.edge(edge_id) {
            Some(edge) => edge,
            None => return false,
        };
        let outgoing = self.station(&edge.source_id).map_or(false, |station| {
            let edges_out = station.behavior().edges_out();
            edges_out.iter().filter(|id| **id == edge_id).count() == 1
        });
        let incoming = self.station(&edge.target_id).map_or(false, |station| {
            let edges_in = station.behavior().edges_in();
            edges_in.iter().filter(|id| *id == edge_id).count() == 1
        });
        outgoing && incoming
    }

    /// Inserts a station into an existing edge.  The edge is re-targeted to
    /// the new station, and a new edge leads from the new station to the
    /// original target.  Every precondition is checked before the graph is
    /// modified.  Returns the identifier of the new edge.
    pub fn split_edge(&mut self, edge_id: &str, station: Station) -> Result<String, ConfigurationError> {
        let edge_index = self.edge_index(edge_id)?;
        let source_id = self.edges[edge_index].source_id.clone();
        let target_id = self.edges[edge_index].target_id.clone();
        let station_id = station.id().to_string();
        if self.station(&station_id).is_some() {
            return Err(ConfigurationError::DuplicateId(station_id));
        }
        if source_id == target_id {
            return Err(ConfigurationError::IncompatibleOptions {
                station: source_id,
                message: "an edge from a station to itself cannot be split".to_string(),
            });
        }
        let target = self.station_index(&target_id)?;
        for (accepts, direction) in [
            (station.behavior().can_add_edge_in(), "incoming"),
            (station.behavior().can_add_edge_out(), "outgoing"),
        ]
        .iter()
        {
            if !accepts {
                return Err(ConfigurationError::CapacityExceeded {
                    station: station_id,
                    direction: direction.to_string(),
                });
            }
        }
        let new_edge_id = self.next_edge_id();

        let mut station = station;
        self.stations[target].behavior_mut().remove_edge(edge_id);
        self.edges[edge_index].target_id = station_id.clone();
        station.behavior_mut().add_edge_in(edge_id);
        station.behavior_mut().add_edge_out(&new_edge_id);
        self.stations[target].behavior_mut().add_edge_in(&new_edge_id);
        self.edges
            .push(Edge::new(&new_edge_id, &station_id, &target_id));
        self.stations.push(station);
        self.refresh_labels(&source_id);
        self.refresh_labels(&station_id);
        debug!(
            edge = edge_id,
            station = station_id.as_str(),
            new_edge = new_edge_id.as_str(),
            "edge split"
        );
        Ok(new_edge_id)
    }

    /// Reports every configuration error and warning of the model.  Broken
    /// edge registrations are reported, never repaired.
    pub fn validate(&self, engine: &dyn ExpressionEngine) -> ValidationReport {
        let mut report = ValidationReport::default();
        for edge in self.edges.iter() {
            let mut dangling = false;
            for endpoint in [&edge.source_id, &edge.target_id].iter() {
                if self.station(endpoint).is_none() {
                    dangling = true;
                    report.error(ConfigurationError::DanglingEdge {
                        edge: edge.id.clone(),
                        station: endpoint.to_string(),
                    });
                }
            }
            if !dangling && !self.connection_ok(&edge.id) {
                report.error(ConfigurationError::BrokenConnection {
                    edge: edge.id.clone(),
                });
            }
        }
        for station in self.stations.iter() {
            let behavior = station.behavior();
            let registered = behavior
                .edges_in()
                .iter()
                .map(String::as_str)
                .chain(behavior.edges_out());
            for edge_id in registered {
                if self.edge(edge_id).is_none() {
                    report.error(ConfigurationError::BrokenConnection {
                        edge: edge_id.to_string(),
                    });
                }
            }
            behavior.validate(station.id(), engine, &mut report);
        }
        for warning in report.warnings.iter() {
            warn!(%warning, "configuration warning");
        }
        debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "model validated"
        );
        report
    }

    /// Routes a client leaving a Decide station.  For metric rules the
    /// inspected station of each edge is resolved here: the direct target,
    /// or the first Process station reached through forwarding stations.
    pub fn select_outgoing_edge(
        &self,
        station_id: &str,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
        metrics: &dyn StationMetrics,
        state: &mut RoutingState,
    ) -> Result<Routing, RuntimeDataError> {
        let decide = self
            .station(station_id)
            .and_then(|station| station.behavior().as_decide())
            .ok_or_else(|| RuntimeDataError::NotADecideStation(station_id.to_string()))?;
        let metric_stations = match decide.decision().metric_rule() {
            Some(rule) => decide
                .edges_out()
                .into_iter()
                .map(|edge_id| {
                    self.metric_station(edge_id, rule.target).ok_or_else(|| {
                        RuntimeDataError::MetricUnavailable {
                            station: edge_id.to_string(),
                            metric: rule.metric.name().to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<String>, RuntimeDataError>>()?,
            None => Vec::new(),
        };
        let context = DecisionContext {
            station_id,
            client,
            services,
            engine,
            metrics,
            metric_stations: &metric_stations,
        };
        decide.select_outgoing_edge(&context, state)
    }

    fn metric_station(&self, edge_id: &str, target: MetricTarget) -> Option<String> {
        let mut station = self.station(&self.edge(edge_id)?.target_id)?;
        if target == MetricTarget::NextStation {
            return Some(station.id().to_string());
        }
        // Forwarding cycles end once every station has been visited
        for _ in 0..self.stations.len() {
            let behavior = station.behavior();
            if behavior.as_process().is_some() {
                return Some(station.id().to_string());
            }
            if !behavior.forwards_clients() {
                return None;
            }
            let next_edge = *behavior.edges_out().first()?;
            station = self.station(&self.edge(next_edge)?.target_id)?;
        }
        None
    }

    /// Renames a client type wherever stations refer to it.
    pub fn rename_client_type(&mut self, old: &str, new: &str) {
        for station in self.stations.iter_mut() {
            station.behavior_mut().rename_client_type(old, new);
        }
        self.refresh_all_labels();
    }

    /// Re-aligns the per-edge parameters of every station with its edge
    /// list and re-projects all edge labels.  Run after loading.
    pub fn relink(&mut self) {
        for station in self.stations.iter_mut() {
            station.behavior_mut().reconcile();
        }
        self.refresh_all_labels();
    }

    fn refresh_all_labels(&mut self) {
        let station_ids: Vec<String> = self
            .stations
            .iter()
            .map(|station| station.id().to_string())
            .collect();
        for station_id in station_ids.iter() {
            self.refresh_labels(station_id);
        }
    }

    fn refresh_labels(&mut self, station_id: &str) {
        let labels: Vec<(String, String)> = match self.station(station_id) {
            Some(station) => {
                let behavior = station.behavior();
                behavior
                    .edges_out()
                    .into_iter()
                    .map(str::to_string)
                    .zip(edge_labels(behavior))
                    .collect()
            }
            None => return,
        };
        for (edge_id, label) in labels {
            if let Some(edge) = self.edges.iter_mut().find(|edge| edge.id == edge_id) {
                edge.label = label;
            }
        }
    }

    fn next_edge_id(&self) -> String {
        let mut index = self.edges.len() + 1;
        loop {
            let candidate = format!("edge-{}", index);
            if self.edge(&candidate).is_none() {
                return candidate;
            }
            index += 1;
        }
    }
}

fn check_unique<'a, I: Iterator<Item = &'a str>>(ids: I) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ConfigurationError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}
