//! The persistence module loads and saves models.  A model document holds
//! a list of stations, each `{ id, type, ...fields }`, and a list of edges.
//! YAML and JSON encode the same document.
//!
//! Loading reports errors per station: an unknown type, an undecodable body
//! or an out-of-range value names the station it was found on.  After
//! loading, the graph is re-linked, so per-edge parameters match the edge
//! lists and edge labels are projected.

use serde::Deserialize;
use tracing::debug;

use crate::simulator::{Edge, StationGraph};
use crate::stations::{Station, StationRepr};
use crate::utils::errors::{ConfigurationError, SimulationError};

#[derive(Debug, Deserialize)]
struct GraphRepr {
    #[serde(default)]
    stations: Vec<StationRepr>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl GraphRepr {
    fn into_graph(self) -> Result<StationGraph, ConfigurationError> {
        let stations = self
            .stations
            .into_iter()
            .map(Station::from_repr)
            .collect::<Result<Vec<Station>, ConfigurationError>>()?;
        debug!(
            stations = stations.len(),
            edges = self.edges.len(),
            "model loaded"
        );
        StationGraph::post(stations, self.edges)
    }
}

pub fn from_yaml(document: &str) -> Result<StationGraph, ConfigurationError> {
    serde_yaml::from_str::<GraphRepr>(document)
        .map_err(|error| ConfigurationError::Document(error.to_string()))?
        .into_graph()
}

pub fn from_json(document: &str) -> Result<StationGraph, ConfigurationError> {
    serde_json::from_str::<GraphRepr>(document)
        .map_err(|error| ConfigurationError::Document(error.to_string()))?
        .into_graph()
}

pub fn to_yaml(graph: &StationGraph) -> Result<String, SimulationError> {
    Ok(serde_yaml::to_string(graph)?)
}

pub fn to_json(graph: &StationGraph) -> Result<String, SimulationError> {
    Ok(serde_json::to_string_pretty(graph)?)
}
