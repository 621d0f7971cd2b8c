use std::collections::BTreeMap;

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::expression::Calculator;
use crate::persistence;
use crate::stations::station_factory;
use crate::stations::Station;
use crate::utils::set_panic_hook;

use super::StationGraph;

/// The `WebStationGraph` provides JS/WASM-compatible interfaces to the core
/// `StationGraph` struct.  For additional insight on these methods, refer to
/// the associated `StationGraph` methods.  Errors are unwrapped, instead of
/// returned, in the `WebStationGraph` methods.
#[wasm_bindgen]
#[derive(Default)]
pub struct WebStationGraph {
    graph: StationGraph,
}

#[wasm_bindgen]
impl WebStationGraph {
    /// A JS/WASM interface for loading a model from its JSON document.
    pub fn post_json(document: &str) -> Self {
        set_panic_hook();
        Self {
            graph: persistence::from_json(document).unwrap(),
        }
    }

    /// A JS/WASM interface for replacing the model with a JSON document.
    pub fn put_json(&mut self, document: &str) {
        self.graph = persistence::from_json(document).unwrap();
    }

    /// Get a JSON representation of the full model.
    pub fn get_json(&self) -> String {
        persistence::to_json(&self.graph).unwrap()
    }

    /// A JS/WASM interface for loading a model from its YAML document.
    pub fn post_yaml(document: &str) -> Self {
        set_panic_hook();
        Self {
            graph: persistence::from_yaml(document).unwrap(),
        }
    }

    /// A JS/WASM interface for replacing the model with a YAML document.
    pub fn put_yaml(&mut self, document: &str) {
        self.graph = persistence::from_yaml(document).unwrap();
    }

    /// Get a YAML representation of the full model.
    pub fn get_yaml(&self) -> String {
        persistence::to_yaml(&self.graph).unwrap()
    }

    /// A JS/WASM interface for `StationGraph.add_station`, which uses a
    /// JSON representation of the station.
    pub fn add_station_json(&mut self, station: &str) {
        let station: Station = serde_json::from_str(station).unwrap();
        self.graph.add_station(station).unwrap();
    }

    /// An interface to `StationGraph.connect`, returning the new edge ID.
    pub fn connect(&mut self, source_id: &str, target_id: &str) -> String {
        self.graph.connect(source_id, target_id).unwrap()
    }

    /// An interface to `StationGraph.remove_edge`.
    pub fn remove_edge(&mut self, edge_id: &str) {
        self.graph.remove_edge(edge_id).unwrap();
    }

    /// An interface to `StationGraph.remove_station`.
    pub fn remove_station(&mut self, station_id: &str) {
        self.graph.remove_station(station_id).unwrap();
    }

    /// A JS/WASM interface for `StationGraph.split_edge`, which uses a JSON
    /// representation of the inserted station.  Returns the new edge ID.
    pub fn split_edge_json(&mut self, edge_id: &str, station: &str) -> String {
        let station: Station = serde_json::from_str(station).unwrap();
        self.graph.split_edge(edge_id, station).unwrap()
    }

    /// An interface to `StationGraph.connection_ok`.
    pub fn connection_ok(&self, edge_id: &str) -> bool {
        self.graph.connection_ok(edge_id)
    }

    /// An interface to `StationGraph.rename_client_type`.
    pub fn rename_client_type(&mut self, old: &str, new: &str) {
        self.graph.rename_client_type(old, new);
    }

    /// A JS/WASM interface for `StationGraph.validate`, with the default
    /// expression engine.  Errors and warnings are returned as messages in
    /// a JSON document.
    pub fn validate_json(&self) -> String {
        let report = self.graph.validate(&Calculator);
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
        serde_json::to_string(&serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors,
            "warnings": warnings,
        }))
        .unwrap()
    }

    /// The projected label of every edge, keyed by edge ID, as JSON.
    pub fn edge_labels_json(&self) -> String {
        let labels: BTreeMap<&str, &str> = self
            .graph
            .edges()
            .iter()
            .map(|edge| (edge.id(), edge.label()))
            .collect();
        serde_json::to_string(&labels).unwrap()
    }

    /// The station types known to the station factory, as a JavaScript
    /// Array.
    pub fn station_types_js() -> Array {
        station_factory::station_types()
            .into_iter()
            .map(JsValue::from)
            .collect()
    }

    /// The station types known to the station factory, as JSON.
    pub fn station_types_json() -> String {
        serde_json::to_string(&station_factory::station_types()).unwrap()
    }
}
