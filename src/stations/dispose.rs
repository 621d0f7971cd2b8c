use serde::{Deserialize, Serialize};

use super::station_trait::{Connectable, SerializableStation, StationBehavior};
use crate::expression::ExpressionEngine;
use crate::utils::errors::ValidationReport;

use simflow_derive::SerializableStation;

/// The Dispose station removes clients from the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SerializableStation)]
#[serde(rename_all = "camelCase")]
pub struct Dispose {
    #[serde(default)]
    edges_in: Vec<String>,
}

impl Dispose {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connectable for Dispose {
    fn edges_in(&self) -> &[String] {
        &self.edges_in
    }

    fn edges_out(&self) -> Vec<&str> {
        Vec::new()
    }

    fn can_add_edge_out(&self) -> bool {
        false
    }

    fn add_edge_in(&mut self, edge: &str) {
        self.edges_in.push(edge.to_string());
    }

    fn add_edge_out(&mut self, _edge: &str) {}

    fn remove_edge(&mut self, edge: &str) {
        self.edges_in.retain(|id| id != edge);
    }
}

impl StationBehavior for Dispose {
    fn validate(
        &self,
        _station_id: &str,
        _engine: &dyn ExpressionEngine,
        _report: &mut ValidationReport,
    ) {
    }
}
