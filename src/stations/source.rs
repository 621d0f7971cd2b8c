use serde::{Deserialize, Serialize};

use super::process::TimeBase;
use super::station_trait::{Connectable, SerializableStation, StationBehavior};
use crate::expression::{EmptyEnvironment, ExpressionEngine};
use crate::input_modeling::{ContinuousRandomVariable, TimeSource};
use crate::simulator::client::Client;
use crate::simulator::Services;
use crate::utils::errors::{ConfigurationError, RuntimeDataError, ValidationReport};

use simflow_derive::SerializableStation;

/// The Source station creates clients of one type, separated by a
/// configured interarrival time.  It has no incoming edges and a single
/// outgoing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SerializableStation)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge_out: Option<String>,
    client_type: String,
    #[serde(default = "default_interarrival_time")]
    interarrival_time: TimeSource,
    #[serde(default)]
    time_base: TimeBase,
}

fn default_interarrival_time() -> TimeSource {
    TimeSource::Distribution(ContinuousRandomVariable::exponential_with_mean(100.0))
}

impl Source {
    pub fn new(client_type: &str, interarrival_time: TimeSource) -> Self {
        Self {
            edge_out: None,
            client_type: client_type.to_string(),
            interarrival_time,
            time_base: TimeBase::default(),
        }
    }

    pub fn client_type(&self) -> &str {
        &self.client_type
    }

    pub fn interarrival_time(&self) -> &TimeSource {
        &self.interarrival_time
    }

    pub fn set_time_base(&mut self, time_base: TimeBase) {
        self.time_base = time_base;
    }

    /// Seconds until the next arrival; never negative.
    pub fn next_interarrival_time(
        &self,
        station_id: &str,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<f64, RuntimeDataError> {
        let value = self.interarrival_time.value(
            station_id,
            engine,
            &EmptyEnvironment,
            &services.global_rng(),
        )?;
        Ok(value.max(0.0) * self.time_base.multiplier())
    }

    pub fn create_client(&self) -> Client {
        Client::new(&self.client_type)
    }
}

impl Connectable for Source {
    fn edges_in(&self) -> &[String] {
        &[]
    }

    fn edges_out(&self) -> Vec<&str> {
        self.edge_out.iter().map(String::as_str).collect()
    }

    fn can_add_edge_in(&self) -> bool {
        false
    }

    fn can_add_edge_out(&self) -> bool {
        self.edge_out.is_none()
    }

    fn add_edge_in(&mut self, _edge: &str) {}

    fn add_edge_out(&mut self, edge: &str) {
        self.edge_out = Some(edge.to_string());
    }

    fn remove_edge(&mut self, edge: &str) {
        if self.edge_out.as_deref() == Some(edge) {
            self.edge_out = None;
        }
    }
}

impl StationBehavior for Source {
    fn validate(
        &self,
        station_id: &str,
        engine: &dyn ExpressionEngine,
        report: &mut ValidationReport,
    ) {
        if self.edge_out.is_none() {
            report.error(ConfigurationError::NoOutgoingEdges {
                station: station_id.to_string(),
            });
        }
        if self.client_type.trim().is_empty() {
            report.error(ConfigurationError::OutOfRange {
                station: station_id.to_string(),
                field: "clientType".to_string(),
                value: String::new(),
            });
        }
        for error in self.range_errors(station_id) {
            report.error(error);
        }
        if let Some(expression) = self.interarrival_time.expression() {
            report.check_expression(engine, station_id, "interarrivalTime", expression);
        }
    }

    fn range_errors(&self, station_id: &str) -> Vec<ConfigurationError> {
        self.interarrival_time
            .check(station_id, "interarrivalTime")
            .err()
            .into_iter()
            .collect()
    }

    fn rename_client_type(&mut self, old: &str, new: &str) {
        if self.client_type.eq_ignore_ascii_case(old) {
            self.client_type = new.to_string();
        }
    }
}
