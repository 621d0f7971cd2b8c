use serde::{Deserialize, Serialize};

use super::process::{ProcessTimeType, TimeBase};
use super::station_trait::{Connectable, SerializableStation, StationBehavior};
use crate::expression::ExpressionEngine;
use crate::input_modeling::distribution_system::field_name;
use crate::input_modeling::DistributionSystem;
use crate::simulator::client::{Client, ClientEnvironment};
use crate::simulator::Services;
use crate::utils::errors::{ConfigurationError, RuntimeDataError, ValidationReport};

use simflow_derive::SerializableStation;

/// The Delay station holds every client for a delay time, without queueing
/// or resources, and then forwards it along its single outgoing edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SerializableStation)]
#[serde(rename_all = "camelCase")]
pub struct Delay {
    #[serde(default)]
    edges_in: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge_out: Option<String>,
    #[serde(default)]
    delay: DistributionSystem,
    #[serde(default)]
    time_base: TimeBase,
    #[serde(default)]
    process_time_type: ProcessTimeType,
}

impl Delay {
    pub fn new(delay: DistributionSystem) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn delay(&self) -> &DistributionSystem {
        &self.delay
    }

    pub fn delay_mut(&mut self) -> &mut DistributionSystem {
        &mut self.delay
    }

    pub fn set_time_base(&mut self, time_base: TimeBase) {
        self.time_base = time_base;
    }

    pub fn process_time_type(&self) -> ProcessTimeType {
        self.process_time_type
    }

    /// Delay of a client in seconds; zero for client types without a
    /// delay.
    pub fn delay_time(
        &self,
        station_id: &str,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<f64, RuntimeDataError> {
        let source = match self.delay.get(&client.client_type) {
            Some(source) => source,
            None => return Ok(0.0),
        };
        let environment = ClientEnvironment::new(client, services);
        let value = source.value(station_id, engine, &environment, &services.global_rng())?;
        Ok(value.max(0.0) * self.time_base.multiplier())
    }
}

impl Connectable for Delay {
    fn edges_in(&self) -> &[String] {
        &self.edges_in
    }

    fn edges_out(&self) -> Vec<&str> {
        self.edge_out.iter().map(String::as_str).collect()
    }

    fn can_add_edge_out(&self) -> bool {
        self.edge_out.is_none()
    }

    fn add_edge_in(&mut self, edge: &str) {
        self.edges_in.push(edge.to_string());
    }

    fn add_edge_out(&mut self, edge: &str) {
        self.edge_out = Some(edge.to_string());
    }

    fn remove_edge(&mut self, edge: &str) {
        self.edges_in.retain(|id| id != edge);
        if self.edge_out.as_deref() == Some(edge) {
            self.edge_out = None;
        }
    }
}

impl StationBehavior for Delay {
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
        for error in self.range_errors(station_id) {
            report.error(error);
        }
        for (client_type, expression) in self.delay.expressions() {
            let field = field_name("delay", client_type);
            report.check_expression(engine, station_id, &field, expression);
        }
    }

    fn range_errors(&self, station_id: &str) -> Vec<ConfigurationError> {
        self.delay.check(station_id, "delay")
    }

    fn forwards_clients(&self) -> bool {
        true
    }

    fn rename_client_type(&mut self, old: &str, new: &str) {
        self.delay.rename_client_type(old, new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Calculator;
    use crate::input_modeling::{ContinuousRandomVariable, TimeSource};

    #[test]
    fn delay_uses_client_attributes() {
        let mut delay = Delay::default();
        delay.delay_mut().set("A", TimeSource::Expression("x*2".into()));
        delay.set_time_base(TimeBase::Minutes);
        let services = Services::default();
        let client = Client::new("A").with_attribute("x", 1.5);
        assert_eq!(delay.delay_time("d", &client, &services, &Calculator).unwrap(), 180.0);
        assert_eq!(
            delay.delay_time("d", &Client::new("B"), &services, &Calculator).unwrap(),
            0.0
        );
    }

    #[test]
    fn delay_forwards_along_one_edge() {
        let mut delay = Delay::default();
        assert!(delay.forwards_clients());
        delay.add_edge_out("next");
        assert!(!delay.can_add_edge_out());
        assert_eq!(delay.edges_out(), vec!["next"]);
    }

    #[test]
    fn unusable_delay_is_reported() {
        let mut delay = Delay::default();
        delay.add_edge_out("next");
        delay
            .delay_mut()
            .set("A", ContinuousRandomVariable::Gamma { shape: -1.0, scale: 2.0 });
        let mut report = ValidationReport::default();
        delay.validate("d", &Calculator, &mut report);
        assert_eq!(
            report.errors,
            vec![ConfigurationError::OutOfRange {
                station: "d".into(),
                field: "delay[A]".into(),
                value: rand_distr::GammaError::ShapeTooSmall.to_string(),
            }]
        );
    }
}
