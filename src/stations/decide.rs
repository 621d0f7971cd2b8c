use serde::{Deserialize, Serialize};
use tracing::trace;

use super::station_trait::{Connectable, SerializableStation, StationBehavior};
use crate::expression::ExpressionEngine;
use crate::simulator::client::{Client, ClientEnvironment};
use crate::simulator::metrics::StationMetrics;
use crate::simulator::Services;
use crate::utils::errors::{
    ConfigurationError, ConfigurationWarning, RuntimeDataError, ValidationReport,
};

use simflow_derive::SerializableStation;

/// The Decide station sends each arriving client along exactly one of its
/// outgoing edges.  The routing rule and its per-edge parameters are held in
/// `DecideMode`; the parameter lists are kept aligned with the outgoing
/// edges.  Optionally, a client leaving along an edge is assigned a new
/// client type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SerializableStation)]
#[serde(rename_all = "camelCase")]
pub struct Decide {
    #[serde(default)]
    edges_in: Vec<String>,
    #[serde(default)]
    edges_out: Vec<String>,
    decision: DecideMode,
    #[serde(default)]
    tie_break: TieBreak,
    #[serde(default)]
    new_client_types: Vec<Option<String>>,
}

/// The routing rule of a Decide station.  Rules that read a metric compare
/// either the direct target of each edge (`*NextStation`) or the first
/// Process station reachable along it (`*ProcessStation`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DecideMode {
    /// Weighted random choice.  Rates are formulas; negative values count
    /// as zero.
    Chance {
        #[serde(default)]
        rates: Vec<String>,
    },
    /// First edge whose condition holds; the last edge is the else case.
    Condition {
        #[serde(default)]
        conditions: Vec<String>,
    },
    /// First edge listing the client type; the last edge takes all others.
    ClientType {
        #[serde(default, rename = "clientTypes")]
        client_types: Vec<Vec<String>>,
    },
    /// Round robin, visiting edge `i` `multiplicities[i]` times in a row.
    Sequence {
        #[serde(default)]
        multiplicities: Vec<u64>,
    },
    ShortestQueueNextStation,
    ShortestQueueProcessStation,
    MinClientsNextStation,
    MinClientsProcessStation,
    LongestQueueNextStation,
    LongestQueueProcessStation,
    MaxClientsNextStation,
    MaxClientsProcessStation,
    /// First edge whose value matches the client's text property `key`;
    /// the last edge is the else case.
    KeyValue {
        #[serde(default)]
        key: String,
        #[serde(default)]
        values: Vec<String>,
        #[serde(default = "default_multi_text_values", rename = "multiTextValues")]
        multi_text_values: bool,
    },
}

fn default_multi_text_values() -> bool {
    true
}

/// How metric-based rules pick among edges with equal metric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TieBreak {
    First,
    Last,
    Random,
}

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::First
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationMetric {
    QueueLength,
    ClientsAtStation,
}

impl StationMetric {
    pub fn name(&self) -> &'static str {
        match self {
            StationMetric::QueueLength => "queueLength",
            StationMetric::ClientsAtStation => "clientsAtStation",
        }
    }

    fn read(&self, metrics: &dyn StationMetrics, station: &str) -> Option<usize> {
        match self {
            StationMetric::QueueLength => metrics.queue_length(station),
            StationMetric::ClientsAtStation => metrics.clients_at_station(station),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

/// Which station along an outgoing edge a metric rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricTarget {
    NextStation,
    ProcessStation,
}

/// A metric-based routing rule, decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricRule {
    pub metric: StationMetric,
    pub extremum: Extremum,
    pub target: MetricTarget,
}

impl MetricRule {
    pub const fn new(metric: StationMetric, extremum: Extremum, target: MetricTarget) -> Self {
        Self {
            metric,
            extremum,
            target,
        }
    }
}

impl DecideMode {
    pub fn chance<S: ToString>(rates: &[S]) -> Self {
        DecideMode::Chance {
            rates: rates.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn condition<S: ToString>(conditions: &[S]) -> Self {
        DecideMode::Condition {
            conditions: conditions.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn sequence(multiplicities: &[u64]) -> Self {
        DecideMode::Sequence {
            multiplicities: multiplicities.to_vec(),
        }
    }

    pub fn metric_rule(&self) -> Option<MetricRule> {
        use self::Extremum::{Max, Min};
        use self::MetricTarget::{NextStation, ProcessStation};
        use self::StationMetric::{ClientsAtStation, QueueLength};
        let (metric, extremum, target) = match self {
            DecideMode::ShortestQueueNextStation => (QueueLength, Min, NextStation),
            DecideMode::ShortestQueueProcessStation => (QueueLength, Min, ProcessStation),
            DecideMode::MinClientsNextStation => (ClientsAtStation, Min, NextStation),
            DecideMode::MinClientsProcessStation => (ClientsAtStation, Min, ProcessStation),
            DecideMode::LongestQueueNextStation => (QueueLength, Max, NextStation),
            DecideMode::LongestQueueProcessStation => (QueueLength, Max, ProcessStation),
            DecideMode::MaxClientsNextStation => (ClientsAtStation, Max, NextStation),
            DecideMode::MaxClientsProcessStation => (ClientsAtStation, Max, ProcessStation),
            DecideMode::Chance { .. }
            | DecideMode::Condition { .. }
            | DecideMode::ClientType { .. }
            | DecideMode::Sequence { .. }
            | DecideMode::KeyValue { .. } => return None,
        };
        Some(MetricRule::new(metric, extremum, target))
    }

    /// Pads per-edge parameters with their defaults, or truncates them, so
    /// there is exactly one per outgoing edge.
    fn reconcile(&mut self, edge_count: usize) {
        match self {
            DecideMode::Chance { rates } => rates.resize(edge_count, "1".to_string()),
            DecideMode::Condition { conditions } => conditions.resize(edge_count, String::new()),
            DecideMode::ClientType { client_types } => client_types.resize(edge_count, Vec::new()),
            DecideMode::Sequence { multiplicities } => multiplicities.resize(edge_count, 1),
            DecideMode::KeyValue { values, .. } => values.resize(edge_count, String::new()),
            DecideMode::ShortestQueueNextStation
            | DecideMode::ShortestQueueProcessStation
            | DecideMode::MinClientsNextStation
            | DecideMode::MinClientsProcessStation
            | DecideMode::LongestQueueNextStation
            | DecideMode::LongestQueueProcessStation
            | DecideMode::MaxClientsNextStation
            | DecideMode::MaxClientsProcessStation => {}
        }
    }

    /// Drops the parameter of a removed edge, keeping later edges aligned.
    fn remove_parameter(&mut self, index: usize) {
        fn remove_at<T>(list: &mut Vec<T>, index: usize) {
            if index < list.len() {
                list.remove(index);
            }
        }
        match self {
            DecideMode::Chance { rates } => remove_at(rates, index),
            DecideMode::Condition { conditions } => remove_at(conditions, index),
            DecideMode::ClientType { client_types } => remove_at(client_types, index),
            DecideMode::Sequence { multiplicities } => remove_at(multiplicities, index),
            DecideMode::KeyValue { values, .. } => remove_at(values, index),
            DecideMode::ShortestQueueNextStation
            | DecideMode::ShortestQueueProcessStation
            | DecideMode::MinClientsNextStation
            | DecideMode::MinClientsProcessStation
            | DecideMode::LongestQueueNextStation
            | DecideMode::LongestQueueProcessStation
            | DecideMode::MaxClientsNextStation
            | DecideMode::MaxClientsProcessStation => {}
        }
    }
}

/// Per-station routing state owned by the simulation runtime.  Only the
/// Sequence rule keeps state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingState {
    sequence_edge: usize,
    sequence_repeats: u64,
}

/// The result of a routing decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Routing {
    pub edge_index: usize,
    pub edge_id: String,
    pub new_client_type: Option<String>,
}

/// Everything a decision reads from the running simulation.
pub struct DecisionContext<'a> {
    pub station_id: &'a str,
    pub client: &'a Client,
    pub services: &'a Services,
    pub engine: &'a dyn ExpressionEngine,
    pub metrics: &'a dyn StationMetrics,
    /// For metric rules, the station inspected for each outgoing edge.
    pub metric_stations: &'a [String],
}

impl Decide {
    pub fn new(decision: DecideMode) -> Self {
        Self {
            edges_in: Vec::new(),
            edges_out: Vec::new(),
            decision,
            tie_break: TieBreak::default(),
            new_client_types: Vec::new(),
        }
    }

    pub fn decision(&self) -> &DecideMode {
        &self.decision
    }

    /// Replaces the routing rule.  Parameters are re-aligned with the
    /// outgoing edges.
    pub fn set_decision(&mut self, decision: DecideMode) {
        self.decision = decision;
        self.reconcile_parameters();
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn set_tie_break(&mut self, tie_break: TieBreak) {
        self.tie_break = tie_break;
    }

    pub fn new_client_type(&self, edge_index: usize) -> Option<&str> {
        self.new_client_types
            .get(edge_index)
            .and_then(|client_type| client_type.as_deref())
    }

    /// Sets the type assigned to clients leaving along an edge.  Blank names
    /// clear the assignment.
    pub fn set_new_client_type(&mut self, edge_index: usize, client_type: Option<&str>) {
        if edge_index >= self.new_client_types.len() {
            return;
        }
        self.new_client_types[edge_index] = client_type
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
    }

    fn reconcile_parameters(&mut self) {
        let edge_count = self.edges_out.len();
        self.decision.reconcile(edge_count);
        self.new_client_types.resize(edge_count, None);
    }

    /// Selects the outgoing edge for a client.  A station without outgoing
    /// edges is a configuration error found by validation, so evaluating one
    /// is reported as a runtime error.
    pub fn select_outgoing_edge(
        &self,
        context: &DecisionContext,
        state: &mut RoutingState,
    ) -> Result<Routing, RuntimeDataError> {
        use self::Extremum::{Max, Min};
        use self::MetricTarget::{NextStation, ProcessStation};
        use self::StationMetric::{ClientsAtStation, QueueLength};
        let edge_count = self.edges_out.len();
        if edge_count == 0 {
            return Err(RuntimeDataError::NoOutgoingEdges(
                context.station_id.to_string(),
            ));
        }
        let edge_index = match &self.decision {
            DecideMode::Chance { rates } => self.by_chance(context, rates)?,
            DecideMode::Condition { conditions } => self.by_condition(context, conditions)?,
            DecideMode::ClientType { client_types } => {
                let client_type = &context.client.client_type;
                first_match_or_else(edge_count, |index| {
                    client_types.get(index).map_or(false, |types| {
                        types
                            .iter()
                            .any(|candidate| candidate.eq_ignore_ascii_case(client_type))
                    })
                })
            }
            DecideMode::Sequence { multiplicities } => by_sequence(multiplicities, edge_count, state),
            DecideMode::KeyValue {
                key,
                values,
                multi_text_values,
            } => {
                let property = context.client.text_property(key).unwrap_or("");
                first_match_or_else(edge_count, |index| {
                    values.get(index).map_or(false, |value| {
                        literals(value, *multi_text_values).any(|literal| literal == property)
                    })
                })
            }
            DecideMode::ShortestQueueNextStation => {
                self.by_metric(context, MetricRule::new(QueueLength, Min, NextStation))?
            }
            DecideMode::ShortestQueueProcessStation => {
                self.by_metric(context, MetricRule::new(QueueLength, Min, ProcessStation))?
            }
            DecideMode::MinClientsNextStation => {
                self.by_metric(context, MetricRule::new(ClientsAtStation, Min, NextStation))?
            }
            DecideMode::MinClientsProcessStation => {
                self.by_metric(context, MetricRule::new(ClientsAtStation, Min, ProcessStation))?
            }
            DecideMode::LongestQueueNextStation => {
                self.by_metric(context, MetricRule::new(QueueLength, Max, NextStation))?
            }
            DecideMode::LongestQueueProcessStation => {
                self.by_metric(context, MetricRule::new(QueueLength, Max, ProcessStation))?
            }
            DecideMode::MaxClientsNextStation => {
                self.by_metric(context, MetricRule::new(ClientsAtStation, Max, NextStation))?
            }
            DecideMode::MaxClientsProcessStation => {
                self.by_metric(context, MetricRule::new(ClientsAtStation, Max, ProcessStation))?
            }
        };
        trace!(
            station = context.station_id,
            edge = edge_index,
            "routing decision"
        );
        Ok(Routing {
            edge_index,
            edge_id: self.edges_out[edge_index].clone(),
            new_client_type: self.new_client_type(edge_index).map(str::to_string),
        })
    }

    fn by_chance(
        &self,
        context: &DecisionContext,
        rates: &[String],
    ) -> Result<usize, RuntimeDataError> {
        let environment = ClientEnvironment::new(context.client, context.services);
        let weights = (0..self.edges_out.len())
            .map(|index| {
                let rate = rates.get(index).map_or("1", String::as_str);
                context
                    .engine
                    .evaluate_number(rate, &environment)
                    .map(|weight| weight.max(0.0))
                    .map_err(|source| RuntimeDataError::EvaluationFailed {
                        station: context.station_id.to_string(),
                        expression: rate.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<f64>, RuntimeDataError>>()?;
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(RuntimeDataError::NoPositiveWeight(
                context.station_id.to_string(),
            ));
        }
        let draw = context.services.uniform() * total;
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if draw < cumulative {
                return Ok(index);
            }
        }
        // Rounding can leave the draw at the very top of the range
        Ok(weights
            .iter()
            .rposition(|weight| *weight > 0.0)
            .unwrap_or(weights.len() - 1))
    }

    fn by_condition(
        &self,
        context: &DecisionContext,
        conditions: &[String],
    ) -> Result<usize, RuntimeDataError> {
        let environment = ClientEnvironment::new(context.client, context.services);
        let last = self.edges_out.len() - 1;
        for index in 0..last {
            let condition = conditions.get(index).map_or("", String::as_str);
            let holds = context
                .engine
                .evaluate_condition(condition, &environment)
                .map_err(|source| RuntimeDataError::EvaluationFailed {
                    station: context.station_id.to_string(),
                    expression: condition.to_string(),
                    source,
                })?;
            if holds {
                return Ok(index);
            }
        }
        Ok(last)
    }

    fn by_metric(
        &self,
        context: &DecisionContext,
        rule: MetricRule,
    ) -> Result<usize, RuntimeDataError> {
        let values = (0..self.edges_out.len())
            .map(|index| {
                let unavailable = |station: &str| RuntimeDataError::MetricUnavailable {
                    station: station.to_string(),
                    metric: rule.metric.name().to_string(),
                };
                let station = context
                    .metric_stations
                    .get(index)
                    .ok_or_else(|| unavailable(&self.edges_out[index]))?;
                rule.metric
                    .read(context.metrics, station)
                    .ok_or_else(|| unavailable(station))
            })
            .collect::<Result<Vec<usize>, RuntimeDataError>>()?;
        let best = match rule.extremum {
            Extremum::Min => values.iter().min(),
            Extremum::Max => values.iter().max(),
        }
        .copied()
        .unwrap_or(0);
        let candidates: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == best)
            .map(|(index, _)| index)
            .collect();
        Ok(match self.tie_break {
            TieBreak::First => candidates[0],
            TieBreak::Last => candidates[candidates.len() - 1],
            TieBreak::Random => candidates[context.services.index(candidates.len())],
        })
    }
}

/// The non-blank literals of a KeyValue entry.  Multi-valued entries are
/// `;`-separated lists.
fn literals(value: &str, multi_text_values: bool) -> Box<dyn Iterator<Item = &str> + '_> {
    if multi_text_values {
        Box::new(value.split(';').map(str::trim).filter(|literal| !literal.is_empty()))
    } else {
        Box::new(Some(value).into_iter().filter(|literal| !literal.is_empty()))
    }
}

/// First edge, except the last, accepted by `accepts`; otherwise the last
/// edge, which is the else case.
fn first_match_or_else<F: Fn(usize) -> bool>(edge_count: usize, accepts: F) -> usize {
    let last = edge_count - 1;
    (0..last).find(|index| accepts(*index)).unwrap_or(last)
}

fn by_sequence(multiplicities: &[u64], edge_count: usize, state: &mut RoutingState) -> usize {
    if state.sequence_edge >= edge_count {
        state.sequence_edge = 0;
        state.sequence_repeats = 0;
    }
    let edge_index = state.sequence_edge;
    let multiplicity = multiplicities.get(edge_index).copied().unwrap_or(1).max(1);
    state.sequence_repeats += 1;
    if state.sequence_repeats >= multiplicity {
        state.sequence_edge = (edge_index + 1) % edge_count;
        state.sequence_repeats = 0;
    }
    edge_index
}

impl Connectable for Decide {
    fn edges_in(&self) -> &[String] {
        &self.edges_in
    }

    fn edges_out(&self) -> Vec<&str> {
        self.edges_out.iter().map(String::as_str).collect()
    }

    fn can_add_edge_out(&self) -> bool {
        true
    }

    fn add_edge_in(&mut self, edge: &str) {
        self.edges_in.push(edge.to_string());
    }

    fn add_edge_out(&mut self, edge: &str) {
        self.edges_out.push(edge.to_string());
        self.reconcile_parameters();
    }

    fn remove_edge(&mut self, edge: &str) {
        self.edges_in.retain(|id| id != edge);
        if let Some(index) = self.edges_out.iter().position(|id| id == edge) {
            self.edges_out.remove(index);
            self.decision.remove_parameter(index);
            if index < self.new_client_types.len() {
                self.new_client_types.remove(index);
            }
            self.reconcile_parameters();
        }
    }
}

impl StationBehavior for Decide {
    fn validate(
        &self,
        station_id: &str,
        engine: &dyn ExpressionEngine,
        report: &mut ValidationReport,
    ) {
        let edge_count = self.edges_out.len();
        if edge_count == 0 {
            report.error(ConfigurationError::NoOutgoingEdges {
                station: station_id.to_string(),
            });
            return;
        }
        match &self.decision {
            DecideMode::Chance { rates } => {
                for (index, rate) in rates.iter().enumerate() {
                    report.check_expression(engine, station_id, &format!("rates[{}]", index), rate);
                }
                let constants: Option<Vec<f64>> =
                    rates.iter().map(|rate| engine.constant_value(rate)).collect();
                if let Some(constants) = constants {
                    if constants.iter().all(|rate| *rate <= 0.0) {
                        report.warning(ConfigurationWarning::AllChanceWeightsZero {
                            station: station_id.to_string(),
                        });
                    }
                }
            }
            DecideMode::Condition { conditions } => {
                // The last edge is the else case, its condition is never read
                for (index, condition) in conditions.iter().enumerate().take(edge_count - 1) {
                    report.check_expression(
                        engine,
                        station_id,
                        &format!("conditions[{}]", index),
                        condition,
                    );
                }
            }
            DecideMode::ClientType { client_types } => {
                for (index, types) in client_types.iter().enumerate().take(edge_count - 1) {
                    if types.iter().all(|name| name.trim().is_empty()) {
                        report.error(ConfigurationError::OutOfRange {
                            station: station_id.to_string(),
                            field: format!("clientTypes[{}]", index),
                            value: "no client type".to_string(),
                        });
                    }
                }
            }
            DecideMode::KeyValue {
                key,
                values,
                multi_text_values,
            } => {
                if key.trim().is_empty() {
                    report.error(ConfigurationError::OutOfRange {
                        station: station_id.to_string(),
                        field: "key".to_string(),
                        value: "empty key".to_string(),
                    });
                }
                // A blank entry would only match clients missing the key
                for (index, value) in values.iter().enumerate().take(edge_count - 1) {
                    if literals(value, *multi_text_values).next().is_none() {
                        report.error(ConfigurationError::OutOfRange {
                            station: station_id.to_string(),
                            field: format!("values[{}]", index),
                            value: "no value".to_string(),
                        });
                    }
                }
            }
            DecideMode::Sequence { .. }
            | DecideMode::ShortestQueueNextStation
            | DecideMode::ShortestQueueProcessStation
            | DecideMode::MinClientsNextStation
            | DecideMode::MinClientsProcessStation
            | DecideMode::LongestQueueNextStation
            | DecideMode::LongestQueueProcessStation
            | DecideMode::MaxClientsNextStation
            | DecideMode::MaxClientsProcessStation => {}
        }
        if let Err(error) = self.check_ranges(station_id) {
            report.error(error);
        }
    }

    fn check_ranges(&self, station_id: &str) -> Result<(), ConfigurationError> {
        if let DecideMode::Sequence { multiplicities } = &self.decision {
            if let Some(index) = multiplicities.iter().position(|m| *m == 0) {
                return Err(ConfigurationError::OutOfRange {
                    station: station_id.to_string(),
                    field: format!("multiplicities[{}]", index),
                    value: "0".to_string(),
                });
            }
        }
        Ok(())
    }

    fn reconcile(&mut self) {
        self.reconcile_parameters();
    }

    fn rename_client_type(&mut self, old: &str, new: &str) {
        if let DecideMode::ClientType { client_types } = &mut self.decision {
            for name in client_types.iter_mut().flatten() {
                if name.eq_ignore_ascii_case(old) {
                    *name = new.to_string();
                }
            }
        }
        for name in self.new_client_types.iter_mut().flatten() {
            if name.eq_ignore_ascii_case(old) {
                *name = new.to_string();
            }
        }
    }

    fn as_decide(&self) -> Option<&Decide> {
        Some(self)
    }

    fn as_decide_mut(&mut self) -> Option<&mut Decide> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Calculator;
    use crate::simulator::metrics::MetricsTable;

    fn decide_with_edges(decision: DecideMode, edges: usize) -> Decide {
        let mut decide = Decide::new(DecideMode::ShortestQueueNextStation);
        for index in 0..edges {
            decide.add_edge_out(&format!("edge-{}", index));
        }
        decide.set_decision(decision);
        decide
    }

    fn select(decide: &Decide, client: &Client, metrics: &MetricsTable, stations: &[String]) -> Result<usize, RuntimeDataError> {
        let services = Services::default();
        let context = DecisionContext {
            station_id: "decide-01",
            client,
            services: &services,
            engine: &Calculator,
            metrics,
            metric_stations: stations,
        };
        decide
            .select_outgoing_edge(&context, &mut RoutingState::default())
            .map(|routing| routing.edge_index)
    }

    #[test]
    fn adding_edges_pads_parameters_with_defaults() {
        let decide = decide_with_edges(DecideMode::chance(&["3"]), 3);
        assert_eq!(decide.decision(), &DecideMode::chance(&["3", "1", "1"]));
        assert_eq!(decide.new_client_types.len(), 3);
    }

    #[test]
    fn removing_an_edge_removes_its_parameter() {
        let mut decide = decide_with_edges(DecideMode::sequence(&[2, 1, 3]), 3);
        decide.set_new_client_type(2, Some(" Express "));
        decide.remove_edge("edge-1");
        assert_eq!(decide.decision(), &DecideMode::sequence(&[2, 3]));
        assert_eq!(decide.new_client_type(1), Some("Express"));
    }

    #[test]
    fn condition_falls_through_to_else_edge() {
        let decide = decide_with_edges(DecideMode::condition(&["x>10", "x>5", ""]), 3);
        let metrics = MetricsTable::default();
        let client = Client::new("A").with_attribute("x", 3.0);
        assert_eq!(select(&decide, &client, &metrics, &[]).unwrap(), 2);
        let client = Client::new("A").with_attribute("x", 7.0);
        assert_eq!(select(&decide, &client, &metrics, &[]).unwrap(), 1);
    }

    #[test]
    fn client_type_matching_ignores_case() {
        let decide = decide_with_edges(
            DecideMode::ClientType {
                client_types: vec![vec!["Gold".into(), "Silver".into()], vec!["Bronze".into()], vec![]],
            },
            3,
        );
        let metrics = MetricsTable::default();
        assert_eq!(select(&decide, &Client::new("silver"), &metrics, &[]).unwrap(), 0);
        assert_eq!(select(&decide, &Client::new("Bronze"), &metrics, &[]).unwrap(), 1);
        assert_eq!(select(&decide, &Client::new("Tin"), &metrics, &[]).unwrap(), 2);
    }

    #[test]
    fn key_value_splits_multi_values() {
        let mut decide = decide_with_edges(
            DecideMode::KeyValue {
                key: "region".into(),
                values: vec!["north;east".into(), "south".into(), String::new()],
                multi_text_values: true,
            },
            3,
        );
        let metrics = MetricsTable::default();
        let east = Client::new("A").with_text_property("region", "east");
        let west = Client::new("A").with_text_property("region", "west");
        assert_eq!(select(&decide, &east, &metrics, &[]).unwrap(), 0);
        assert_eq!(select(&decide, &west, &metrics, &[]).unwrap(), 2);
        decide.set_decision(DecideMode::KeyValue {
            key: "region".into(),
            values: vec!["north;east".into(), "south".into()],
            multi_text_values: false,
        });
        assert_eq!(select(&decide, &east, &metrics, &[]).unwrap(), 2);
    }

    #[test]
    fn metric_rules_apply_tie_break() {
        let mut decide = decide_with_edges(DecideMode::ShortestQueueNextStation, 3);
        let mut metrics = MetricsTable::default();
        metrics.set("a", 2, 3);
        metrics.set("b", 1, 4);
        metrics.set("c", 1, 1);
        let stations: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let client = Client::new("A");
        assert_eq!(select(&decide, &client, &metrics, &stations).unwrap(), 1);
        decide.set_tie_break(TieBreak::Last);
        assert_eq!(select(&decide, &client, &metrics, &stations).unwrap(), 2);
        decide.set_decision(DecideMode::MaxClientsNextStation);
        assert_eq!(select(&decide, &client, &metrics, &stations).unwrap(), 1);
    }

    #[test]
    fn missing_metric_is_a_runtime_error() {
        let decide = decide_with_edges(DecideMode::LongestQueueNextStation, 2);
        let mut metrics = MetricsTable::default();
        metrics.set("a", 2, 3);
        let stations: Vec<String> = vec!["a".into(), "b".into()];
        assert_eq!(
            select(&decide, &Client::new("A"), &metrics, &stations).unwrap_err(),
            RuntimeDataError::MetricUnavailable {
                station: "b".into(),
                metric: "queueLength".into()
            }
        );
    }

    #[test]
    fn all_zero_rates_are_reported_not_guessed() {
        let decide = decide_with_edges(DecideMode::chance(&["0", "-1"]), 2);
        let metrics = MetricsTable::default();
        assert_eq!(
            select(&decide, &Client::new("A"), &metrics, &[]).unwrap_err(),
            RuntimeDataError::NoPositiveWeight("decide-01".into())
        );
        let mut report = ValidationReport::default();
        decide.validate("decide-01", &Calculator, &mut report);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![ConfigurationWarning::AllChanceWeightsZero {
                station: "decide-01".into()
            }]
        );
    }

    #[test]
    fn validation_flags_malformed_conditions_but_not_the_else_edge() {
        let decide = decide_with_edges(DecideMode::condition(&["x>", "", "anything("]), 3);
        let mut report = ValidationReport::default();
        decide.validate("decide-01", &Calculator, &mut report);
        let fields: Vec<String> = report
            .errors
            .iter()
            .filter_map(|error| match error {
                ConfigurationError::MalformedExpression { field, .. } => Some(field.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec!["conditions[0]", "conditions[1]"]);
    }

    #[test]
    fn zero_multiplicity_is_out_of_range() {
        let decide = decide_with_edges(DecideMode::sequence(&[1, 0]), 2);
        assert!(matches!(
            decide.check_ranges("decide-01"),
            Err(ConfigurationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn no_outgoing_edges_is_a_configuration_error() {
        let decide = Decide::new(DecideMode::chance::<&str>(&[]));
        let mut report = ValidationReport::default();
        decide.validate("decide-01", &Calculator, &mut report);
        assert_eq!(
            report.errors,
            vec![ConfigurationError::NoOutgoingEdges {
                station: "decide-01".into()
            }]
        );
    }

    #[test]
    fn blank_key_values_are_out_of_range_except_the_else_edge() {
        let decide = decide_with_edges(
            DecideMode::KeyValue {
                key: "region".into(),
                values: vec!["north".into(), " ; ".into()],
                multi_text_values: true,
            },
            4,
        );
        let mut report = ValidationReport::default();
        decide.validate("decide-01", &Calculator, &mut report);
        assert_eq!(
            report.errors,
            vec![
                ConfigurationError::OutOfRange {
                    station: "decide-01".into(),
                    field: "values[1]".into(),
                    value: "no value".into()
                },
                ConfigurationError::OutOfRange {
                    station: "decide-01".into(),
                    field: "values[2]".into(),
                    value: "no value".into()
                },
            ]
        );
    }

    #[test]
    fn blank_key_values_never_match_a_missing_property() {
        let decide = decide_with_edges(
            DecideMode::KeyValue {
                key: "region".into(),
                values: vec!["north;".into(), "".into(), "south".into()],
                multi_text_values: true,
            },
            4,
        );
        let metrics = MetricsTable::default();
        assert_eq!(select(&decide, &Client::new("A"), &metrics, &[]).unwrap(), 3);
        let south = Client::new("A").with_text_property("region", "south");
        assert_eq!(select(&decide, &south, &metrics, &[]).unwrap(), 2);
    }

    #[test]
    fn every_metric_mode_reads_its_own_rule() {
        let mut metrics = MetricsTable::default();
        metrics.set("a", 1, 5);
        metrics.set("b", 3, 2);
        let stations: Vec<String> = vec!["a".into(), "b".into()];
        let client = Client::new("A");
        let cases = [
            (DecideMode::ShortestQueueNextStation, 0),
            (DecideMode::ShortestQueueProcessStation, 0),
            (DecideMode::MinClientsNextStation, 1),
            (DecideMode::MinClientsProcessStation, 1),
            (DecideMode::LongestQueueNextStation, 1),
            (DecideMode::LongestQueueProcessStation, 1),
            (DecideMode::MaxClientsNextStation, 0),
            (DecideMode::MaxClientsProcessStation, 0),
        ];
        for (mode, expected) in cases.iter() {
            let decide = decide_with_edges(mode.clone(), 2);
            assert!(mode.metric_rule().is_some());
            assert_eq!(
                select(&decide, &client, &metrics, &stations).unwrap(),
                *expected,
                "{:?}",
                mode
            );
        }
        assert_eq!(DecideMode::sequence(&[1]).metric_rule(), None);
    }

    #[test]
    fn renaming_a_client_type_ignores_case() {
        let mut decide = decide_with_edges(
            DecideMode::ClientType {
                client_types: vec![vec!["GOLD".into()], vec![]],
            },
            2,
        );
        decide.set_new_client_type(1, Some("gold"));
        decide.rename_client_type("Gold", "Platinum");
        assert_eq!(
            decide.decision(),
            &DecideMode::ClientType {
                client_types: vec![vec!["Platinum".into()], vec![]]
            }
        );
        assert_eq!(decide.new_client_type(1), Some("Platinum"));
    }
}
