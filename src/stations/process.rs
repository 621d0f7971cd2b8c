use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::batch::BatchPolicy;
use super::resources::{first_available, ResourceAlternative};
use super::station_trait::{Connectable, SerializableStation, StationBehavior};
use crate::expression::ExpressionEngine;
use crate::input_modeling::distribution_system::{field_name, lookup, rename_key};
use crate::input_modeling::{ContinuousRandomVariable, DistributionSystem, SetupTimes, TimeSource};
use crate::simulator::client::{Client, ClientEnvironment};
use crate::simulator::metrics::ResourceAvailability;
use crate::simulator::Services;
use crate::utils::errors::{
    ConfigurationError, ConfigurationWarning, RuntimeDataError, ValidationReport,
};

use simflow_derive::SerializableStation;

/// Client priority formula meaning "longest waiting first".
pub const DEFAULT_CLIENT_PRIORITY: &str = "w";
/// Resource priority formula of a station that does not compete for
/// resources.
pub const DEFAULT_RESOURCE_PRIORITY: &str = "1";
const DEFAULT_COSTS: &str = "0";

/// The Process station serves clients with resources.  Clients wait until
/// one of the resource alternatives is available, optionally give up after a
/// waiting tolerance (leaving along the cancel edge), are served in batches
/// within `[batch_min, batch_max]`, and leave along the success edge.
/// Setup times depend on the types of consecutive clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SerializableStation)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(default)]
    edges_in: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge_cancel: Option<String>,
    #[serde(default)]
    time_base: TimeBase,
    #[serde(default)]
    process_time_type: ProcessTimeType,
    #[serde(default = "default_batch_size")]
    batch_min: u32,
    #[serde(default = "default_batch_size")]
    batch_max: u32,
    #[serde(default)]
    campaign_mode: bool,
    #[serde(default = "default_working")]
    working: DistributionSystem,
    #[serde(default)]
    post_processing: DistributionSystem,
    #[serde(default)]
    cancel: DistributionSystem,
    #[serde(default)]
    setup_times: SetupTimes,
    #[serde(default)]
    can_cancel_in_setup_time: bool,
    #[serde(default)]
    priority: BTreeMap<String, String>,
    #[serde(default)]
    resources: Vec<ResourceAlternative>,
    #[serde(default)]
    resource_check_in_random_order: bool,
    #[serde(default = "default_resource_priority")]
    resource_priority: String,
    #[serde(default)]
    costs: StationCosts,
}

fn default_batch_size() -> u32 {
    1
}

fn default_working() -> DistributionSystem {
    DistributionSystem::new(Some(TimeSource::Distribution(
        ContinuousRandomVariable::exponential_with_mean(50.0),
    )))
}

fn default_resource_priority() -> String {
    DEFAULT_RESOURCE_PRIORITY.to_string()
}

fn default_costs() -> String {
    DEFAULT_COSTS.to_string()
}

/// The unit of all times configured on a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeBase {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl Default for TimeBase {
    fn default() -> Self {
        TimeBase::Seconds
    }
}

impl TimeBase {
    /// Seconds per unit.
    pub fn multiplier(&self) -> f64 {
        match self {
            TimeBase::Seconds => 1.0,
            TimeBase::Minutes => 60.0,
            TimeBase::Hours => 3600.0,
            TimeBase::Days => 86400.0,
        }
    }
}

/// How the busy time of a client is booked in the client statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessTimeType {
    Waiting,
    Transfer,
    Process,
    Nothing,
}

impl Default for ProcessTimeType {
    fn default() -> Self {
        ProcessTimeType::Process
    }
}

/// Residence time of a client split by statistics category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeShares {
    pub waiting: f64,
    pub transfer: f64,
    pub process: f64,
}

impl ProcessTimeType {
    /// Books the waiting time and the busy (setup plus service) time of a
    /// client.
    pub fn account(&self, waiting: f64, busy: f64) -> TimeShares {
        match self {
            ProcessTimeType::Waiting => TimeShares {
                waiting: waiting + busy,
                ..TimeShares::default()
            },
            ProcessTimeType::Transfer => TimeShares {
                waiting,
                transfer: busy,
                ..TimeShares::default()
            },
            ProcessTimeType::Process => TimeShares {
                waiting,
                process: busy,
                ..TimeShares::default()
            },
            ProcessTimeType::Nothing => TimeShares {
                waiting,
                ..TimeShares::default()
            },
        }
    }
}

/// Cost formulas of a Process station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationCosts {
    #[serde(default = "default_costs")]
    pub per_client: String,
    #[serde(default = "default_costs")]
    pub per_service_second: String,
    #[serde(default = "default_costs")]
    pub per_post_processing_second: String,
}

impl Default for StationCosts {
    fn default() -> Self {
        Self {
            per_client: default_costs(),
            per_service_second: default_costs(),
            per_post_processing_second: default_costs(),
        }
    }
}

fn is_default_costs(expression: &str) -> bool {
    let expression = expression.trim();
    expression.is_empty() || expression == DEFAULT_COSTS
}

/// How a client leaves a Process station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOutcome {
    Completed,
    Cancelled,
}

/// Which time of the station to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeKind {
    Working,
    PostProcessing,
    Cancel,
}

impl Default for Process {
    fn default() -> Self {
        Self {
            edges_in: Vec::new(),
            edge_success: None,
            edge_cancel: None,
            time_base: TimeBase::default(),
            process_time_type: ProcessTimeType::default(),
            batch_min: default_batch_size(),
            batch_max: default_batch_size(),
            campaign_mode: false,
            working: default_working(),
            post_processing: DistributionSystem::default(),
            cancel: DistributionSystem::default(),
            setup_times: SetupTimes::default(),
            can_cancel_in_setup_time: false,
            priority: BTreeMap::new(),
            resources: Vec::new(),
            resource_check_in_random_order: false,
            resource_priority: default_resource_priority(),
            costs: StationCosts::default(),
        }
    }
}

impl Process {
    pub fn new(resources: Vec<ResourceAlternative>) -> Self {
        Self {
            resources,
            ..Self::default()
        }
    }

    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    pub fn set_time_base(&mut self, time_base: TimeBase) {
        self.time_base = time_base;
    }

    pub fn process_time_type(&self) -> ProcessTimeType {
        self.process_time_type
    }

    pub fn set_process_time_type(&mut self, process_time_type: ProcessTimeType) {
        self.process_time_type = process_time_type;
    }

    pub fn batch_bounds(&self) -> (u32, u32) {
        (self.batch_min, self.batch_max)
    }

    /// Sets the batch bounds.  Both must be at least 1 and the maximum must
    /// not be below the minimum.
    pub fn set_batch_bounds(
        &mut self,
        station_id: &str,
        minimum: u32,
        maximum: u32,
    ) -> Result<(), ConfigurationError> {
        check_batch_bounds(station_id, minimum, maximum)?;
        self.batch_min = minimum;
        self.batch_max = maximum;
        Ok(())
    }

    pub fn campaign_mode(&self) -> bool {
        self.campaign_mode
    }

    pub fn set_campaign_mode(&mut self, campaign_mode: bool) {
        self.campaign_mode = campaign_mode;
    }

    pub fn working(&self) -> &DistributionSystem {
        &self.working
    }

    pub fn working_mut(&mut self) -> &mut DistributionSystem {
        &mut self.working
    }

    pub fn post_processing(&self) -> &DistributionSystem {
        &self.post_processing
    }

    pub fn post_processing_mut(&mut self) -> &mut DistributionSystem {
        &mut self.post_processing
    }

    pub fn cancel(&self) -> &DistributionSystem {
        &self.cancel
    }

    pub fn cancel_mut(&mut self) -> &mut DistributionSystem {
        &mut self.cancel
    }

    pub fn setup_times(&self) -> &SetupTimes {
        &self.setup_times
    }

    pub fn setup_times_mut(&mut self) -> &mut SetupTimes {
        &mut self.setup_times
    }

    pub fn set_can_cancel_in_setup_time(&mut self, can_cancel: bool) {
        self.can_cancel_in_setup_time = can_cancel;
    }

    /// Waiting tolerance can expire during setup only if the flag is set, a
    /// waiting tolerance is configured and setup times are in use.
    pub fn may_cancel_in_setup_time(&self) -> bool {
        self.can_cancel_in_setup_time && !self.cancel.is_empty() && self.setup_times.is_active()
    }

    /// The priority formula for a client type; `"w"` unless overridden.
    pub fn client_priority(&self, client_type: &str) -> &str {
        lookup(&self.priority, client_type)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CLIENT_PRIORITY)
    }

    pub fn set_client_priority(&mut self, client_type: &str, formula: &str) {
        if formula.trim() == DEFAULT_CLIENT_PRIORITY {
            self.priority.remove(client_type);
        } else {
            self.priority
                .insert(client_type.to_string(), formula.to_string());
        }
    }

    pub fn resources(&self) -> &[ResourceAlternative] {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Vec<ResourceAlternative> {
        &mut self.resources
    }

    pub fn resource_check_in_random_order(&self) -> bool {
        self.resource_check_in_random_order
    }

    pub fn set_resource_check_in_random_order(&mut self, random_order: bool) {
        self.resource_check_in_random_order = random_order;
    }

    pub fn resource_priority(&self) -> &str {
        &self.resource_priority
    }

    pub fn set_resource_priority(&mut self, formula: &str) {
        self.resource_priority = formula.to_string();
    }

    pub fn cost_formulas(&self) -> &StationCosts {
        &self.costs
    }

    pub fn costs_mut(&mut self) -> &mut StationCosts {
        &mut self.costs
    }

    pub fn edge_success(&self) -> Option<&str> {
        self.edge_success.as_deref()
    }

    pub fn edge_cancel(&self) -> Option<&str> {
        self.edge_cancel.as_deref()
    }

    /// The edge a client leaves along.  Cancellation falls back to nothing
    /// when no cancel edge exists.
    pub fn outgoing_edge(&self, outcome: ServiceOutcome) -> Option<&str> {
        match outcome {
            ServiceOutcome::Completed => self.edge_success(),
            ServiceOutcome::Cancelled => self.edge_cancel(),
        }
    }

    fn distribution_system(&self, kind: TimeKind) -> &DistributionSystem {
        match kind {
            TimeKind::Working => &self.working,
            TimeKind::PostProcessing => &self.post_processing,
            TimeKind::Cancel => &self.cancel,
        }
    }

    /// Resolves, draws, clamps to zero and scales to seconds.
    fn time(
        &self,
        kind: TimeKind,
        station_id: &str,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<Option<f64>, RuntimeDataError> {
        let source = match self.distribution_system(kind).get(&client.client_type) {
            Some(source) => source,
            None => return Ok(None),
        };
        self.scaled(source, station_id, client, services, engine)
            .map(Some)
    }

    fn scaled(
        &self,
        source: &TimeSource,
        station_id: &str,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<f64, RuntimeDataError> {
        let environment = ClientEnvironment::new(client, services);
        let value = source.value(station_id, engine, &environment, &services.global_rng())?;
        Ok(value.max(0.0) * self.time_base.multiplier())
    }

    /// Service time of a client in seconds.
    pub fn service_time(
        &self,
        station_id: &str,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<f64, RuntimeDataError> {
        self.time(TimeKind::Working, station_id, client, services, engine)?
            .ok_or_else(|| RuntimeDataError::NoWorkingTime(station_id.to_string()))
    }

    /// Post-processing time in seconds; zero when none is configured.
    pub fn post_processing_time(
        &self,
        station_id: &str,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<f64, RuntimeDataError> {
        Ok(self
            .time(TimeKind::PostProcessing, station_id, client, services, engine)?
            .unwrap_or(0.0))
    }

    /// Waiting tolerance in seconds; `None` means the client waits forever.
    pub fn waiting_tolerance(
        &self,
        station_id: &str,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<Option<f64>, RuntimeDataError> {
        self.time(TimeKind::Cancel, station_id, client, services, engine)
    }

    /// Setup time in seconds before serving `client` after a client of type
    /// `previous_type`.  The first client, and any pair without an entry,
    /// needs no setup.
    pub fn setup_time(
        &self,
        station_id: &str,
        previous_type: Option<&str>,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<f64, RuntimeDataError> {
        let source = match previous_type
            .and_then(|previous| self.setup_times.get(previous, &client.client_type))
        {
            Some(source) => source,
            None => return Ok(0.0),
        };
        self.scaled(source, station_id, client, services, engine)
    }

    /// Index of the resource alternative to use, or `None` if the client has
    /// to keep waiting.
    pub fn select_resource_alternative(
        &self,
        availability: &dyn ResourceAvailability,
        services: &Services,
    ) -> Option<usize> {
        if self.resources.is_empty() {
            return None;
        }
        let start = if self.resource_check_in_random_order && self.resources.len() > 1 {
            services.index(self.resources.len())
        } else {
            0
        };
        let selected = first_available(&self.resources, availability, start);
        trace!(start, ?selected, "resource alternative check");
        selected
    }

    /// Size of the next batch, if one can start.  Sizes outside the station
    /// bounds are never committed.
    pub fn form_batch(&self, waiting: usize, policy: &dyn BatchPolicy) -> Option<usize> {
        policy
            .batch_size(waiting, self.batch_min, self.batch_max)
            .filter(|size| {
                *size <= waiting
                    && *size >= self.batch_min as usize
                    && *size <= self.batch_max as usize
            })
    }

    /// Picks the next client from the queue: the highest priority score,
    /// first come first served among equal scores.  In campaign mode clients
    /// of the previously served type are preferred.
    pub fn select_next_client(
        &self,
        station_id: &str,
        waiting: &[Client],
        previous_type: Option<&str>,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<Option<usize>, RuntimeDataError> {
        if waiting.is_empty() {
            return Ok(None);
        }
        let first_come_first_served = self.priority.is_empty();
        if first_come_first_served && !self.campaign_mode {
            return Ok(Some(0));
        }
        let scores = waiting
            .iter()
            .map(|client| {
                if first_come_first_served {
                    return Ok(0.0);
                }
                let formula = self.client_priority(&client.client_type);
                let environment = ClientEnvironment::new(client, services);
                engine.evaluate_number(formula, &environment).map_err(|source| {
                    RuntimeDataError::EvaluationFailed {
                        station: station_id.to_string(),
                        expression: formula.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<f64>, RuntimeDataError>>()?;
        if self.campaign_mode {
            if let Some(previous) = previous_type {
                let campaign = (0..waiting.len())
                    .filter(|index| waiting[*index].client_type.eq_ignore_ascii_case(previous));
                if let Some(index) = highest_score(&scores, campaign) {
                    return Ok(Some(index));
                }
            }
        }
        Ok(highest_score(&scores, 0..waiting.len()))
    }

    /// Costs of serving one client: the flat per-client formula plus the
    /// per-second formulas times the service and post-processing seconds.
    pub fn costs(
        &self,
        station_id: &str,
        service_seconds: f64,
        post_processing_seconds: f64,
        client: &Client,
        services: &Services,
        engine: &dyn ExpressionEngine,
    ) -> Result<f64, RuntimeDataError> {
        let environment = ClientEnvironment::new(client, services);
        let evaluate = |formula: &str| -> Result<f64, RuntimeDataError> {
            if is_default_costs(formula) {
                return Ok(0.0);
            }
            engine
                .evaluate_number(formula, &environment)
                .map_err(|source| RuntimeDataError::EvaluationFailed {
                    station: station_id.to_string(),
                    expression: formula.to_string(),
                    source,
                })
        };
        Ok(evaluate(&self.costs.per_client)?
            + evaluate(&self.costs.per_service_second)? * service_seconds
            + evaluate(&self.costs.per_post_processing_second)? * post_processing_seconds)
    }

    fn check_expressions(
        &self,
        station_id: &str,
        engine: &dyn ExpressionEngine,
        report: &mut ValidationReport,
    ) {
        let systems = [
            ("working", &self.working),
            ("postProcessing", &self.post_processing),
            ("cancel", &self.cancel),
        ];
        for (name, system) in systems.iter() {
            for (client_type, expression) in system.expressions() {
                let field = field_name(name, client_type);
                report.check_expression(engine, station_id, &field, expression);
            }
        }
        for (previous, next, source) in self.setup_times.iter() {
            if let Some(expression) = source.expression() {
                let field = format!("setupTimes[{}][{}]", previous, next);
                report.check_expression(engine, station_id, &field, expression);
            }
        }
        for (client_type, formula) in self.priority.iter() {
            if formula.trim() != DEFAULT_CLIENT_PRIORITY {
                let field = format!("priority[{}]", client_type);
                report.check_expression(engine, station_id, &field, formula);
            }
        }
        if self.resource_priority.trim() != DEFAULT_RESOURCE_PRIORITY {
            report.check_expression(
                engine,
                station_id,
                "resourcePriority",
                &self.resource_priority,
            );
        }
        let costs = [
            ("costs.perClient", &self.costs.per_client),
            ("costs.perServiceSecond", &self.costs.per_service_second),
            (
                "costs.perPostProcessingSecond",
                &self.costs.per_post_processing_second,
            ),
        ];
        for (field, formula) in costs.iter() {
            if !is_default_costs(formula) {
                report.check_expression(engine, station_id, field, formula);
            }
        }
    }
}

/// The earliest candidate with the highest score.
fn highest_score(scores: &[f64], candidates: impl Iterator<Item = usize>) -> Option<usize> {
    candidates.fold(None, |best, index| match best {
        Some(current) if scores[current] >= scores[index] => Some(current),
        _ => Some(index),
    })
}

fn check_batch_bounds(station_id: &str, minimum: u32, maximum: u32) -> Result<(), ConfigurationError> {
    if minimum < 1 {
        return Err(ConfigurationError::OutOfRange {
            station: station_id.to_string(),
            field: "batchMin".to_string(),
            value: minimum.to_string(),
        });
    }
    if maximum < minimum {
        return Err(ConfigurationError::OutOfRange {
            station: station_id.to_string(),
            field: "batchMax".to_string(),
            value: maximum.to_string(),
        });
    }
    Ok(())
}

impl Connectable for Process {
    fn edges_in(&self) -> &[String] {
        &self.edges_in
    }

    fn edges_out(&self) -> Vec<&str> {
        self.edge_success
            .iter()
            .chain(self.edge_cancel.iter())
            .map(String::as_str)
            .collect()
    }

    fn can_add_edge_out(&self) -> bool {
        self.edge_success.is_none() || self.edge_cancel.is_none()
    }

    /// The first outgoing edge is the success edge, the second the cancel
    /// edge.
    fn add_edge_out(&mut self, edge: &str) {
        if self.edge_success.is_none() {
            self.edge_success = Some(edge.to_string());
        } else if self.edge_cancel.is_none() {
            self.edge_cancel = Some(edge.to_string());
        }
    }

    fn add_edge_in(&mut self, edge: &str) {
        self.edges_in.push(edge.to_string());
    }

    /// Dropping the success edge drops the cancel edge with it, since a
    /// cancel edge never stands alone.
    fn remove_edge(&mut self, edge: &str) {
        self.edges_in.retain(|id| id != edge);
        if self.edge_success.as_deref() == Some(edge) {
            self.edge_success = None;
            self.edge_cancel = None;
        }
        if self.edge_cancel.as_deref() == Some(edge) {
            self.edge_cancel = None;
        }
    }
}

impl StationBehavior for Process {
    fn validate(
        &self,
        station_id: &str,
        engine: &dyn ExpressionEngine,
        report: &mut ValidationReport,
    ) {
        let station = || station_id.to_string();
        if self.edge_success.is_none() && self.edge_cancel.is_none() {
            report.error(ConfigurationError::NoOutgoingEdges { station: station() });
        }
        for error in self.range_errors(station_id) {
            report.error(error);
        }
        if self.campaign_mode && self.batch_max > 1 {
            report.error(ConfigurationError::IncompatibleOptions {
                station: station(),
                message: "campaign mode cannot be combined with batch service".to_string(),
            });
        }
        if self.setup_times.is_active() && self.batch_max > 1 {
            report.error(ConfigurationError::IncompatibleOptions {
                station: station(),
                message: "setup times cannot be combined with batch service".to_string(),
            });
        }
        if self.working.general().is_none() {
            report.error(ConfigurationError::MissingDistribution {
                station: station(),
                field: "working".to_string(),
            });
        }
        match (self.cancel.is_empty(), self.edge_cancel.is_some()) {
            (false, false) => report.error(ConfigurationError::IncompatibleOptions {
                station: station(),
                message: "a waiting tolerance needs a cancel edge".to_string(),
            }),
            (true, true) => report.error(ConfigurationError::IncompatibleOptions {
                station: station(),
                message: "a cancel edge needs a waiting tolerance".to_string(),
            }),
            _ => {}
        }
        if self.can_cancel_in_setup_time && !self.may_cancel_in_setup_time() {
            report.warning(ConfigurationWarning::IneffectiveOption {
                station: station(),
                option: "canCancelInSetupTime".to_string(),
                message: "needs a waiting tolerance and setup times".to_string(),
            });
        }
        if self.resources.is_empty() {
            report.error(ConfigurationError::NoResourceAlternative { station: station() });
        }
        for (index, alternative) in self.resources.iter().enumerate() {
            if alternative.is_empty() {
                report.error(ConfigurationError::OutOfRange {
                    station: station(),
                    field: format!("resources[{}]", index),
                    value: "no resource group".to_string(),
                });
            }
        }
        if self.resource_check_in_random_order && self.resources.len() < 2 {
            report.warning(ConfigurationWarning::IneffectiveOption {
                station: station(),
                option: "resourceCheckInRandomOrder".to_string(),
                message: "needs more than one resource alternative".to_string(),
            });
        }
        self.check_expressions(station_id, engine, report);
    }

    fn range_errors(&self, station_id: &str) -> Vec<ConfigurationError> {
        let mut errors: Vec<ConfigurationError> =
            check_batch_bounds(station_id, self.batch_min, self.batch_max)
                .err()
                .into_iter()
                .collect();
        for (index, alternative) in self.resources.iter().enumerate() {
            if let Some(group) = alternative.zero_count_group() {
                errors.push(ConfigurationError::OutOfRange {
                    station: station_id.to_string(),
                    field: format!("resources[{}][{}]", index, group),
                    value: "0".to_string(),
                });
            }
        }
        if let (Some(cancel), None) = (&self.edge_cancel, &self.edge_success) {
            errors.push(ConfigurationError::OutOfRange {
                station: station_id.to_string(),
                field: "edgeCancel".to_string(),
                value: cancel.clone(),
            });
        }
        errors.extend(self.working.check(station_id, "working"));
        errors.extend(self.post_processing.check(station_id, "postProcessing"));
        errors.extend(self.cancel.check(station_id, "cancel"));
        errors.extend(self.setup_times.check(station_id));
        errors
    }

    fn rename_client_type(&mut self, old: &str, new: &str) {
        self.working.rename_client_type(old, new);
        self.post_processing.rename_client_type(old, new);
        self.cancel.rename_client_type(old, new);
        self.setup_times.rename_client_type(old, new);
        rename_key(&mut self.priority, old, new);
    }

    fn as_process(&self) -> Option<&Process> {
        Some(self)
    }

    fn as_process_mut(&mut self) -> Option<&mut Process> {
        Some(self)
    }
}
