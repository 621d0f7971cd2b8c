use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::dynamic_rng::DynRng;
use super::random_variable::Continuous;
use crate::expression::{Environment, ExpressionEngine};
use crate::utils::errors::{ConfigurationError, RuntimeDataError};

/// A time is either drawn from a distribution or computed by a formula.
/// Setting one replaces the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeSource {
    Distribution(Continuous),
    Expression(String),
}

impl TimeSource {
    /// Samples the distribution or evaluates the formula.  The raw value is
    /// returned; callers clamp and scale.
    pub fn value(
        &self,
        station: &str,
        engine: &dyn ExpressionEngine,
        environment: &dyn Environment,
        rng: &DynRng,
    ) -> Result<f64, RuntimeDataError> {
        match self {
            TimeSource::Distribution(distribution) => distribution
                .random_variate(rng)
                .map_err(|error| RuntimeDataError::Sampling {
                    station: station.to_string(),
                    message: error.to_string(),
                }),
            TimeSource::Expression(expression) => engine
                .evaluate_number(expression, environment)
                .map_err(|source| RuntimeDataError::EvaluationFailed {
                    station: station.to_string(),
                    expression: expression.clone(),
                    source,
                }),
        }
    }

    pub fn expression(&self) -> Option<&str> {
        match self {
            TimeSource::Expression(expression) => Some(expression),
            TimeSource::Distribution(_) => None,
        }
    }

    /// Rejects distribution parameters that cannot be sampled.  Formulas are
    /// parse-checked by the expression engine instead.
    pub fn check(&self, station: &str, field: &str) -> Result<(), ConfigurationError> {
        match self {
            TimeSource::Distribution(distribution) => {
                distribution
                    .check()
                    .map_err(|error| ConfigurationError::OutOfRange {
                        station: station.to_string(),
                        field: field.to_string(),
                        value: error.to_string(),
                    })
            }
            TimeSource::Expression(_) => Ok(()),
        }
    }
}

pub(crate) fn field_name(name: &str, client_type: Option<&str>) -> String {
    match client_type {
        Some(client_type) => format!("{}[{}]", name, client_type),
        None => name.to_string(),
    }
}

impl From<Continuous> for TimeSource {
    fn from(distribution: Continuous) -> Self {
        TimeSource::Distribution(distribution)
    }
}

/// Looks up a client type exactly, then ignoring ASCII case.
pub(crate) fn lookup<'a, V>(map: &'a BTreeMap<String, V>, client_type: &str) -> Option<&'a V> {
    map.get(client_type).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(client_type))
            .map(|(_, value)| value)
    })
}

/// Moves every entry whose key matches `old`, ignoring ASCII case, to
/// `new`.  When several keys match, the exact match wins.
pub(crate) fn rename_key<V>(map: &mut BTreeMap<String, V>, old: &str, new: &str) {
    let matching: Vec<String> = map
        .keys()
        .filter(|key| key.eq_ignore_ascii_case(old))
        .cloned()
        .collect();
    let mut renamed = None;
    for key in matching {
        if let Some(value) = map.remove(&key) {
            if renamed.is_none() || key == old {
                renamed = Some(value);
            }
        }
    }
    if let Some(value) = renamed {
        map.insert(new.to_string(), value);
    }
}

/// A general time source plus per-client-type overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    general: Option<TimeSource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    by_client_type: BTreeMap<String, TimeSource>,
}

impl DistributionSystem {
    pub fn new(general: Option<TimeSource>) -> Self {
        Self {
            general,
            by_client_type: BTreeMap::new(),
        }
    }

    pub fn general(&self) -> Option<&TimeSource> {
        self.general.as_ref()
    }

    pub fn set_general(&mut self, source: Option<TimeSource>) {
        self.general = source;
    }

    pub fn by_client_type(&self) -> &BTreeMap<String, TimeSource> {
        &self.by_client_type
    }

    /// Installs an override, replacing any distribution or formula already
    /// configured for the client type.
    pub fn set<S: Into<TimeSource>>(&mut self, client_type: &str, source: S) {
        self.by_client_type
            .insert(client_type.to_string(), source.into());
    }

    pub fn remove(&mut self, client_type: &str) -> Option<TimeSource> {
        self.by_client_type.remove(client_type)
    }

    /// Resolution order: exact client type, case-insensitive client type,
    /// general fallback.  `None` means nothing is configured.
    pub fn get(&self, client_type: &str) -> Option<&TimeSource> {
        lookup(&self.by_client_type, client_type).or_else(|| self.general.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_none() && self.by_client_type.is_empty()
    }

    /// Every configured source, keyed by the client type it applies to
    /// (`None` for the general fallback).
    pub fn entries(&self) -> impl Iterator<Item = (Option<&str>, &TimeSource)> {
        self.general.iter().map(|source| (None, source)).chain(
            self.by_client_type
                .iter()
                .map(|(client_type, source)| (Some(client_type.as_str()), source)),
        )
    }

    /// Every formula, keyed like `entries`.
    pub fn expressions(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.entries().filter_map(|(client_type, source)| {
            source.expression().map(|expression| (client_type, expression))
        })
    }

    /// Checks the parameters of every distribution.  Fields are named
    /// `name` for the general fallback and `name[clientType]` otherwise.
    pub fn check(&self, station: &str, name: &str) -> Vec<ConfigurationError> {
        self.entries()
            .filter_map(|(client_type, source)| {
                source.check(station, &field_name(name, client_type)).err()
            })
            .collect()
    }

    /// Renames the override of a client type.  Keys differing only in case
    /// are merged, as lookups already treat them as one.
    pub fn rename_client_type(&mut self, old: &str, new: &str) {
        rename_key(&mut self.by_client_type, old, new);
    }
}
