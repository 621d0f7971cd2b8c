use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::distribution_system::{lookup, rename_key, TimeSource};
use crate::utils::errors::ConfigurationError;

/// Changeover times between consecutive clients, keyed by the type of the
/// previous client and then the type of the next client.  The matrix is
/// asymmetric: `(A, B)` and `(B, A)` are independent entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupTimes {
    entries: BTreeMap<String, BTreeMap<String, TimeSource>>,
}

impl SetupTimes {
    /// True as soon as any pair has an entry.
    pub fn is_active(&self) -> bool {
        self.entries.values().any(|row| !row.is_empty())
    }

    pub fn get(&self, previous: &str, next: &str) -> Option<&TimeSource> {
        lookup(&self.entries, previous).and_then(|row| lookup(row, next))
    }

    pub fn set<S: Into<TimeSource>>(&mut self, previous: &str, next: &str, source: S) {
        self.entries
            .entry(previous.to_string())
            .or_default()
            .insert(next.to_string(), source.into());
    }

    pub fn remove(&mut self, previous: &str, next: &str) -> Option<TimeSource> {
        let row = self.entries.get_mut(previous)?;
        let removed = row.remove(next);
        if row.is_empty() {
            self.entries.remove(previous);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates `(previous, next, source)` triples in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &TimeSource)> {
        self.entries.iter().flat_map(|(previous, row)| {
            row.iter()
                .map(move |(next, source)| (previous.as_str(), next.as_str(), source))
        })
    }

    /// Checks the distribution parameters of every pair, naming each field
    /// `setupTimes[previous][next]`.
    pub fn check(&self, station: &str) -> Vec<ConfigurationError> {
        self.iter()
            .filter_map(|(previous, next, source)| {
                source
                    .check(station, &format!("setupTimes[{}][{}]", previous, next))
                    .err()
            })
            .collect()
    }

    /// Renames a client type on both axes, ignoring ASCII case.
    pub fn rename_client_type(&mut self, old: &str, new: &str) {
        rename_key(&mut self.entries, old, new);
        for row in self.entries.values_mut() {
            rename_key(row, old, new);
        }
    }
}
