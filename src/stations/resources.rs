use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::simulator::metrics::ResourceAvailability;

/// One way of staffing a Process station: the number of units needed from
/// each resource group.  A client is served by the first alternative whose
/// every need can be met.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceAlternative {
    needs: BTreeMap<String, u32>,
}

impl ResourceAlternative {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, group: &str, count: u32) -> Self {
        self.needs.insert(group.to_string(), count);
        self
    }

    pub fn needs(&self) -> &BTreeMap<String, u32> {
        &self.needs
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    pub fn is_available(&self, availability: &dyn ResourceAvailability) -> bool {
        self.needs
            .iter()
            .all(|(group, count)| availability.available(group) >= *count as usize)
    }

    pub(crate) fn zero_count_group(&self) -> Option<&str> {
        self.needs
            .iter()
            .find(|(_, count)| **count == 0)
            .map(|(group, _)| group.as_str())
    }
}

/// Scans the alternatives cyclically from `start`, returning the index of
/// the first one that is available.
pub fn first_available(
    alternatives: &[ResourceAlternative],
    availability: &dyn ResourceAvailability,
    start: usize,
) -> Option<usize> {
    let count = alternatives.len();
    (0..count)
        .map(|offset| (start + offset) % count)
        .find(|index| alternatives[*index].is_available(availability))
}
