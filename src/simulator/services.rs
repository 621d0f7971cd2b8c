use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::input_modeling::dynamic_rng::{default_rng, DynRng};

/// The simulation runtime provides a random number generator, the
/// simulation clock, and the global variables of the model to station
/// configuration whenever a decision is evaluated.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    #[serde(skip, default = "default_rng")]
    pub(crate) global_rng: DynRng,
    pub(crate) global_time: f64,
    #[serde(default)]
    pub(crate) variables: BTreeMap<String, f64>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            global_rng: default_rng(),
            global_time: 0.0,
            variables: BTreeMap::new(),
        }
    }
}

impl Services {
    pub fn with_rng(global_rng: DynRng) -> Self {
        Self {
            global_rng,
            ..Self::default()
        }
    }

    pub fn global_rng(&self) -> DynRng {
        self.global_rng.clone()
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub fn set_global_time(&mut self, time: f64) {
        self.global_time = time;
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.variables.insert(name.to_string(), value);
    }

    /// A uniform draw from [0, 1) on the shared stream.
    pub(crate) fn uniform(&self) -> f64 {
        use rand::Rng;
        self.global_rng.borrow_mut().gen::<f64>()
    }

    /// A uniform index from [0, upper) on the shared stream.
    pub(crate) fn index(&self, upper: usize) -> usize {
        use rand::Rng;
        self.global_rng.borrow_mut().gen_range(0..upper)
    }
}
