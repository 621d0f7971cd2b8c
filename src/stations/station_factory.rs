use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;

use super::station_trait::StationBehavior;
use crate::utils::errors::ConfigurationError;

pub type StationConstructor =
    fn(serde_yaml::Value) -> Result<Box<dyn StationBehavior>, serde_yaml::Error>;

lazy_static! {
    static ref CONSTRUCTORS: Mutex<HashMap<&'static str, StationConstructor>> = {
        let mut m = HashMap::new();
        m.insert("Decide", super::Decide::from_value as StationConstructor);
        m.insert("Delay", super::Delay::from_value as StationConstructor);
        m.insert("Dispose", super::Dispose::from_value as StationConstructor);
        m.insert("Process", super::Process::from_value as StationConstructor);
        m.insert("Source", super::Source::from_value as StationConstructor);
        Mutex::new(m)
    };
}

/// Makes a custom station type loadable.  Registering an existing name
/// replaces its constructor.
pub fn register(station_type: &'static str, constructor: StationConstructor) {
    CONSTRUCTORS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(station_type, constructor);
}

pub fn station_types() -> Vec<&'static str> {
    let mut types: Vec<&'static str> = CONSTRUCTORS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .copied()
        .collect();
    types.sort_unstable();
    types
}

/// Builds a station from its flattened configuration fields.
pub fn create(
    station_id: &str,
    station_type: &str,
    extra_fields: serde_yaml::Value,
) -> Result<Box<dyn StationBehavior>, ConfigurationError> {
    let constructor = CONSTRUCTORS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(station_type)
        .copied()
        .ok_or_else(|| ConfigurationError::UnknownStationType {
            station: station_id.to_string(),
            station_type: station_type.to_string(),
        })?;
    let station = constructor(extra_fields).map_err(|error| {
        ConfigurationError::Deserialization {
            station: station_id.to_string(),
            message: error.to_string(),
        }
    })?;
    station.check_ranges(station_id)?;
    Ok(station)
}
