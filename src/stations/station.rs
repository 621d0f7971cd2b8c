use serde::ser::SerializeMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::station_repr::StationRepr;
use super::station_trait::{SerializableStation, StationBehavior};
use crate::utils::errors::ConfigurationError;

/// `Station` wraps a station configuration and provides common ID
/// functionality.  Every station in a graph has a unique ID.
#[derive(Debug, Clone)]
pub struct Station {
    id: String,
    inner: Box<dyn StationBehavior>,
}

impl Station {
    pub fn new<S: StationBehavior + 'static>(id: &str, inner: S) -> Self {
        Self {
            id: id.to_string(),
            inner: Box::new(inner),
        }
    }

    pub fn from_boxed(id: String, inner: Box<dyn StationBehavior>) -> Self {
        Self { id, inner }
    }

    /// Decodes a persisted station through the station factory.
    pub fn from_repr(repr: StationRepr) -> Result<Self, ConfigurationError> {
        let inner = super::station_factory::create(&repr.id, &repr.station_type, repr.extra)?;
        Ok(Self::from_boxed(repr.id, inner))
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn get_type(&self) -> &'static str {
        self.inner.get_type()
    }

    pub fn behavior(&self) -> &dyn StationBehavior {
        self.inner.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn StationBehavior {
        self.inner.as_mut()
    }
}

impl Serialize for Station {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra_fields = SerializableStation::serialize(self.inner.as_ref())
            .map_err(serde::ser::Error::custom)?;
        let mut station = serializer.serialize_map(None)?;
        station.serialize_entry("id", &self.id)?;
        station.serialize_entry("type", self.inner.get_type())?;
        if let serde_yaml::Value::Mapping(map) = extra_fields {
            for (key, value) in map.iter() {
                station.serialize_entry(&key, &value)?;
            }
        }
        station.end()
    }
}

impl<'de> Deserialize<'de> for Station {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = StationRepr::deserialize(deserializer)?;
        Station::from_repr(repr).map_err(de::Error::custom)
    }
}
