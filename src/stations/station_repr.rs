use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct StationRepr {
    pub id: String,
    #[serde(rename = "type")]
    pub station_type: String,
    #[serde(flatten)]
    pub extra: serde_yaml::Value,
}
