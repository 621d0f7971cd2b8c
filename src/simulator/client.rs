use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Services;
use crate::expression::Environment;

/// The view of a client that station decisions need: its type, its numeric
/// and text properties, and how long it has been waiting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_type: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
    #[serde(default)]
    pub text_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub waiting_time: f64,
}

impl Client {
    pub fn new(client_type: &str) -> Self {
        Self {
            client_type: client_type.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: f64) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn with_text_property(mut self, key: &str, value: &str) -> Self {
        self.text_properties
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_waiting_time(mut self, waiting_time: f64) -> Self {
        self.waiting_time = waiting_time;
        self
    }

    pub fn text_property(&self, key: &str) -> Option<&str> {
        self.text_properties.get(key).map(String::as_str)
    }
}

/// The variables visible to a formula evaluated for one client.
///
/// `w` is the waiting time of the client and `t` the simulation clock.
/// Client attributes shadow global model variables of the same name.
pub struct ClientEnvironment<'a> {
    client: &'a Client,
    services: &'a Services,
}

impl<'a> ClientEnvironment<'a> {
    pub fn new(client: &'a Client, services: &'a Services) -> Self {
        Self { client, services }
    }
}

impl<'a> Environment for ClientEnvironment<'a> {
    fn variable(&self, name: &str) -> Option<f64> {
        match name {
            "w" => Some(self.client.waiting_time),
            "t" => Some(self.services.global_time()),
            _ => self
                .client
                .attributes
                .get(name)
                .copied()
                .or_else(|| self.services.variable(name)),
        }
    }
}
