use std::fmt::Debug;

use super::{Decide, Process};
use crate::expression::ExpressionEngine;
use crate::utils::errors::{ConfigurationError, ValidationReport};

pub trait StationClone {
    fn clone_box(&self) -> Box<dyn StationBehavior>;
}

impl<T> StationClone for T
where
    T: 'static + StationBehavior + Clone,
{
    fn clone_box(&self) -> Box<dyn StationBehavior> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn StationBehavior> {
    fn clone(&self) -> Box<dyn StationBehavior> {
        self.clone_box()
    }
}

pub trait SerializableStation {
    fn get_type(&self) -> &'static str {
        "Station"
    }
    fn serialize(&self) -> Result<serde_yaml::Value, serde_yaml::Error> {
        Ok(serde_yaml::Value::Null)
    }
}

/// Edge bookkeeping of a station.  Each station records the ids of the
/// edges attached to it; the graph keeps these lists and the edge endpoints
/// mutually consistent.
pub trait Connectable {
    fn edges_in(&self) -> &[String];
    /// Outgoing edges in decision order.
    fn edges_out(&self) -> Vec<&str>;
    fn can_add_edge_in(&self) -> bool {
        true
    }
    fn can_add_edge_out(&self) -> bool;
    fn add_edge_in(&mut self, edge: &str);
    fn add_edge_out(&mut self, edge: &str);
    /// Detaches an edge from both directions.  Unknown ids are ignored.
    fn remove_edge(&mut self, edge: &str);
}

/// The `StationBehavior` trait defines everything the editor and the
/// simulation runtime need from a station configuration: edge bookkeeping,
/// persistence, validation, and access to the routing and service
/// configurations of Decide and Process stations.
pub trait StationBehavior: StationClone + SerializableStation + Connectable + Debug {
    /// Reports configuration errors and warnings of this station.
    fn validate(
        &self,
        station_id: &str,
        engine: &dyn ExpressionEngine,
        report: &mut ValidationReport,
    );

    /// Every out-of-range parameter.  Validation reports all of them.
    fn range_errors(&self, _station_id: &str) -> Vec<ConfigurationError> {
        Vec::new()
    }

    /// Range checks that make a persisted station unloadable.
    fn check_ranges(&self, station_id: &str) -> Result<(), ConfigurationError> {
        match self.range_errors(station_id).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Re-aligns per-edge parameters after the outgoing edge list changed.
    fn reconcile(&mut self) {}

    /// True for stations that hand every client on to their single outgoing
    /// edge without serving it.
    fn forwards_clients(&self) -> bool {
        false
    }

    fn rename_client_type(&mut self, _old: &str, _new: &str) {}

    fn as_decide(&self) -> Option<&Decide> {
        None
    }
    fn as_decide_mut(&mut self) -> Option<&mut Decide> {
        None
    }
    fn as_process(&self) -> Option<&Process> {
        None
    }
    fn as_process_mut(&mut self) -> Option<&mut Process> {
        None
    }
}
