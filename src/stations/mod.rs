//! The stations module provides the configurations of the station types a
//! queueing network is built from.  Decide stations route clients, Process
//! stations serve them with resources, and Source, Delay and Dispose
//! stations create, hold and remove them.  Additionally, this module
//! specifies the requirements of any custom station type, via the
//! `StationBehavior` trait.

pub mod batch;
pub mod decide;
pub mod delay;
pub mod dispose;
pub mod process;
pub mod resources;
pub mod source;
pub mod station;

pub mod station_factory;
pub mod station_repr;
pub mod station_trait;

pub use self::batch::{BatchPolicy, FullBatchPolicy, GreedyBatchPolicy};
pub use self::decide::{
    Decide, DecideMode, DecisionContext, MetricRule, MetricTarget, Routing, RoutingState,
    TieBreak,
};
pub use self::delay::Delay;
pub use self::dispose::Dispose;
pub use self::process::{Process, ProcessTimeType, ServiceOutcome, StationCosts, TimeBase};
pub use self::resources::ResourceAlternative;
pub use self::source::Source;
pub use self::station::Station;
pub use self::station_trait::{Connectable, SerializableStation, StationBehavior};

pub use self::station_repr::StationRepr;
