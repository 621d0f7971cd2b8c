//! The input modeling module provides a foundation for configurable station
//! timing, whether that is deterministic or stochastic.  The module includes
//! a set of random variable distributions, per-client-type distribution
//! systems, setup-time matrices, and a structure around random number
//! generation.

pub mod distribution_system;
pub mod dynamic_rng;
pub mod random_variable;
pub mod setup_times;

pub use distribution_system::{DistributionSystem, TimeSource};
pub use dynamic_rng::{dyn_rng, DynRng};
pub use random_variable::Continuous as ContinuousRandomVariable;
pub use setup_times::SetupTimes;
