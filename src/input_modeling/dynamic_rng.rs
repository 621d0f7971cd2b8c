use std::{cell::RefCell, rc::Rc};

use rand::RngCore;

/// Any seedable or entropy-backed generator can drive a simulation, as long
/// as it can be debug-printed alongside the rest of the services.
pub trait SimulationRng: std::fmt::Debug + RngCore {}
impl<T: std::fmt::Debug + RngCore> SimulationRng for T {}

/// Shared handle to the simulation random number generator.  Stations draw
/// from the same stream the scheduler uses, so runs stay reproducible.
pub type DynRng = Rc<RefCell<dyn SimulationRng>>;

pub(crate) fn default_rng() -> DynRng {
    Rc::new(RefCell::new(rand_pcg::Pcg64Mcg::new(42)))
}

pub fn dyn_rng<Rng: SimulationRng + 'static>(rng: Rng) -> DynRng {
    Rc::new(RefCell::new(rng))
}
