pub mod simulated;

pub use simulated::{SimulatedNetwork, SimulatedRadio};
