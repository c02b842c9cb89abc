//! Switch-level simulation of a netlist, one step at a time
//!
//! ```
//! # use kohctpyktop::layout::generators::testcases;
//! use kohctpyktop::sim::simulate;
//! use kohctpyktop::topology::build_topology;
//! let layer = testcases::and2();
//! let topology = build_topology(&layer).unwrap();
//! let result = simulate(&topology, layer.pins(), 100).unwrap();
//!
//! // The output follows the and of both inputs, one step late
//! assert!(result.is_correct());
//! ```

mod result;
mod simulator;

use crate::error::SimulationError;
use crate::layout::Pin;
use crate::topology::Topology;

pub use result::{Mismatch, PinTrace, SimulationResult, StepState};
pub use simulator::Simulator;

/// Default number of simulation steps
pub const DEFAULT_STEPS: usize = 100;

/// Parameters of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of steps to simulate
    pub steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            steps: DEFAULT_STEPS,
        }
    }
}

impl SimulationConfig {
    /// Simulate a netlist with these parameters
    pub fn run(
        &self,
        topology: &Topology,
        pins: &[Pin],
    ) -> Result<SimulationResult, SimulationError> {
        simulate(topology, pins, self.steps)
    }
}

/// Simulate a netlist over a number of steps; return the whole history
pub fn simulate(
    topology: &Topology,
    pins: &[Pin],
    steps: usize,
) -> Result<SimulationResult, SimulationError> {
    let mut sim = Simulator::new(topology, pins)?;
    Ok(sim.run(steps))
}
