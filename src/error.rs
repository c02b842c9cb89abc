//! Error types for topology extraction and simulation
//!
//! All of these are contract violations: the layout or the netlist breaks an assumption the
//! extraction or the simulation relies on. They are reported to the caller instead of being
//! patched over, and the caller decides whether to refuse the build.

use thiserror::Error;

use crate::layout::{Direction, Position};
use crate::topology::{GateId, NodeId, Place};

/// Errors raised while extracting or validating a netlist
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A gate cell has no controlling input across its conductor
    #[error("Gate cell {0} has no controlling input")]
    GateWithoutInput(Position),

    /// A gate chain reaches the edge of the layer, leaving no room for a power terminal
    #[error("Gate chain at {0} has no power terminal inside the layer")]
    MissingPowerTerminal(Position),

    /// A slave link on a cell that is not a gate, or along the conductor of a gate
    #[error("Cell {0} has a slave link to the {1} but is not controlled from there")]
    StraySlaveLink(Position, Direction),

    /// A gate without any input group
    #[error("Gate {0} has no input group")]
    GateWithoutInputs(GateId),

    /// An input group without any node
    #[error("Input group {1} of gate {0} is empty")]
    EmptyInputGroup(GateId, usize),

    /// An input group with more than two nodes
    #[error("Input group {1} of gate {0} has {2} nodes, at most two are allowed")]
    OversizedInputGroup(GateId, usize, usize),

    /// A gate referencing a node that does not exist
    #[error("Gate {0} references unknown node {1}")]
    UnknownNode(GateId, NodeId),

    /// A place owned by two different nodes
    #[error("Place {0} belongs to both {1} and {2}")]
    OverlappingNodes(Place, NodeId, NodeId),
}

/// Errors raised when setting up a simulation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The netlist breaks the gate contract
    #[error("Cannot simulate an invalid netlist: {0}")]
    InvalidTopology(#[from] TopologyError),
}
