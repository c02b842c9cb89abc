//! Extraction of a switch-level netlist from a layout
//!
//! The netlist is made of nodes, sets of places that are electrically the same, and gates,
//! transistors or chains of transistors that connect two nodes depending on the value of others.
//!
//! ```
//! # use kohctpyktop::layout::generators::testcases;
//! use kohctpyktop::topology::build_topology;
//! let layer = testcases::or2();
//! let topology = build_topology(&layer).unwrap();
//!
//! // VCC, OUT, A and B
//! assert_eq!(topology.nb_nodes(), 4);
//!
//! // One transistor, switched by A or B
//! let gate = &topology.gates()[0];
//! assert_eq!(gate.inputs()[0].len(), 2);
//! ```

mod builder;
mod flood_fill;
mod gate_chain;
mod merge;
mod netlist;
mod place;
pub mod stats;

pub use builder::build_topology;
pub use flood_fill::{connected_places, flood_fill, is_conductive};
pub use merge::merge_nodes;
pub use netlist::{CellAssignment, GateId, NodeId, SchemeGate, SchemeNode, Topology};
pub use place::{LayerKind, Place, PlaceSet};
