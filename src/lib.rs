//! Topology extraction and simulation of hand-drawn transistor layouts
//!
//! This crate reads layouts drawn on a grid, in the spirit of the KOHCTPYKTOP game: each cell may
//! hold N- or P-doped silicon, metal, and vias between the two layers. Drawing silicon of one
//! doping across silicon of the other creates a transistor gate. The layout is turned into a
//! switch-level netlist, then simulated step by step to compare its outputs with the expected
//! waveforms.
//!
//! # Usage
//!
//! ```bash
//! # Show the netlist extracted from a small layout
//! kohctpyktop show --layout nand
//! # Simulate it, printing the waveform of every pin
//! kohctpyktop simulate --layout nand --steps 100 --waves
//! ```
//!
//! # Development
//!
//! ## Datastructures
//!
//! A [`Layer`](layout::Layer) is a grid of cells, with links between neighbouring cells on each
//! layer. Silicon links are either plain connections, or transistor boundaries: the controlling
//! side of a gate sees a `Master` link, the gate itself a `Slave` link.
//!
//! A [`Topology`](topology::Topology) is the extracted netlist:
//! * nodes are sets of places (one layer of one cell) that are always at the same value;
//! * gates are chains of transistors of the same kind, connecting two nodes when open.
//!
//! Nodes are pairwise disjoint and every conductive place belongs to exactly one node.
//! A gate is open when the and of its input groups, each the or of one or two nodes, is high;
//! P-type gates invert this condition.
//!
//! ## Simulation
//!
//! Simulation is step-based. Each step, the input pins that are high power their node, and power
//! spreads through the gates that were open at the end of the previous step. The gates are then
//! evaluated from the new values. A signal thus needs one step to cross each transistor.
//!
//! For example, here is a nand gate:
//! ```
//! use kohctpyktop::layout::generators::testcases;
//! use kohctpyktop::sim::simulate;
//! use kohctpyktop::topology::build_topology;
//!
//! let layer = testcases::nand2();
//! let topology = build_topology(&layer).unwrap();
//! let result = simulate(&topology, layer.pins(), 100).unwrap();
//! let out = result.pin_trace("OUT").unwrap();
//! assert_eq!(out.values, out.expected);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod layout;
pub mod sim;
pub mod topology;

pub use error::{SimulationError, TopologyError};
pub use layout::{Layer, Pin, Waveform};
pub use topology::{build_topology, stats, Topology};
