//! Compute netlist statistics
//!
//! ```
//! # use kohctpyktop::layout::generators::testcases;
//! use kohctpyktop::topology::build_topology;
//! use kohctpyktop::topology::stats::stats;
//! let topology = build_topology(&testcases::nand2()).unwrap();
//! let stats = stats(&topology);
//!
//! // A single chain of two P-type transistors
//! assert_eq!(stats.nb_gates, 1);
//! assert_eq!(stats.nb_inversion, 1);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::topology::Topology;

/// Number of nodes and gates in a netlist, and the shape of the gates
#[derive(Clone, Debug)]
pub struct TopologyStats {
    /// Number of nodes
    pub nb_nodes: usize,
    /// Number of nodes without any place
    pub nb_empty_nodes: usize,
    /// Number of elementary places owned by a node
    pub nb_places: usize,
    /// Number of gates
    pub nb_gates: usize,
    /// Number of inverting (P-type) gates
    pub nb_inversion: usize,
    /// Number of gates by chain length
    pub chain_length: Vec<usize>,
    /// Number of input groups by number of nodes
    pub group_width: Vec<usize>,
}

fn record(histogram: &mut Vec<usize>, sz: usize) {
    while histogram.len() <= sz {
        histogram.push(0);
    }
    histogram[sz] += 1;
}

impl fmt::Display for TopologyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Nodes: {}", self.nb_nodes)?;
        if self.nb_empty_nodes != 0 {
            writeln!(f, "      empty: {}", self.nb_empty_nodes)?;
        }
        writeln!(f, "  Places: {}", self.nb_places)?;
        writeln!(f, "  Gates: {}", self.nb_gates)?;
        if self.nb_gates != 0 {
            writeln!(f, "      N-type: {}", self.nb_gates - self.nb_inversion)?;
            writeln!(f, "      P-type: {}", self.nb_inversion)?;
            writeln!(f, "  Chain length:")?;
            for (i, nb) in self.chain_length.iter().enumerate() {
                if *nb != 0 {
                    writeln!(f, "      {}: {}", i, nb)?;
                }
            }
            writeln!(f, "  Input group width:")?;
            for (i, nb) in self.group_width.iter().enumerate() {
                if *nb != 0 {
                    writeln!(f, "      {}: {}", i, nb)?;
                }
            }
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the netlist
pub fn stats(t: &Topology) -> TopologyStats {
    let mut ret = TopologyStats {
        nb_nodes: t.nb_nodes(),
        nb_empty_nodes: t.nodes().iter().filter(|n| n.is_empty()).count(),
        nb_places: t.nodes().iter().map(|n| n.places().len()).sum(),
        nb_gates: t.nb_gates(),
        nb_inversion: 0,
        chain_length: Vec::new(),
        group_width: Vec::new(),
    };
    for g in t.gates() {
        if g.is_inversion_gate() {
            ret.nb_inversion += 1;
        }
        record(&mut ret.chain_length, g.cells().len());
        for group in g.inputs() {
            record(&mut ret.group_width, group.len());
        }
    }
    ret
}
