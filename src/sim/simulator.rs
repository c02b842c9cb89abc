use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::error::SimulationError;
use crate::layout::Pin;
use crate::sim::{PinTrace, SimulationResult, StepState};
use crate::topology::{GateId, NodeId, Topology};

/// A pin driving its node
struct Source<'a> {
    node: Option<NodeId>,
    values: Box<dyn Iterator<Item = bool> + 'a>,
}

/// Step-by-step switch-level simulation of a netlist
///
/// Each step, power flows from the input pins that are high, through the nodes and through the
/// gates that were open at the end of the previous step. Gates are then evaluated from the new
/// node power, and take effect at the next step. All gates start closed.
pub struct Simulator<'a> {
    topology: &'a Topology,
    pins: &'a [Pin],
    pin_nodes: Vec<Option<NodeId>>,
    sources: Vec<Source<'a>>,
    /// Gates having each node as a power terminal
    gates_by_node: Vec<Vec<GateId>>,
    gate_open: Vec<bool>,
    history: Vec<StepState>,
}

impl<'a> Simulator<'a> {
    /// Bind the pins to the netlist and prepare the simulation
    pub fn new(topology: &'a Topology, pins: &'a [Pin]) -> Result<Simulator<'a>, SimulationError> {
        topology.check()?;
        let pin_nodes = pins.iter().map(|p| topology.pin_node(p)).collect_vec();
        for (pin, node) in pins.iter().zip(pin_nodes.iter()) {
            if node.is_none() {
                warn!("Pin {} at {} is not bound to any node", pin.name, pin.position);
            }
        }
        let sources = pins
            .iter()
            .zip(pin_nodes.iter())
            .filter(|(pin, _)| !pin.is_output)
            .map(|(pin, node)| Source {
                node: *node,
                values: pin.values.values(),
            })
            .collect_vec();
        let mut gates_by_node = vec![Vec::new(); topology.nb_nodes()];
        for (i, gate) in topology.gates().iter().enumerate() {
            for n in gate.power_nodes().iter().unique() {
                gates_by_node[n.index()].push(GateId::new(i));
            }
        }
        debug!(
            "Simulating {} nodes and {} gates with {} sources",
            topology.nb_nodes(),
            topology.nb_gates(),
            sources.len()
        );
        Ok(Simulator {
            topology,
            pins,
            pin_nodes,
            sources,
            gates_by_node,
            gate_open: vec![false; topology.nb_gates()],
            history: Vec::new(),
        })
    }

    /// Return the number of steps simulated so far
    pub fn current_step(&self) -> usize {
        self.history.len()
    }

    /// Power a node and everything reachable from it through gates open during this step
    fn propagate(&self, origin: NodeId, was_open: &[bool], power: &mut [bool]) {
        let mut stack = vec![origin];
        while let Some(n) = stack.pop() {
            if power[n.index()] || self.topology.node(n).is_empty() {
                continue;
            }
            power[n.index()] = true;
            for g in &self.gates_by_node[n.index()] {
                if !was_open[g.index()] {
                    continue;
                }
                if let Some(other) = self.topology.gate(*g).other_terminal(n) {
                    stack.push(other);
                }
            }
        }
    }

    /// Run one step of the simulation
    pub fn step(&mut self) -> &StepState {
        let was_open = self.gate_open.clone();
        let mut power = vec![false; self.topology.nb_nodes()];
        let mut driven = Vec::new();
        for source in &mut self.sources {
            let high = source.values.next().unwrap_or(false);
            match source.node {
                Some(n) if high => driven.push(n),
                _ => (),
            }
        }
        for n in driven {
            self.propagate(n, &was_open, &mut power);
        }
        self.gate_open = self
            .topology
            .gates()
            .iter()
            .map(|g| g.is_open_for(&power))
            .collect();
        trace!(
            "Step {}: {} powered nodes, {} open gates",
            self.history.len(),
            power.iter().filter(|p| **p).count(),
            self.gate_open.iter().filter(|o| **o).count()
        );
        self.history.push(StepState {
            node_power: power,
            gate_open: self.gate_open.clone(),
            gate_was_open: was_open,
        });
        &self.history[self.history.len() - 1]
    }

    /// Run a number of steps, and return the whole history so far
    pub fn run(&mut self, steps: usize) -> SimulationResult {
        for _ in 0..steps {
            self.step();
        }
        self.result()
    }

    /// History of the simulation so far
    pub fn result(&self) -> SimulationResult {
        let nb_steps = self.history.len();
        let pins = self
            .pins
            .iter()
            .zip(self.pin_nodes.iter())
            .map(|(pin, node)| PinTrace {
                name: pin.name.clone(),
                is_output: pin.is_output,
                node: *node,
                values: match node {
                    Some(n) => self.history.iter().map(|s| s.node_power[n.index()]).collect(),
                    None => vec![false; nb_steps],
                },
                expected: pin.values.take(nb_steps),
            })
            .collect();
        SimulationResult {
            steps: self.history.clone(),
            pins,
        }
    }
}
