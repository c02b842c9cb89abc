use std::fmt;

use crate::topology::{GateId, NodeId};

/// State of the netlist after one simulation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepState {
    /// Power of every node during the step
    pub node_power: Vec<bool>,
    /// Whether each gate opens for the next step, evaluated from this step's power
    pub gate_open: Vec<bool>,
    /// Whether each gate conducted during this step
    pub gate_was_open: Vec<bool>,
}

/// Values seen on a pin during a simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTrace {
    /// Name of the pin
    pub name: String,
    /// Whether the pin is observed rather than driven
    pub is_output: bool,
    /// Node the pin is bound to, if its anchor cell is conductive
    pub node: Option<NodeId>,
    /// Power of the node at each step
    pub values: Vec<bool>,
    /// Waveform of the pin at each step: driven values for an input, expected values for an output
    pub expected: Vec<bool>,
}

impl PinTrace {
    /// Steps where the observed value differs from the expected one
    pub fn mismatches(&self) -> Vec<usize> {
        self.values
            .iter()
            .zip(self.expected.iter())
            .enumerate()
            .filter(|(_, (v, e))| v != e)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Difference between the expected and observed value of an output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Index of the pin
    pub pin: usize,
    /// Simulation step
    pub step: usize,
    /// Expected value
    pub expected: bool,
}

/// Full history of a simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    pub(crate) steps: Vec<StepState>,
    pub(crate) pins: Vec<PinTrace>,
}

impl SimulationResult {
    /// Return the number of simulated steps
    pub fn nb_steps(&self) -> usize {
        self.steps.len()
    }

    /// State after each step
    pub fn steps(&self) -> &[StepState] {
        &self.steps
    }

    /// Power of a node at a given step
    pub fn node_power(&self, step: usize, node: NodeId) -> bool {
        self.steps[step].node_power[node.index()]
    }

    /// Power of a node over the whole simulation
    pub fn node_waveform(&self, node: NodeId) -> Vec<bool> {
        self.steps
            .iter()
            .map(|s| s.node_power[node.index()])
            .collect()
    }

    /// Open state of a gate over the whole simulation, as evaluated at the end of each step
    pub fn gate_waveform(&self, gate: GateId) -> Vec<bool> {
        self.steps
            .iter()
            .map(|s| s.gate_open[gate.index()])
            .collect()
    }

    /// Values seen on each pin, in the order of the pins
    pub fn pin_traces(&self) -> &[PinTrace] {
        &self.pins
    }

    /// Trace of the first pin with the given name
    pub fn pin_trace(&self, name: &str) -> Option<&PinTrace> {
        self.pins.iter().find(|p| p.name == name)
    }

    /// Every step where an output pin differs from its expected value
    pub fn mismatches(&self) -> Vec<Mismatch> {
        let mut ret = Vec::new();
        for (i, pin) in self.pins.iter().enumerate() {
            if !pin.is_output {
                continue;
            }
            for step in pin.mismatches() {
                ret.push(Mismatch {
                    pin: i,
                    step,
                    expected: pin.expected[step],
                });
            }
        }
        ret
    }

    /// Return whether every output pin shows its expected values
    pub fn is_correct(&self) -> bool {
        self.mismatches().is_empty()
    }
}

fn write_wave(f: &mut fmt::Formatter<'_>, values: &[bool]) -> fmt::Result {
    for v in values {
        write!(f, "{}", if *v { '‾' } else { '_' })?;
    }
    Ok(())
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.pins.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for pin in &self.pins {
            write!(f, "{:>width$} ", pin.name, width = width)?;
            write_wave(f, &pin.values)?;
            writeln!(f)?;
            if pin.is_output {
                write!(f, "{:>width$} ", "", width = width)?;
                write_wave(f, &pin.expected)?;
                writeln!(f, " (expected)")?;
            }
        }
        fmt::Result::Ok(())
    }
}
