use std::collections::hash_map::Entry;
use std::fmt;

use fxhash::FxHashMap;

use crate::error::TopologyError;
use crate::layout::{Pin, Position};
use crate::topology::Place;

/// Handle of a node in a [`Topology`]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a handle from a node index
    pub fn new(i: usize) -> NodeId {
        assert!(i <= u32::MAX as usize, "Node index {} does not fit in 32 bits", i);
        NodeId(i as u32)
    }

    /// Index of the node in the topology
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle of a gate in a [`Topology`]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct GateId(u32);

impl GateId {
    /// Create a handle from a gate index
    pub fn new(i: usize) -> GateId {
        assert!(i <= u32::MAX as usize, "Gate index {} does not fit in 32 bits", i);
        GateId(i as u32)
    }

    /// Index of the gate in the topology
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A set of elementary places that are electrically the same
///
/// A node may be empty when it was seeded from a cell without plain silicon, for example the
/// terminal of a gate that touches another gate. Such a node never carries power.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemeNode {
    places: Box<[Place]>,
}

impl SchemeNode {
    /// Create a node from its places
    pub fn new(places: Vec<Place>) -> SchemeNode {
        SchemeNode {
            places: places.into(),
        }
    }

    /// Places of the node
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Return whether the node owns a place
    pub fn contains(&self, place: &Place) -> bool {
        self.places.contains(place)
    }

    /// Return whether the node owns no place
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// A transistor, or a chain of consecutive transistors of the same kind acting as one
///
/// The gate connects its two power nodes when open. Each cell of the chain contributes one input
/// group of one or two nodes, or'ed together; the chain signal is the and of all groups.
/// A non-inverting (N-type) gate is open when the chain signal is high, an inverting (P-type)
/// gate is open when it is low.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeGate {
    is_inversion: bool,
    power: [NodeId; 2],
    inputs: Vec<Box<[NodeId]>>,
    cells: Vec<Position>,
}

impl SchemeGate {
    /// Create a gate from its power nodes, its input groups and the cells of the chain
    pub fn new(
        is_inversion: bool,
        power: [NodeId; 2],
        inputs: Vec<Box<[NodeId]>>,
        cells: Vec<Position>,
    ) -> SchemeGate {
        SchemeGate {
            is_inversion,
            power,
            inputs,
            cells,
        }
    }

    /// Return whether the gate opens on a low input (P-type)
    pub fn is_inversion_gate(&self) -> bool {
        self.is_inversion
    }

    /// The two nodes connected by the gate
    pub fn power_nodes(&self) -> [NodeId; 2] {
        self.power
    }

    /// Input groups, one per cell of the chain
    pub fn inputs(&self) -> &[Box<[NodeId]>] {
        &self.inputs
    }

    /// Cells of the chain, in travel order
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// The power node on the other side of the gate, if the node is one of its terminals
    pub fn other_terminal(&self, node: NodeId) -> Option<NodeId> {
        if self.power[0] == node {
            Some(self.power[1])
        } else if self.power[1] == node {
            Some(self.power[0])
        } else {
            None
        }
    }

    /// And of the or'ed input groups, given the power of every node
    pub fn chain_signal(&self, power: &[bool]) -> bool {
        assert!(!self.inputs.is_empty(), "Gate without input group");
        self.inputs
            .iter()
            .all(|group| group.iter().any(|n| power[n.index()]))
    }

    /// Return whether the gate conducts, given the power of every node
    pub fn is_open_for(&self, power: &[bool]) -> bool {
        self.chain_signal(power) != self.is_inversion
    }

    /// Apply a node translation to every node reference
    pub fn remap(&self, translation: &[NodeId]) -> SchemeGate {
        let t = |n: &NodeId| translation[n.index()];
        SchemeGate {
            is_inversion: self.is_inversion,
            power: [t(&self.power[0]), t(&self.power[1])],
            inputs: self
                .inputs
                .iter()
                .map(|group| group.iter().map(t).collect())
                .collect(),
            cells: self.cells.clone(),
        }
    }
}

/// Nodes of one cell, for display purposes
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct CellAssignment {
    /// Node owning the silicon place
    pub silicon: Option<NodeId>,
    /// Node owning the metal place
    pub metal: Option<NodeId>,
}

/// Netlist extracted from a layout: nodes, and the gates switching them
///
/// Nodes are pairwise disjoint, so that every place maps to at most one node.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<SchemeNode>,
    gates: Vec<SchemeGate>,
    place_to_node: FxHashMap<Place, NodeId>,
}

impl Topology {
    /// Build a netlist from nodes and gates, checking that it is well-formed
    pub fn from_parts(
        nodes: Vec<SchemeNode>,
        gates: Vec<SchemeGate>,
    ) -> Result<Topology, TopologyError> {
        let mut place_to_node = FxHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            for place in node.places() {
                match place_to_node.entry(*place) {
                    Entry::Occupied(e) => {
                        return Err(TopologyError::OverlappingNodes(
                            *place,
                            *e.get(),
                            NodeId::new(i),
                        ))
                    }
                    Entry::Vacant(e) => {
                        e.insert(NodeId::new(i));
                    }
                }
            }
        }
        let ret = Topology {
            nodes,
            gates,
            place_to_node,
        };
        ret.check()?;
        Ok(ret)
    }

    /// Check the gate contract: every gate has at least one input group, every group has one
    /// or two nodes, and every reference points to an existing node
    pub fn check(&self) -> Result<(), TopologyError> {
        for (i, gate) in self.gates.iter().enumerate() {
            let id = GateId::new(i);
            if gate.inputs.is_empty() {
                return Err(TopologyError::GateWithoutInputs(id));
            }
            for (j, group) in gate.inputs.iter().enumerate() {
                if group.is_empty() {
                    return Err(TopologyError::EmptyInputGroup(id, j));
                }
                if group.len() > 2 {
                    return Err(TopologyError::OversizedInputGroup(id, j, group.len()));
                }
            }
            let refs = gate.power.iter().chain(gate.inputs.iter().flat_map(|g| g.iter()));
            for n in refs {
                if n.index() >= self.nodes.len() {
                    return Err(TopologyError::UnknownNode(id, *n));
                }
            }
        }
        Ok(())
    }

    /// Return the number of nodes
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of gates
    pub fn nb_gates(&self) -> usize {
        self.gates.len()
    }

    /// Get the node with the given handle
    pub fn node(&self, id: NodeId) -> &SchemeNode {
        &self.nodes[id.index()]
    }

    /// Get the gate with the given handle
    pub fn gate(&self, id: GateId) -> &SchemeGate {
        &self.gates[id.index()]
    }

    /// All nodes, in extraction order
    pub fn nodes(&self) -> &[SchemeNode] {
        &self.nodes
    }

    /// All gates, in extraction order
    pub fn gates(&self) -> &[SchemeGate] {
        &self.gates
    }

    /// Node owning a place, if any
    pub fn node_at(&self, place: Place) -> Option<NodeId> {
        self.place_to_node.get(&place).copied()
    }

    /// Nodes owning the silicon and metal places of a cell
    pub fn assignment(&self, pos: Position) -> CellAssignment {
        CellAssignment {
            silicon: self.node_at(Place::silicon(pos)),
            metal: self.node_at(Place::metal(pos)),
        }
    }

    /// Node a pin is bound to: the node of its anchor cell, metal first
    pub fn pin_node(&self, pin: &Pin) -> Option<NodeId> {
        self.node_at(Place::metal(pin.position))
            .or_else(|| self.node_at(Place::silicon(pin.position)))
    }

    /// Gates having the node as one of their power terminals
    pub fn gates_switching(&self, node: NodeId) -> Vec<GateId> {
        self.gates
            .iter()
            .enumerate()
            .filter(|(_, g)| g.power.contains(&node))
            .map(|(i, _)| GateId::new(i))
            .collect()
    }
}
