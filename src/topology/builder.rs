//! Extraction of a netlist from a layout

use fxhash::FxHashSet;
use tracing::{debug, warn};

use crate::error::TopologyError;
use crate::layout::{Direction, Layer, SiliconLink};
use crate::topology::flood_fill::{flood_fill, is_conductive};
use crate::topology::gate_chain::extract_gate_chains;
use crate::topology::merge::merge_nodes;
use crate::topology::{Place, PlaceSet, Topology};

/// Slave links only exist on the controlled side of a gate
fn check_slave_links(layer: &Layer) -> Result<(), TopologyError> {
    for pos in layer.positions() {
        if layer.cell(pos).silicon.is_gate() {
            continue;
        }
        for dir in Direction::ALL {
            if layer.neighbour(pos, dir).is_some()
                && layer.link(pos, dir).silicon == SiliconLink::Slave
            {
                return Err(TopologyError::StraySlaveLink(pos, dir));
            }
        }
    }
    Ok(())
}

/// Seed one node per pin, from the metal of its anchor cell or from its silicon if it has no metal
fn pin_seeds(layer: &Layer, seeds: &mut Vec<PlaceSet>) {
    for pin in layer.pins() {
        let metal = Place::metal(pin.position);
        let origin = if is_conductive(layer, metal) {
            metal
        } else {
            Place::silicon(pin.position)
        };
        let node = flood_fill(layer, origin);
        if node.is_empty() {
            warn!("Pin {} at {} is not connected to anything", pin.name, pin.position);
            continue;
        }
        seeds.push(node);
    }
}

/// Seed one node per conductive place that no seed covers yet, row by row, silicon first
fn remaining_seeds(layer: &Layer, seeds: &mut Vec<PlaceSet>) {
    let mut covered: FxHashSet<Place> = seeds.iter().flatten().copied().collect();
    for pos in layer.positions() {
        for place in [Place::silicon(pos), Place::metal(pos)] {
            if covered.contains(&place) || !is_conductive(layer, place) {
                continue;
            }
            let node = flood_fill(layer, place);
            covered.extend(node.iter().copied());
            seeds.push(node);
        }
    }
}

/// Extract the netlist of a layout
///
/// Gate chains are found first, seeding their terminals and inputs; then every pin seeds a node,
/// and finally every conductive place left over. Overlapping seeds are merged so that the nodes
/// partition the conductive places, and gates are rewritten to refer to the merged nodes.
/// Building twice from the same layout gives the same netlist.
pub fn build_topology(layer: &Layer) -> Result<Topology, TopologyError> {
    check_slave_links(layer)?;
    let mut seeds = Vec::new();
    let gates = extract_gate_chains(layer, &mut seeds)?;
    let nb_gate_seeds = seeds.len();
    pin_seeds(layer, &mut seeds);
    let nb_pin_seeds = seeds.len() - nb_gate_seeds;
    remaining_seeds(layer, &mut seeds);
    debug!(
        "Found {} gates; seeded {} gate nodes, {} pin nodes and {} other nodes",
        gates.len(),
        nb_gate_seeds,
        nb_pin_seeds,
        seeds.len() - nb_gate_seeds - nb_pin_seeds
    );

    let (nodes, translation) = merge_nodes(&seeds);
    let gates = gates.iter().map(|g| g.remap(&translation)).collect();
    Topology::from_parts(nodes, gates)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::build_topology;
    use crate::error::TopologyError;
    use crate::layout::generators::{level_template, testcases, LEVEL_COLUMNS, LEVEL_ROWS};
    use crate::layout::{Direction, Doping, Layer, Pin, Position, SiliconLink, Waveform};
    use crate::topology::{flood_fill, is_conductive, NodeId, Place, PlaceSet};

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    /// Layout drawn with random strokes of the editing API
    fn random_layer(seed: u64) -> Layer {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (rows, cols) = (8, 10);
        let mut ret = Layer::new(rows, cols);
        for _ in 0..120 {
            let from = p(rng.gen_range(0..rows), rng.gen_range(0..cols));
            let dir = Direction::ALL[rng.gen_range(0..4)];
            let to = ret.neighbour(from, dir).unwrap_or(from);
            match rng.gen_range(0..6) {
                0 | 1 => {
                    ret.draw_silicon(from, from, Doping::N);
                    ret.draw_silicon(from, to, Doping::N);
                }
                2 | 3 => {
                    ret.draw_silicon(from, from, Doping::P);
                    ret.draw_silicon(from, to, Doping::P);
                }
                4 => {
                    ret.draw_metal(from, to);
                }
                _ => {
                    ret.put_via(from);
                }
            }
        }
        ret
    }

    /// Every conductive place belongs to exactly the node its flood fill describes
    fn check_partition(layer: &Layer) {
        let t = build_topology(layer).unwrap();
        for pos in layer.positions() {
            for place in [Place::silicon(pos), Place::metal(pos)] {
                let owner = t.node_at(place);
                if !is_conductive(layer, place) {
                    assert_eq!(owner, None);
                    continue;
                }
                let Some(id) = owner else {
                    panic!("Place {} belongs to no node", place);
                };
                let expected = flood_fill(layer, place);
                let actual: PlaceSet = t.node(id).places().iter().copied().collect();
                assert_eq!(expected.len(), actual.len());
                assert!(expected.iter().all(|x| actual.contains(x)));
            }
        }
        for gate in t.gates() {
            for pos in gate.cells() {
                assert_eq!(t.node_at(Place::silicon(*pos)), None);
            }
        }
    }

    #[test]
    fn test_partition() {
        for l in [
            testcases::npn_switch(),
            testcases::nand2(),
            testcases::nor2(),
            level_template(LEVEL_ROWS, LEVEL_COLUMNS),
        ] {
            check_partition(&l);
        }
    }

    #[test]
    fn test_partition_random() {
        for seed in 0..20 {
            check_partition(&random_layer(seed));
        }
    }

    #[test]
    fn test_idempotent() {
        for seed in 0..5 {
            let l = random_layer(seed);
            let t1 = build_topology(&l).unwrap();
            let t2 = build_topology(&l).unwrap();
            assert_eq!(t1.nodes(), t2.nodes());
            assert_eq!(t1.gates(), t2.gates());
        }
    }

    #[test]
    fn test_empty_layer() {
        let t = build_topology(&Layer::new(4, 4)).unwrap();
        assert_eq!(t.nb_nodes(), 0);
        assert_eq!(t.nb_gates(), 0);
    }

    #[test]
    fn test_single_wire() {
        // A metal wire and an unconnected silicon wire, no gate and no pin
        let mut l = Layer::new(3, 3);
        l.draw_metal_path(&[p(0, 0), p(0, 1), p(0, 2)]);
        l.draw_silicon_path(&[p(2, 0), p(2, 1)], Doping::P);
        let t = build_topology(&l).unwrap();
        assert_eq!(t.nb_nodes(), 2);
        // Row-major: the metal wire on row 0 comes first
        assert_eq!(t.node_at(Place::metal(p(0, 2))), Some(NodeId::new(0)));
        assert_eq!(t.node_at(Place::silicon(p(2, 0))), Some(NodeId::new(1)));
    }

    #[test]
    fn test_switch() {
        let l = testcases::npn_switch();
        let t = build_topology(&l).unwrap();
        // VCC, OUT and A, each with its pin pad
        assert_eq!(t.nb_nodes(), 3);
        assert_eq!(t.nb_gates(), 1);
        let g = &t.gates()[0];
        let [vcc, out] = g.power_nodes();
        assert_eq!(t.pin_node(&l.pins()[0]), Some(vcc));
        assert_eq!(t.pin_node(&l.pins()[2]), Some(out));
        assert_eq!(t.pin_node(&l.pins()[1]), Some(g.inputs()[0][0]));
        let a = t.assignment(p(2, 1));
        assert_eq!(a.silicon, a.metal);
        assert_eq!(t.assignment(p(2, 2)).silicon, None);
    }

    #[test]
    fn test_shared_terminal() {
        // Two transistors in series sharing the middle wire, each controlled by its own input
        let mut l = Layer::new(5, 9);
        let conductor: Vec<Position> = (0..9).map(|c| p(2, c)).collect();
        l.draw_silicon_path(&conductor, Doping::N);
        l.draw_silicon_path(&[p(0, 2), p(1, 2), p(2, 2)], Doping::P);
        l.draw_silicon_path(&[p(4, 6), p(3, 6), p(2, 6)], Doping::P);
        let t = build_topology(&l).unwrap();
        assert_eq!(t.nb_gates(), 2);
        let [_, middle0] = t.gates()[0].power_nodes();
        let [middle1, _] = t.gates()[1].power_nodes();
        assert_eq!(middle0, middle1);
        assert_eq!(t.node(middle0).places().len(), 3);
        // Left, middle, right, and the two inputs
        assert_eq!(t.nb_nodes(), 5);
        assert_eq!(t.gates_switching(middle0).len(), 2);
    }

    #[test]
    fn test_input_is_terminal() {
        // The output of one transistor controls another: one node, two roles
        let mut l = Layer::new(6, 6);
        l.draw_silicon_path(&[p(0, 1), p(1, 1), p(2, 1), p(3, 1), p(4, 1)], Doping::N);
        l.draw_silicon_path(&[p(1, 0), p(1, 1)], Doping::P);
        l.draw_silicon_path(&[p(3, 1), p(3, 2), p(3, 3)], Doping::N);
        l.draw_metal_path(&[p(3, 3), p(3, 4)]);
        l.put_via(p(3, 3));
        l.draw_silicon_path(&[p(0, 5), p(1, 5), p(2, 5), p(3, 5), p(4, 5)], Doping::N);
        l.draw_silicon_path(&[p(3, 4), p(3, 5)], Doping::P);
        l.put_via(p(3, 4));
        let t = build_topology(&l).unwrap();
        assert_eq!(t.nb_gates(), 2);
        let [_, out] = t.gates()[0].power_nodes();
        assert_eq!(t.gates()[1].inputs()[0][0], out);
    }

    #[test]
    fn test_pin_on_metal() {
        let mut l = Layer::new(3, 3);
        l.draw_silicon_path(&[p(1, 0), p(1, 1), p(1, 2)], Doping::P);
        l.place_pin(Pin::input("A", p(1, 1), Waveform::always_up()));
        // Metal pad without via: pin node is separate from the silicon below
        let t = build_topology(&l).unwrap();
        assert_eq!(t.nb_nodes(), 2);
        assert_eq!(t.pin_node(&l.pins()[0]), Some(NodeId::new(0)));
        assert_eq!(t.node_at(Place::silicon(p(1, 0))), Some(NodeId::new(1)));
        l.put_via(p(1, 1));
        let t = build_topology(&l).unwrap();
        assert_eq!(t.nb_nodes(), 1);
    }

    #[test]
    fn test_unbound_pin() {
        // The pad is removed: the pin seeds no node, not even an empty one
        let mut l = Layer::new(3, 3);
        l.place_pin(Pin::output("OUT", p(1, 1), Waveform::always_up()));
        l.delete_metal(p(1, 1));
        let t = build_topology(&l).unwrap();
        assert_eq!(t.nb_nodes(), 0);
        assert_eq!(t.pin_node(&l.pins()[0]), None);

        l.draw_metal_path(&[p(0, 0), p(0, 1), p(0, 2)]);
        let t = build_topology(&l).unwrap();
        assert_eq!(t.nb_nodes(), 1);
        assert!(t.nodes().iter().all(|n| !n.places().is_empty()));
        assert_eq!(t.pin_node(&l.pins()[0]), None);
    }

    #[test]
    fn test_stray_slave_link() {
        let mut l = Layer::new(3, 3);
        l.draw_silicon_path(&[p(1, 0), p(1, 1)], Doping::P);
        l.set_silicon_link(p(1, 0), Direction::Right, SiliconLink::Master);
        assert_eq!(
            build_topology(&l).unwrap_err(),
            TopologyError::StraySlaveLink(p(1, 1), Direction::Left)
        );
    }
}
