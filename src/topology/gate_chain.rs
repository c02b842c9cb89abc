//! Detection of transistor gates and chains of gates
//!
//! If a chain of gates looks like this, with `║` and `│` the two kinds of silicon:
//! ```text
//!         b0  c0      e0
//! p0 ──╥───╫───╫───╥───╫── p1
//!     a0  b1  c1  d0  e1
//! ```
//! the gate is open depending on `AND(OR(a0), OR(b0, b1), OR(c0, c1), OR(d0), OR(e0, e1))`,
//! and connects `p0` to `p1`.

use fxhash::FxHashSet;
use tracing::trace;

use crate::error::TopologyError;
use crate::layout::{Direction, Doping, Layer, Position, SiliconLink};
use crate::topology::flood_fill::flood_fill;
use crate::topology::{NodeId, Place, PlaceSet, SchemeGate};

/// Direction in which a chain is followed: downwards for vertical gates, rightwards otherwise
fn travel_direction(layer: &Layer, pos: Position) -> Direction {
    if layer.cell(pos).silicon.is_vertical_gate() {
        Direction::Bottom
    } else {
        Direction::Right
    }
}

/// Flood fill the controlling inputs of one gate cell, on both sides of its conductor
fn input_group(
    layer: &Layer,
    pos: Position,
    travel: Direction,
) -> Result<Vec<PlaceSet>, TopologyError> {
    for dir in [travel, travel.opposite()] {
        if layer.neighbour(pos, dir).is_some() && layer.link(pos, dir).silicon == SiliconLink::Slave
        {
            return Err(TopologyError::StraySlaveLink(pos, dir));
        }
    }
    let mut ret = Vec::new();
    for dir in travel.perpendicular() {
        if layer.link(pos, dir).silicon != SiliconLink::Slave {
            continue;
        }
        if let Some(tap) = layer.neighbour(pos, dir) {
            ret.push(flood_fill(layer, Place::silicon(tap)));
        }
    }
    if ret.is_empty() {
        return Err(TopologyError::GateWithoutInput(pos));
    }
    Ok(ret)
}

/// Extract the chain starting at a gate cell
///
/// The chain continues as long as cells carry exactly the same silicon content as the first one.
/// New nodes are appended to `seeds`: first and second power terminals, then the input groups.
/// The returned gate refers to nodes by their index in `seeds`.
fn extract_chain(
    layer: &Layer,
    start: Position,
    seeds: &mut Vec<PlaceSet>,
) -> Result<SchemeGate, TopologyError> {
    let gate_type = layer.cell(start).silicon;
    let travel = travel_direction(layer, start);
    let first_terminal = layer
        .neighbour(start, travel.opposite())
        .ok_or(TopologyError::MissingPowerTerminal(start))?;

    let mut cells = Vec::new();
    let mut groups = Vec::new();
    let mut pos = start;
    while layer.cell(pos).silicon == gate_type {
        cells.push(pos);
        groups.push(input_group(layer, pos, travel)?);
        pos = layer
            .neighbour(pos, travel)
            .ok_or(TopologyError::MissingPowerTerminal(pos))?;
    }
    let last_terminal = pos;

    let mut add_seed = |places: PlaceSet| {
        seeds.push(places);
        NodeId::new(seeds.len() - 1)
    };
    let power = [
        add_seed(flood_fill(layer, Place::silicon(first_terminal))),
        add_seed(flood_fill(layer, Place::silicon(last_terminal))),
    ];
    let inputs = groups
        .into_iter()
        .map(|group| group.into_iter().map(&mut add_seed).collect())
        .collect();
    trace!(
        "Gate chain of {} cells from {} to {}",
        cells.len(),
        first_terminal,
        last_terminal
    );
    Ok(SchemeGate::new(
        gate_type.doping() == Some(Doping::P),
        power,
        inputs,
        cells,
    ))
}

/// Find all gate chains of a layer, scanning row by row
///
/// Nodes are seeded into `seeds` and may overlap; gates refer to them by index.
pub(crate) fn extract_gate_chains(
    layer: &Layer,
    seeds: &mut Vec<PlaceSet>,
) -> Result<Vec<SchemeGate>, TopologyError> {
    let mut in_chain = FxHashSet::default();
    let mut ret = Vec::new();
    for pos in layer.positions() {
        if !layer.cell(pos).silicon.is_gate() || in_chain.contains(&pos) {
            continue;
        }
        let gate = extract_chain(layer, pos, seeds)?;
        in_chain.extend(gate.cells().iter().copied());
        ret.push(gate);
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::extract_gate_chains;
    use crate::error::TopologyError;
    use crate::layout::generators::testcases;
    use crate::layout::{Direction, Doping, Layer, Position, SiliconLink, SiliconType};
    use crate::topology::{NodeId, Place};

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_single_gate() {
        let l = testcases::npn_switch();
        let mut seeds = Vec::new();
        let gates = extract_gate_chains(&l, &mut seeds).unwrap();
        assert_eq!(gates.len(), 1);
        let g = &gates[0];
        assert!(!g.is_inversion_gate());
        assert_eq!(g.cells(), &[p(2, 2)]);
        assert_eq!(g.power_nodes(), [NodeId::new(0), NodeId::new(1)]);
        assert_eq!(g.inputs().len(), 1);
        assert_eq!(&*g.inputs()[0], &[NodeId::new(2)]);
        assert_eq!(seeds.len(), 3);
        // Terminals hold the via and the pin pad above and below the gate
        assert!(seeds[0].contains(&Place::silicon(p(1, 2))));
        assert!(seeds[0].contains(&Place::metal(p(1, 2))));
        assert!(seeds[1].contains(&Place::silicon(p(3, 2))));
        assert!(seeds[2].contains(&Place::silicon(p(2, 1))));
        // No seed crosses the gate
        for s in &seeds {
            assert!(!s.contains(&Place::silicon(p(2, 2))));
        }
        assert!(!seeds[0].contains(&Place::silicon(p(3, 2))));
    }

    #[test]
    fn test_inversion() {
        let l = testcases::pnp_switch();
        let mut seeds = Vec::new();
        let gates = extract_gate_chains(&l, &mut seeds).unwrap();
        assert!(gates[0].is_inversion_gate());
    }

    #[test]
    fn test_chain() {
        let l = testcases::and2();
        let mut seeds = Vec::new();
        let gates = extract_gate_chains(&l, &mut seeds).unwrap();
        assert_eq!(gates.len(), 1);
        let g = &gates[0];
        assert_eq!(g.cells(), &[p(3, 3), p(3, 4)]);
        assert_eq!(g.inputs().len(), 2);
        assert_eq!(g.inputs()[0].len(), 1);
        assert_eq!(g.inputs()[1].len(), 1);
        assert_eq!(seeds.len(), 4);
        assert!(seeds[0].contains(&Place::silicon(p(3, 2))));
        assert!(seeds[1].contains(&Place::silicon(p(3, 5))));
        assert!(seeds[2].contains(&Place::silicon(p(2, 3))));
        assert!(seeds[3].contains(&Place::silicon(p(2, 4))));
    }

    #[test]
    fn test_double_input() {
        let l = testcases::or2();
        let mut seeds = Vec::new();
        let gates = extract_gate_chains(&l, &mut seeds).unwrap();
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].inputs().len(), 1);
        assert_eq!(gates[0].inputs()[0].len(), 2);
        assert_eq!(seeds.len(), 4);
    }

    #[test]
    fn test_chain_stops_at_different_gate() {
        // Horizontal N conductor crossed twice, the second gate then rotated by hand
        let mut l = Layer::new(5, 6);
        let conductor: Vec<Position> = (0..6).map(|c| p(2, c)).collect();
        l.draw_silicon_path(&conductor, Doping::N);
        l.draw_silicon_path(&[p(1, 2), p(2, 2)], Doping::P);
        l.draw_silicon_path(&[p(1, 3), p(2, 3)], Doping::P);
        assert_eq!(l.cell(p(2, 2)).silicon, SiliconType::NTypeHGate);
        l.set_silicon(p(2, 3), SiliconType::NTypeVGate);
        let mut seeds = Vec::new();
        let res = extract_gate_chains(&l, &mut seeds);
        // The vertical gate at (2, 3) is controlled from above, along its own conductor
        assert_eq!(
            res.unwrap_err(),
            TopologyError::StraySlaveLink(p(2, 3), Direction::Top)
        );
    }

    #[test]
    fn test_contract_violations() {
        // Chain running into a gate cell without input
        let mut l = Layer::new(3, 3);
        l.draw_silicon_path(&[p(0, 1), p(1, 1), p(2, 1)], Doping::N);
        l.draw_silicon_path(&[p(1, 0), p(1, 1)], Doping::P);
        l.set_silicon(p(2, 1), SiliconType::NTypeVGate);
        let mut seeds = Vec::new();
        assert_eq!(
            extract_gate_chains(&l, &mut seeds).unwrap_err(),
            TopologyError::GateWithoutInput(p(2, 1))
        );

        let mut l = Layer::new(3, 3);
        l.set_silicon(p(1, 2), SiliconType::PTypeHGate);
        l.set_silicon_link(p(0, 2), Direction::Bottom, SiliconLink::Master);
        assert_eq!(
            extract_gate_chains(&l, &mut Vec::new()).unwrap_err(),
            TopologyError::MissingPowerTerminal(p(1, 2))
        );

        let mut l = Layer::new(3, 3);
        l.set_silicon(p(1, 1), SiliconType::PTypeHGate);
        assert_eq!(
            extract_gate_chains(&l, &mut Vec::new()).unwrap_err(),
            TopologyError::GateWithoutInput(p(1, 1))
        );
    }
}
