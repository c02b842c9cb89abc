//! Propagation of a node through plain conductors

use crate::layout::{Direction, Layer, SiliconLink};
use crate::topology::{LayerKind, Place, PlaceSet};

/// Return whether a place holds conductive material that a node may own
///
/// Gate cells are not conductive on the silicon layer: the gate belongs to its transistor.
pub fn is_conductive(layer: &Layer, place: Place) -> bool {
    let cell = layer.cell(place.pos);
    match place.layer {
        LayerKind::Metal => cell.metal,
        LayerKind::Silicon => cell.silicon.is_plain(),
    }
}

/// Places directly connected to a place: neighbours through links of the same layer, and the
/// other layer of the cell through a via
///
/// Master and slave links are transistor boundaries and are never followed.
pub fn connected_places(layer: &Layer, place: Place) -> Vec<Place> {
    let mut ret = Vec::new();
    for dir in Direction::ALL {
        let Some(n) = layer.neighbour(place.pos, dir) else {
            continue;
        };
        let link = layer.link(place.pos, dir);
        let connected = match place.layer {
            LayerKind::Metal => link.metal,
            LayerKind::Silicon => link.silicon == SiliconLink::BiDirectional,
        };
        if connected {
            ret.push(Place {
                pos: n,
                layer: place.layer,
            });
        }
    }
    if layer.cell(place.pos).silicon.has_via() {
        ret.push(place.other_layer());
    }
    ret
}

/// Add to a node every place reachable from the origin without crossing a transistor
///
/// Places already in the node are not visited again, which bounds the traversal on looping wires.
pub fn flood_fill_into(layer: &Layer, origin: Place, node: &mut PlaceSet) {
    let mut stack = vec![origin];
    while let Some(place) = stack.pop() {
        if !is_conductive(layer, place) || node.contains(&place) {
            continue;
        }
        node.insert(place);
        stack.extend(connected_places(layer, place));
    }
}

/// Compute the set of places reachable from the origin without crossing a transistor
///
/// The result is empty if the origin itself is not conductive.
pub fn flood_fill(layer: &Layer, origin: Place) -> PlaceSet {
    let mut ret = PlaceSet::default();
    flood_fill_into(layer, origin, &mut ret);
    ret
}
