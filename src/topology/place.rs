use std::fmt;

use fxhash::FxBuildHasher;
use indexmap::IndexSet;

use crate::layout::Position;

/// Layer of an elementary place
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum LayerKind {
    /// Doped silicon
    Silicon,
    /// Metal
    Metal,
}

/// Elementary place: one layer of one cell, the atomic unit of connectivity
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Place {
    /// Cell of the place
    pub pos: Position,
    /// Layer of the place
    pub layer: LayerKind,
}

impl Place {
    /// Silicon place of a cell
    pub fn silicon(pos: Position) -> Place {
        Place {
            pos,
            layer: LayerKind::Silicon,
        }
    }

    /// Metal place of a cell
    pub fn metal(pos: Position) -> Place {
        Place {
            pos,
            layer: LayerKind::Metal,
        }
    }

    /// Return whether the place is on the metal layer
    pub fn is_metal(&self) -> bool {
        self.layer == LayerKind::Metal
    }

    /// The other layer of the same cell, reached through a via
    pub fn other_layer(&self) -> Place {
        match self.layer {
            LayerKind::Silicon => Place::metal(self.pos),
            LayerKind::Metal => Place::silicon(self.pos),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layer {
            LayerKind::Silicon => write!(f, "{}/silicon", self.pos),
            LayerKind::Metal => write!(f, "{}/metal", self.pos),
        }
    }
}

/// Set of places, kept in insertion order for reproducible netlists
pub type PlaceSet = IndexSet<Place, FxBuildHasher>;
