use std::fmt;

/// Doping of a silicon region
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Doping {
    /// P-type silicon
    P,
    /// N-type silicon
    N,
}

impl Doping {
    /// The other doping
    pub fn opposite(self) -> Doping {
        match self {
            Doping::P => Doping::N,
            Doping::N => Doping::P,
        }
    }
}

impl fmt::Display for Doping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Doping::P => write!(f, "P"),
            Doping::N => write!(f, "N"),
        }
    }
}

/// Content of the silicon layer of a cell
///
/// Gate cells are named after their base doping, i.e. the doping of the conductor they switch.
/// A vertical gate switches a vertical conductor and is controlled from its left and right neighbours;
/// a horizontal gate switches a horizontal conductor and is controlled from above and below.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum SiliconType {
    /// No silicon
    #[default]
    None,
    /// Plain P-type silicon
    PType,
    /// Plain N-type silicon
    NType,
    /// P-type silicon with a via to the metal layer
    PTypeVia,
    /// N-type silicon with a via to the metal layer
    NTypeVia,
    /// Horizontal gate on P-type silicon
    PTypeHGate,
    /// Vertical gate on P-type silicon
    PTypeVGate,
    /// Horizontal gate on N-type silicon
    NTypeHGate,
    /// Vertical gate on N-type silicon
    NTypeVGate,
}

impl SiliconType {
    /// Base doping of the cell, including gates
    pub fn doping(self) -> Option<Doping> {
        use SiliconType::*;
        match self {
            None => Option::None,
            PType | PTypeVia | PTypeHGate | PTypeVGate => Some(Doping::P),
            NType | NTypeVia | NTypeHGate | NTypeVGate => Some(Doping::N),
        }
    }

    /// Plain silicon of the given doping
    pub fn plain(doping: Doping) -> SiliconType {
        match doping {
            Doping::P => SiliconType::PType,
            Doping::N => SiliconType::NType,
        }
    }

    /// Gate of the given base doping and orientation
    pub fn gate(doping: Doping, vertical: bool) -> SiliconType {
        match (doping, vertical) {
            (Doping::P, false) => SiliconType::PTypeHGate,
            (Doping::P, true) => SiliconType::PTypeVGate,
            (Doping::N, false) => SiliconType::NTypeHGate,
            (Doping::N, true) => SiliconType::NTypeVGate,
        }
    }

    /// Whether this is doped silicon that is not a gate, with or without a via
    pub fn is_plain(self) -> bool {
        use SiliconType::*;
        matches!(self, PType | NType | PTypeVia | NTypeVia)
    }

    /// Whether this is plain silicon of the given doping, with or without a via
    pub fn is_plain_of(self, doping: Doping) -> bool {
        self.is_plain() && self.doping() == Some(doping)
    }

    /// Whether the cell bridges its silicon and metal layers
    pub fn has_via(self) -> bool {
        matches!(self, SiliconType::PTypeVia | SiliconType::NTypeVia)
    }

    /// Whether the cell is a transistor gate
    pub fn is_gate(self) -> bool {
        use SiliconType::*;
        matches!(self, PTypeHGate | PTypeVGate | NTypeHGate | NTypeVGate)
    }

    /// Whether the cell is a gate of the given base doping
    pub fn is_gate_of(self, doping: Doping) -> bool {
        self.is_gate() && self.doping() == Some(doping)
    }

    /// Whether the cell is a gate switching a vertical conductor
    pub fn is_vertical_gate(self) -> bool {
        matches!(self, SiliconType::PTypeVGate | SiliconType::NTypeVGate)
    }

    /// The same doping with a via added; gates and empty cells cannot carry a via
    pub fn with_via(self) -> Option<SiliconType> {
        match self {
            SiliconType::PType | SiliconType::PTypeVia => Some(SiliconType::PTypeVia),
            SiliconType::NType | SiliconType::NTypeVia => Some(SiliconType::NTypeVia),
            _ => None,
        }
    }

    /// The same doping with gate and via removed
    pub fn base(self) -> SiliconType {
        match self.doping() {
            Some(d) => SiliconType::plain(d),
            None => SiliconType::None,
        }
    }
}

/// Kind of silicon connection between two neighbouring cells
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum SiliconLink {
    /// No connection
    #[default]
    None,
    /// Plain silicon continuity
    BiDirectional,
    /// This side controls the transistor gate on the other side
    Master,
    /// This side is a transistor gate controlled from the other side
    Slave,
}

impl SiliconLink {
    /// The same link seen from the other cell
    pub fn reverse(self) -> SiliconLink {
        match self {
            SiliconLink::Master => SiliconLink::Slave,
            SiliconLink::Slave => SiliconLink::Master,
            l => l,
        }
    }
}

/// Connection state between a cell and one of its neighbours
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Link {
    /// Silicon connection
    pub silicon: SiliconLink,
    /// Metal connection
    pub metal: bool,
}

impl Link {
    /// The same link seen from the other cell
    pub fn reverse(self) -> Link {
        Link {
            silicon: self.silicon.reverse(),
            metal: self.metal,
        }
    }
}

/// Content of a single cell of a layer
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct Cell {
    /// Silicon layer content
    pub silicon: SiliconType,
    /// Whether the metal layer is present
    pub metal: bool,
    /// Index of the pin bound to this cell, if any
    pub pin: Option<usize>,
    /// Whether the cell belongs to a read-only region
    pub locked: bool,
}

impl Cell {
    /// Whether the cell has no content on any layer
    pub fn is_empty(&self) -> bool {
        self.silicon == SiliconType::None && !self.metal
    }
}
