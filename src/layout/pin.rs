use std::fmt;
use std::iter;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::layout::Position;

/// Deterministic, infinite boolean sequence driven on a pin, one value per simulation step
///
/// The sequence restarts from the beginning every time [`Waveform::values`] is called.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Waveform {
    /// Always the same value
    Constant(bool),
    /// `skip` low values, then `on` high values and `off` low values repeated forever; an empty
    /// period is always low
    Pulse {
        /// Number of high values per period
        on: usize,
        /// Number of low values per period
        off: usize,
        /// Number of low values before the first period
        skip: usize,
    },
    /// A fixed pattern, repeated forever; an empty pattern is always low
    Pattern(Box<[bool]>),
    /// Pseudo-random values from a seed
    Random {
        /// Seed of the generator
        seed: u64,
    },
}

impl Waveform {
    /// A permanently high source
    pub fn always_up() -> Waveform {
        Waveform::Constant(true)
    }

    /// A square wave, starting after `skip` low values
    pub fn pulse(on: usize, off: usize, skip: usize) -> Waveform {
        assert!(on + off > 0, "A pulse needs a non-empty period");
        Waveform::Pulse { on, off, skip }
    }

    /// Restart the sequence
    pub fn values(&self) -> Box<dyn Iterator<Item = bool> + '_> {
        match self {
            Waveform::Constant(v) => Box::new(iter::repeat(*v)),
            Waveform::Pulse { on, off, skip } => {
                if on + off == 0 {
                    return Box::new(iter::repeat(false));
                }
                let period = iter::repeat(true)
                    .take(*on)
                    .chain(iter::repeat(false).take(*off));
                Box::new(iter::repeat(false).take(*skip).chain(period.cycle()))
            }
            Waveform::Pattern(p) => {
                if p.is_empty() {
                    Box::new(iter::repeat(false))
                } else {
                    Box::new(p.iter().copied().cycle())
                }
            }
            Waveform::Random { seed } => {
                let mut rng = SmallRng::seed_from_u64(*seed);
                Box::new(iter::repeat_with(move || rng.gen()))
            }
        }
    }

    /// The first `nb` values of the sequence
    pub fn take(&self, nb: usize) -> Vec<bool> {
        self.values().take(nb).collect()
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Constant(v) => write!(f, "constant {}", *v as u8),
            Waveform::Pulse { on, off, skip } => {
                write!(f, "pulse on={} off={} skip={}", on, off, skip)
            }
            Waveform::Pattern(p) => {
                write!(f, "pattern ")?;
                for b in p.iter() {
                    write!(f, "{}", *b as u8)?;
                }
                Ok(())
            }
            Waveform::Random { seed } => write!(f, "random seed={}", seed),
        }
    }
}

/// External connection of a layer
///
/// Input pins drive their node with their waveform. Output pins are observed, and their waveform
/// holds the values they are expected to show.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Pin {
    /// Name shown to the user
    pub name: String,
    /// Anchor cell, top-left corner of the footprint
    pub position: Position,
    /// Footprint width in cells
    pub width: usize,
    /// Footprint height in cells
    pub height: usize,
    /// Whether the pin is observed rather than driven
    pub is_output: bool,
    /// Driven or expected values
    pub values: Waveform,
}

impl Pin {
    /// Create a single-cell input pin
    pub fn input(name: &str, position: Position, values: Waveform) -> Pin {
        Pin {
            name: name.to_string(),
            position,
            width: 1,
            height: 1,
            is_output: false,
            values,
        }
    }

    /// Create a single-cell output pin, with the values it is expected to show
    pub fn output(name: &str, position: Position, expected: Waveform) -> Pin {
        Pin {
            is_output: true,
            ..Pin::input(name, position, expected)
        }
    }

    /// Change the footprint of the pin
    pub fn with_size(mut self, width: usize, height: usize) -> Pin {
        assert!(width > 0 && height > 0, "A pin covers at least one cell");
        self.width = width;
        self.height = height;
        self
    }

    /// Cells covered by the pin
    pub fn footprint(&self) -> impl Iterator<Item = Position> + '_ {
        let p = self.position;
        (p.row..p.row + self.height)
            .flat_map(move |row| (p.col..p.col + self.width).map(move |col| Position { row, col }))
    }
}
