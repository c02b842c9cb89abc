//! Representation and editing of transistor layouts
//!
//! A [`Layer`] is a grid of cells. Each cell may hold doped silicon (possibly forming a transistor
//! gate or carrying a via) and metal, and is linked to its four neighbours independently on each
//! layer. Pins bind named external inputs and outputs to the grid.

mod cell;
pub mod generators;
mod geometry;
mod layer;
mod pin;

pub use cell::{Cell, Doping, Link, SiliconLink, SiliconType};
pub use geometry::{Direction, Position};
pub use layer::Layer;
pub use pin::{Pin, Waveform};
