//! Layout generators and templates

use crate::layout::{Layer, Pin, Position, Waveform};

/// Number of read-only columns on each side of a level
pub const LOCKED_COLUMNS: usize = 4;

/// Default number of rows of a level
pub const LEVEL_ROWS: usize = 27;

/// Default number of columns of a level
pub const LEVEL_COLUMNS: usize = 30;

/// An empty level with power and data pins on both sides
///
/// Four `+VCC` pins sit in the corners, inputs `A0` to `A3` on the left and outputs `B0` to `B3`
/// on the right. Each pin is a 3x3 metal pad, and the pin columns are read-only.
pub fn level_template(rows: usize, cols: usize) -> Layer {
    assert!(rows >= 25, "A level needs at least 25 rows");
    assert!(
        cols >= 2 * LOCKED_COLUMNS,
        "A level needs at least {} columns",
        2 * LOCKED_COLUMNS
    );
    let mut ret = Layer::new(rows, cols);
    let right = cols - 3;
    // Pads are centered on the given cell
    let pad = |row: usize, col: usize| Position::new(row - 1, col - 1);

    let data_pins = [
        Pin::input("A0", pad(7, 2), Waveform::pulse(10, 10, 0)),
        Pin::input("A1", pad(11, 2), Waveform::pulse(10, 10, 10)),
        Pin::input("A2", pad(15, 2), Waveform::pulse(20, 10, 0)),
        Pin::input("A3", pad(19, 2), Waveform::pulse(10, 30, 0)),
        Pin::output("B0", pad(7, right), Waveform::always_up()),
        Pin::output("B1", pad(11, right), Waveform::always_up()),
        Pin::output("B2", pad(15, right), Waveform::always_up()),
        Pin::output("B3", pad(19, right), Waveform::always_up()),
    ];
    let power_pins = [
        Pin::input("+VCC", pad(3, 2), Waveform::always_up()),
        Pin::input("+VCC", pad(23, 2), Waveform::always_up()),
        Pin::input("+VCC", pad(3, right), Waveform::always_up()),
        Pin::input("+VCC", pad(23, right), Waveform::always_up()),
    ];
    for pin in data_pins.into_iter().chain(power_pins) {
        ret.place_pin(pin.with_size(3, 3));
    }

    for row in 0..rows {
        for col in 0..LOCKED_COLUMNS {
            ret.set_locked(Position::new(row, col), true);
            ret.set_locked(Position::new(row, cols - col - 1), true);
        }
    }
    ret
}

/// Small circuits used to test extraction and simulation
///
/// Inputs follow `A = pulse(10, 10, 10)` and `B = pulse(20, 20, 20)`, so that the four input
/// combinations appear every 40 steps. The expected waveform of each output accounts for the
/// one-step delay of a transistor.
pub mod testcases {
    use crate::layout::{Doping, Layer, Pin, Position, Waveform};

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn input_a() -> Waveform {
        Waveform::pulse(10, 10, 10)
    }

    fn input_b() -> Waveform {
        Waveform::pulse(20, 20, 20)
    }

    /// Place a via and a single-cell pin on a silicon cell
    fn tap(layer: &mut Layer, pin: Pin) {
        let pos = pin.position;
        assert!(layer.put_via(pos));
        layer.place_pin(pin);
    }

    /// A single vertical transistor switching power from `VCC` to `OUT`, controlled by `A`
    ///
    /// The conductor runs on column 2 from row 1 to row 3, the gate sits at (2, 2) and its
    /// input at (2, 1).
    fn switch(base: Doping, expected: Waveform) -> Layer {
        let mut ret = Layer::new(5, 5);
        ret.draw_silicon_path(&[p(1, 2), p(2, 2), p(3, 2)], base);
        ret.draw_silicon_path(&[p(2, 1), p(2, 2)], base.opposite());
        tap(&mut ret, Pin::input("VCC", p(1, 2), Waveform::always_up()));
        tap(&mut ret, Pin::input("A", p(2, 1), input_a()));
        tap(&mut ret, Pin::output("OUT", p(3, 2), expected));
        ret
    }

    /// Buffer: an N-type transistor, conducting when `A` is high
    pub fn npn_switch() -> Layer {
        switch(Doping::N, Waveform::pulse(10, 10, 11))
    }

    /// Inverter: a P-type transistor, conducting when `A` is low
    pub fn pnp_switch() -> Layer {
        switch(Doping::P, Waveform::pulse(10, 10, 1))
    }

    /// Two horizontal transistors in a chain, controlled from above by `A` and `B`
    ///
    /// The conductor runs on row 3 from column 1 to column 6; gates sit at (3, 3) and (3, 4).
    fn chain(base: Doping, expected: Waveform) -> Layer {
        let mut ret = Layer::new(6, 8);
        let conductor: Vec<Position> = (1..7).map(|col| p(3, col)).collect();
        ret.draw_silicon_path(&conductor, base);
        ret.draw_silicon_path(&[p(1, 3), p(2, 3), p(3, 3)], base.opposite());
        ret.draw_silicon_path(&[p(1, 4), p(2, 4), p(3, 4)], base.opposite());
        tap(&mut ret, Pin::input("VCC", p(3, 1), Waveform::always_up()));
        tap(&mut ret, Pin::input("A", p(1, 3), input_a()));
        tap(&mut ret, Pin::input("B", p(1, 4), input_b()));
        tap(&mut ret, Pin::output("OUT", p(3, 6), expected));
        ret
    }

    /// A single horizontal transistor controlled from above by `A` and from below by `B`
    ///
    /// The conductor runs on row 3 from column 1 to column 5; the gate sits at (3, 3).
    fn double_input(base: Doping, expected: Waveform) -> Layer {
        let mut ret = Layer::new(7, 7);
        let conductor: Vec<Position> = (1..6).map(|col| p(3, col)).collect();
        ret.draw_silicon_path(&conductor, base);
        ret.draw_silicon_path(&[p(1, 3), p(2, 3), p(3, 3)], base.opposite());
        ret.draw_silicon_path(&[p(5, 3), p(4, 3), p(3, 3)], base.opposite());
        tap(&mut ret, Pin::input("VCC", p(3, 1), Waveform::always_up()));
        tap(&mut ret, Pin::input("A", p(1, 3), input_a()));
        tap(&mut ret, Pin::input("B", p(5, 3), input_b()));
        tap(&mut ret, Pin::output("OUT", p(3, 5), expected));
        ret
    }

    /// And gate: two N-type transistors in a chain
    pub fn and2() -> Layer {
        chain(Doping::N, Waveform::pulse(10, 30, 31))
    }

    /// Nand gate: two P-type transistors in a chain
    pub fn nand2() -> Layer {
        chain(Doping::P, Waveform::pulse(30, 10, 1))
    }

    /// Or gate: one N-type transistor with inputs on both sides
    pub fn or2() -> Layer {
        double_input(Doping::N, Waveform::pulse(30, 10, 11))
    }

    /// Nor gate: one P-type transistor with inputs on both sides
    pub fn nor2() -> Layer {
        double_input(Doping::P, Waveform::pulse(10, 30, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::{level_template, testcases, LEVEL_COLUMNS, LEVEL_ROWS, LOCKED_COLUMNS};
    use crate::layout::{Direction, Position, SiliconLink, SiliconType};

    #[test]
    fn test_level_template() {
        let l = level_template(LEVEL_ROWS, LEVEL_COLUMNS);
        assert_eq!(l.pins().len(), 12);
        assert_eq!(l.pins().iter().filter(|p| p.is_output).count(), 4);
        assert_eq!(l.pins().iter().filter(|p| p.name == "+VCC").count(), 4);
        for row in 0..LEVEL_ROWS {
            assert!(l.is_locked(Position::new(row, 0)));
            assert!(l.is_locked(Position::new(row, LOCKED_COLUMNS - 1)));
            assert!(!l.is_locked(Position::new(row, LOCKED_COLUMNS)));
            assert!(l.is_locked(Position::new(row, LEVEL_COLUMNS - 1)));
        }
        // Pads are centered on the pin cell
        assert!(l.cell(Position::new(6, 1)).metal);
        assert!(l.cell(Position::new(8, 3)).metal);
        assert!(!l.cell(Position::new(9, 3)).metal);
        assert_eq!(l.cell(Position::new(7, 2)).pin, Some(0));
    }

    #[test]
    fn test_switch_structure() {
        let l = testcases::npn_switch();
        assert_eq!(l.cell(Position::new(2, 2)).silicon, SiliconType::NTypeVGate);
        assert_eq!(l.cell(Position::new(1, 2)).silicon, SiliconType::NTypeVia);
        assert_eq!(l.cell(Position::new(2, 1)).silicon, SiliconType::PTypeVia);
        assert_eq!(
            l.link(Position::new(2, 2), Direction::Left).silicon,
            SiliconLink::Slave
        );
        let l = testcases::pnp_switch();
        assert_eq!(l.cell(Position::new(2, 2)).silicon, SiliconType::PTypeVGate);
    }

    #[test]
    fn test_two_input_structure() {
        let l = testcases::and2();
        assert_eq!(l.cell(Position::new(3, 3)).silicon, SiliconType::NTypeHGate);
        assert_eq!(l.cell(Position::new(3, 4)).silicon, SiliconType::NTypeHGate);
        assert_eq!(l.cell(Position::new(3, 5)).silicon, SiliconType::NType);
        let l = testcases::nor2();
        let gate = Position::new(3, 3);
        assert_eq!(l.cell(gate).silicon, SiliconType::PTypeHGate);
        assert_eq!(l.link(gate, Direction::Top).silicon, SiliconLink::Slave);
        assert_eq!(l.link(gate, Direction::Bottom).silicon, SiliconLink::Slave);
        assert_eq!(
            l.link(gate, Direction::Left).silicon,
            SiliconLink::BiDirectional
        );
        assert_eq!(l.pins().len(), 4);
    }
}
