use crate::layout::{Cell, Direction, Doping, Link, Pin, Position, SiliconLink, SiliconType};

/// A rectangular grid of cells, each with a silicon and a metal layer, and the links between them
///
/// Links are stored on both sides of each pair of neighbours. They are only written through
/// [`Layer::set_silicon_link`] and [`Layer::set_metal_link`], so that a `Master` link on one side
/// is always seen as `Slave` from the other side.
///
/// The drawing operations follow the rules of the layout editor: they refuse edits that would
/// produce an inconsistent transistor, and report whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    links: Vec<[Link; 4]>,
    pins: Vec<Pin>,
}

impl Layer {
    /// Create an empty layer
    pub fn new(rows: usize, cols: usize) -> Self {
        Layer {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
            links: vec![[Link::default(); 4]; rows * cols],
            pins: Vec::new(),
        }
    }

    /// Return the number of rows
    pub fn nb_rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns
    pub fn nb_cols(&self) -> usize {
        self.cols
    }

    /// Return whether the position lies inside the layer
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "Position {} is outside of the {}x{} layer",
            pos,
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    /// Get the cell at a position
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    /// Get the link from a cell toward one of its neighbours
    pub fn link(&self, pos: Position, dir: Direction) -> Link {
        self.links[self.index(pos)][dir.index()]
    }

    /// Get the neighbour of a cell, if it lies inside the layer
    pub fn neighbour(&self, pos: Position, dir: Direction) -> Option<Position> {
        pos.step(dir, self.rows, self.cols)
    }

    /// Iterate over all positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Position { row, col }))
    }

    /// Return the pins of the layer
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Get the pin at index i
    pub fn pin(&self, i: usize) -> &Pin {
        &self.pins[i]
    }

    /// Return whether the cell is read-only
    pub fn is_locked(&self, pos: Position) -> bool {
        self.cell(pos).locked
    }

    /// Set the silicon content of a cell, without any check
    pub fn set_silicon(&mut self, pos: Position, silicon: SiliconType) {
        let i = self.index(pos);
        self.cells[i].silicon = silicon;
    }

    /// Set the metal content of a cell, without any check
    pub fn set_metal(&mut self, pos: Position, metal: bool) {
        let i = self.index(pos);
        self.cells[i].metal = metal;
    }

    /// Mark a cell as read-only or not
    pub fn set_locked(&mut self, pos: Position, locked: bool) {
        let i = self.index(pos);
        self.cells[i].locked = locked;
    }

    /// Set the silicon link between a cell and its neighbour; the neighbour sees the reverse link
    pub fn set_silicon_link(&mut self, pos: Position, dir: Direction, link: SiliconLink) {
        let other = self.expect_neighbour(pos, dir);
        let i = self.index(pos);
        let j = self.index(other);
        self.links[i][dir.index()].silicon = link;
        self.links[j][dir.opposite().index()].silicon = link.reverse();
    }

    /// Set the metal link between a cell and its neighbour
    pub fn set_metal_link(&mut self, pos: Position, dir: Direction, metal: bool) {
        let other = self.expect_neighbour(pos, dir);
        let i = self.index(pos);
        let j = self.index(other);
        self.links[i][dir.index()].metal = metal;
        self.links[j][dir.opposite().index()].metal = metal;
    }

    fn expect_neighbour(&self, pos: Position, dir: Direction) -> Position {
        match self.neighbour(pos, dir) {
            Some(p) => p,
            None => panic!("Cell {} has no neighbour to the {}", pos, dir),
        }
    }

    /// Bind a pin to the layer, laying a fully connected metal pad over its footprint
    ///
    /// Returns the index of the pin.
    pub fn place_pin(&mut self, pin: Pin) -> usize {
        let id = self.pins.len();
        let cells: Vec<Position> = pin.footprint().collect();
        for &pos in &cells {
            assert!(
                self.contains(pos),
                "Pin {} does not fit in the layer at {}",
                pin.name,
                pos
            );
        }
        for &pos in &cells {
            let i = self.index(pos);
            self.cells[i].metal = true;
            self.cells[i].pin = Some(id);
        }
        for &pos in &cells {
            for dir in [Direction::Right, Direction::Bottom] {
                if let Some(n) = self.neighbour(pos, dir) {
                    if cells.contains(&n) {
                        self.set_metal_link(pos, dir, true);
                    }
                }
            }
        }
        self.pins.push(pin);
        id
    }

    /// Add metal to a single cell
    pub fn add_metal(&mut self, pos: Position) -> bool {
        let cell = *self.cell(pos);
        if cell.metal || cell.locked {
            return false;
        }
        self.set_metal(pos, true);
        true
    }

    /// Draw metal on two neighbouring cells and link them
    ///
    /// Locked cells may be linked to only if they already carry metal.
    pub fn draw_metal(&mut self, from: Position, to: Position) -> bool {
        if from == to {
            return self.add_metal(from);
        }
        let Some(dir) = from.direction_to(to) else {
            return false;
        };
        let (a, b) = (*self.cell(from), *self.cell(to));
        if (!a.metal && a.locked) || (!b.metal && b.locked) {
            return false;
        }
        if a.metal && b.metal && self.link(from, dir).metal {
            return false;
        }
        self.set_metal(from, true);
        self.set_metal(to, true);
        self.set_metal_link(from, dir, true);
        true
    }

    /// Draw metal along a path of neighbouring cells
    pub fn draw_metal_path(&mut self, path: &[Position]) -> bool {
        let mut changed = false;
        if let Some(&first) = path.first() {
            changed |= self.add_metal(first);
        }
        for w in path.windows(2) {
            changed |= self.draw_metal(w[0], w[1]);
        }
        changed
    }

    /// Return whether silicon of the given doping may be drawn from a cell to its neighbour
    pub fn can_draw_silicon(&self, from: Position, to: Position, doping: Doping) -> bool {
        let Some(dir) = from.direction_to(to) else {
            return false;
        };
        // Cells already on both sides of a transistor stay as they are
        if matches!(
            self.link(from, dir).silicon,
            SiliconLink::Master | SiliconLink::Slave
        ) {
            return false;
        }
        let inverted = doping.opposite();
        let f = self.cell(from).silicon;
        let t = self.cell(to).silicon;
        if f.is_gate_of(inverted) || f.is_plain_of(inverted) {
            return false;
        }
        if !f.is_gate_of(doping) && !f.is_plain_of(doping) {
            return false;
        }
        if t.is_plain_of(doping) && self.link(from, dir).silicon != SiliconLink::BiDirectional {
            return true;
        }
        if t == SiliconType::None {
            return true;
        }
        // A gate can only be drawn across a conductor running through the target cell
        let crossable = t.is_gate_of(inverted) || t == SiliconType::plain(inverted);
        crossable
            && dir
                .perpendicular()
                .iter()
                .all(|d| self.link(to, *d).silicon == SiliconLink::BiDirectional)
    }

    /// Draw silicon on a single empty cell, or from a cell to its neighbour
    ///
    /// Drawing across silicon of the opposite doping creates a transistor gate on the target cell,
    /// controlled by the source cell.
    pub fn draw_silicon(&mut self, from: Position, to: Position, doping: Doping) -> bool {
        if self.is_locked(from) || self.is_locked(to) {
            return false;
        }
        if from == to {
            if self.cell(from).silicon != SiliconType::None {
                return false;
            }
            self.set_silicon(from, SiliconType::plain(doping));
            return true;
        }
        if !self.can_draw_silicon(from, to, doping) {
            return false;
        }
        let Some(dir) = from.direction_to(to) else {
            return false;
        };
        let t = self.cell(to).silicon;
        if t == SiliconType::None {
            self.set_silicon(to, SiliconType::plain(doping));
            self.set_silicon_link(from, dir, SiliconLink::BiDirectional);
        } else if t.is_plain_of(doping) {
            self.set_silicon_link(from, dir, SiliconLink::BiDirectional);
        } else {
            // The gate switches the conductor perpendicular to the drawing direction
            self.set_silicon(to, SiliconType::gate(doping.opposite(), !dir.is_vertical()));
            self.set_silicon_link(from, dir, SiliconLink::Master);
        }
        true
    }

    /// Draw silicon along a path of neighbouring cells
    pub fn draw_silicon_path(&mut self, path: &[Position], doping: Doping) -> bool {
        let mut changed = false;
        if let Some(&first) = path.first() {
            changed |= self.draw_silicon(first, first, doping);
        }
        for w in path.windows(2) {
            changed |= self.draw_silicon(w[0], w[1], doping);
        }
        changed
    }

    /// Bridge the silicon and metal layers of a cell
    pub fn put_via(&mut self, pos: Position) -> bool {
        let cell = *self.cell(pos);
        if cell.locked || cell.silicon.has_via() {
            return false;
        }
        match cell.silicon.with_via() {
            Some(s) => {
                self.set_silicon(pos, s);
                true
            }
            None => false,
        }
    }

    /// Remove the via of a cell
    pub fn delete_via(&mut self, pos: Position) -> bool {
        let cell = *self.cell(pos);
        if cell.locked || !cell.silicon.has_via() {
            return false;
        }
        self.set_silicon(pos, cell.silicon.base());
        true
    }

    /// Remove the metal of a cell and all its metal links
    pub fn delete_metal(&mut self, pos: Position) -> bool {
        let cell = *self.cell(pos);
        if cell.locked || !cell.metal {
            return false;
        }
        for dir in Direction::ALL {
            if self.neighbour(pos, dir).is_some() {
                self.set_metal_link(pos, dir, false);
            }
        }
        self.set_metal(pos, false);
        true
    }

    /// Remove the silicon of a cell and all its silicon links
    ///
    /// Gates linked to the cell lose their transistor and revert to plain silicon.
    pub fn delete_silicon(&mut self, pos: Position) -> bool {
        let cell = *self.cell(pos);
        if cell.locked || cell.silicon == SiliconType::None {
            return false;
        }
        for dir in Direction::ALL {
            let Some(n) = self.neighbour(pos, dir) else {
                continue;
            };
            let linked = self.link(pos, dir).silicon != SiliconLink::None;
            self.set_silicon_link(pos, dir, SiliconLink::None);
            if linked && self.cell(n).silicon.is_gate() {
                self.remove_gate(n);
            }
        }
        self.set_silicon(pos, SiliconType::None);
        true
    }

    fn remove_gate(&mut self, pos: Position) {
        let base = self.cell(pos).silicon.base();
        self.set_silicon(pos, base);
        for dir in Direction::ALL {
            if self.neighbour(pos, dir).is_some()
                && self.link(pos, dir).silicon == SiliconLink::Slave
            {
                self.set_silicon_link(pos, dir, SiliconLink::None);
            }
        }
    }
}
