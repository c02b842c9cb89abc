use std::fmt;

/// Position of a cell in a layer, as row and column
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct Position {
    /// Row index, growing downwards
    pub row: usize,
    /// Column index, growing rightwards
    pub col: usize,
}

impl Position {
    /// Create a position from a row and a column
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Position of the neighbour in the given direction, if it lies inside a `rows x cols` grid
    pub fn step(&self, dir: Direction, rows: usize, cols: usize) -> Option<Position> {
        let (dr, dc) = dir.offset();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row < rows && col < cols {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// Direction leading from this position to a neighbour, if they are adjacent
    pub fn direction_to(&self, other: Position) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| {
            let (dr, dc) = d.offset();
            self.row.checked_add_signed(dr) == Some(other.row)
                && self.col.checked_add_signed(dc) == Some(other.col)
        })
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four directions linking a cell to its neighbours
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Direction {
    /// Previous row
    Top,
    /// Next column
    Right,
    /// Next row
    Bottom,
    /// Previous column
    Left,
}

impl Direction {
    /// All directions, in storage order
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Index of the direction in per-cell link tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing back
    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 2) % 4]
    }

    /// The two directions at a right angle to this one
    pub fn perpendicular(self) -> [Direction; 2] {
        [
            Direction::ALL[(self.index() + 1) % 4],
            Direction::ALL[(self.index() + 3) % 4],
        ]
    }

    /// Whether the direction moves between rows
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }

    fn offset(self) -> (isize, isize) {
        match self {
            Direction::Top => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Bottom => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Top => "top",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Position};

    #[test]
    fn test_step() {
        let p = Position::new(0, 0);
        assert_eq!(p.step(Direction::Top, 3, 3), None);
        assert_eq!(p.step(Direction::Left, 3, 3), None);
        assert_eq!(p.step(Direction::Right, 3, 3), Some(Position::new(0, 1)));
        assert_eq!(p.step(Direction::Bottom, 3, 3), Some(Position::new(1, 0)));
        let q = Position::new(2, 2);
        assert_eq!(q.step(Direction::Right, 3, 3), None);
        assert_eq!(q.step(Direction::Bottom, 3, 3), None);
    }

    #[test]
    fn test_directions() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
            for p in d.perpendicular() {
                assert_ne!(p.is_vertical(), d.is_vertical());
            }
        }
        let p = Position::new(1, 1);
        for d in Direction::ALL {
            let n = p.step(d, 3, 3).unwrap();
            assert_eq!(p.direction_to(n), Some(d));
            assert_eq!(n.direction_to(p), Some(d.opposite()));
        }
        assert_eq!(p.direction_to(Position::new(2, 2)), None);
        assert_eq!(p.direction_to(p), None);
    }
}
