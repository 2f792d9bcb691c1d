//! Letter grid and coordinates.

use serde::{Deserialize, Serialize};

/// A cell coordinate, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Steps `n` cells along `direction`, or `None` when that leaves the
    /// non-negative quadrant.
    pub fn step(self, direction: Direction, n: usize) -> Option<Self> {
        let (d_row, d_col) = direction.delta();
        let row = self.row.checked_add_signed(d_row * n as isize)?;
        let col = self.col.checked_add_signed(d_col * n as isize)?;
        Some(Self { row, col })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Placement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Direction {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Down and to the right.
    DiagonalDown,
    /// Up and to the right.
    DiagonalUp,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    /// `(row, col)` step per letter.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (-1, 1),
        }
    }
}

/// Square grid of single letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<char>,
}

impl Grid {
    /// Builds a grid from row-major cells. `cells.len()` must be `size * size`.
    pub(crate) fn from_cells(size: usize, cells: Vec<char>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if `coord` lies inside the grid.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    /// Letter at `coord`, if inside the grid.
    pub fn get(&self, coord: Coord) -> Option<char> {
        self.contains(coord)
            .then(|| self.cells[coord.row * self.size + coord.col])
    }

    /// Iterates the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> + '_ {
        self.cells.chunks(self.size.max(1))
    }

    /// Reads the letters along a path of coordinates.
    ///
    /// Coordinates outside the grid are skipped.
    pub fn read(&self, path: &[Coord]) -> String {
        path.iter().filter_map(|c| self.get(*c)).collect()
    }

    /// Formats the grid as text with row and column indices.
    pub fn display(&self) -> String {
        let mut out = String::from("   ");
        for col in 0..self.size {
            out.push_str(&format!("{:>2}", col));
        }
        for (row, letters) in self.rows().enumerate() {
            out.push('\n');
            out.push_str(&format!("{:>2} ", row));
            for letter in letters {
                out.push(' ');
                out.push(*letter);
            }
        }
        out
    }
}
