//! Randomized word placement.
//!
//! Each word gets a fixed budget of random `(direction, anchor)` tries. A
//! placement is valid when every cell it covers is inside the grid and either
//! empty or already holding the same letter, so words may cross but never
//! overwrite. Words that run out of tries are dropped from the puzzle, and the
//! remaining empty cells are filled with uniform random letters.

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use super::grid::{Coord, Direction, Grid};

/// Where a word was embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The word, normalized to upper case.
    pub word: String,
    /// Cell of the first letter.
    pub start: Coord,
    /// Reading direction.
    pub direction: Direction,
}

impl Placement {
    /// Coordinates covered by the word, first letter first.
    pub fn path(&self) -> Vec<Coord> {
        (0..self.word.chars().count())
            .filter_map(|i| self.start.step(self.direction, i))
            .collect()
    }
}

/// Output of [`generate`].
#[derive(Debug, Clone)]
pub struct GeneratedPuzzle {
    /// Filled grid.
    pub grid: Grid,
    /// Normalized configured words, in configured order.
    pub words: Vec<String>,
    /// Successful placements, in configured order.
    pub placements: Vec<Placement>,
    /// Words that exhausted their placement budget.
    pub dropped: Vec<String>,
}

/// Working grid during placement; `None` marks an empty cell.
struct Canvas {
    size: usize,
    cells: Vec<Option<char>>,
}

impl Canvas {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        (coord.row < self.size && coord.col < self.size).then_some(coord.row * self.size + coord.col)
    }

    fn fits(&self, letters: &[char], start: Coord, direction: Direction) -> bool {
        letters.iter().enumerate().all(|(i, &letter)| {
            start
                .step(direction, i)
                .and_then(|coord| self.index(coord))
                .is_some_and(|idx| self.cells[idx].is_none_or(|existing| existing == letter))
        })
    }

    fn commit(&mut self, letters: &[char], start: Coord, direction: Direction) {
        for (i, &letter) in letters.iter().enumerate() {
            if let Some(idx) = start.step(direction, i).and_then(|c| self.index(c)) {
                self.cells[idx] = Some(letter);
            }
        }
    }

    fn fill<R: Rng>(self, rng: &mut R) -> Grid {
        let cells = self
            .cells
            .into_iter()
            .map(|cell| cell.unwrap_or_else(|| char::from(b'A' + rng.random_range(0..26u8))))
            .collect();
        Grid::from_cells(self.size, cells)
    }
}

/// Tries to embed one word, returning where it landed.
fn place_word<R: Rng>(
    canvas: &mut Canvas,
    word: &str,
    attempts: u32,
    rng: &mut R,
) -> Option<Placement> {
    let letters: Vec<char> = word.chars().collect();
    for attempt in 0..attempts {
        let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        let start = Coord::new(
            rng.random_range(0..canvas.size),
            rng.random_range(0..canvas.size),
        );
        if canvas.fits(&letters, start, direction) {
            canvas.commit(&letters, start, direction);
            debug!(word, %start, %direction, attempt, "Word placed");
            return Some(Placement {
                word: word.to_string(),
                start,
                direction,
            });
        }
    }
    None
}

/// Generates a `size`×`size` puzzle hiding as many of `words` as fit.
#[instrument(skip(words, rng), fields(words = words.len()))]
pub fn generate<R: Rng>(
    words: &[String],
    size: usize,
    attempts: u32,
    rng: &mut R,
) -> GeneratedPuzzle {
    let mut canvas = Canvas::new(size);
    let mut normalized = Vec::with_capacity(words.len());
    let mut placements = Vec::new();
    let mut dropped = Vec::new();

    for word in words {
        let word = word.trim().to_uppercase();
        if word.is_empty() {
            warn!("Skipping empty puzzle word");
            continue;
        }
        if normalized.contains(&word) {
            warn!(word = %word, "Skipping duplicate puzzle word");
            continue;
        }
        if size > 0
            && let Some(placement) = place_word(&mut canvas, &word, attempts, rng)
        {
            placements.push(placement);
        } else {
            warn!(word = %word, attempts, "Placement exhausted, dropping word");
            dropped.push(word.clone());
        }
        normalized.push(word);
    }

    info!(
        placed = placements.len(),
        dropped = dropped.len(),
        size,
        "Puzzle generated"
    );

    GeneratedPuzzle {
        grid: canvas.fill(rng),
        words: normalized,
        placements,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_crossing_requires_matching_letter() {
        let mut canvas = Canvas::new(5);
        let cat: Vec<char> = "CAT".chars().collect();
        canvas.commit(&cat, Coord::new(0, 0), Direction::Horizontal);

        let arm: Vec<char> = "ARM".chars().collect();
        assert!(canvas.fits(&arm, Coord::new(0, 1), Direction::Vertical));
        let dog: Vec<char> = "DOG".chars().collect();
        assert!(!canvas.fits(&dog, Coord::new(0, 1), Direction::Vertical));
    }

    #[test]
    fn test_fits_rejects_out_of_bounds() {
        let canvas = Canvas::new(3);
        let long: Vec<char> = "ABCD".chars().collect();
        for direction in Direction::ALL {
            for row in 0..3 {
                for col in 0..3 {
                    assert!(!canvas.fits(&long, Coord::new(row, col), direction));
                }
            }
        }
    }

    #[test]
    fn test_word_longer_than_grid_is_dropped() {
        let mut rng = Pcg64::seed_from_u64(7);
        let puzzle = generate(&words(&["toolongword", "ok"]), 4, 50, &mut rng);
        assert_eq!(puzzle.dropped, vec!["TOOLONGWORD".to_string()]);
        assert_eq!(puzzle.placements.len(), 1);
        assert_eq!(puzzle.words.len(), 2);
    }

    #[test]
    fn test_placements_read_back_from_grid() {
        let mut rng = Pcg64::seed_from_u64(42);
        let puzzle = generate(&words(&["RUST", "CARGO", "CRATE"]), 8, 50, &mut rng);
        for placement in &puzzle.placements {
            assert_eq!(puzzle.grid.read(&placement.path()), placement.word);
        }
        assert!(puzzle.grid.rows().flatten().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let list = words(&["ALPHA", "BRAVO", "DELTA"]);
        let a = generate(&list, 8, 50, &mut Pcg64::seed_from_u64(9));
        let b = generate(&list, 8, 50, &mut Pcg64::seed_from_u64(9));
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.placements, b.placements);
    }
}
