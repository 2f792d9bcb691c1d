//! Tests for word placement and the puzzle engine.

use rand::SeedableRng;
use rand_pcg::Pcg64;
use teamquest_games::games::puzzle::{Direction, generate};
use teamquest_games::{
    Coord, Difficulty, Grid, PuzzleOutcome, PuzzleSettings, PuzzleState, SelectError,
    SelectionOutcome,
};

/// Brute-force search for `word` read forwards or backwards along a straight line.
fn locate(grid: &Grid, word: &str) -> Option<Vec<Coord>> {
    let len = word.chars().count();
    let reversed: String = word.chars().rev().collect();
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            for direction in Direction::ALL {
                let path: Option<Vec<Coord>> = (0..len)
                    .map(|i| Coord::new(row, col).step(direction, i))
                    .collect();
                let Some(path) = path else { continue };
                if !path.iter().all(|c| grid.contains(*c)) {
                    continue;
                }
                let read = grid.read(&path);
                if read == word || read == reversed {
                    return Some(path);
                }
            }
        }
    }
    None
}

fn puzzle(difficulty: Difficulty, seed: u64) -> PuzzleState {
    let settings = PuzzleSettings::default();
    let layout = settings.layout(difficulty);
    let generated = generate(
        &layout.words,
        layout.grid_size,
        settings.placement_attempts,
        &mut Pcg64::seed_from_u64(seed),
    );
    PuzzleState::new(generated)
}

fn select_all(state: &mut PuzzleState, path: &[Coord]) -> Vec<SelectionOutcome> {
    path.iter()
        .map(|c| state.select(*c).expect("active puzzle"))
        .collect()
}

#[test]
fn test_placed_words_are_discoverable() {
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        for seed in 0..20 {
            let state = puzzle(difficulty, seed);
            assert!(state.placed_words().len() <= state.target_words().len());
            for word in state.placed_words() {
                assert!(state.target_words().contains(word));
                assert!(
                    locate(state.grid(), word).is_some(),
                    "{} not in {:?} grid for seed {}",
                    word,
                    difficulty,
                    seed
                );
            }
        }
    }
}

#[test]
fn test_grid_size_follows_difficulty() {
    assert_eq!(puzzle(Difficulty::Easy, 1).grid().size(), 8);
    assert_eq!(puzzle(Difficulty::Medium, 1).grid().size(), 10);
    assert_eq!(puzzle(Difficulty::Hard, 1).grid().size(), 12);
}

#[test]
fn test_forward_and_reverse_selection_both_match() {
    let mut state = puzzle(Difficulty::Easy, 3);
    let words = state.placed_words().to_vec();
    assert!(words.len() >= 2, "seeded easy puzzle places several words");

    let forward = locate(state.grid(), &words[0]).expect("placed word");
    let outcomes = select_all(&mut state, &forward);
    assert_eq!(
        outcomes.last(),
        Some(&SelectionOutcome::Found {
            word: words[0].clone()
        })
    );

    let mut backward = locate(state.grid(), &words[1]).expect("placed word");
    backward.reverse();
    let outcomes = select_all(&mut state, &backward);
    assert_eq!(
        outcomes.last(),
        Some(&SelectionOutcome::Found {
            word: words[1].clone()
        })
    );
    assert_eq!(state.found_words(), &words[..2]);
    assert!(state.selection().is_empty());
}

#[test]
fn test_reselecting_found_word_is_noop() {
    let mut state = puzzle(Difficulty::Medium, 5);
    let word = state.placed_words()[0].clone();
    let path = locate(state.grid(), &word).expect("placed word");

    select_all(&mut state, &path);
    assert!(state.is_found(&word));

    let outcomes = select_all(&mut state, &path);
    assert!(outcomes.iter().all(|o| !o.is_found()));
    assert_eq!(state.found_words().iter().filter(|w| **w == word).count(), 1);
}

#[test]
fn test_selection_resets_at_longest_word_length() {
    let mut state = puzzle(Difficulty::Easy, 11);
    let longest = state
        .placed_words()
        .iter()
        .map(|w| w.chars().count())
        .max()
        .expect("placed words");

    // Repeating one cell never spells a word.
    let cell = Coord::new(0, 0);
    for n in 1..longest {
        assert_eq!(state.select(cell), Ok(SelectionOutcome::Extended { len: n }));
    }
    assert_eq!(state.select(cell), Ok(SelectionOutcome::Reset));
    assert!(state.selection().is_empty());
    assert!(state.found_words().is_empty());
}

#[test]
fn test_out_of_bounds_selection_rejected() {
    let mut state = puzzle(Difficulty::Easy, 2);
    let outside = Coord::new(8, 0);
    assert_eq!(state.select(outside), Err(SelectError::OutOfBounds(outside)));
    assert!(state.selection().is_empty());
}

#[test]
fn test_finding_every_word_completes() {
    let mut state = puzzle(Difficulty::Easy, 8);
    for _ in 0..3 {
        state.tick();
    }
    let words = state.placed_words().to_vec();
    for word in &words {
        let path = locate(state.grid(), word).expect("placed word");
        select_all(&mut state, &path);
    }
    assert_eq!(state.outcome(), PuzzleOutcome::Completed);

    let report = state.report().expect("terminal");
    assert_eq!(report.words_found as usize, words.len());
    assert_eq!(report.total_words as usize, words.len());
    assert_eq!(report.elapsed_secs, 3);

    // The clock stops once the puzzle ends.
    state.tick();
    assert_eq!(state.elapsed_secs(), 3);
    assert_eq!(state.select(Coord::new(0, 0)), Err(SelectError::NotActive));
}

#[test]
fn test_give_up_keeps_partial_progress() {
    let mut state = puzzle(Difficulty::Medium, 4);
    let word = state.placed_words()[0].clone();
    let path = locate(state.grid(), &word).expect("placed word");
    select_all(&mut state, &path);
    state.tick();

    state.give_up().expect("active puzzle");
    assert_eq!(state.outcome(), PuzzleOutcome::Abandoned);
    let report = state.report().expect("terminal");
    assert_eq!(report.words_found, 1);
    assert_eq!(report.elapsed_secs, 1);
    assert_eq!(state.give_up(), Err(SelectError::NotActive));
}

#[test]
fn test_unplaceable_words_start_completed() {
    let words = vec!["MUCHTOOLONG".to_string()];
    let generated = generate(&words, 4, 10, &mut Pcg64::seed_from_u64(1));
    assert_eq!(generated.dropped, vec!["MUCHTOOLONG".to_string()]);

    let state = PuzzleState::new(generated);
    assert_eq!(state.outcome(), PuzzleOutcome::Completed);
    assert!(state.placed_words().is_empty());
    assert_eq!(state.target_words(), &["MUCHTOOLONG".to_string()]);
}
