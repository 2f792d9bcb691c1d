//! Tests for the XP scoring policy.

use teamquest_games::scoring::{BoardScoring, MoveTier};
use teamquest_games::{
    BoardOutcome, BoardReport, Difficulty, EngineReport, GameCatalog, GameDefinition, Mark,
    PuzzleOutcome, PuzzleReport, ScoreInput, ScoringPolicy, ScoringSettings,
};

fn definition(id: &str) -> GameDefinition {
    GameCatalog::default()
        .get(id)
        .cloned()
        .expect("built-in game")
}

fn board(outcome: BoardOutcome, move_count: u32) -> EngineReport {
    BoardReport {
        outcome,
        move_count,
    }
    .into()
}

fn puzzle(outcome: PuzzleOutcome, elapsed_secs: u32, words_found: u32) -> EngineReport {
    PuzzleReport {
        outcome,
        elapsed_secs,
        words_found,
        total_words: 6,
    }
    .into()
}

fn score(game: &GameDefinition, report: &EngineReport, players: usize) -> u32 {
    ScoringPolicy::default()
        .score(&ScoreInput {
            game,
            report,
            distinct_players: players,
            cancelled: false,
        })
        .total()
}

#[test]
fn test_fastest_board_win() {
    let game = definition("tic-tac-toe");
    let report = board(BoardOutcome::Won(Mark::A), 5);
    assert_eq!(score(&game, &report, 1), 25 + 15);
}

#[test]
fn test_board_speed_tiers() {
    let game = definition("tic-tac-toe");
    let won = |moves| score(&game, &board(BoardOutcome::Won(Mark::B), moves), 1);
    assert_eq!(won(6), 35);
    assert_eq!(won(7), 35);
    assert_eq!(won(8), 30);
    assert_eq!(won(9), 30);
}

#[test]
fn test_board_draw_is_flat() {
    let game = definition("tic-tac-toe");
    let report = board(BoardOutcome::Draw, 9);
    assert_eq!(score(&game, &report, 1), 10);
    assert_eq!(score(&game, &report, 2), 10);
}

#[test]
fn test_multiplayer_bonus_is_flat() {
    let game = definition("tic-tac-toe");
    let report = board(BoardOutcome::Won(Mark::A), 5);
    assert_eq!(score(&game, &report, 2), 25 + 15 + 10);

    let puzzle_game = definition("word-search");
    let report = board(BoardOutcome::Won(Mark::A), 9);
    assert_eq!(score(&puzzle_game, &report, 4), 30 + 5 + 20);
    assert_eq!(score(&puzzle_game, &report, 2), 30 + 5 + 20);
}

#[test]
fn test_completed_puzzle_fastest_tier() {
    let game = definition("word-search");
    let report = puzzle(PuzzleOutcome::Completed, 45, 6);
    let breakdown = ScoringPolicy::default().score(&ScoreInput {
        game: &game,
        report: &report,
        distinct_players: 1,
        cancelled: false,
    });
    assert_eq!(breakdown.base, 60);
    assert_eq!(breakdown.time_bonus, 25);
    assert_eq!(breakdown.difficulty_bonus, 10);
    assert_eq!(breakdown.total(), 95);
}

#[test]
fn test_puzzle_time_and_difficulty_tiers() {
    let medium = definition("word-search");
    let completed =
        |g: &GameDefinition, secs| score(g, &puzzle(PuzzleOutcome::Completed, secs, 6), 1);
    assert_eq!(completed(&medium, 59), 60 + 25 + 10);
    assert_eq!(completed(&medium, 60), 60 + 15 + 10);
    assert_eq!(completed(&medium, 150), 60 + 10 + 10);
    assert_eq!(completed(&medium, 180), 60 + 10);

    let easy = medium.with_difficulty(Difficulty::Easy);
    let hard = medium.with_difficulty(Difficulty::Hard);
    assert_eq!(completed(&easy, 400), 60);
    assert_eq!(completed(&hard, 400), 60 + 20);
}

#[test]
fn test_abandoned_puzzle_partial_credit() {
    let game = definition("word-search");
    let report = puzzle(PuzzleOutcome::Abandoned, 30, 2);
    assert_eq!(score(&game, &report, 1), 10);
    let report = puzzle(PuzzleOutcome::Abandoned, 30, 0);
    assert_eq!(score(&game, &report, 1), 0);
}

#[test]
fn test_completed_with_nothing_found_scores_zero() {
    let game = definition("word-search");
    let report = PuzzleReport {
        outcome: PuzzleOutcome::Completed,
        elapsed_secs: 0,
        words_found: 0,
        total_words: 0,
    }
    .into();
    assert_eq!(score(&game, &report, 1), 0);
}

#[test]
fn test_cancelled_always_zero() {
    let policy = ScoringPolicy::default();
    let board_game = definition("tic-tac-toe");
    let puzzle_game = definition("word-search");
    let reports = [
        (&board_game, board(BoardOutcome::Won(Mark::A), 5)),
        (&board_game, board(BoardOutcome::Draw, 9)),
        (&puzzle_game, puzzle(PuzzleOutcome::Completed, 10, 6)),
        (&puzzle_game, puzzle(PuzzleOutcome::Abandoned, 10, 3)),
    ];
    for (game, report) in &reports {
        for players in 1..=4 {
            let breakdown = policy.score(&ScoreInput {
                game,
                report,
                distinct_players: players,
                cancelled: true,
            });
            assert_eq!(breakdown.total(), 0);
        }
    }
}

#[test]
fn test_score_is_pure() {
    let policy = ScoringPolicy::default();
    let game = definition("word-search");
    let report = puzzle(PuzzleOutcome::Completed, 75, 5);
    let input = ScoreInput {
        game: &game,
        report: &report,
        distinct_players: 3,
        cancelled: false,
    };
    let first = policy.score(&input);
    for _ in 0..10 {
        assert_eq!(policy.score(&input), first);
    }
}

#[test]
fn test_custom_settings() {
    let settings = ScoringSettings {
        board: BoardScoring {
            draw_xp: 3,
            speed_tiers: vec![MoveTier {
                max_moves: 6,
                bonus: 50,
            }],
        },
        ..ScoringSettings::default()
    };
    let policy = ScoringPolicy::new(settings);
    let game = definition("tic-tac-toe");
    let won = |moves| {
        policy
            .score(&ScoreInput {
                game: &game,
                report: &board(BoardOutcome::Won(Mark::A), moves),
                distinct_players: 1,
                cancelled: false,
            })
            .total()
    };
    assert_eq!(won(5), 75);
    assert_eq!(won(7), 25);
}
