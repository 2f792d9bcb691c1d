//! Tests for TOML settings.

use std::io::Write;

use teamquest_games::{CompletionSink, Difficulty, GameResult, GameVariant, Settings, Turn};

#[test]
fn test_empty_file_uses_defaults() {
    let settings = Settings::from_toml("").expect("defaults are valid");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.catalog.len(), 2);
    assert_eq!(settings.scoring.board.draw_xp, 10);
    assert_eq!(settings.puzzle.placement_attempts, 50);
    assert_eq!(settings.puzzle.layout(Difficulty::Hard).grid_size, 12);
}

#[test]
fn test_partial_override() {
    let settings = Settings::from_toml(
        r#"
        seed = 42

        [user]
        id = "u1"
        display_name = "Rita"

        [scoring.board]
        draw_xp = 12

        [puzzle.easy]
        grid_size = 6
        words = ["cat", "dog"]
        "#,
    )
    .expect("valid config");

    assert_eq!(settings.seed, Some(42));
    assert_eq!(settings.user.id(), "u1");
    assert_eq!(settings.scoring.board.draw_xp, 12);
    // Unset fields in a section keep their defaults.
    assert_eq!(settings.scoring.board.speed_tiers.len(), 3);
    assert_eq!(settings.scoring.puzzle.word_xp, 10);
    assert_eq!(settings.puzzle.easy.grid_size, 6);
    assert_eq!(settings.puzzle.medium.grid_size, 10);
}

#[test]
fn test_custom_catalog() {
    let settings = Settings::from_toml(
        r#"
        [[catalog]]
        id = "grid-dash"
        name = "Grid Dash"
        difficulty = "hard"
        base_xp = 40
        bonus_xp = 5
        max_players = 3
        variant = "puzzle"

        [[team]]
        id = "ana"
        display_name = "Ana"
        title = "Designer"
        "#,
    )
    .expect("valid config");

    let catalog = settings.game_catalog();
    assert_eq!(catalog.len(), 1);
    let game = catalog.get("grid-dash").expect("configured game");
    assert_eq!(*game.difficulty(), Difficulty::Hard);
    assert_eq!(*game.variant(), GameVariant::Puzzle);
    assert_eq!(game.description(), "");
    assert_eq!(settings.team.len(), 1);
    assert_eq!(settings.team[0].title().as_deref(), Some("Designer"));
}

#[test]
fn test_validation_failures() {
    let duplicate = r#"
        [[catalog]]
        id = "a"
        name = "A"
        base_xp = 1
        bonus_xp = 1
        max_players = 2
        variant = "board"

        [[catalog]]
        id = "a"
        name = "A again"
        base_xp = 1
        bonus_xp = 1
        max_players = 2
        variant = "board"
    "#;
    let err = Settings::from_toml(duplicate).expect_err("duplicate ids");
    assert!(err.message.contains("Duplicate game id"));

    let no_players = r#"
        [[catalog]]
        id = "a"
        name = "A"
        base_xp = 1
        bonus_xp = 1
        max_players = 0
        variant = "board"
    "#;
    assert!(Settings::from_toml(no_players).is_err());

    let zero_grid = r#"
        [puzzle.medium]
        grid_size = 0
        words = ["X"]
    "#;
    assert!(Settings::from_toml(zero_grid).is_err());

    let no_words = r#"
        [puzzle.hard]
        grid_size = 12
        words = []
    "#;
    assert!(Settings::from_toml(no_words).is_err());

    let crowded_board = r#"
        [[catalog]]
        id = "four-way"
        name = "Four Way"
        base_xp = 25
        bonus_xp = 10
        max_players = 3
        variant = "board"
    "#;
    let err = Settings::from_toml(crowded_board).expect_err("board games seat two");
    assert!(err.message.contains("at most 2 players"));

    let mut empty = Settings::default();
    empty.catalog.clear();
    assert!(empty.validate().is_err());

    assert!(Settings::from_toml("seed = \"abc\"").is_err());
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "seed = 5").expect("write");
    let settings = Settings::from_file(file.path()).expect("valid file");
    assert_eq!(settings.seed, Some(5));

    let missing = file.path().with_extension("missing");
    let err = Settings::from_file(&missing).expect_err("no such file");
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_load_prefers_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "seed = 8").expect("write");
    let settings = Settings::load(Some(file.path())).expect("valid file");
    assert_eq!(settings.seed, Some(8));
}

#[test]
fn test_seeded_controller_is_reproducible() {
    let settings = Settings {
        seed: Some(17),
        ..Settings::default()
    };
    let grid = || {
        let mut controller = settings.controller(Vec::<GameResult>::new());
        controller.start_solo("word-search").expect("idle");
        controller.session().expect("active").clone()
    };
    assert_eq!(grid().engine(), grid().engine());
}

#[test]
fn test_controller_uses_configured_scoring() {
    let mut settings = Settings::default();
    settings.scoring.board.speed_tiers.clear();
    let mut controller = settings.controller(Vec::<GameResult>::new());
    controller.start_solo("tic-tac-toe").expect("idle");
    let mut last = None;
    for cell in [0, 3, 1, 4, 2] {
        last = Some(controller.play_cell(cell).expect("legal"));
    }
    let Some(Turn::Finished(result)) = last else {
        panic!("game should end");
    };
    assert_eq!(*result.xp_earned(), 25);

    let mut sink = controller.into_sink();
    assert_eq!(sink.len(), 1);
    sink.on_game_end(&result);
    assert_eq!(sink.len(), 2);
}
