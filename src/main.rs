//! TeamQuest - terminal front end
//!
//! Lists the catalog, plays one session on stdin and shows profile progress.

#![warn(missing_docs)]

mod cli;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use teamquest_games::{
    Coord, EngineState, GameResult, GameVariant, ProfileLedger, SessionController, SessionPhase,
    Settings, Toggle, Turn,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Catalog => {
            list_catalog(&settings);
            Ok(())
        }
        Command::Play {
            game_id,
            invite,
            seed,
        } => {
            if seed.is_some() {
                settings.seed = seed;
            }
            play(&settings, &cli.ledger, &game_id, &invite).await
        }
        Command::Profile => show_profile(&cli.ledger),
    }
}

/// Logs go to stderr so the game display on stdout stays readable.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn list_catalog(settings: &Settings) {
    for game in &settings.catalog {
        println!(
            "{:<14} {:<14} {:<8} {:<10} up to {} players, {} XP (+{} with teammates)",
            game.id(),
            game.name(),
            game.difficulty(),
            game.category(),
            game.max_players(),
            game.base_xp(),
            game.bonus_xp()
        );
        if !game.description().is_empty() {
            println!("{:<14} {}", "", game.description());
        }
    }
}

#[instrument(skip(ledger_path))]
fn show_profile(ledger_path: &Path) -> Result<()> {
    let ledger = ProfileLedger::load_or_default(ledger_path)?;
    let level = ledger.level();
    println!("Level {} - {} XP", level.level, ledger.total_xp());
    if !level.is_max() {
        println!(
            "{} XP to level {}",
            level.remaining(*ledger.total_xp()),
            level.level + 1
        );
    }
    println!("Games played: {}", ledger.games_played());
    if let Some(favourite) = ledger.favourite_game() {
        println!(
            "Favourite: {} ({} plays, {} XP)",
            favourite.game_name(),
            favourite.plays(),
            favourite.xp()
        );
    }
    if !ledger.achievements().is_empty() {
        println!("\nRecent:");
        for achievement in ledger.achievements() {
            println!(
                "  {} {}",
                achievement.earned_at().format("%Y-%m-%d %H:%M"),
                achievement.summary()
            );
        }
    }
    Ok(())
}

#[instrument(skip(settings, ledger_path))]
async fn play(
    settings: &Settings,
    ledger_path: &Path,
    game_id: &str,
    invite: &[String],
) -> Result<()> {
    let ledger = ProfileLedger::load_or_default(ledger_path)?;
    let mut controller = settings.controller(ledger);

    if invite.is_empty() {
        controller.start_solo(game_id)?;
    } else {
        let request = controller.request_invite(game_id, &settings.team)?;
        let capacity = request.game().invite_capacity();
        for id in invite {
            match controller.toggle_invitee(id)? {
                Toggle::Added => debug!(player = %id, "Invited"),
                Toggle::Removed => warn!(player = %id, "Listed twice, deselected"),
                Toggle::CapacityExceeded => {
                    println!("Only {} teammate(s) can join, skipping {}", capacity, id)
                }
            }
        }
        controller.confirm_invite()?;
    }

    // A puzzle with nothing placed ends at start.
    let result = match controller.phase() {
        SessionPhase::Active => run_session(&mut controller).await?,
        _ => None,
    };
    if let Some(result) = result {
        println!("\n{}", result.summary());
        let xp = result.breakdown();
        if xp.total() > xp.base {
            println!(
                "  base {}, speed +{}, time +{}, difficulty +{}, team +{}",
                xp.base, xp.speed_bonus, xp.time_bonus, xp.difficulty_bonus, xp.multiplayer_bonus
            );
        }
    }

    let mut ledger = controller.into_sink();
    if let Some(level) = ledger.take_level_up() {
        println!("Level up! You reached level {}", level);
    }
    ledger.save(ledger_path)?;
    info!("Session saved to profile");
    Ok(())
}

/// Reads commands until the session ends, ticking the clock once a second.
async fn run_session(
    controller: &mut SessionController<ProfileLedger>,
) -> Result<Option<GameResult>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately.
    ticker.tick().await;

    render(controller);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.tick();
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("Input closed, leaving the session");
                    return Ok(Some(controller.exit()?));
                };
                match handle_input(controller, line.trim()) {
                    Ok(Some(result)) => return Ok(Some(result)),
                    Ok(None) => render(controller),
                    Err(e) => println!("{}", e),
                }
            }
        }
    }
}

/// Applies one line of input. Returns the result once the session ends.
fn handle_input(
    controller: &mut SessionController<ProfileLedger>,
    input: &str,
) -> Result<Option<GameResult>> {
    match input {
        "" => return Ok(None),
        "exit" | "quit" => return Ok(Some(controller.exit()?)),
        "give-up" => return Ok(Some(controller.give_up()?)),
        "clear" => {
            controller.clear_selection()?;
            return Ok(None);
        }
        _ => {}
    }

    let Some(session) = controller.session() else {
        bail!("No active session");
    };
    let turn = match session.engine().variant() {
        GameVariant::Board => {
            let cell: usize = input
                .parse()
                .ok()
                .filter(|n| (1..=9).contains(n))
                .context("Enter a square number from 1 to 9")?;
            match controller.play_cell(cell - 1)? {
                Turn::Continue(_) => None,
                Turn::Finished(result) => Some(result),
            }
        }
        GameVariant::Puzzle => {
            let coord = parse_coord(input).context("Enter a cell as `row col`")?;
            match controller.select_cell(coord)? {
                Turn::Continue(outcome) => {
                    debug!(?outcome, "Selection");
                    None
                }
                Turn::Finished(result) => Some(result),
            }
        }
    };
    Ok(turn)
}

fn parse_coord(input: &str) -> Option<Coord> {
    let mut parts = input.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some(Coord::new(row, col))
}

fn render(controller: &SessionController<ProfileLedger>) {
    let Some(session) = controller.session() else {
        return;
    };
    match session.engine() {
        EngineState::Board(state) => {
            let to_move = session
                .player_for(state.turn())
                .map(|p| p.display_name().clone())
                .unwrap_or_else(|| format!("Player {}", state.turn()));
            println!("\n{}\n", state.board().display());
            if let Some(last) = state.history().last() {
                println!("Last move: {}", last);
            }
            println!("{} ({}) to move:", to_move, state.turn());
        }
        EngineState::Puzzle(state) => {
            println!("\n{}\n", state.grid().display());
            let words: Vec<String> = state
                .placed_words()
                .iter()
                .map(|w| {
                    if state.is_found(w) {
                        format!("[{}]", w)
                    } else {
                        w.clone()
                    }
                })
                .collect();
            println!("Words: {}", words.join(" "));
            let picked = state.grid().read(state.selection());
            if !picked.is_empty() {
                println!("Selected: {}", picked);
            }
            println!(
                "{}:{:02}  cell as `row col`, `clear`, `give-up` or `exit`:",
                state.elapsed_secs() / 60,
                state.elapsed_secs() % 60
            );
        }
    }
}
