//! Riddle Rally - terminal play loop.
//!
//! A line-oriented front over the session engine: one command per line,
//! state reprinted after every intent. Rendering stays deliberately thin;
//! all game rules live in the library.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use riddle_rally::{
    DemoJudge, DemoSource, GameConfig, GameDriver, GameEngine, Mode, Phase, Player, SeenRegistry,
};
use std::io::{BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { mode, config, demo } => run_play(mode.into(), config, demo).await,
    }
}

/// Runs one interactive play session.
async fn run_play(mode: Mode, config: Option<std::path::PathBuf>, demo: bool) -> Result<()> {
    let config = match config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::new(),
    };

    let mut driver = if demo {
        info!("Using bundled demo riddles");
        GameDriver::new(
            &config,
            Box::new(DemoSource::new()),
            Box::new(DemoJudge::new()),
            SeenRegistry::new(),
        )
    } else {
        let llm_config = config.create_llm_config()?;
        let service = riddle_rally::LlmService::new(llm_config);
        GameDriver::new(
            &config,
            Box::new(service.clone()),
            Box::new(service),
            SeenRegistry::new(),
        )
    };

    println!("Riddle Rally - {} rounds. Type 'help' for commands.", config.total_rounds());
    if let Err(error) = driver.start(mode).await {
        warn!(%error, "Could not start the first round");
        println!("Could not fetch a riddle: {}", error);
        println!("Type 'retry' to try again, or 'quit'.");
    } else {
        render(driver.engine());
    }

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let outcome = match verb {
            "" => continue,
            "help" => {
                print_help();
                Ok(())
            }
            "clue" => match rest.parse::<usize>() {
                Ok(number) if number >= 1 => {
                    if !driver.reveal_clue(number - 1) {
                        println!("That clue cannot be revealed right now.");
                    }
                    Ok(())
                }
                _ => {
                    println!("Usage: clue <1-4>");
                    Ok(())
                }
            },
            "claim" => match rest {
                "1" => driver.claim_turn(Player::One),
                "2" => driver.claim_turn(Player::Two),
                _ => {
                    println!("Usage: claim <1|2>");
                    Ok(())
                }
            },
            "guess" => driver.submit_guess(rest).await,
            "ok" => driver.acknowledge().await,
            "retry" => driver.retry_round().await,
            "restart" => {
                driver.restart();
                driver.start(mode).await
            }
            "quit" | "exit" => break,
            other => {
                println!("Unknown command '{}'. Type 'help'.", other);
                Ok(())
            }
        };

        if let Err(error) = outcome {
            println!("{}", error);
        }
        render(driver.engine());
        if driver.engine().phase() == Phase::GameOver {
            println!("Type 'restart' to play again, or 'quit'.");
        }
    }

    Ok(())
}

/// Prints the current game state.
fn render(engine: &GameEngine) {
    match engine.phase() {
        Phase::NotStarted => println!("No game in progress."),
        Phase::Playing => render_playing(engine),
        Phase::GameOver => render_game_over(engine),
    }
}

fn render_playing(engine: &GameEngine) {
    println!();
    println!(
        "Riddle {} of {}  |  P1: {}  P2: {}",
        engine.current_round_number(),
        engine.total_rounds(),
        engine.scores().get(Player::One),
        engine.scores().get(Player::Two),
    );

    let round = match engine.current_round() {
        Some(round) => round,
        None => {
            if let Some(error) = engine.last_error() {
                println!("No riddle available: {}", error);
                println!("Type 'retry' to fetch another, or 'restart'.");
            }
            return;
        }
    };

    if round.answered() {
        if let Some(result) = engine.last_result() {
            println!("{}", result.title());
            println!("{}", result.message());
        } else if let Some(error) = engine.last_error() {
            println!("The judge was unavailable: {}", error);
        }
        println!("Type 'ok' to continue.");
        return;
    }

    println!("{}", round.riddle().text());
    println!("Worth {} points.", round.remaining_value());
    for (index, revealed) in round.revealed().iter().enumerate() {
        if *revealed {
            if let Some(clue) = round.riddle().clue(index) {
                println!("  Clue {}: {}", index + 1, clue);
            }
        }
    }
    if engine.mode() == Mode::Duo {
        match round.claiming_player() {
            Some(player) => println!("Player {} has claimed this riddle.", player),
            None => println!("Player {}'s turn to shine. Claim to answer!", engine.next_turn_hint()),
        }
    }
}

fn render_game_over(engine: &GameEngine) {
    println!();
    println!("Game over after {} rounds!", engine.rounds_completed());
    println!(
        "Final scores - P1: {}  P2: {}",
        engine.scores().get(Player::One),
        engine.scores().get(Player::Two),
    );
    match engine.mode() {
        Mode::Solo => {}
        Mode::Duo => match engine.scores().leader() {
            Some(winner) => println!("Player {} wins!", winner),
            None => println!("It's a tie!"),
        },
    }
}

fn print_help() {
    println!("Commands:");
    println!("  clue <1-4>    reveal a clue (costs points)");
    println!("  claim <1|2>   duo mode: lock in as the answering player");
    println!("  guess <text>  submit an answer");
    println!("  ok            acknowledge the result and continue");
    println!("  retry         retry a failed riddle fetch");
    println!("  restart       start over with a fresh session");
    println!("  quit          leave the game");
}
