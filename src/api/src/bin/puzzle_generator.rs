use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use tracing::info;

use wordsearch::config::AppConfig;
use wordsearch::game::conversion::SerializablePuzzle;
use wordsearch::game::{Difficulty, PuzzleEngine, WordBank};

fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    let difficulty = match env::var("PUZZLE_DIFFICULTY") {
        Ok(value) => value.parse::<Difficulty>()?,
        Err(_) => config.game.default_difficulty,
    };
    let seed = env::var("PUZZLE_SEED").ok();
    let format = env::var("PUZZLE_FORMAT").unwrap_or_else(|_| "text".to_string());

    let word_bank = WordBank::from_file(&config.server.word_bank_path)?;
    let engine = PuzzleEngine::new(word_bank, config.game.clone());

    info!("Generating {} puzzle (seed: {:?})", difficulty, seed);
    let session = engine.new_session(difficulty, seed.as_deref())?;
    let puzzle = session.puzzle();

    match format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&SerializablePuzzle::from(puzzle))
                .context("serializing puzzle")?;
            println!("{json}");
        }
        _ => {
            print!("{}", puzzle.grid);
            println!();
            for placement in &puzzle.placements {
                println!(
                    "{:<14} ({}, {}) -> ({}, {})",
                    placement.word.display,
                    placement.start.row,
                    placement.start.col,
                    placement.direction.0,
                    placement.direction.1
                );
            }
            for word in &puzzle.unplaced {
                println!("{:<14} not placed", word.display);
            }
        }
    }

    Ok(())
}
