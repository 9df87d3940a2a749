pub mod conversion;
pub mod difficulty;
pub mod directions;
pub mod error;
pub mod generator;
pub mod grid;
pub mod selection;
pub mod session;
pub mod word;
pub mod word_bank;

pub use difficulty::{Difficulty, DifficultySettings};
pub use error::PuzzleError;
pub use generator::{Placement, Puzzle, PuzzleGenerator};
pub use grid::{Cell, Grid};
pub use selection::{check_selection, resolve_line, Feedback, FoundSet, MatchResult, SelectionOutcome};
pub use session::{SelectionState, Session};
pub use word::WordEntry;
pub use word_bank::WordBank;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_seeder::Seeder;
use tracing::info;

use crate::config::GameConfig;

/// Builds play sessions from the word bank and the configured difficulty levels.
#[derive(Clone)]
pub struct PuzzleEngine {
    word_bank: Arc<WordBank>,
    config: GameConfig,
    generator: PuzzleGenerator,
}

impl PuzzleEngine {
    pub fn new(word_bank: WordBank, config: GameConfig) -> Self {
        Self {
            word_bank: Arc::new(word_bank),
            config,
            generator: PuzzleGenerator::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn word_bank(&self) -> &WordBank {
        &self.word_bank
    }

    /// A fresh session. The same `seed` and difficulty always give the same puzzle.
    pub fn new_session(&self, difficulty: Difficulty, seed: Option<&str>) -> Result<Session, PuzzleError> {
        let settings = self.config.settings(difficulty);
        let mut rng = match seed {
            Some(seed) => StdRng::from_seed(Self::create_seed(seed, difficulty)),
            None => StdRng::from_entropy(),
        };

        let words = self
            .word_bank
            .select_for_grid(settings.word_count, settings.size, &mut rng);
        if words.is_empty() {
            return Err(PuzzleError::EmptyWordBank);
        }

        let session = Session::new(&self.generator, difficulty, words, settings.size, &mut rng);
        info!(
            "Created {} session: {}x{} grid, {} words ({} unplaced)",
            difficulty,
            settings.size,
            settings.size,
            session.words().len(),
            session.puzzle().unplaced.len()
        );
        Ok(session)
    }

    fn create_seed(seed: &str, difficulty: Difficulty) -> [u8; 32] {
        let seed_string = format!("{}:{}", seed, difficulty);
        Seeder::from(seed_string).make_seed()
    }
}
