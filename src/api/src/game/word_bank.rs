use std::{fs, path::Path};

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::game::{
    error::PuzzleError,
    word::{dedup_words, WordEntry},
};

#[derive(Deserialize)]
struct WordBankFile {
    words: Vec<String>,
}

/// The pool a session draws its words from.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<WordEntry>,
}

impl WordBank {
    pub fn from_words<S: AsRef<str>>(raw: &[S]) -> Result<Self, PuzzleError> {
        let mut words = Vec::with_capacity(raw.len());
        for word in raw {
            match WordEntry::new(word.as_ref()) {
                Ok(entry) => words.push(entry),
                Err(e) => warn!("Ignoring word bank entry: {}", e),
            }
        }

        let words = dedup_words(words);
        if words.is_empty() {
            return Err(PuzzleError::EmptyWordBank);
        }
        Ok(Self { words })
    }

    /// Loads a `{"words": [...]}` data file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading word bank {}", path.display()))?;
        let file: WordBankFile = serde_json::from_str(&contents)
            .with_context(|| format!("parsing word bank {}", path.display()))?;
        let bank = Self::from_words(&file.words)?;
        info!("Loaded {} words from {}", bank.len(), path.display());
        Ok(bank)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    /// Up to `count` distinct random words short enough for a `size`x`size` grid.
    pub fn select_for_grid<R: Rng>(&self, count: usize, size: usize, rng: &mut R) -> Vec<WordEntry> {
        let mut candidates: Vec<&WordEntry> =
            self.words.iter().filter(|word| word.len() <= size).collect();
        candidates.shuffle(rng);
        candidates.into_iter().take(count).cloned().collect()
    }
}
