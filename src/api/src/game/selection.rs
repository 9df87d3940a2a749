use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::{
    error::PuzzleError,
    grid::{Cell, Grid},
    word::WordEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Found,
    AlreadyFound,
    NoMatch,
}

/// Canonical words the player has matched in the current session, each with
/// the cells it was found on. The grid itself is never marked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundSet(HashMap<String, Vec<Cell>>);

impl FoundSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.0.contains_key(canonical)
    }

    pub fn cells(&self, canonical: &str) -> Option<&[Cell]> {
        self.0.get(canonical).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, canonical: &str, cells: &[Cell]) {
        self.0.insert(canonical.to_string(), cells.to_vec());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub result: MatchResult,
    /// Display form of the matched word list entry.
    pub word: Option<String>,
    pub cells: Vec<Cell>,
    /// True once every word in the list has been found.
    pub complete: bool,
}

impl SelectionOutcome {
    pub fn feedback(&self) -> Feedback {
        match (self.result, &self.word) {
            (MatchResult::Found, _) if self.complete => Feedback::Complete,
            (MatchResult::Found, Some(word)) => Feedback::Found(word.clone()),
            (MatchResult::AlreadyFound, Some(word)) => Feedback::AlreadyFound(word.clone()),
            _ => Feedback::TryAgain,
        }
    }
}

/// Player-facing messages, in the site's language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Prompt,
    Found(String),
    AlreadyFound(String),
    TryAgain,
    Complete,
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::Prompt => write!(f, "Clique e arraste para selecionar uma palavra!"),
            Feedback::Found(word) => write!(f, "Palavra encontrada: {}!", word),
            Feedback::AlreadyFound(word) => write!(f, "Você já encontrou a palavra {}!", word),
            Feedback::TryAgain => write!(f, "Tente novamente!"),
            Feedback::Complete => write!(f, "Parabéns! Você encontrou todas as palavras!"),
        }
    }
}

/// Cells on the straight line from `start` to `end`, both inclusive.
///
/// Returns an empty path when the two cells are not on a common row, column
/// or exact diagonal.
pub fn resolve_line(start: Cell, end: Cell) -> Vec<Cell> {
    let rows = start.row.abs_diff(end.row);
    let cols = start.col.abs_diff(end.col);

    if rows != 0 && cols != 0 && rows != cols {
        return Vec::new();
    }

    // k never exceeds the distance on a moving axis.
    let walk = |from: usize, to: usize, k: usize| match from.cmp(&to) {
        Ordering::Less => from + k,
        Ordering::Greater => from - k,
        Ordering::Equal => from,
    };

    (0..=rows.max(cols))
        .map(|k| Cell::new(walk(start.row, end.row, k), walk(start.col, end.col, k)))
        .collect()
}

/// Checks the letters under `cells`, forwards and backwards, against the word list.
pub fn check_selection(
    cells: &[Cell],
    grid: &Grid,
    words: &[WordEntry],
    found: &mut FoundSet,
) -> Result<SelectionOutcome, PuzzleError> {
    if cells.is_empty() {
        return Err(PuzzleError::MalformedSelection);
    }

    let selected = grid.letters_along(cells)?.to_uppercase();
    let reversed: String = selected.chars().rev().collect();

    let matched = words
        .iter()
        .find(|word| word.matches(&selected) || word.matches(&reversed));

    let (result, word) = match matched {
        Some(word) if !found.contains(&word.canonical) => {
            found.insert(&word.canonical, cells);
            (MatchResult::Found, Some(word.display.clone()))
        }
        Some(word) => (MatchResult::AlreadyFound, Some(word.display.clone())),
        None => (MatchResult::NoMatch, None),
    };

    Ok(SelectionOutcome {
        result,
        word,
        cells: cells.to_vec(),
        complete: found.len() == words.len(),
    })
}
