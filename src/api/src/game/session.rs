use rand::Rng;

use crate::game::{
    difficulty::Difficulty,
    error::PuzzleError,
    generator::{Puzzle, PuzzleGenerator},
    grid::{Cell, Grid},
    selection::{self, FoundSet, SelectionOutcome},
    word::{dedup_words, WordEntry},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selecting { start: Cell, path: Vec<Cell> },
}

/// One play session: the puzzle, its word list and the player's progress.
///
/// Restarting or changing difficulty means building a new `Session`; nothing
/// carries over from the old one.
#[derive(Debug, Clone)]
pub struct Session {
    difficulty: Difficulty,
    words: Vec<WordEntry>,
    puzzle: Puzzle,
    found: FoundSet,
    selection: SelectionState,
}

impl Session {
    pub fn new<R: Rng>(
        generator: &PuzzleGenerator,
        difficulty: Difficulty,
        words: Vec<WordEntry>,
        size: usize,
        rng: &mut R,
    ) -> Self {
        let words = dedup_words(words);
        let puzzle = generator.generate(&words, size, rng);
        Self {
            difficulty,
            words,
            puzzle,
            found: FoundSet::new(),
            selection: SelectionState::Idle,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn grid(&self) -> &Grid {
        &self.puzzle.grid
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    pub fn found(&self) -> &FoundSet {
        &self.found
    }

    pub fn is_found(&self, word: &WordEntry) -> bool {
        self.found.contains(&word.canonical)
    }

    /// Cells `word` was found on, if it has been found.
    pub fn found_cells(&self, word: &WordEntry) -> Option<&[Cell]> {
        self.found.cells(&word.canonical)
    }

    pub fn is_complete(&self) -> bool {
        self.found.len() == self.words.len()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Cells of the gesture in progress; empty when idle or when the drag is not a straight line.
    pub fn selection_path(&self) -> &[Cell] {
        match &self.selection {
            SelectionState::Idle => &[],
            SelectionState::Selecting { path, .. } => path,
        }
    }

    pub fn pointer_down(&mut self, cell: Cell) -> Result<(), PuzzleError> {
        self.grid().check_bounds(cell)?;
        self.selection = SelectionState::Selecting {
            start: cell,
            path: vec![cell],
        };
        Ok(())
    }

    pub fn pointer_move(&mut self, cell: Cell) -> Result<&[Cell], PuzzleError> {
        self.grid().check_bounds(cell)?;
        if let SelectionState::Selecting { start, path } = &mut self.selection {
            *path = selection::resolve_line(*start, cell);
        }
        Ok(self.selection_path())
    }

    /// Ends the gesture and checks it. `Ok(None)` means there was nothing to
    /// check: no gesture in progress, or the drag was not a straight line.
    ///
    /// The session is idle afterwards, even when `cell` is out of bounds.
    pub fn pointer_up(&mut self, cell: Cell) -> Result<Option<SelectionOutcome>, PuzzleError> {
        let previous = std::mem::replace(&mut self.selection, SelectionState::Idle);
        self.grid().check_bounds(cell)?;
        let start = match previous {
            SelectionState::Idle => return Ok(None),
            SelectionState::Selecting { start, .. } => start,
        };

        let path = selection::resolve_line(start, cell);
        match selection::check_selection(&path, &self.puzzle.grid, &self.words, &mut self.found) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(PuzzleError::MalformedSelection) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// A whole drag gesture from `start` to `end`.
    pub fn select(&mut self, start: Cell, end: Cell) -> Result<Option<SelectionOutcome>, PuzzleError> {
        self.pointer_down(start)?;
        self.pointer_up(end)
    }
}
