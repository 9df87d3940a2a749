use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::game::{
    directions::{Direction, DIRECTIONS},
    error::PuzzleError,
    grid::{Cell, Grid},
    word::WordEntry,
};

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A cell is owned by one word and may be shared with at most one more.
const MAX_WORDS_PER_CELL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub word: WordEntry,
    pub start: Cell,
    pub direction: Direction,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone)]
pub struct Puzzle {
    pub grid: Grid,
    pub placements: Vec<Placement>,
    /// Words the generator dropped. They stay in the word list shown to the player.
    pub unplaced: Vec<WordEntry>,
}

impl Puzzle {
    pub fn is_placed(&self, word: &WordEntry) -> bool {
        self.placements
            .iter()
            .any(|placement| placement.word.canonical == word.canonical)
    }
}

#[derive(Clone, Copy)]
struct DraftCell {
    letter: char,
    coverage: u8,
}

/// The grid while words are still being committed.
struct Draft {
    size: usize,
    cells: Vec<Vec<Option<DraftCell>>>,
}

impl Draft {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![None; size]; size],
        }
    }

    /// Cells the word would cover from `start` along `direction`, or `None` if
    /// any letter leaves the grid or disagrees with what is already there.
    fn fit(&self, letters: &[char], start: Cell, direction: Direction) -> Option<Vec<Cell>> {
        let mut cells = Vec::with_capacity(letters.len());
        for (k, &letter) in letters.iter().enumerate() {
            let cell = start.offset(direction, k, self.size)?;
            if let Some(existing) = self.cells[cell.row][cell.col] {
                if existing.letter != letter || existing.coverage >= MAX_WORDS_PER_CELL {
                    return None;
                }
            }
            cells.push(cell);
        }
        Some(cells)
    }

    fn commit(&mut self, letters: &[char], cells: &[Cell]) {
        for (cell, &letter) in cells.iter().zip(letters) {
            let slot = &mut self.cells[cell.row][cell.col];
            let coverage = slot.map_or(0, |existing| existing.coverage);
            *slot = Some(DraftCell {
                letter,
                coverage: coverage + 1,
            });
        }
    }

    fn fill<R: Rng>(self, rng: &mut R) -> Grid {
        let mut rows = Vec::with_capacity(self.size);
        for row in self.cells {
            let mut letters = Vec::with_capacity(self.size);
            for cell in row {
                letters.push(match cell {
                    Some(cell) => cell.letter,
                    None => char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]),
                });
            }
            rows.push(letters);
        }
        Grid::from_filled(rows)
    }
}

/// Places words along the 8 compass directions and fills the rest with random letters.
///
/// Each word gets one exhaustive scan over every (start, direction) pair, in a
/// freshly shuffled order, so a word is `O(size² · 8 · len)` at worst. The first
/// fit wins and there is no backtracking across words: a word that fits nowhere
/// is dropped and reported in [`Puzzle::unplaced`].
#[derive(Clone, Default)]
pub struct PuzzleGenerator;

impl PuzzleGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate<R: Rng>(&self, words: &[WordEntry], size: usize, rng: &mut R) -> Puzzle {
        let mut draft = Draft::new(size);
        let mut placements = Vec::new();
        let mut unplaced = Vec::new();

        // Longest first; the sort is stable so equal lengths keep list order.
        let mut sorted: Vec<&WordEntry> = words.iter().collect();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()));

        for word in sorted {
            let letters: Vec<char> = word.canonical.chars().collect();
            match Self::find_placement(&draft, &letters, rng) {
                Some((start, direction, cells)) => {
                    draft.commit(&letters, &cells);
                    debug!(
                        "Placed {} at {:?} heading {:?}",
                        word.canonical, start, direction
                    );
                    placements.push(Placement {
                        word: word.clone(),
                        start,
                        direction,
                        cells,
                    });
                }
                None => {
                    warn!(
                        "Skipping word on {}x{} grid: {}",
                        size,
                        size,
                        PuzzleError::UnplaceableWord(word.canonical.clone())
                    );
                    unplaced.push(word.clone());
                }
            }
        }

        Puzzle {
            grid: draft.fill(rng),
            placements,
            unplaced,
        }
    }

    fn find_placement<R: Rng>(
        draft: &Draft,
        letters: &[char],
        rng: &mut R,
    ) -> Option<(Cell, Direction, Vec<Cell>)> {
        if letters.is_empty() {
            return None;
        }

        let mut starts: Vec<Cell> = (0..draft.size)
            .flat_map(|row| (0..draft.size).map(move |col| Cell::new(row, col)))
            .collect();
        let mut directions = DIRECTIONS;
        starts.shuffle(rng);
        directions.shuffle(rng);

        for start in starts {
            for direction in directions {
                if let Some(cells) = draft.fit(letters, start, direction) {
                    return Some((start, direction, cells));
                }
            }
        }
        None
    }
}
