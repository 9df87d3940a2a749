use serde::{Deserialize, Serialize};

use crate::game::{generator::Puzzle, grid::Cell};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializablePuzzle {
    pub size: usize,
    pub rows: Vec<String>,
    pub placements: Vec<SerializablePlacement>,
    pub unplaced: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializablePlacement {
    pub word: String,
    pub start: Cell,
    pub direction: [isize; 2],
    pub cells: Vec<Cell>,
}

impl From<&Puzzle> for SerializablePuzzle {
    fn from(puzzle: &Puzzle) -> Self {
        Self {
            size: puzzle.grid.size(),
            rows: puzzle.grid.row_strings(),
            placements: puzzle
                .placements
                .iter()
                .map(|placement| SerializablePlacement {
                    word: placement.word.display.clone(),
                    start: placement.start,
                    direction: [placement.direction.0, placement.direction.1],
                    cells: placement.cells.clone(),
                })
                .collect(),
            unplaced: puzzle.unplaced.iter().map(|word| word.display.clone()).collect(),
        }
    }
}
