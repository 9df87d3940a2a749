use core::fmt;

use crate::game::{directions::DIRECTIONS, error::PuzzleError};

pub mod cell;

pub use cell::Cell;

/// A fully populated, square letter grid. Read-only once generation finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<char>>) -> Result<Self, PuzzleError> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return Err(PuzzleError::MalformedGrid);
        }
        Ok(Self { rows })
    }

    /// Rows produced by the generator, which are square by construction.
    pub(crate) fn from_filled(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size() && cell.col < self.size()
    }

    pub fn get(&self, cell: Cell) -> Option<char> {
        self.rows.get(cell.row)?.get(cell.col).copied()
    }

    pub fn check_bounds(&self, cell: Cell) -> Result<(), PuzzleError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(PuzzleError::CellOutOfBounds {
                row: cell.row,
                col: cell.col,
                size: self.size(),
            })
        }
    }

    /// Concatenates the letters under `cells`, failing on the first cell outside the grid.
    pub fn letters_along(&self, cells: &[Cell]) -> Result<String, PuzzleError> {
        cells
            .iter()
            .map(|&cell| {
                self.check_bounds(cell)?;
                Ok(self.rows[cell.row][cell.col])
            })
            .collect()
    }

    pub fn row_strings(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }

    /// First straight-line run spelling `word`, scanning every cell in every direction.
    pub fn locate(&self, word: &str) -> Option<Vec<Cell>> {
        let letters: Vec<char> = word.chars().collect();
        if letters.is_empty() {
            return None;
        }
        let size = self.size();
        for row in 0..size {
            for col in 0..size {
                let start = Cell::new(row, col);
                for direction in DIRECTIONS {
                    let cells: Option<Vec<Cell>> = (0..letters.len())
                        .map(|k| start.offset(direction, k, size))
                        .collect();
                    if let Some(cells) = cells {
                        if cells
                            .iter()
                            .zip(&letters)
                            .all(|(cell, letter)| self.rows[cell.row][cell.col] == *letter)
                        {
                            return Some(cells);
                        }
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for letter in row {
                write!(f, " {} ", letter)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
