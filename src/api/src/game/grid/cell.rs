use serde::{Deserialize, Serialize};

use crate::game::directions::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The cell `steps` moves away along `direction`, if it stays inside a `size`x`size` grid.
    pub fn offset(&self, direction: Direction, steps: usize, size: usize) -> Option<Cell> {
        let steps = isize::try_from(steps).ok()?;
        let row = self
            .row
            .checked_add_signed(direction.0.checked_mul(steps)?)?;
        let col = self
            .col
            .checked_add_signed(direction.1.checked_mul(steps)?)?;
        if row >= size || col >= size {
            return None;
        }
        Some(Cell { row, col })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}
