use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// Diagnostic for a word the generator had to drop. Never returned by `generate`.
    #[error("word '{0}' could not be placed on the grid")]
    UnplaceableWord(String),

    #[error("selection is not a straight line")]
    MalformedSelection,

    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    CellOutOfBounds { row: usize, col: usize, size: usize },

    #[error("'{0}' is not a usable puzzle word")]
    InvalidWord(String),

    #[error("word bank has no usable words")]
    EmptyWordBank,

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("grid rows must form a non-empty square")]
    MalformedGrid,
}
