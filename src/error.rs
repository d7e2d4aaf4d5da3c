use std::fmt;

/// Errors that can occur when building or parsing a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The grid has no rows.
    Empty,
    /// A row does not have as many cells as the grid has rows.
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// Boards must be at least 2x2.
    TooSmall(usize),
    /// The number of tiles does not match the declared dimension.
    TileCount { expected: usize, found: usize },
    /// A tile value is outside 0..N*N.
    OutOfRange { value: u32, max: u32 },
    /// A tile value appears more than once.
    Duplicate(u32),
    /// A tile value never appears.
    Missing(u32),
    /// The leading dimension could not be read.
    Dimension(String),
    /// A tile could not be read as a non-negative integer.
    Tile(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "board: no rows"),
            Self::NotSquare { row, len, expected } => write!(
                f,
                "board: row {row} has {len} cells, expected {expected}"
            ),
            Self::TooSmall(n) => write!(f, "board: dimension {n} is too small (minimum 2)"),
            Self::TileCount { expected, found } => {
                write!(f, "board: expected {expected} tiles, found {found}")
            }
            Self::OutOfRange { value, max } => {
                write!(f, "board: tile {value} out of range 0..={max}")
            }
            Self::Duplicate(v) => write!(f, "board: tile {v} appears more than once"),
            Self::Missing(v) => write!(f, "board: tile {v} is missing"),
            Self::Dimension(s) => write!(f, "board: invalid dimension {s:?}"),
            Self::Tile(s) => write!(f, "board: invalid tile {s:?}"),
        }
    }
}

impl std::error::Error for BoardError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_quote_bad_input() {
        assert_eq!(
            BoardError::Dimension("x".to_string()).to_string(),
            "board: invalid dimension \"x\""
        );
        assert_eq!(
            BoardError::Tile("-1".to_string()).to_string(),
            "board: invalid tile \"-1\""
        );
    }
}
