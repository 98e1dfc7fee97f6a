//! Errors raised by maze construction, generation and solving

use thiserror::Error;

use crate::maze::Point;

/// Precondition violations reported by the maze core.
///
/// A solver that finds no route is not an error; it returns an empty path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Width or height is not positive.
    #[error("invalid maze dimensions {width}x{height}, both sides must be positive")]
    InvalidDimensions { width: usize, height: usize },

    /// The grid has no cells, or start/finish have not been set yet.
    #[error("maze grid is not initialized")]
    UninitializedGrid,

    /// Passage endpoints outside the grid or not adjacent to each other.
    #[error("invalid passage between {a} and {b}")]
    InvalidPassage { a: Point, b: Point },

    /// A batch of zero mazes was requested.
    #[error("number of mazes must be greater than 0")]
    EmptyBatch,
}
