//! Generate random perfect mazes and find the way through them
//!
//! Mazes are grown as random spanning trees with Prim's algorithm
//! ([`MazeGenerator`]) and solved with A* search ([`AStarSolver`]).
//! [`BatchOrchestrator`] does both for many mazes at once, sequentially or
//! on a pool of workers, and [`MazeSession`] keeps the latest batch around
//! for callers serving repeated requests.
//!
//! # Examples
//! ## Single maze
//! ```
//! use prim_maze::{generate_maze, solve};
//!
//! let maze = generate_maze(12, 8, Some(2024)).unwrap();
//! let path = solve(&maze);
//!
//! assert_eq!(path.first().copied(), maze.start());
//! assert_eq!(path.last().copied(), maze.finish());
//! println!("{}", maze.render_with_path(&path));
//! ```
//!
//! ## Batch of mazes
//! ```
//! use prim_maze::{generate_batch, solve, solve_batch};
//!
//! let mazes = generate_batch(6, 20, 20).unwrap();
//! let paths = solve_batch(&mazes);
//!
//! assert_eq!(paths.len(), 6);
//! assert_eq!(paths[4], solve(&mazes[4]));
//! ```

mod batch;
mod error;
mod maze;
pub mod maze_generator;
pub mod maze_solver;
mod session;

pub use batch::{BatchOrchestrator, ExecutionMode};
pub use error::MazeError;
pub use maze::{Cell, Maze, Passage, Point};
pub use maze_generator::MazeGenerator;
pub use maze_solver::{AStarSolver, Heuristic};
pub use session::{
    GenerationReport, MazeParams, MazeSession, SolveReport, MAX_SIDE, MIN_SIDE,
};

/// Generate a single maze, reproducible if `seed` is given
pub fn generate_maze(width: usize, height: usize, seed: Option<u64>) -> Result<Maze, MazeError> {
    MazeGenerator::new(seed).generate_maze(width, height)
}

/// Generate `count` mazes in parallel, in index order
pub fn generate_batch(count: usize, width: usize, height: usize) -> Result<Vec<Maze>, MazeError> {
    BatchOrchestrator::default().generate_batch(count, width, height, None)
}

/// Shortest path from start to finish, empty if there is none
pub fn solve(maze: &Maze) -> Vec<Point> {
    AStarSolver::default().solve(maze)
}

/// Solve all mazes in parallel, one path per maze in input order
pub fn solve_batch(mazes: &[Maze]) -> Vec<Vec<Point>> {
    BatchOrchestrator::default().solve_batch(mazes)
}
