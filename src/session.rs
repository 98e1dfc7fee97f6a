//! Application context owning the current batch of mazes

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{BatchOrchestrator, Maze, MazeError, Point};

/// Smallest accepted maze side
pub const MIN_SIDE: usize = 2;
/// Largest accepted maze side
pub const MAX_SIDE: usize = 500;

/// Parameters of a generation request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeParams {
    pub count: usize,
    pub width: usize,
    pub height: usize,
}

impl MazeParams {
    /// Request with both sides clamped to [`MIN_SIDE`]..=[`MAX_SIDE`]
    pub fn clamped(count: usize, width: usize, height: usize) -> Self {
        Self {
            count,
            width: width.clamp(MIN_SIDE, MAX_SIDE),
            height: height.clamp(MIN_SIDE, MAX_SIDE),
        }
    }
}

/// Freshly generated batch
#[derive(Clone, Debug)]
pub struct GenerationReport {
    pub mazes: Arc<Vec<Maze>>,
    pub elapsed: Duration,
}

/// Paths for the current batch, index-aligned with its mazes
#[derive(Clone, Debug)]
pub struct SolveReport {
    pub paths: Vec<Vec<Point>>,
    pub elapsed: Duration,
}

/// Holds the mazes shared between generation and solving requests
///
/// Generation swaps in a whole new batch under the write lock; solving
/// takes a snapshot under the read lock and works outside of it, so
/// several solves may run at once.
#[derive(Debug, Default)]
pub struct MazeSession {
    orchestrator: BatchOrchestrator,
    seed: Option<u64>,
    mazes: RwLock<Arc<Vec<Maze>>>,
}

impl MazeSession {
    pub fn new(orchestrator: BatchOrchestrator) -> Self {
        Self {
            orchestrator,
            seed: None,
            mazes: RwLock::default(),
        }
    }

    /// Make every generated batch reproducible from `seed`
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator {
        &self.orchestrator
    }

    /// Current batch, empty before the first generation
    pub fn mazes(&self) -> Arc<Vec<Maze>> {
        Arc::clone(&self.mazes.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the current batch with `params.count` new mazes
    pub fn generate(&self, params: MazeParams) -> Result<GenerationReport, MazeError> {
        if params.count == 0 {
            return Err(MazeError::EmptyBatch);
        }

        let t0 = Instant::now();
        let mazes = Arc::new(self.orchestrator.generate_batch(
            params.count,
            params.width,
            params.height,
            self.seed,
        )?);
        let elapsed = t0.elapsed();

        *self.mazes.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&mazes);
        Ok(GenerationReport { mazes, elapsed })
    }

    /// Solve every maze of the current batch
    ///
    /// Returns [`MazeError::UninitializedGrid`] if nothing was generated yet.
    pub fn solve(&self) -> Result<SolveReport, MazeError> {
        let mazes = self.mazes();
        if mazes.is_empty() {
            return Err(MazeError::UninitializedGrid);
        }

        let t0 = Instant::now();
        let paths = self.orchestrator.solve_batch(&mazes);
        Ok(SolveReport {
            paths,
            elapsed: t0.elapsed(),
        })
    }
}

#[cfg(feature = "serde")]
fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(feature = "serde")]
impl Serialize for GenerationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GenerationReport", 3)?;
        state.serialize_field("numMazes", &self.mazes.len())?;
        state.serialize_field("generationTime", &millis(self.elapsed))?;
        state.serialize_field("mazes", self.mazes.as_slice())?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl Serialize for SolveReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SolveReport", 2)?;
        state.serialize_field("solvingTime", &millis(self.elapsed))?;
        state.serialize_field("paths", &self.paths)?;
        state.end()
    }
}
