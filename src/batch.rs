//! Generating and solving many independent mazes

use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::{AStarSolver, Heuristic, Maze, MazeError, MazeGenerator, Point};

/// How a batch is spread over workers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExecutionMode {
    /// One maze after another on the calling thread
    Sequential,
    /// Work-stealing rayon pool, one task per maze
    #[default]
    Parallel,
    /// Contiguous partitions per worker, results sent back to a coordinator
    Partitioned,
}

/// Runs generation and solving over a batch, keeping results in input order
///
/// All modes hand out the same per-maze seeds, so a seeded batch is
/// identical whichever mode produced it.
#[derive(Clone, Copy, Debug)]
pub struct BatchOrchestrator {
    mode: ExecutionMode,
    workers: usize,
    solver: AStarSolver,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new(ExecutionMode::default(), 0)
    }
}

impl BatchOrchestrator {
    /// Orchestrator with `workers` threads; 0 uses the available parallelism
    pub fn new(mode: ExecutionMode, workers: usize) -> Self {
        let workers = if workers == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            workers
        };
        Self {
            mode,
            workers,
            solver: AStarSolver::default(),
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.solver = AStarSolver::new(heuristic);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn heuristic(&self) -> Heuristic {
        self.solver.heuristic()
    }

    /// Generate `count` mazes of `width` x `height`
    ///
    /// With a base `seed`, maze `i` is generated from `seed + i`. Without
    /// one, per-maze seeds are drawn from entropy in index order before any
    /// maze is built.
    ///
    /// # Examples
    /// ```
    /// use prim_maze::{BatchOrchestrator, ExecutionMode};
    ///
    /// let sequential = BatchOrchestrator::new(ExecutionMode::Sequential, 1);
    /// let parallel = BatchOrchestrator::new(ExecutionMode::Parallel, 4);
    ///
    /// let a = sequential.generate_batch(8, 10, 10, Some(1)).unwrap();
    /// let b = parallel.generate_batch(8, 10, 10, Some(1)).unwrap();
    /// assert_eq!(sequential.solve_batch(&a), parallel.solve_batch(&b));
    /// ```
    pub fn generate_batch(
        &self,
        count: usize,
        width: usize,
        height: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Maze>, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let seeds = Self::maze_seeds(count, seed);

        let t0 = Instant::now();
        let mazes = self
            .run(&seeds, |&seed| {
                MazeGenerator::new(Some(seed)).generate_maze(width, height)
            })
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Generated {} mazes of size {}x{} in {:?} ({:?}, {} workers)",
            count,
            width,
            height,
            t0.elapsed(),
            self.mode,
            self.workers
        );
        Ok(mazes)
    }

    /// One path per maze, index-aligned with `mazes`
    ///
    /// Unsolvable mazes give an empty path.
    pub fn solve_batch(&self, mazes: &[Maze]) -> Vec<Vec<Point>> {
        let t0 = Instant::now();
        let paths = self.run(mazes, |maze| self.solver.solve(maze));
        info!(
            "Solved {} mazes in {:?} ({:?}, {} workers)",
            mazes.len(),
            t0.elapsed(),
            self.mode,
            self.workers
        );
        paths
    }

    fn maze_seeds(count: usize, seed: Option<u64>) -> Vec<u64> {
        match seed {
            Some(base) => (0..count as u64).map(|i| base.wrapping_add(i)).collect(),
            None => {
                let mut master = StdRng::from_entropy();
                (0..count).map(|_| master.gen()).collect()
            }
        }
    }

    /// Apply `job` to every item, returning results in input order
    fn run<T, R, F>(&self, items: &[T], job: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        match self.mode {
            ExecutionMode::Sequential => items.iter().map(job).collect(),
            ExecutionMode::Parallel => self.run_parallel(items, job),
            ExecutionMode::Partitioned => self.run_partitioned(items, job),
        }
    }

    fn run_parallel<T, R, F>(&self, items: &[T], job: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
        {
            Ok(pool) => pool.install(|| items.par_iter().map(&job).collect()),
            Err(err) => {
                // Fall back to the global pool
                debug!("Could not build worker pool: {}", err);
                items.par_iter().map(&job).collect()
            }
        }
    }

    /// Split `items` into one contiguous partition per worker
    ///
    /// Each partition is processed on its own thread and reported back as
    /// `(rank, results)`; the coordinator reassembles them in rank order.
    fn run_partitioned<T, R, F>(&self, items: &[T], job: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }
        let per_partition = items.len().div_ceil(self.workers);
        let partitions = items.len().div_ceil(per_partition);

        let mut gathered: Vec<Option<Vec<R>>> = (0..partitions).map(|_| None).collect();
        thread::scope(|scope| {
            let (sender, receiver) = mpsc::channel();
            for (rank, partition) in items.chunks(per_partition).enumerate() {
                let sender = sender.clone();
                let job = &job;
                scope.spawn(move || {
                    let local: Vec<R> = partition.iter().map(job).collect();
                    // Receiver outlives every sender inside this scope
                    let _ = sender.send((rank, local));
                });
            }
            drop(sender);

            for (rank, local) in receiver {
                debug!("Partition {} reported {} results", rank, local.len());
                gathered[rank] = Some(local);
            }
        });

        gathered.into_iter().flatten().flatten().collect()
    }
}
