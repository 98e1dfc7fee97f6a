//! Maze generation

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Maze, MazeError};

/// Perfect maze generator, growing a random spanning tree from a single cell.
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    /// Create generator, reproducible if `seed` is given
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Allocate a `width` x `height` maze and generate it
    ///
    /// # Examples
    /// ```
    /// use prim_maze::MazeGenerator;
    ///
    /// let maze = MazeGenerator::new(Some(7)).generate_maze(5, 4).unwrap();
    /// assert_eq!(maze.passages().len(), 5 * 4 - 1);
    /// assert!(maze.start().is_some() && maze.finish().is_some());
    /// ```
    pub fn generate_maze(&mut self, width: usize, height: usize) -> Result<Maze, MazeError> {
        let mut maze = Maze::new(width, height)?;
        self.generate(&mut maze)?;
        Ok(maze)
    }

    /// Generate maze with Prim's algorithm
    ///
    /// Starting from a random cell, repeatedly pick a random frontier cell
    /// and connect it to one of its in-maze neighbours at random. Each new
    /// cell joins exactly one existing cell, so the result is a spanning
    /// tree. `start` is the first cell, `finish` the last one incorporated.
    ///
    /// Any previous content of `maze` is discarded. Returns
    /// [`MazeError::UninitializedGrid`] if the maze has no cells.
    ///
    /// See more: <https://weblog.jamisbuck.org/2011/1/10/maze-generation-prim-s-algorithm>
    pub fn generate(&mut self, maze: &mut Maze) -> Result<(), MazeError> {
        if maze.cells().is_empty() {
            return Err(MazeError::UninitializedGrid);
        }
        maze.reset();
        debug!(
            "Generating {}x{} maze with Prim's algorithm",
            maze.width(),
            maze.height()
        );

        let start_x = self.random.gen_range(0..maze.width());
        let start_y = self.random.gen_range(0..maze.height());
        let start = start_y * maze.width() + start_x;
        let mut last_visited = start;
        maze.cell_mut(start).in_maze = true;

        let mut frontier = Vec::new();
        Self::add_frontier_neighbours(maze, &mut frontier, start);

        let mut maze_neighbours = Vec::with_capacity(4);
        while !frontier.is_empty() {
            let idx = self.random.gen_range(0..frontier.len());
            let next = frontier[idx];

            maze_neighbours.clear();
            maze_neighbours.extend(
                maze.neighbor_indices(next)
                    .filter(|&n| maze.cells()[n].in_maze()),
            );

            if !maze_neighbours.is_empty() {
                let neighbour = maze_neighbours[self.random.gen_range(0..maze_neighbours.len())];
                maze.link(next, neighbour);

                let cell = maze.cell_mut(next);
                cell.in_maze = true;
                cell.in_frontier = false;
                last_visited = next;

                Self::add_frontier_neighbours(maze, &mut frontier, next);
            }

            frontier.swap_remove(idx);
        }

        maze.set_endpoint_indices(start, last_visited);
        debug!(
            "Generated maze with {} passages, start {:?}, finish {:?}",
            maze.passages().len(),
            maze.start(),
            maze.finish()
        );
        Ok(())
    }

    /// Queue the neighbours of `idx` that are neither in the maze nor queued
    fn add_frontier_neighbours(maze: &mut Maze, frontier: &mut Vec<usize>, idx: usize) {
        let neighbours: Vec<usize> = maze.neighbor_indices(idx).collect();
        for n in neighbours {
            let cell = maze.cell_mut(n);
            if !cell.in_maze && !cell.in_frontier {
                cell.in_frontier = true;
                frontier.push(n);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use crate::{maze_generator::MazeGenerator, Maze, MazeError, Point};

    /// Number of cells reachable from `from` through passages
    fn reachable(maze: &Maze, from: Point) -> usize {
        let mut seen = HashSet::from([from]);
        let mut stack = vec![from];
        while let Some(p) = stack.pop() {
            for n in maze.linked_neighbors(p) {
                if seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len()
    }

    fn assert_spanning_tree(maze: &Maze) {
        let in_maze = maze.cells().iter().filter(|c| c.in_maze()).count();
        assert_eq!(in_maze, maze.cells().len());
        assert!(maze.cells().iter().all(|c| !c.in_frontier()));
        assert_eq!(maze.passages().len(), in_maze - 1);

        let start = maze.start().unwrap();
        assert_eq!(reachable(maze, start), in_maze);
        for p in maze.passages() {
            assert!(p.c1().is_adjacent(p.c2()));
        }
    }

    #[test]
    fn generate_spanning_tree() {
        let mut gen = MazeGenerator::new(Some(0));
        let maze = gen.generate_maze(15, 15).unwrap();

        assert_spanning_tree(&maze);
        let (start, finish) = (maze.start().unwrap(), maze.finish().unwrap());
        assert!(maze.cell(start).unwrap().in_maze());
        assert!(maze.cell(finish).unwrap().in_maze());
    }

    #[test]
    fn single_cell_maze() {
        let maze = MazeGenerator::new(Some(3)).generate_maze(1, 1).unwrap();

        assert_eq!(maze.start(), Some(Point::new(0, 0)));
        assert_eq!(maze.start(), maze.finish());
        assert!(maze.passages().is_empty());
        assert!(maze.cells()[0].in_maze());
    }

    #[test]
    fn two_cell_maze_has_one_passage() {
        let maze = MazeGenerator::new(None).generate_maze(2, 1).unwrap();

        assert_eq!(maze.passages().len(), 1);
        assert_ne!(maze.start(), maze.finish());
    }

    #[test]
    fn same_seed_same_maze() {
        let a = MazeGenerator::new(Some(42)).generate_maze(20, 12).unwrap();
        let b = MazeGenerator::new(Some(42)).generate_maze(20, 12).unwrap();

        assert_eq!(a.passages(), b.passages());
        assert_eq!((a.start(), a.finish()), (b.start(), b.finish()));
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn unallocated_grid_is_rejected() {
        let mut maze = Maze::default();
        assert_eq!(
            MazeGenerator::new(Some(1)).generate(&mut maze),
            Err(MazeError::UninitializedGrid)
        );
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        assert!(matches!(
            MazeGenerator::new(Some(1)).generate_maze(0, 3),
            Err(MazeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn regenerate_replaces_previous_maze() {
        let mut gen = MazeGenerator::new(Some(9));
        let mut maze = Maze::new(6, 6).unwrap();
        gen.generate(&mut maze).unwrap();
        gen.generate(&mut maze).unwrap();

        assert_spanning_tree(&maze);
    }

    proptest! {
        #[test]
        fn every_seed_gives_spanning_tree(
            seed in any::<u64>(),
            width in 1usize..24,
            height in 1usize..24,
        ) {
            let maze = MazeGenerator::new(Some(seed)).generate_maze(width, height).unwrap();
            prop_assert_eq!(maze.passages().len(), width * height - 1);
            prop_assert_eq!(reachable(&maze, maze.start().unwrap()), width * height);
            prop_assert!(maze.cell(maze.finish().unwrap()).unwrap().in_maze());
        }
    }
}
