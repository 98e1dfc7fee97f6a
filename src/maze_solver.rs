//! Shortest paths through a maze with A* search

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use ordered_float::OrderedFloat;

use crate::{Maze, MazeError, Point};

/// Estimate of the remaining distance to the finish
///
/// Both variants are admissible on a 4-connected grid with unit steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
}

impl Heuristic {
    pub fn estimate(self, a: Point, b: Point) -> f64 {
        match self {
            Heuristic::Manhattan => a.manhattan(b) as f64,
            Heuristic::Euclidean => {
                let dx = a.x.abs_diff(b.x) as f64;
                let dy = a.y.abs_diff(b.y) as f64;
                dx.hypot(dy)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum NodeState {
    #[default]
    Unseen,
    Open,
    Closed,
}

/// Per-cell search bookkeeping
#[derive(Clone, Copy, Default)]
struct Node {
    g: f64,
    f: f64,
    parent: Option<usize>,
    /// Position in which the cell first entered the open set
    order: usize,
    state: NodeState,
}

/// Open set entry, popped by smallest `f`, then earliest insertion
#[derive(PartialEq, Eq)]
struct OpenEntry {
    f: OrderedFloat<f64>,
    order: usize,
    idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed, `BinaryHeap` is a max-heap.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* solver over the passage graph of a [`Maze`]
///
/// Equal `f` costs are resolved in favour of the cell that entered the
/// open set first, which reproduces a linear scan over an insertion-ordered
/// open list keeping the first minimum.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStarSolver {
    heuristic: Heuristic,
}

impl AStarSolver {
    pub fn new(heuristic: Heuristic) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Path from `start` to `finish`, both included
    ///
    /// Empty if the maze has no endpoints or the finish cannot be reached.
    ///
    /// # Examples
    /// ```
    /// use prim_maze::{AStarSolver, Maze, Point};
    ///
    /// let mut maze = Maze::new(2, 1).unwrap();
    /// let (a, b) = (Point::new(0, 0), Point::new(1, 0));
    /// maze.add_passage(a, b).unwrap();
    /// maze.set_endpoints(b, a).unwrap();
    ///
    /// assert_eq!(AStarSolver::default().solve(&maze), vec![b, a]);
    /// ```
    pub fn solve(&self, maze: &Maze) -> Vec<Point> {
        match (maze.start(), maze.finish()) {
            (Some(start), Some(finish)) => self.solve_between(maze, start, finish),
            _ => Vec::new(),
        }
    }

    /// Like [`Self::solve`], but a maze without endpoints is an error
    pub fn try_solve(&self, maze: &Maze) -> Result<Vec<Point>, MazeError> {
        let (Some(start), Some(finish)) = (maze.start(), maze.finish()) else {
            return Err(MazeError::UninitializedGrid);
        };
        Ok(self.solve_between(maze, start, finish))
    }

    /// Shortest path between two arbitrary cells
    ///
    /// Empty if either point is outside the maze or no path exists.
    pub fn solve_between(&self, maze: &Maze, from: Point, to: Point) -> Vec<Point> {
        let (Some(start), Some(goal)) = (maze.index(from), maze.index(to)) else {
            return Vec::new();
        };
        if start == goal {
            return vec![from];
        }

        let mut nodes = vec![Node::default(); maze.cells().len()];
        let mut open = BinaryHeap::new();

        let start_f = self.heuristic.estimate(from, to);
        nodes[start] = Node {
            g: 0.0,
            f: start_f,
            parent: None,
            order: 0,
            state: NodeState::Open,
        };
        open.push(OpenEntry {
            f: OrderedFloat(start_f),
            order: 0,
            idx: start,
        });
        let mut inserted = 1;
        let mut expanded = 0;

        while let Some(OpenEntry { f, idx: current, .. }) = open.pop() {
            let node = nodes[current];
            // Skip entries superseded by a cheaper route.
            if node.state != NodeState::Open || OrderedFloat(node.f) != f {
                continue;
            }

            if current == goal {
                let path = Self::reconstruct_path(maze, &nodes, goal);
                debug!(
                    "Found path of {} cells from {} to {}, expanded {} cells",
                    path.len(),
                    from,
                    to,
                    expanded
                );
                return path;
            }

            nodes[current].state = NodeState::Closed;
            expanded += 1;
            let current_point = maze.point(current);

            for &n in maze.links_of(current) {
                let neighbour = nodes[n];
                if neighbour.state == NodeState::Closed {
                    continue;
                }

                let n_point = maze.point(n);
                let tentative_g = node.g + current_point.manhattan(n_point) as f64;
                let in_open = neighbour.state == NodeState::Open;

                if !in_open || tentative_g < neighbour.g {
                    let order = if in_open {
                        neighbour.order
                    } else {
                        inserted += 1;
                        inserted - 1
                    };
                    let f = tentative_g + self.heuristic.estimate(n_point, to);
                    nodes[n] = Node {
                        g: tentative_g,
                        f,
                        parent: Some(current),
                        order,
                        state: NodeState::Open,
                    };
                    open.push(OpenEntry {
                        f: OrderedFloat(f),
                        order,
                        idx: n,
                    });
                }
            }
        }

        debug!(
            "No path from {} to {}, expanded {} cells",
            from, to, expanded
        );
        Vec::new()
    }

    /// Walk parent links back from `goal`, then reverse
    fn reconstruct_path(maze: &Maze, nodes: &[Node], goal: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(idx) = current {
            path.push(maze.point(idx));
            current = nodes[idx].parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use crate::{AStarSolver, Heuristic, Maze, MazeError, MazeGenerator, Point};

    fn p(x: usize, y: usize) -> Point {
        Point::new(x, y)
    }

    fn assert_valid_path(maze: &Maze, path: &[Point]) {
        assert_eq!(path.first().copied(), maze.start());
        assert_eq!(path.last().copied(), maze.finish());
        for step in path.windows(2) {
            assert!(maze.is_linked(step[0], step[1]), "{:?} not linked", step);
        }
    }

    /// 3x3 maze with a single serpentine corridor
    ///
    /// ```text
    /// S > >
    /// < < v
    /// v > F
    /// ```
    fn serpentine() -> Maze {
        let mut maze = Maze::new(3, 3).unwrap();
        let route = [
            p(0, 0),
            p(1, 0),
            p(2, 0),
            p(2, 1),
            p(1, 1),
            p(0, 1),
            p(0, 2),
            p(1, 2),
            p(2, 2),
        ];
        for step in route.windows(2) {
            maze.add_passage(step[0], step[1]).unwrap();
        }
        maze.set_endpoints(p(0, 0), p(2, 2)).unwrap();
        maze
    }

    #[test]
    fn two_cells() {
        let mut maze = Maze::new(2, 1).unwrap();
        maze.add_passage(p(0, 0), p(1, 0)).unwrap();
        maze.set_endpoints(p(0, 0), p(1, 0)).unwrap();
        assert_eq!(AStarSolver::default().solve(&maze), vec![p(0, 0), p(1, 0)]);

        maze.set_endpoints(p(1, 0), p(0, 0)).unwrap();
        assert_eq!(AStarSolver::default().solve(&maze), vec![p(1, 0), p(0, 0)]);
    }

    #[test]
    fn follow_the_only_corridor() {
        let maze = serpentine();
        let path = AStarSolver::default().solve(&maze);

        // Corridor length 8 steps
        assert_eq!(path.len(), 9);
        assert_valid_path(&maze, &path);
    }

    #[test]
    fn dead_end_is_not_part_of_path() {
        let mut maze = Maze::new(3, 2).unwrap();
        maze.add_passage(p(0, 0), p(1, 0)).unwrap();
        maze.add_passage(p(1, 0), p(1, 1)).unwrap();
        maze.add_passage(p(1, 1), p(0, 1)).unwrap();
        maze.add_passage(p(1, 0), p(2, 0)).unwrap();
        maze.add_passage(p(2, 0), p(2, 1)).unwrap();
        maze.set_endpoints(p(0, 0), p(0, 1)).unwrap();

        let path = AStarSolver::default().solve(&maze);
        assert_eq!(path, vec![p(0, 0), p(1, 0), p(1, 1), p(0, 1)]);
    }

    #[test]
    fn disconnected_finish() {
        let mut maze = Maze::new(3, 1).unwrap();
        maze.add_passage(p(0, 0), p(1, 0)).unwrap();
        maze.set_endpoints(p(0, 0), p(2, 0)).unwrap();

        assert!(AStarSolver::default().solve(&maze).is_empty());
        assert_eq!(AStarSolver::default().try_solve(&maze), Ok(vec![]));
    }

    #[test]
    fn start_is_finish() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.set_endpoints(p(1, 1), p(1, 1)).unwrap();
        assert_eq!(AStarSolver::default().solve(&maze), vec![p(1, 1)]);
    }

    #[test]
    fn missing_endpoints() {
        let maze = Maze::new(2, 2).unwrap();
        assert!(AStarSolver::default().solve(&maze).is_empty());
        assert_eq!(
            AStarSolver::default().try_solve(&maze),
            Err(MazeError::UninitializedGrid)
        );
        assert!(AStarSolver::default()
            .solve_between(&maze, p(0, 0), p(5, 5))
            .is_empty());
    }

    #[test]
    fn equal_costs_prefer_earliest_discovered() {
        // Two equally short routes around a 2x2 loop; the passage added
        // first decides which neighbour of the start is expanded first.
        let mut via_right = Maze::new(2, 2).unwrap();
        via_right.add_passage(p(0, 0), p(1, 0)).unwrap();
        via_right.add_passage(p(0, 0), p(0, 1)).unwrap();
        via_right.add_passage(p(1, 0), p(1, 1)).unwrap();
        via_right.add_passage(p(0, 1), p(1, 1)).unwrap();
        via_right.set_endpoints(p(0, 0), p(1, 1)).unwrap();

        let mut via_down = Maze::new(2, 2).unwrap();
        via_down.add_passage(p(0, 0), p(0, 1)).unwrap();
        via_down.add_passage(p(0, 0), p(1, 0)).unwrap();
        via_down.add_passage(p(0, 1), p(1, 1)).unwrap();
        via_down.add_passage(p(1, 0), p(1, 1)).unwrap();
        via_down.set_endpoints(p(0, 0), p(1, 1)).unwrap();

        for heuristic in [Heuristic::Manhattan, Heuristic::Euclidean] {
            let solver = AStarSolver::new(heuristic);
            assert_eq!(solver.solve(&via_right), vec![p(0, 0), p(1, 0), p(1, 1)]);
            assert_eq!(solver.solve(&via_down), vec![p(0, 0), p(0, 1), p(1, 1)]);
        }
    }

    #[test]
    fn generated_maze_is_solvable() {
        let maze = MazeGenerator::new(Some(11)).generate_maze(30, 20).unwrap();
        let path = AStarSolver::default().solve(&maze);

        assert!(!path.is_empty());
        assert_valid_path(&maze, &path);
    }

    #[test]
    fn solving_twice_gives_same_path() {
        let maze = MazeGenerator::new(Some(5)).generate_maze(25, 25).unwrap();
        let solver = AStarSolver::default();
        assert_eq!(solver.solve(&maze), solver.solve(&maze));
    }

    #[test]
    fn heuristics_agree_on_length() {
        // Perfect maze: the shortest path is the only path.
        for seed in 0..10 {
            let maze = MazeGenerator::new(Some(seed)).generate_maze(12, 9).unwrap();
            let manhattan = AStarSolver::new(Heuristic::Manhattan).solve(&maze);
            let euclidean = AStarSolver::new(Heuristic::Euclidean).solve(&maze);
            assert_eq!(manhattan, euclidean);
        }
    }

    #[test]
    fn estimates() {
        assert_eq!(Heuristic::Manhattan.estimate(p(0, 0), p(3, 4)), 7.0);
        assert_eq!(Heuristic::Euclidean.estimate(p(0, 0), p(3, 4)), 5.0);
        assert_eq!(Heuristic::Euclidean.estimate(p(3, 4), p(0, 0)), 5.0);
    }
}
