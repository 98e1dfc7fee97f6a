//! Grid model: cells, passages and the maze that owns them

use std::fmt;

use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use crate::MazeError;

/// Location in the maze
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Grid-step distance between two points
    pub fn manhattan(self, other: Point) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True if the points differ by one in exactly one axis
    pub fn is_adjacent(self, other: Point) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single grid position
///
/// By default there are walls on every side of a cell. Equality only
/// considers the coordinates, never the generation flags.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Cell {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pos: Point,
    /// Already incorporated into the spanning tree
    pub(crate) in_maze: bool,
    /// Queued as a generation candidate
    pub(crate) in_frontier: bool,
}

impl Cell {
    fn new(pos: Point) -> Self {
        Self {
            pos,
            in_maze: false,
            in_frontier: false,
        }
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn in_maze(&self) -> bool {
        self.in_maze
    }

    pub fn in_frontier(&self) -> bool {
        self.in_frontier
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Cell {}

/// Open connection between two adjacent cells, i.e. a missing wall
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Passage {
    c1: Point,
    c2: Point,
}

impl Passage {
    pub fn c1(&self) -> Point {
        self.c1
    }

    pub fn c2(&self) -> Point {
        self.c2
    }

    /// True if this passage joins `a` and `b`, in either direction
    pub fn connects(&self, a: Point, b: Point) -> bool {
        (self.c1 == a && self.c2 == b) || (self.c1 == b && self.c2 == a)
    }
}

/// Rectangular 4-connected maze
///
/// Cells are stored row-major, so the cell at `(x, y)` lives at index
/// `y * width + x`. All internal references to cells are such indices.
/// [`Maze::default`] is the unallocated zero-area maze.
#[derive(Clone, Debug, Default)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    /// Open connections, in insertion order
    passages: Vec<Passage>,
    /// Linked cell indices per cell, in passage insertion order
    links: Vec<Vec<usize>>,
    start: Option<usize>,
    finish: Option<usize>,
}

impl Maze {
    /// Neighbour offsets, in the order every search and generation step visits them
    pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

    const S_WALL: char = '🟫';
    const S_VALID: char = '🟩';
    const S_START: char = '🏃';
    const S_FINISH: char = '❎';
    const S_PATH: char = '🟨';

    /// Allocate a `width` x `height` grid of unvisited cells
    ///
    /// Returns [`MazeError::InvalidDimensions`] if either side is zero.
    ///
    /// # Examples
    /// ```
    /// use prim_maze::{Maze, Point};
    ///
    /// let maze = Maze::new(3, 2).unwrap();
    /// assert_eq!(maze.cells().len(), 6);
    /// assert_eq!(maze.start(), None);
    /// assert!(maze.contains(Point::new(2, 1)));
    /// ```
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Point::new(x, y))))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
            passages: Vec::new(),
            links: vec![Vec::new(); width * height],
            start: None,
            finish: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells as rows, so that `rows()[y][x]` is the cell at `(x, y)`
    pub fn rows(&self) -> Vec<&[Cell]> {
        self.cells.chunks(self.width.max(1)).collect()
    }

    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.index(p).map(|idx| &self.cells[idx])
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn start(&self) -> Option<Point> {
        self.start.map(|idx| self.point(idx))
    }

    pub fn finish(&self) -> Option<Point> {
        self.finish.map(|idx| self.point(idx))
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    pub(crate) fn index(&self, p: Point) -> Option<usize> {
        self.contains(p).then(|| p.y * self.width + p.x)
    }

    pub(crate) fn point(&self, idx: usize) -> Point {
        Point::new(idx % self.width, idx / self.width)
    }

    pub(crate) fn cell_mut(&mut self, idx: usize) -> &mut Cell {
        &mut self.cells[idx]
    }

    /// Grid-adjacent points that exist on the board
    ///
    /// Order is fixed to +x, +y, -x, -y.
    pub fn neighbors_of(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        Self::DIRECTIONS.into_iter().filter_map(move |(dx, dy)| {
            let n = Point::new(p.x.checked_add_signed(dx)?, p.y.checked_add_signed(dy)?);
            self.contains(n).then_some(n)
        })
    }

    pub(crate) fn neighbor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors_of(self.point(idx))
            .map(move |n| n.y * self.width + n.x)
    }

    /// Points joined to `p` by a passage, in passage insertion order
    pub fn linked_neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        self.index(p)
            .map(|idx| self.links[idx].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&idx| self.point(idx))
    }

    pub(crate) fn links_of(&self, idx: usize) -> &[usize] {
        &self.links[idx]
    }

    /// True if a passage joins `a` and `b`
    pub fn is_linked(&self, a: Point, b: Point) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => self.links[ia].contains(&ib),
            _ => false,
        }
    }

    /// Open the wall between two adjacent cells
    ///
    /// Returns [`MazeError::InvalidPassage`] if either point lies outside
    /// the grid or the points are not adjacent.
    pub fn add_passage(&mut self, a: Point, b: Point) -> Result<(), MazeError> {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) if a.is_adjacent(b) => {
                self.link(ia, ib);
                Ok(())
            }
            _ => Err(MazeError::InvalidPassage { a, b }),
        }
    }

    /// Record a passage between two cell indices known to be adjacent
    pub(crate) fn link(&mut self, a: usize, b: usize) {
        self.passages.push(Passage {
            c1: self.point(a),
            c2: self.point(b),
        });
        self.links[a].push(b);
        self.links[b].push(a);
    }

    /// Designate start and finish cells
    pub fn set_endpoints(&mut self, start: Point, finish: Point) -> Result<(), MazeError> {
        match (self.index(start), self.index(finish)) {
            (Some(s), Some(f)) => {
                self.start = Some(s);
                self.finish = Some(f);
                Ok(())
            }
            _ => Err(MazeError::InvalidPassage {
                a: start,
                b: finish,
            }),
        }
    }

    pub(crate) fn set_endpoint_indices(&mut self, start: usize, finish: usize) {
        self.start = Some(start);
        self.finish = Some(finish);
    }

    /// Remove all passages and flags, keeping the allocated grid
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.in_maze = false;
            cell.in_frontier = false;
        }
        self.passages.clear();
        self.links.iter_mut().for_each(Vec::clear);
        self.start = None;
        self.finish = None;
    }

    /// Draw the maze with `path` highlighted
    ///
    /// Every cell takes the odd position `(2x + 1, 2y + 1)` of a
    /// `(2w + 1) x (2h + 1)` canvas, walls fill the rest, and each passage
    /// opens the square between its two cells.
    pub fn render_with_path(&self, path: &[Point]) -> String {
        let mut squares: Vec<Vec<char>> = (0..2 * self.height + 1)
            .map(|_| (0..2 * self.width + 1).map(|_| Self::S_WALL).collect())
            .collect();

        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.in_maze || !self.links[idx].is_empty() {
                squares[2 * cell.pos.y + 1][2 * cell.pos.x + 1] = Self::S_VALID;
            }
        }
        for p in &self.passages {
            squares[p.c1.y + p.c2.y + 1][p.c1.x + p.c2.x + 1] = Self::S_VALID;
        }

        for p in path.iter().filter(|p| self.contains(**p)) {
            squares[2 * p.y + 1][2 * p.x + 1] = Self::S_PATH;
        }
        for step in path.windows(2) {
            if self.is_linked(step[0], step[1]) {
                squares[step[0].y + step[1].y + 1][step[0].x + step[1].x + 1] = Self::S_PATH;
            }
        }

        if let Some(s) = self.start() {
            squares[2 * s.y + 1][2 * s.x + 1] = Self::S_START;
        }
        if let Some(f) = self.finish() {
            squares[2 * f.y + 1][2 * f.x + 1] = Self::S_FINISH;
        }

        squares.iter().map(|row| row.iter().join("")).join("\n")
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_path(&[]))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Maze {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Maze", 6)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("start", &self.start())?;
        state.serialize_field("finish", &self.finish())?;
        state.serialize_field("cells", &self.cells)?;
        state.serialize_field("passages", &self.passages)?;
        state.end()
    }
}
