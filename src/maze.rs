#![allow(clippy::cast_sign_loss)]

use std::{
    fmt::{self, Display},
    ops::Add,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("a {width}x{height} maze has too many cells")]
    TooLarge { width: i32, height: i32 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Vector(pub i32, pub i32);

impl Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0, self.1 + other.1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Clockwise from the top. The solver explores in this order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub const fn offset(self) -> Vector {
        match self {
            Self::Up => Vector(0, -1),
            Self::Right => Vector(1, 0),
            Self::Down => Vector(0, 1),
            Self::Left => Vector(-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub visited: bool,
    pub on_path: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            up: true,
            down: true,
            left: true,
            right: true,
            visited: false,
            on_path: false,
        }
    }
}

impl Cell {
    pub const fn wall(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Down => self.down,
            Direction::Left => self.left,
        }
    }

    pub fn set_wall(&mut self, dir: Direction, present: bool) {
        match dir {
            Direction::Up => self.up = present,
            Direction::Right => self.right = present,
            Direction::Down => self.down = present,
            Direction::Left => self.left = present,
        }
    }
}

/// A rectangular grid of walled cells, stored row-major.
///
/// Walls between two cells are stored on both sides and are only ever
/// opened in pairs through [`Maze::carve_passage`]. The only unpaired
/// openings are the boundary ones made by [`Maze::open_boundary`].
pub struct Maze {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Maze {
    pub fn new(width: i32, height: i32) -> Result<Self, MazeError> {
        if width <= 0 || height <= 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let count = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n <= i32::MAX as usize)
            .ok_or(MazeError::TooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); count],
        })
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn start(&self) -> Vector {
        Vector(0, 0)
    }

    pub const fn exit(&self) -> Vector {
        Vector(self.width - 1, self.height - 1)
    }

    pub const fn contains(&self, pos: Vector) -> bool {
        pos.0 >= 0 && pos.0 < self.width && pos.1 >= 0 && pos.1 < self.height
    }

    fn index(&self, pos: Vector) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.1 as usize) * (self.width as usize) + pos.0 as usize)
    }

    pub fn cell(&self, pos: Vector) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    pub fn cell_mut(&mut self, pos: Vector) -> Option<&mut Cell> {
        self.index(pos).map(move |idx| &mut self.cells[idx])
    }

    pub fn cells(&self) -> impl Iterator<Item = (Vector, &Cell)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (Vector(idx as i32 % width, idx as i32 / width), cell))
    }

    /// Whether `pos` has an open passage into its in-bounds neighbour in `dir`.
    pub fn is_open(&self, pos: Vector, dir: Direction) -> bool {
        self.contains(pos + dir.offset()) && self.cell(pos).is_some_and(|c| !c.wall(dir))
    }

    /// Opens the wall pair between `pos` and its neighbour in `dir`.
    /// Does nothing if either cell is outside the grid.
    pub fn carve_passage(&mut self, pos: Vector, dir: Direction) {
        let next = pos + dir.offset();
        if !(self.contains(pos) && self.contains(next)) {
            return;
        }
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_wall(dir, false);
        }
        if let Some(cell) = self.cell_mut(next) {
            cell.set_wall(dir.opposite(), false);
        }
    }

    /// Opens a single wall of `pos`; used for the entrance and exit, which
    /// face outside the grid and have no matching neighbour wall.
    pub fn open_boundary(&mut self, pos: Vector, dir: Direction) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_wall(dir, false);
        }
    }

    pub fn reset_visited(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
        }
    }

    pub fn clear_path(&mut self) {
        for cell in &mut self.cells {
            cell.on_path = false;
        }
    }

    pub const fn render(&self, mode: Mode) -> Render<'_> {
        Render { maze: self, mode }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Plain,
    Solution,
}

pub struct Render<'a> {
    maze: &'a Maze,
    mode: Mode,
}

impl Render<'_> {
    const MARKER: char = '*';
}

impl Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let maze = self.maze;
        for y in 0..maze.height {
            for x in 0..maze.width {
                let cell = maze.cell(Vector(x, y)).ok_or(fmt::Error)?;
                write!(f, "{}", if cell.up { "+---" } else { "+   " })?;
            }
            writeln!(f, "+")?;

            for x in 0..maze.width {
                let cell = maze.cell(Vector(x, y)).ok_or(fmt::Error)?;
                write!(f, "{}", if cell.left { '|' } else { ' ' })?;
                if self.mode == Mode::Solution && cell.on_path {
                    write!(f, " {} ", Self::MARKER)?;
                } else {
                    write!(f, "   ")?;
                }
            }
            writeln!(f, "|")?;
        }
        for _ in 0..maze.width {
            write!(f, "+---")?;
        }
        writeln!(f, "+")
    }
}

impl Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(Mode::Plain).fmt(f)
    }
}
