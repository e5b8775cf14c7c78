use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::maze::{Direction, Maze, Vector};

/// Neighbours are collected in this order before one is picked at random.
static CARVE_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Carves a perfect maze with randomized depth-first backtracking.
pub struct Carver<R> {
    rng: R,
}

impl Carver<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Carver<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn carve(&mut self, maze: &mut Maze) {
        let start = maze.start();
        let mut cells = Vec::new();
        let mut carved = 0usize;

        Self::visit(maze, start);
        cells.push(start);
        while let Some(&cell) = cells.last() {
            let unvisited = CARVE_ORDER
                .iter()
                .copied()
                .filter(|&dir| {
                    maze.cell(cell + dir.offset())
                        .is_some_and(|neighbour| !neighbour.visited)
                })
                .collect::<Vec<_>>();

            if unvisited.is_empty() {
                cells.pop();
            } else {
                let dir = unvisited[self.rng.gen_range(0..unvisited.len())];
                let next = cell + dir.offset();
                trace!(?cell, ?dir, "carving passage");

                maze.carve_passage(cell, dir);
                Self::visit(maze, next);
                cells.push(next);
                carved += 1;
            }
        }

        // Entrance and exit face outside the grid.
        maze.open_boundary(start, Direction::Left);
        let exit = maze.exit();
        maze.open_boundary(exit, Direction::Right);

        maze.reset_visited();
        debug!(
            width = maze.width(),
            height = maze.height(),
            passages = carved,
            "maze carved"
        );
    }

    fn visit(maze: &mut Maze, pos: Vector) {
        if let Some(cell) = maze.cell_mut(pos) {
            cell.visited = true;
        }
    }
}
