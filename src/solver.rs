use tracing::debug;

use crate::maze::{Direction, Maze, Vector};

/// One level of the depth-first search: a visited cell and the index of the
/// next direction in [`Direction::ALL`] still to try from it.
struct Frame {
    pos: Vector,
    next: usize,
}

/// Depth-first search from the top-left cell to the bottom-right one.
///
/// Directions are tried up, right, down, left. Every cell on the path that
/// is found gets `on_path` set; nothing is marked when there is no path.
pub struct Solver;

impl Solver {
    pub fn solve(maze: &mut Maze) -> bool {
        maze.reset_visited();
        maze.clear_path();

        let (start, target) = (maze.start(), maze.exit());
        let found = Self::search(maze, start, target);
        debug!(
            found,
            marked = maze.cells().filter(|(_, cell)| cell.on_path).count(),
            "maze solved"
        );
        found
    }

    fn search(maze: &mut Maze, start: Vector, target: Vector) -> bool {
        if start == target {
            Self::mark(maze, target);
            return true;
        }
        if !Self::enter(maze, start) {
            return false;
        }

        let mut frames = vec![Frame {
            pos: start,
            next: 0,
        }];
        while let Some(frame) = frames.last_mut() {
            let Some(&dir) = Direction::ALL.get(frame.next) else {
                frames.pop();
                continue;
            };
            frame.next += 1;

            let pos = frame.pos;
            if maze.cell(pos).map_or(true, |cell| cell.wall(dir)) {
                continue;
            }

            let next = pos + dir.offset();
            if next == target {
                Self::mark(maze, target);
                for frame in &frames {
                    Self::mark(maze, frame.pos);
                }
                return true;
            }
            if Self::enter(maze, next) {
                frames.push(Frame { pos: next, next: 0 });
            }
        }
        false
    }

    /// Marks `pos` visited, unless it is off the grid or already visited.
    fn enter(maze: &mut Maze, pos: Vector) -> bool {
        match maze.cell_mut(pos) {
            Some(cell) if !cell.visited => {
                cell.visited = true;
                true
            }
            _ => false,
        }
    }

    fn mark(maze: &mut Maze, pos: Vector) {
        if let Some(cell) = maze.cell_mut(pos) {
            cell.on_path = true;
        }
    }

    /// The marked path in order from entrance to exit.
    ///
    /// Walks marked neighbours through open passages, so it assumes the
    /// passages form a tree, as carved mazes do.
    pub fn path(maze: &Maze) -> Vec<Vector> {
        let on_path = |pos: Vector| maze.cell(pos).is_some_and(|cell| cell.on_path);

        let mut path = Vec::new();
        let mut prev = None;
        let mut pos = maze.start();
        while on_path(pos) {
            path.push(pos);
            if pos == maze.exit() {
                break;
            }
            let next = Direction::ALL
                .iter()
                .map(|&dir| (dir, pos + dir.offset()))
                .find(|&(dir, next)| {
                    Some(next) != prev && maze.is_open(pos, dir) && on_path(next)
                });
            match next {
                Some((_, next)) => {
                    prev = Some(pos);
                    pos = next;
                }
                None => break,
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carver::Carver;
    use crate::maze::Mode;

    fn carved(width: i32, height: i32, seed: u64) -> Maze {
        let mut maze = Maze::new(width, height).unwrap();
        Carver::from_seed(seed).carve(&mut maze);
        maze
    }

    #[test]
    fn generated_mazes_are_solvable() {
        for seed in 0..20 {
            let mut maze = carved(1 + (seed as i32 % 7), 1 + (seed as i32 % 5), seed);
            assert!(Solver::solve(&mut maze), "seed {seed}");
        }
    }

    #[test]
    fn solution_is_a_simple_connected_path() {
        let mut maze = carved(15, 11, 5);
        assert!(Solver::solve(&mut maze));

        let path = Solver::path(&maze);
        assert_eq!(path.first(), Some(&maze.start()));
        assert_eq!(path.last(), Some(&maze.exit()));

        let marked = maze.cells().filter(|(_, cell)| cell.on_path).count();
        assert_eq!(path.len(), marked);

        for pair in path.windows(2) {
            let dir = Direction::ALL
                .into_iter()
                .find(|&dir| pair[0] + dir.offset() == pair[1])
                .unwrap();
            assert!(maze.is_open(pair[0], dir));
        }
    }

    #[test]
    fn single_cell_is_its_own_exit() {
        let mut maze = carved(1, 1, 3);
        assert!(Solver::solve(&mut maze));
        assert_eq!(Solver::path(&maze), vec![Vector(0, 0)]);
    }

    #[test]
    fn two_cells_in_order() {
        let mut maze = carved(2, 1, 8);
        assert!(Solver::solve(&mut maze));
        assert_eq!(Solver::path(&maze), vec![Vector(0, 0), Vector(1, 0)]);
        assert_eq!(
            maze.render(Mode::Solution).to_string(),
            "+---+---+\n\
             \x20 *   * |\n\
             +---+---+\n"
        );
    }

    #[test]
    fn disconnected_grid_has_no_solution() {
        let mut maze = Maze::new(3, 3).unwrap();
        maze.carve_passage(Vector(0, 0), Direction::Right);
        maze.carve_passage(Vector(1, 0), Direction::Down);
        maze.carve_passage(Vector(2, 2), Direction::Up);

        assert!(!Solver::solve(&mut maze));
        assert!(maze.cells().all(|(_, cell)| !cell.on_path));
        assert!(Solver::path(&maze).is_empty());
    }

    #[test]
    fn backtracks_out_of_dead_ends() {
        // Right runs into a dead end; the route goes down then right.
        let mut maze = Maze::new(3, 2).unwrap();
        maze.carve_passage(Vector(0, 0), Direction::Right);
        maze.carve_passage(Vector(1, 0), Direction::Right);
        maze.carve_passage(Vector(0, 0), Direction::Down);
        maze.carve_passage(Vector(0, 1), Direction::Right);
        maze.carve_passage(Vector(1, 1), Direction::Right);

        assert!(Solver::solve(&mut maze));
        assert_eq!(
            Solver::path(&maze),
            vec![Vector(0, 0), Vector(0, 1), Vector(1, 1), Vector(2, 1)]
        );
        assert!(!maze.cell(Vector(1, 0)).unwrap().on_path);
        assert!(!maze.cell(Vector(2, 0)).unwrap().on_path);
    }

    #[test]
    fn long_corridor_does_not_exhaust_the_stack() {
        let mut maze = carved(1, 100_000, 21);
        assert!(Solver::solve(&mut maze));
        assert_eq!(Solver::path(&maze).len(), 100_000);
    }

    #[test]
    fn solving_twice_gives_the_same_marks() {
        let mut maze = carved(8, 6, 11);
        assert!(Solver::solve(&mut maze));
        let first = maze.render(Mode::Solution).to_string();
        assert!(Solver::solve(&mut maze));
        assert_eq!(first, maze.render(Mode::Solution).to_string());
    }
}
