//! # maze_pathfinding
//!
//! An incremental grid search engine for visualising
//! [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search),
//! [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) and
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) on randomly generated mazes.
//!
//! The search advances a single frontier pop per [MazeEngine::step] call, so a driver can
//! either step it manually or call it from a timer. Running it to completion with
//! [MazeEngine::run_to_completion] produces exactly the same result as stepping by hand.
//!
//! ```
//! use maze_pathfinding::{cell, Algorithm, MazeEngine, Options, Outcome};
//!
//! let options = Options {
//!     algorithm: Algorithm::Bfs,
//!     density: 0.0,
//!     rows: 5,
//!     cols: 5,
//!     ..Options::default()
//! };
//! let mut engine = MazeEngine::with_seed(options, 7);
//! assert_eq!(engine.run_to_completion(), Outcome::Solved);
//! assert_eq!(engine.path().first(), Some(&cell(0, 0)));
//! assert_eq!(engine.path_length(), 9);
//! ```
pub mod engine;
pub mod frontier;
pub mod maze_grid;
pub mod options;
pub mod search;

use grid_util::point::Point;

pub use engine::MazeEngine;
pub use options::{Algorithm, Options, ParseAlgorithmError};
pub use search::{CellState, Outcome, SearchState};

/// Cost of a cardinal (straight) move.
pub const C: i32 = 1;
/// Cost of a diagonal move. An integer stand-in for the square root of two.
pub const D: i32 = 2;

/// Smallest number of rows or columns a maze can have.
pub const MIN_DIM: usize = 5;
/// Largest number of rows or columns a maze can have.
pub const MAX_DIM: usize = 80;

/// Builds the [Point] for a cell. Columns map to `x` and rows to `y`.
pub fn cell(row: i32, col: i32) -> Point {
    Point::new(col, row)
}

/// Clamps a requested row or column count to the supported range.
pub fn clamp_dim(n: usize) -> usize {
    n.clamp(MIN_DIM, MAX_DIM)
}

/// Checks whether two cells are one legal move apart under the given movement rule.
pub fn is_adjacent(p1: &Point, p2: &Point, allow_diagonal: bool) -> bool {
    match (p1.move_distance(p2), p1.manhattan_distance(p2)) {
        (1, 1) => true,
        (1, 2) => allow_diagonal,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_are_clamped() {
        assert_eq!(clamp_dim(0), MIN_DIM);
        assert_eq!(clamp_dim(25), 25);
        assert_eq!(clamp_dim(500), MAX_DIM);
    }

    #[test]
    fn adjacency_respects_diagonal_switch() {
        let p = cell(2, 2);
        assert!(is_adjacent(&p, &cell(1, 2), false));
        assert!(is_adjacent(&p, &cell(2, 3), false));
        assert!(!is_adjacent(&p, &cell(3, 3), false));
        assert!(is_adjacent(&p, &cell(3, 3), true));
        assert!(!is_adjacent(&p, &p, true));
        assert!(!is_adjacent(&p, &cell(4, 2), true));
        assert!(!is_adjacent(&p, &cell(4, 3), true));
        for q in p.moore_neighborhood() {
            assert!(is_adjacent(&p, &q, true));
            assert_eq!(is_adjacent(&p, &q, false), p.neumann_neighborhood().contains(&q));
        }
    }
}
