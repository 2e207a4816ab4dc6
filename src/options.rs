use core::fmt;
use std::str::FromStr;

use grid_util::point::Point;

use crate::{clamp_dim, C};

/// Lower end of the wall probability range reachable from a 0-100 density control.
pub const DENSITY_MIN: f32 = 0.05;
/// Upper end of the wall probability range reachable from a 0-100 density control.
pub const DENSITY_MAX: f32 = 0.45;

/// The search algorithms the engine can step through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bfs,
    Dijkstra,
    #[default]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bfs, Algorithm::Dijkstra, Algorithm::AStar];

    /// Whether the frontier is ordered by cost. BFS uses plain insertion order.
    pub fn uses_priority(&self) -> bool {
        !matches!(self, Algorithm::Bfs)
    }

    /// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) for A*, zero
    /// otherwise. Only admissible on a 4-grid: with cost 2 diagonals it can overestimate, which
    /// is accepted.
    pub fn heuristic(&self, p: &Point, goal: &Point) -> i32 {
        match self {
            Algorithm::AStar => p.manhattan_distance(goal) * C,
            Algorithm::Bfs | Algorithm::Dijkstra => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::AStar => "A*",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an algorithm name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseAlgorithmError(String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown algorithm '{}', expected one of BFS, Dijkstra, A*",
            self.0
        )
    }
}

impl std::error::Error for ParseAlgorithmError {}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "a*" | "astar" => Ok(Algorithm::AStar),
            _ => Err(ParseAlgorithmError(s.to_owned())),
        }
    }
}

/// Caller-owned configuration. Read when a maze is generated and when a search begins.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub algorithm: Algorithm,
    /// Also allow the four diagonal moves, at cost [D](crate::D).
    pub diagonal: bool,
    /// Force the top row and rightmost column open so the corners are always connected.
    pub guarantee_path: bool,
    /// Probability of each cell becoming a wall.
    pub density: f32,
    pub rows: usize,
    pub cols: usize,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            algorithm: Algorithm::AStar,
            diagonal: false,
            guarantee_path: true,
            density: 0.28,
            rows: 25,
            cols: 25,
        }
    }
}

impl Options {
    /// Maps a 0-100 control value linearly onto [DENSITY_MIN]..=[DENSITY_MAX].
    pub fn density_from_percent(percent: f64) -> f32 {
        let t = percent.clamp(0.0, 100.0) / 100.0;
        DENSITY_MIN + (DENSITY_MAX - DENSITY_MIN) * t as f32
    }

    /// Inverse of [density_from_percent](Self::density_from_percent).
    pub fn density_percent(&self) -> f64 {
        let t = (self.density - DENSITY_MIN) / (DENSITY_MAX - DENSITY_MIN);
        (t as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn set_density_percent(&mut self, percent: f64) {
        self.density = Options::density_from_percent(percent);
    }

    /// The density actually used for generation.
    pub fn wall_probability(&self) -> f32 {
        if self.density.is_nan() {
            0.0
        } else {
            self.density.clamp(0.0, 1.0)
        }
    }

    /// Rows and columns clamped to the supported range.
    pub fn clamped_size(&self) -> (usize, usize) {
        (clamp_dim(self.rows), clamp_dim(self.cols))
    }
}
