use core::fmt;

use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use itertools::iproduct;
use petgraph::unionfind::UnionFind;
use rand::Rng;

use crate::{clamp_dim, C, D};

/// The maze itself: a [BoolGrid] whose cells are either free ([false]) or walls ([true]). Columns
/// run along `x` and rows along `y`, so cell `(row, col)` has index `row * cols + col`.
#[derive(Clone, Debug)]
pub struct MazeGrid {
    pub grid: BoolGrid,
}

impl Default for MazeGrid {
    fn default() -> MazeGrid {
        MazeGrid::new(25, 25)
    }
}

impl MazeGrid {
    /// Creates an all-free grid. Both dimensions are clamped to
    /// [MIN_DIM](crate::MIN_DIM)..=[MAX_DIM](crate::MAX_DIM).
    pub fn new(rows: usize, cols: usize) -> MazeGrid {
        MazeGrid {
            grid: BoolGrid::new(clamp_dim(cols), clamp_dim(rows), false),
        }
    }
    pub fn rows(&self) -> usize {
        self.grid.height()
    }
    pub fn cols(&self) -> usize {
        self.grid.width()
    }
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }
    pub fn in_bounds(&self, p: Point) -> bool {
        self.grid.point_in_bounds(p)
    }
    pub fn get_ix_point(&self, p: &Point) -> usize {
        debug_assert!(
            self.in_bounds(*p),
            "{:?} outside {}x{} grid",
            p,
            self.rows(),
            self.cols()
        );
        self.grid.get_ix_point(p)
    }
    pub fn point(&self, ix: usize) -> Point {
        Point::new((ix % self.cols()) as i32, (ix / self.cols()) as i32)
    }
    /// The start corner, top-left.
    pub fn top_left(&self) -> Point {
        Point::new(0, 0)
    }
    /// The goal corner, bottom-right.
    pub fn bottom_right(&self) -> Point {
        Point::new(self.cols() as i32 - 1, self.rows() as i32 - 1)
    }
    /// Clamps an arbitrary point, such as one mapped from a pointer position, onto the grid.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0, self.cols() as i32 - 1),
            p.y.clamp(0, self.rows() as i32 - 1),
        )
    }
    /// Out-of-bounds points read as walls.
    pub fn is_wall(&self, p: Point) -> bool {
        !self.in_bounds(p) || self.grid.get_point(p)
    }
    pub fn set_wall(&mut self, p: Point, blocked: bool) {
        debug_assert!(self.in_bounds(p), "{:?} outside grid", p);
        self.grid.set_point(p, blocked);
    }
    pub fn can_move_to(&self, p: Point) -> bool {
        self.in_bounds(p) && !self.grid.get_point(p)
    }
    pub fn wall_count(&self) -> usize {
        iproduct!(0..self.rows(), 0..self.cols())
            .filter(|&(y, x)| self.grid.get(x, y))
            .count()
    }
    pub fn free_count(&self) -> usize {
        self.cell_count() - self.wall_count()
    }

    /// In-bounds free neighbours of `pos` with their move cost: the
    /// [von Neumann neighbourhood](https://en.wikipedia.org/wiki/Von_Neumann_neighborhood) at cost
    /// [C], or the [Moore neighbourhood](https://en.wikipedia.org/wiki/Moore_neighborhood) with
    /// diagonals at cost [D] if `allow_diagonal` is set.
    pub fn neighborhood_points_and_cost(
        &self,
        pos: &Point,
        allow_diagonal: bool,
    ) -> impl Iterator<Item = (Point, i32)> + '_ {
        let pos = *pos;
        let neighbours = if allow_diagonal {
            pos.moore_neighborhood()
        } else {
            pos.neumann_neighborhood()
        };
        neighbours
            .into_iter()
            .filter(move |p| self.can_move_to(*p))
            // Diagonal neighbours are two straight moves away
            .map(move |p| (p, if pos.manhattan_distance(&p) == 1 { C } else { D }))
    }

    /// Fills the grid with walls, each cell independently with probability `density`, drawing one
    /// uniform float per cell in row-major order. The 2x2 block in every corner is then opened,
    /// and if `guarantee_path` is set so are the whole top row and rightmost column, which
    /// connects the top-left corner to the bottom-right one.
    pub fn generate<R: Rng>(&mut self, rng: &mut R, density: f32, guarantee_path: bool) {
        for (y, x) in iproduct!(0..self.rows(), 0..self.cols()) {
            self.grid.set(x, y, rng.gen::<f32>() < density);
        }
        let (rows, cols) = (self.rows() as i32, self.cols() as i32);
        for (dr, dc) in iproduct!(0..=1, 0..=1) {
            for (r, c) in [
                (dr, dc),
                (dr, cols - 1 - dc),
                (rows - 1 - dr, dc),
                (rows - 1 - dr, cols - 1 - dc),
            ] {
                self.set_wall(Point::new(c, r), false);
            }
        }
        if guarantee_path {
            for c in 0..cols {
                self.set_wall(Point::new(c, 0), false);
            }
            for r in 0..rows {
                self.set_wall(Point::new(cols - 1, r), false);
            }
        }
    }

    /// Generates a new [UnionFind] structure and links up free neighbours into the same
    /// components.
    pub fn generate_components(&self, allow_diagonal: bool) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.cell_count());
        for ix in 0..self.cell_count() {
            let point = self.point(ix);
            if !self.can_move_to(point) {
                continue;
            }
            for (p, _) in self.neighborhood_points_and_cost(&point, allow_diagonal) {
                components.union(ix, self.get_ix_point(&p));
            }
        }
        components
    }

    /// Checks if start and goal are free and on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point, allow_diagonal: bool) -> bool {
        if !self.can_move_to(*start) || !self.can_move_to(*goal) {
            return false;
        }
        let components = self.generate_components(allow_diagonal);
        components.equiv(self.get_ix_point(start), self.get_ix_point(goal))
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.rows() {
            let line: String = (0..self.cols())
                .map(|x| if self.grid.get(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
