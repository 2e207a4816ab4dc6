//! The resumable search. A [Search] holds all scratch state of one run and advances it by a
//! single frontier pop per [Search::step], so BFS, Dijkstra and A* can be watched cell by cell.
use grid_util::point::Point;
use log::{debug, info, trace};

use crate::{frontier::Frontier, maze_grid::MazeGrid, options::Algorithm};

/// Search overlay of a single cell. Walls never carry anything but [CellState::Unseen].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Unseen,
    /// Discovered, waiting in the frontier.
    Frontier,
    /// Expanded.
    Visited,
    /// On the reconstructed path.
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Solved,
    Unsolved,
}

/// `Idle -> Running -> Finished`. Any edit of the maze drops back to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchState {
    #[default]
    Idle,
    Running,
    Finished(Outcome),
}

impl SearchState {
    pub fn is_finished(&self) -> bool {
        matches!(self, SearchState::Finished(_))
    }
}

/// Scratch state of one search run. Only valid for the grid, start and goal it was created
/// with; the engine drops it whenever any of those change.
#[derive(Clone, Debug)]
pub struct Search {
    algorithm: Algorithm,
    allow_diagonal: bool,
    goal: Point,
    goal_ix: usize,
    state: SearchState,
    cells: Vec<CellState>,
    g_score: Vec<i32>,
    parent: Vec<Option<usize>>,
    frontier: Frontier,
    path: Vec<Point>,
    steps: usize,
    expanded: usize,
}

impl Search {
    /// Seeds the frontier with `start` at cost zero and marks it as frontier. The algorithm and
    /// movement rule are fixed for the lifetime of the run.
    pub fn begin(
        grid: &MazeGrid,
        algorithm: Algorithm,
        allow_diagonal: bool,
        start: Point,
        goal: Point,
    ) -> Search {
        debug_assert!(grid.can_move_to(start), "start {:?} is not free", start);
        debug_assert!(grid.can_move_to(goal), "goal {:?} is not free", goal);
        let n = grid.cell_count();
        let mut search = Search {
            algorithm,
            allow_diagonal,
            goal,
            goal_ix: grid.get_ix_point(&goal),
            state: SearchState::Running,
            cells: vec![CellState::Unseen; n],
            g_score: vec![i32::MAX; n],
            parent: vec![None; n],
            frontier: Frontier::new(algorithm.uses_priority()),
            path: Vec::new(),
            steps: 0,
            expanded: 0,
        };
        let start_ix = grid.get_ix_point(&start);
        search.g_score[start_ix] = 0;
        search
            .frontier
            .push(start_ix, 0, algorithm.heuristic(&start, &goal));
        search.cells[start_ix] = CellState::Frontier;
        debug!(
            "Beginning {} search from {:?} to {:?} (diagonal: {})",
            algorithm, start, goal, allow_diagonal
        );
        search
    }

    /// Pops one cell and either finishes on the goal or expands it. Returns whether anything
    /// changed; once finished every further call returns [false].
    pub fn step(&mut self, grid: &MazeGrid) -> bool {
        if self.state.is_finished() {
            return false;
        }
        let Some(current) = self.frontier.pop(&self.g_score) else {
            self.finish(Outcome::Unsolved);
            return false;
        };
        self.steps += 1;
        trace!("Step {}: popped {:?}", self.steps, grid.point(current));
        if current == self.goal_ix {
            self.rebuild_path(grid);
            self.finish(Outcome::Solved);
            return true;
        }
        self.expand(grid, current);
        true
    }

    fn expand(&mut self, grid: &MazeGrid, current: usize) {
        if self.cells[current] != CellState::Path {
            self.cells[current] = CellState::Visited;
        }
        self.expanded += 1;
        let pos = grid.point(current);
        let current_cost = self.g_score[current];
        for (neighbour, move_cost) in grid.neighborhood_points_and_cost(&pos, self.allow_diagonal)
        {
            let n = grid.get_ix_point(&neighbour);
            let new_cost = current_cost + move_cost;
            match self.algorithm {
                Algorithm::Bfs => {
                    if self.cells[n] == CellState::Unseen {
                        self.cells[n] = CellState::Frontier;
                        self.parent[n] = Some(current);
                        self.g_score[n] = new_cost;
                        self.frontier.push(n, new_cost, new_cost);
                    }
                }
                Algorithm::Dijkstra | Algorithm::AStar => {
                    if new_cost < self.g_score[n] {
                        self.g_score[n] = new_cost;
                        self.parent[n] = Some(current);
                        let h = self.algorithm.heuristic(&neighbour, &self.goal);
                        self.frontier.push(n, new_cost, new_cost + h);
                        if !matches!(self.cells[n], CellState::Visited | CellState::Path) {
                            self.cells[n] = CellState::Frontier;
                        }
                    }
                }
            }
        }
    }

    /// Walks the parent pointers back from the goal and paints the path.
    fn rebuild_path(&mut self, grid: &MazeGrid) {
        let mut indices: Vec<usize> =
            std::iter::successors(Some(self.goal_ix), |&ix| self.parent[ix]).collect();
        indices.reverse();
        for &ix in &indices {
            self.cells[ix] = CellState::Path;
        }
        self.path = indices.into_iter().map(|ix| grid.point(ix)).collect();
    }

    fn finish(&mut self, outcome: Outcome) {
        self.state = SearchState::Finished(outcome);
        info!(
            "{} search finished {:?} after {} steps: {} visited, path length {}",
            self.algorithm,
            outcome,
            self.steps,
            self.visited_count(),
            self.path.len()
        );
    }

    pub fn state(&self) -> SearchState {
        self.state
    }
    pub fn allow_diagonal(&self) -> bool {
        self.allow_diagonal
    }
    pub fn cell_state(&self, ix: usize) -> CellState {
        self.cells[ix]
    }
    /// Cost along the recorded parent chain, [None] if the cell was never reached.
    pub fn g_score(&self, ix: usize) -> Option<i32> {
        Some(self.g_score[ix]).filter(|&g| g != i32::MAX)
    }
    pub fn path(&self) -> &[Point] {
        &self.path
    }
    pub fn visited_count(&self) -> usize {
        self.count(CellState::Visited)
    }
    pub fn frontier_count(&self) -> usize {
        self.count(CellState::Frontier)
    }
    /// Number of [step](Self::step) calls that popped a cell.
    pub fn steps(&self) -> usize {
        self.steps
    }
    /// Number of expansions. Unlike [visited_count](Self::visited_count) this never drops when
    /// the path is painted over visited cells.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
    fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }
}
