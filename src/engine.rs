use core::fmt;

use grid_util::point::Point;
use itertools::Itertools;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    is_adjacent,
    maze_grid::MazeGrid,
    options::{Algorithm, Options},
    search::{CellState, Outcome, Search, SearchState},
    C, D,
};

/// [MazeEngine] owns a maze, its start and goal, the caller's [Options] and at most one search
/// in progress. Every call runs to completion synchronously; any change to the maze, the start
/// or the goal discards the search so that a stale run can never continue on a changed grid.
#[derive(Clone, Debug)]
pub struct MazeEngine {
    options: Options,
    grid: MazeGrid,
    start: Point,
    goal: Point,
    search: Option<Search>,
    last_seed: u64,
}

impl Default for MazeEngine {
    fn default() -> MazeEngine {
        MazeEngine::new(Options::default())
    }
}

impl MazeEngine {
    /// Creates an engine and generates a first maze from a random seed.
    pub fn new(options: Options) -> MazeEngine {
        let mut engine = MazeEngine::empty(options);
        engine.generate(None);
        engine
    }

    /// Creates an engine whose first maze is generated from `seed`.
    pub fn with_seed(options: Options, seed: u64) -> MazeEngine {
        let mut engine = MazeEngine::empty(options);
        engine.generate(Some(seed));
        engine
    }

    /// Creates an engine on an all-free grid without generating walls.
    pub fn empty(options: Options) -> MazeEngine {
        let (rows, cols) = options.clamped_size();
        let grid = MazeGrid::new(rows, cols);
        MazeEngine {
            start: grid.top_left(),
            goal: grid.bottom_right(),
            options: Options {
                rows,
                cols,
                ..options
            },
            grid,
            search: None,
            last_seed: 0,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The options are only read when a maze is generated or a search begins.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Switches algorithm and resets the current search.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.options.algorithm = algorithm;
        self.clear_search();
    }

    /// Switches the movement rule and resets the current search.
    pub fn set_diagonal(&mut self, diagonal: bool) {
        self.options.diagonal = diagonal;
        self.clear_search();
    }

    /// Reallocates an all-free grid of the clamped size and moves start and goal to the top-left
    /// and bottom-right corners.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.grid = MazeGrid::new(rows, cols);
        self.options.rows = self.grid.rows();
        self.options.cols = self.grid.cols();
        self.start = self.grid.top_left();
        self.goal = self.grid.bottom_right();
        self.search = None;
        debug!("Resized grid to {}x{}", self.grid.rows(), self.grid.cols());
    }

    /// Generates a new maze and returns the seed used. [None] draws a fresh seed from the
    /// operating system; the same seed and options always give the same maze. Resizes first if
    /// the requested size changed.
    pub fn generate(&mut self, seed: Option<u64>) -> u64 {
        self.clear_search();
        let (rows, cols) = self.options.clamped_size();
        if (rows, cols) != (self.grid.rows(), self.grid.cols()) {
            self.resize(rows, cols);
        }
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        self.grid.generate(
            &mut rng,
            self.options.wall_probability(),
            self.options.guarantee_path,
        );
        self.start = self.grid.top_left();
        self.goal = self.grid.bottom_right();
        self.last_seed = seed;
        info!(
            "Generated {}x{} maze with seed {} ({} walls, density {})",
            rows,
            cols,
            seed,
            self.grid.wall_count(),
            self.options.wall_probability()
        );
        seed
    }

    /// The seed behind the current maze.
    pub fn last_seed(&self) -> u64 {
        self.last_seed
    }

    /// Flips a cell between free and wall. Returns [false] and changes nothing for the start or
    /// goal cell.
    pub fn toggle_wall(&mut self, cell: Point) -> bool {
        if !self.check_bounds(cell) {
            return false;
        }
        if cell == self.start || cell == self.goal {
            debug!("Refusing to toggle wall on start/goal {:?}", cell);
            return false;
        }
        let blocked = self.grid.is_wall(cell);
        self.grid.set_wall(cell, !blocked);
        self.clear_search();
        true
    }

    /// Moves the start marker. Returns [false] and changes nothing if `cell` is a wall.
    pub fn set_start(&mut self, cell: Point) -> bool {
        if !self.check_bounds(cell) {
            return false;
        }
        if self.grid.is_wall(cell) {
            debug!("Refusing to place start on wall {:?}", cell);
            return false;
        }
        self.start = cell;
        self.clear_search();
        true
    }

    /// Moves the goal marker. Returns [false] and changes nothing if `cell` is a wall.
    pub fn set_goal(&mut self, cell: Point) -> bool {
        if !self.check_bounds(cell) {
            return false;
        }
        if self.grid.is_wall(cell) {
            debug!("Refusing to place goal on wall {:?}", cell);
            return false;
        }
        self.goal = cell;
        self.clear_search();
        true
    }

    fn check_bounds(&self, cell: Point) -> bool {
        let in_bounds = self.grid.in_bounds(cell);
        debug_assert!(
            in_bounds,
            "{:?} outside {}x{} grid, clamp it first",
            cell,
            self.grid.rows(),
            self.grid.cols()
        );
        in_bounds
    }

    /// Clamps a point, e.g. one mapped from a pointer position, onto the current grid.
    pub fn clamp_cell(&self, cell: Point) -> Point {
        self.grid.clamp(cell)
    }

    /// Drops all search state: every cell goes back to [CellState::Unseen] and the state to
    /// [SearchState::Idle].
    pub fn clear_search(&mut self) {
        if self.search.take().is_some() {
            debug!("Cleared search");
        }
    }

    /// Starts a fresh search with the current algorithm and movement rule, discarding any
    /// previous one.
    pub fn begin_search(&mut self) {
        self.search = Some(Search::begin(
            &self.grid,
            self.options.algorithm,
            self.options.diagonal,
            self.start,
            self.goal,
        ));
    }

    /// Advances the search by one frontier pop, beginning it first if idle. Returns whether
    /// anything changed; after the search finished this is always [false].
    pub fn step(&mut self) -> bool {
        if self.search.is_none() {
            self.begin_search();
        }
        let Some(search) = self.search.as_mut() else {
            return false;
        };
        let was_running = search.state() == SearchState::Running;
        let changed = search.step(&self.grid);
        if was_running
            && search.state() == SearchState::Finished(Outcome::Unsolved)
            && self.grid.reachable(&self.start, &self.goal, search.allow_diagonal())
        {
            warn!(
                "Frontier exhausted although {:?} is reachable from {:?}",
                self.goal, self.start
            );
        }
        changed
    }

    /// Steps until the search finishes. Gives the same result as stepping by hand.
    pub fn run_to_completion(&mut self) -> Outcome {
        loop {
            self.step();
            if let SearchState::Finished(outcome) = self.state() {
                return outcome;
            }
        }
    }

    pub fn state(&self) -> SearchState {
        self.search
            .as_ref()
            .map_or(SearchState::Idle, |search| search.state())
    }
    pub fn is_running(&self) -> bool {
        self.state() == SearchState::Running
    }
    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }
    pub fn is_solved(&self) -> bool {
        self.state() == SearchState::Finished(Outcome::Solved)
    }
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state() {
            SearchState::Finished(outcome) => Some(outcome),
            SearchState::Idle | SearchState::Running => None,
        }
    }

    /// Number of cells currently marked [CellState::Visited].
    pub fn visited_count(&self) -> usize {
        self.search.as_ref().map_or(0, Search::visited_count)
    }
    /// Number of cells currently marked [CellState::Frontier].
    pub fn frontier_count(&self) -> usize {
        self.search.as_ref().map_or(0, Search::frontier_count)
    }
    /// Number of cells expanded so far in this run.
    pub fn expanded_count(&self) -> usize {
        self.search.as_ref().map_or(0, Search::expanded)
    }
    /// Number of productive steps so far in this run.
    pub fn steps_taken(&self) -> usize {
        self.search.as_ref().map_or(0, Search::steps)
    }
    /// Number of cells on the path, 0 unless solved.
    pub fn path_length(&self) -> usize {
        self.path().len()
    }
    /// Cells from start to goal, empty unless solved.
    pub fn path(&self) -> &[Point] {
        match &self.search {
            Some(search) => search.path(),
            None => &[],
        }
    }
    /// Sum of the move costs along the path.
    pub fn path_cost(&self) -> i32 {
        self.path()
            .iter()
            .tuple_windows()
            .map(|(a, b)| if a.x != b.x && a.y != b.y { D } else { C })
            .sum()
    }
    /// Checks that the path runs from start to goal over free cells in legal moves.
    pub fn path_is_valid(&self) -> bool {
        let allow_diagonal = self
            .search
            .as_ref()
            .map_or(self.options.diagonal, Search::allow_diagonal);
        let path = self.path();
        path.first() == Some(&self.start)
            && path.last() == Some(&self.goal)
            && path.iter().all(|p| self.grid.can_move_to(*p))
            && path
                .iter()
                .tuple_windows()
                .all(|(a, b)| is_adjacent(a, b, allow_diagonal))
    }

    pub fn cell_state(&self, cell: Point) -> CellState {
        match &self.search {
            Some(search) if self.grid.in_bounds(cell) => {
                search.cell_state(self.grid.get_ix_point(&cell))
            }
            _ => CellState::Unseen,
        }
    }
    /// Best known cost from the start, [None] if not reached in the current run.
    pub fn g_score(&self, cell: Point) -> Option<i32> {
        match &self.search {
            Some(search) if self.grid.in_bounds(cell) => {
                search.g_score(self.grid.get_ix_point(&cell))
            }
            _ => None,
        }
    }
    pub fn is_wall(&self, cell: Point) -> bool {
        self.grid.is_wall(cell)
    }
    pub fn is_start(&self, cell: Point) -> bool {
        cell == self.start
    }
    pub fn is_goal(&self, cell: Point) -> bool {
        cell == self.goal
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn goal(&self) -> Point {
        self.goal
    }
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }
    /// Whether the goal can be reached from the start at all under the configured movement rule.
    pub fn is_reachable(&self) -> bool {
        self.grid
            .reachable(&self.start, &self.goal, self.options.diagonal)
    }
}

impl fmt::Display for MazeEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows() as i32 {
            let line: String = (0..self.cols() as i32)
                .map(|col| {
                    let p = Point::new(col, row);
                    if self.is_start(p) {
                        'S'
                    } else if self.is_goal(p) {
                        'G'
                    } else if self.is_wall(p) {
                        '#'
                    } else {
                        match self.cell_state(p) {
                            CellState::Path => '*',
                            CellState::Frontier => 'o',
                            CellState::Visited => '.',
                            CellState::Unseen => ' ',
                        }
                    }
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;

    fn open_options(rows: usize, cols: usize) -> Options {
        Options {
            density: 0.0,
            rows,
            cols,
            ..Options::default()
        }
    }

    #[test]
    fn construction_places_markers_in_corners() {
        let engine = MazeEngine::with_seed(Options::default(), 11);
        assert_eq!(engine.start(), cell(0, 0));
        assert_eq!(engine.goal(), cell(24, 24));
        assert_eq!(engine.state(), SearchState::Idle);
        assert_eq!(engine.last_seed(), 11);
    }

    #[test]
    fn first_step_begins_search() {
        let mut engine = MazeEngine::with_seed(open_options(5, 5), 1);
        assert!(engine.step());
        assert!(engine.is_running());
        assert_eq!(engine.visited_count(), 1);
        assert_eq!(engine.cell_state(cell(0, 0)), CellState::Visited);
        assert_eq!(engine.steps_taken(), 1);
    }

    #[test]
    fn finished_search_stays_put() {
        let mut engine = MazeEngine::with_seed(open_options(5, 5), 1);
        assert_eq!(engine.run_to_completion(), Outcome::Solved);
        let snapshot = engine.to_string();
        let visited = engine.visited_count();
        for _ in 0..5 {
            assert!(!engine.step());
        }
        assert_eq!(engine.to_string(), snapshot);
        assert_eq!(engine.visited_count(), visited);
        assert_eq!(engine.run_to_completion(), Outcome::Solved);
    }

    #[test]
    fn edits_reset_running_search() {
        let mut engine = MazeEngine::with_seed(open_options(6, 6), 1);
        for _ in 0..4 {
            engine.step();
        }
        assert!(engine.is_running());
        assert!(engine.toggle_wall(cell(3, 3)));
        assert_eq!(engine.state(), SearchState::Idle);
        assert_eq!(
            (engine.visited_count(), engine.frontier_count(), engine.path_length()),
            (0, 0, 0)
        );

        engine.run_to_completion();
        assert!(engine.set_start(cell(1, 1)));
        assert_eq!(engine.state(), SearchState::Idle);
        assert!(engine.path().is_empty());

        engine.step();
        assert!(engine.set_goal(cell(4, 4)));
        assert_eq!(engine.state(), SearchState::Idle);
        assert_eq!(engine.cell_state(cell(1, 1)), CellState::Unseen);
    }

    #[test]
    fn rejected_edits_change_nothing() {
        let mut engine = MazeEngine::with_seed(open_options(6, 6), 1);
        engine.step();
        assert!(!engine.toggle_wall(engine.start()));
        assert!(!engine.toggle_wall(engine.goal()));
        assert!(engine.is_running());

        engine.clear_search();
        assert!(engine.toggle_wall(cell(2, 2)));
        engine.step();
        assert!(!engine.set_start(cell(2, 2)));
        assert!(!engine.set_goal(cell(2, 2)));
        assert!(engine.is_running());
        assert_eq!(engine.start(), cell(0, 0));
        assert_eq!(engine.goal(), cell(5, 5));
    }

    #[test]
    fn resize_clamps_and_resets() {
        let mut engine = MazeEngine::with_seed(Options::default(), 5);
        engine.step();
        engine.resize(3, 120);
        assert_eq!((engine.rows(), engine.cols()), (5, 80));
        assert_eq!(engine.options().rows, 5);
        assert_eq!(engine.goal(), cell(4, 79));
        assert_eq!(engine.state(), SearchState::Idle);
        assert_eq!(engine.grid().wall_count(), 0);
    }

    #[test]
    fn generate_picks_up_size_changes() {
        let mut engine = MazeEngine::with_seed(Options::default(), 5);
        engine.options_mut().rows = 12;
        engine.options_mut().cols = 7;
        engine.generate(Some(5));
        assert_eq!((engine.rows(), engine.cols()), (12, 7));
        assert_eq!(engine.goal(), cell(11, 6));
    }

    #[test]
    fn random_seed_is_reported() {
        let mut engine = MazeEngine::default();
        let seed = engine.generate(None);
        assert_eq!(engine.last_seed(), seed);
        let walls = engine.grid().to_string();
        engine.generate(Some(seed));
        assert_eq!(engine.grid().to_string(), walls);
    }

    #[test]
    fn options_are_captured_at_begin() {
        let mut engine = MazeEngine::with_seed(open_options(5, 5), 1);
        engine.options_mut().algorithm = Algorithm::Bfs;
        engine.step();
        engine.options_mut().algorithm = Algorithm::AStar;
        engine.options_mut().diagonal = true;
        engine.run_to_completion();
        // Still a 4-connected BFS path
        assert_eq!(engine.path_length(), 9);
        assert!(engine.path_is_valid());

        engine.set_diagonal(true);
        assert_eq!(engine.state(), SearchState::Idle);
        engine.run_to_completion();
        assert!(engine.path_is_valid());
        assert_eq!(engine.path_cost(), 8);
    }

    #[test]
    fn display_shows_overlays() {
        let mut engine = MazeEngine::with_seed(open_options(5, 5), 1);
        engine.set_algorithm(Algorithm::Bfs);
        engine.toggle_wall(cell(0, 4));
        let text = engine.to_string();
        assert_eq!(text.lines().next(), Some("S   #"));
        assert_eq!(text.lines().last(), Some("    G"));
        engine.step();
        assert_eq!(engine.to_string().lines().next(), Some("So  #"));
        engine.run_to_completion();
        let text = engine.to_string();
        // Start and goal keep their own markers
        assert_eq!(text.matches('*').count(), engine.path_length() - 2);
        assert_eq!(engine.path_length(), 9);
    }

    #[test]
    fn clamp_cell_for_pointer_input() {
        let engine = MazeEngine::with_seed(open_options(10, 8), 1);
        assert_eq!(engine.clamp_cell(cell(-4, 20)), cell(0, 7));
        assert_eq!(engine.clamp_cell(cell(12, 3)), cell(9, 3));
    }
}
