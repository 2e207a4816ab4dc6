use maze_pathfinding::{Algorithm, MazeEngine, Options, Outcome};
use std::time::Instant;

// A driver loop for the engine: steps a search, printing the maze every few steps,
// then reports the outcome the way a status bar would.
//
// cargo run --example step_through -- [bfs|dijkstra|a*] [seed]
fn main() {
    let mut args = std::env::args().skip(1);
    let algorithm = match args.next().map(|s| s.parse::<Algorithm>()) {
        Some(Ok(algorithm)) => algorithm,
        Some(Err(e)) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
        None => Algorithm::AStar,
    };
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let mut options = Options {
        algorithm,
        rows: 15,
        cols: 30,
        ..Options::default()
    };
    options.set_density_percent(60.0);
    let mut engine = MazeEngine::new(options);
    let seed = engine.generate(seed);
    println!("{algorithm} on a {}x{} maze (seed {seed})", engine.rows(), engine.cols());

    let t0 = Instant::now();
    while engine.step() {
        if engine.steps_taken() % 40 == 0 {
            println!("step {}:\n{}", engine.steps_taken(), engine);
        }
    }
    let elapsed = t0.elapsed();

    println!("{}", engine);
    let status = match engine.outcome() {
        Some(Outcome::Solved) => "Solved",
        Some(Outcome::Unsolved) | None => "No path",
    };
    println!(
        "{status}. Visited: {}  Path: {}  Time: {} ms",
        engine.visited_count(),
        engine.path_length(),
        elapsed.as_millis()
    );
}
