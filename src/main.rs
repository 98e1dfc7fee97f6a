//! CLI for generating and solving batches of mazes

use clap::Parser;
use log::info;
use prim_maze::{BatchOrchestrator, ExecutionMode, Heuristic, MazeParams, MazeSession};

/// Generate random mazes and solve them all with A*
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of mazes
    #[arg(short = 'n', long, default_value_t = 10)]
    mazes: usize,

    /// Maze width, clamped to 2..=500
    #[arg(long, default_value_t = 40)]
    width: usize,

    /// Maze height, clamped to 2..=500
    #[arg(long, default_value_t = 40)]
    height: usize,

    /// Worker threads, 0 for all available cores
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// How the batch is spread over the workers
    #[arg(short, long, value_enum, default_value_t = ExecutionMode::Parallel)]
    mode: ExecutionMode,

    /// Distance estimate used by the solver
    #[arg(long, value_enum, default_value_t = Heuristic::Manhattan)]
    heuristic: Heuristic,

    /// Random seed; maze `i` is generated from `seed + i`
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the first maze with its path
    #[arg(short, long)]
    print: bool,

    /// Print the generated mazes and their paths as JSON
    #[arg(long)]
    json: bool,
}

/// Generate mazes, solve them, print report
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let orchestrator =
        BatchOrchestrator::new(args.mode, args.threads).with_heuristic(args.heuristic);
    info!(
        "Using {:?} execution with {} workers",
        orchestrator.mode(),
        orchestrator.workers()
    );
    let session = MazeSession::new(orchestrator).with_seed(args.seed);

    let params = MazeParams::clamped(args.mazes, args.width, args.height);
    let generated = session.generate(params)?;
    let solved = session.solve()?;

    if args.json {
        println!("{}", serde_json::to_string(&generated)?);
        println!("{}", serde_json::to_string(&solved)?);
        return Ok(());
    }

    println!(
        "Generated {} mazes of size {}x{} in {:.3} ms",
        generated.mazes.len(),
        params.width,
        params.height,
        generated.elapsed.as_secs_f64() * 1000.0
    );
    println!(
        "Solved {} mazes in {:.3} ms",
        solved.paths.len(),
        solved.elapsed.as_secs_f64() * 1000.0
    );
    for (i, path) in solved.paths.iter().enumerate() {
        match path.len() {
            0 => println!("Maze {}: no path", i),
            len => println!("Maze {}: the shortest path is {} steps.", i, len - 1),
        }
    }

    if args.print {
        if let (Some(maze), Some(path)) = (generated.mazes.first(), solved.paths.first()) {
            println!("{}", maze.render_with_path(path));
        }
    }
    Ok(())
}
