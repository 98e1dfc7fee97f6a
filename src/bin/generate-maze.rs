//! CLI for maze generation

use clap::Parser;
use prim_maze::{MazeGenerator, MazeParams};

/// Random perfect maze generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze height, clamped to 2..=500
    #[arg(long, default_value_t = 19)]
    height: usize,

    /// Maze width, clamped to 2..=500
    #[arg(long, default_value_t = 15)]
    width: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the maze as JSON instead of drawing it
    #[arg(long)]
    json: bool,
}

/// Generate a maze, print output
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = MazeParams::clamped(1, args.width, args.height);
    let mut gen = MazeGenerator::new(args.seed);
    let maze = gen.generate_maze(params.width, params.height)?;

    if args.json {
        println!("{}", serde_json::to_string(&maze)?);
    } else {
        println!("{}", maze);
    }
    Ok(())
}
