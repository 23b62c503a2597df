//! Solve a routing problem from a JSON file and print the solution.

use std::fs;
use std::sync::Arc;

use clap::Parser;

use vrp_engine::problem::Problem;
use vrp_engine::stats::SolveStats;
use vrp_engine::Engine;

#[derive(Parser)]
#[command(about = "Solve a vehicle-routing problem from a JSON file")]
struct Args {
    /// Path to the problem JSON file
    problem: String,
    /// Pretty-print the solution JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let data = fs::read_to_string(&args.problem)?;
    let problem: Problem = serde_json::from_str(&data)?;

    let engine = Engine::new(Arc::new(SolveStats::new()));
    let solution = engine.solve(&problem)?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&solution)?
    } else {
        serde_json::to_string(&solution)?
    };
    println!("{}", rendered);

    Ok(())
}
