//! Carpool Fairness Sweep Binary
//!
//! Runs every allocation strategy over a grid of run lengths and prints the
//! max/min unfairness each one reached.
//!
//! ## Usage
//! ```bash
//! cargo run --bin carpool --release
//! cargo run --bin carpool --release -- --people 30 --start 100 --end 3000 --step 100
//! ```

use std::process::ExitCode;

use carpool_fairness::report::{render, Format};
use carpool_fairness::sweep::{
    run_sweep, SweepConfig, DEFAULT_END, DEFAULT_PEOPLE, DEFAULT_START, DEFAULT_STEP,
};
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "carpool")]
#[command(about = "Compare carpool driver allocation strategies by how unfair they get")]
struct Args {
    /// Number of participants
    #[arg(long, default_value_t = DEFAULT_PEOPLE)]
    people: u32,

    /// Shortest run length (days)
    #[arg(long, default_value_t = DEFAULT_START)]
    start: usize,

    /// Longest run length (days), inclusive when on the step grid
    #[arg(long, default_value_t = DEFAULT_END)]
    end: usize,

    /// Distance between run lengths
    #[arg(long, default_value_t = DEFAULT_STEP)]
    step: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = SweepConfig {
        people: args.people,
        start: args.start,
        end: args.end,
        step: args.step,
    };

    let mut rng = rand::thread_rng();
    let report = run_sweep(&config, &mut rng).and_then(|result| render(&result, args.format));

    match report {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
