//! Carpool Fairness Simulation Library
//!
//! Simulates "who drives today" between randomly paired participants under
//! four allocation strategies, and measures how unfair each one becomes as
//! the number of days grows.
//!
//! ## Modules
//!
//! - `pair`: participant pairs and their ledger keys
//! - `ledger`: per-pair driving balances
//! - `unfairness`: per-participant unfairness and run extremes
//! - `strategy`: the four allocation strategies
//! - `run`: a single run over a fixed number of days
//! - `sweep`: repeated runs over a grid of run lengths
//! - `report`: table and JSON output
//!
//! ## Usage
//!
//! ```bash
//! # Default sweep: 50 people, 200..=10000 days in steps of 200
//! cargo run --bin carpool --release
//!
//! # Smaller sweep as JSON
//! cargo run --bin carpool --release -- --people 20 --end 2000 --format json
//! ```

pub mod error;
pub mod pair;
pub mod ledger;
pub mod unfairness;
pub mod strategy;
pub mod run;
pub mod sweep;
pub mod report;

pub use error::SimError;
pub use run::{run_once, RunResult, Simulation};
pub use strategy::{Engine, Strategy};
pub use sweep::{run_sweep, SweepConfig, SweepResult};
pub use unfairness::Extremes;
