//! Sweep Reports
//!
//! Text rendering of a sweep, either as a human-readable table or as JSON
//! for plotting elsewhere.

use crate::error::SimError;
use crate::strategy::Strategy;
use crate::sweep::SweepResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Table,
    Json,
}

pub fn render(result: &SweepResult, format: Format) -> Result<String, SimError> {
    match format {
        Format::Table => Ok(render_table(result)),
        Format::Json => render_json(result),
    }
}

pub fn render_json(result: &SweepResult) -> Result<String, SimError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn render_table(result: &SweepResult) -> String {
    let rule = "=".repeat(55);
    let mut out = Vec::new();

    out.push(rule.clone());
    out.push("  Carpool Fairness Simulation".to_string());
    out.push("  Max/min unfairness per strategy vs. number of days".to_string());
    out.push(rule.clone());
    out.push(String::new());
    out.push("Parameters:".to_string());
    out.push(format!("  People: {}", result.people));
    match (result.run_lengths.first(), result.run_lengths.last()) {
        (Some(first), Some(last)) => out.push(format!(
            "  Run lengths: {}..={} ({} runs)",
            first,
            last,
            result.run_lengths.len()
        )),
        _ => out.push("  Run lengths: none".to_string()),
    }
    out.push(String::new());

    for series in &result.series {
        out.push(format!("Strategy: {}", series.strategy.name()));
        out.push("-".repeat(50));
        out.push(format!("  {:>8} | {:>6} | {:>6}", "days", "max", "min"));
        for (i, days) in result.run_lengths.iter().enumerate() {
            out.push(format!(
                "  {:>8} | {:>6} | {:>6}",
                days, series.max[i], series.min[i]
            ));
        }
        out.push(String::new());
    }

    out.push(rule.clone());
    out.push("  Summary".to_string());
    out.push(rule);
    out.push(String::new());
    out.push(summary_table(result));
    out.join("\n")
}

fn summary_table(result: &SweepResult) -> String {
    let mut rows = vec![
        "| Strategy      | Final Max | Final Min | Peak Max | Peak Min |".to_string(),
        "|---------------|-----------|-----------|----------|----------|".to_string(),
    ];

    for strategy in Strategy::all() {
        let Some(series) = result.series(strategy) else {
            continue;
        };
        let last = series.last().unwrap_or_default();
        let peak = series.peak();
        rows.push(format!(
            "| {:13} | {:9} | {:9} | {:8} | {:8} |",
            strategy.label(),
            last.max,
            last.min,
            peak.max,
            peak.min
        ));
    }
    rows.join("\n")
}
