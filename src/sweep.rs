//! Run-Length Sweep
//!
//! Repeats independent runs over a grid of run lengths and collects, per
//! strategy, the series of max and min unfairness. Each run starts from
//! empty ledgers; nothing carries over between grid points.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SimError;
use crate::run::{run_once, MIN_PEOPLE};
use crate::strategy::Strategy;
use crate::unfairness::Extremes;

pub const DEFAULT_PEOPLE: u32 = 50;
pub const DEFAULT_START: usize = 200;
pub const DEFAULT_END: usize = 10_000;
pub const DEFAULT_STEP: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub people: u32,
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            people: DEFAULT_PEOPLE,
            start: DEFAULT_START,
            end: DEFAULT_END,
            step: DEFAULT_STEP,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.people < MIN_PEOPLE {
            return Err(SimError::TooFewParticipants { people: self.people });
        }
        if self.start == 0 {
            return Err(SimError::NonPositiveRunLength);
        }
        if self.step == 0 || self.end < self.start {
            return Err(SimError::EmptySweep {
                start: self.start,
                end: self.end,
                step: self.step,
            });
        }
        Ok(())
    }

    /// `start, start + step, ...` up to and including `end`.
    pub fn run_lengths(&self) -> Vec<usize> {
        if self.step == 0 || self.end < self.start {
            return Vec::new();
        }
        (self.start..=self.end).step_by(self.step).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySeries {
    pub strategy: Strategy,
    pub max: Vec<i64>,
    pub min: Vec<i64>,
}

impl StrategySeries {
    fn new(strategy: Strategy, capacity: usize) -> Self {
        Self {
            strategy,
            max: Vec::with_capacity(capacity),
            min: Vec::with_capacity(capacity),
        }
    }

    /// Largest max and smallest min over the whole sweep.
    pub fn peak(&self) -> Extremes {
        Extremes {
            max: self.max.iter().copied().max().unwrap_or(0),
            min: self.min.iter().copied().min().unwrap_or(0),
        }
    }

    pub fn spread(&self) -> Vec<i64> {
        self.max.iter().zip(&self.min).map(|(hi, lo)| hi - lo).collect()
    }

    pub fn last(&self) -> Option<Extremes> {
        match (self.max.last(), self.min.last()) {
            (Some(&max), Some(&min)) => Some(Extremes { max, min }),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    pub people: u32,
    pub run_lengths: Vec<usize>,
    pub series: Vec<StrategySeries>,
}

impl SweepResult {
    pub fn series(&self, strategy: Strategy) -> Option<&StrategySeries> {
        self.series.iter().find(|s| s.strategy == strategy)
    }

    /// Extremes observed by `strategy` in the run of length `run_length`.
    pub fn extremes(&self, run_length: usize, strategy: Strategy) -> Option<Extremes> {
        let idx = self.run_lengths.iter().position(|&len| len == run_length)?;
        let series = self.series(strategy)?;
        Some(Extremes {
            max: series.max[idx],
            min: series.min[idx],
        })
    }
}

pub fn run_sweep<R: Rng + ?Sized>(
    config: &SweepConfig,
    rng: &mut R,
) -> Result<SweepResult, SimError> {
    config.validate()?;
    let run_lengths = config.run_lengths();
    info!(
        people = config.people,
        runs = run_lengths.len(),
        start = config.start,
        end = config.end,
        step = config.step,
        "starting sweep"
    );

    let mut series: Vec<StrategySeries> = Strategy::all()
        .into_iter()
        .map(|strategy| StrategySeries::new(strategy, run_lengths.len()))
        .collect();

    for &days in &run_lengths {
        let run = run_once(config.people, days, rng)?;
        for s in series.iter_mut() {
            let extremes = run.extremes(s.strategy).unwrap_or_default();
            s.max.push(extremes.max);
            s.min.push(extremes.min);
        }
    }

    info!(runs = run_lengths.len(), "sweep complete");
    Ok(SweepResult {
        people: config.people,
        run_lengths,
        series,
    })
}
