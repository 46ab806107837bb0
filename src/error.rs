//! Errors raised when a simulation request is rejected at the boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("population of {people} cannot form a pair (need at least 2 participants)")]
    TooFewParticipants { people: u32 },

    #[error("sweep {start}..={end} step {step} contains no run lengths")]
    EmptySweep { start: usize, end: usize, step: usize },

    #[error("sweep run lengths must be positive")]
    NonPositiveRunLength,

    #[error("biased coin probability {p} is outside [0, 1]")]
    InvalidProbability { p: f64 },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
