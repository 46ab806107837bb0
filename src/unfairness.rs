//! Unfairness Accumulator
//!
//! A participant's unfairness is their net number of drives against everyone
//! else: +1 each time they drive, -1 each time they are driven. Summed over a
//! population it is always zero.
//!
//! Values are kept either incrementally (`record`) or rebuilt from a ledger
//! (`recompute`). The rebuild walks every pair, O(n^2) per call.

use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::pair::{Pair, Participant};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unfairness {
    values: Vec<i64>,
}

impl Unfairness {
    pub fn new(people: u32) -> Self {
        Self {
            values: vec![0; people as usize],
        }
    }

    pub fn people(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn get(&self, person: Participant) -> i64 {
        self.values[self.slot(person)]
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Incremental update for one event.
    pub fn record(&mut self, driver: Participant, rider: Participant) {
        let d = self.slot(driver);
        let r = self.slot(rider);
        self.values[d] += 1;
        self.values[r] -= 1;
    }

    /// Rebuilds every participant's value from the ledger's balances.
    pub fn recompute(&mut self, ledger: &Ledger) {
        let n = self.people();
        assert_eq!(ledger.people(), n, "ledger and accumulator populations differ");
        for i in 1..=n {
            let mut total = 0;
            for j in 1..i {
                total -= ledger.balance(Pair { low: j, high: i });
            }
            for j in (i + 1)..=n {
                total += ledger.balance(Pair { low: i, high: j });
            }
            self.values[(i - 1) as usize] = total;
        }
    }

    pub fn total(&self) -> i64 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> i64 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    pub fn min(&self) -> i64 {
        self.values.iter().copied().min().unwrap_or(0)
    }

    fn slot(&self, person: Participant) -> usize {
        assert!(
            person >= 1 && person <= self.people(),
            "participant {} outside population of {}",
            person,
            self.people()
        );
        (person - 1) as usize
    }
}

/// Running max/min of a population's unfairness over a run. Starts at 0,
/// the value of every participant before the first day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extremes {
    pub max: i64,
    pub min: i64,
}

impl Extremes {
    pub fn fold(&mut self, unfairness: &Unfairness) {
        self.max = self.max.max(unfairness.max());
        self.min = self.min.min(unfairness.min());
    }

    pub fn spread(&self) -> i64 {
        self.max - self.min
    }
}
