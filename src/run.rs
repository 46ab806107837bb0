//! Run Controller
//!
//! One run simulates a fixed number of days for a fixed population:
//! -> each day two distinct participants are drawn uniformly at random
//! -> the same pair is handed to every strategy
//! -> each strategy folds its population's unfairness into its running
//!    max/min after the day
//!
//! Engines are created fresh for every run and dropped with it.

use rand::Rng;
use tracing::debug;

use crate::error::SimError;
use crate::pair::Participant;
use crate::strategy::{Engine, Strategy};
use crate::unfairness::Extremes;

pub const MIN_PEOPLE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub people: u32,
    pub days: usize,
    pub extremes: Vec<(Strategy, Extremes)>,
}

impl RunResult {
    pub fn extremes(&self, strategy: Strategy) -> Option<Extremes> {
        self.extremes
            .iter()
            .find(|(s, _)| *s == strategy)
            .map(|(_, e)| *e)
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    people: u32,
    days: usize,
    engines: Vec<Engine>,
}

impl Simulation {
    pub fn new(people: u32) -> Result<Self, SimError> {
        if people < MIN_PEOPLE {
            return Err(SimError::TooFewParticipants { people });
        }
        Ok(Self {
            people,
            days: 0,
            engines: Strategy::all()
                .into_iter()
                .map(|strategy| Engine::new(strategy, people))
                .collect(),
        })
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    /// Draws `a` uniformly from the population, then `b` uniformly from
    /// everyone else.
    pub fn draw_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (Participant, Participant) {
        let a = rng.gen_range(1..=self.people);
        let mut b = rng.gen_range(1..self.people);
        if b >= a {
            b += 1;
        }
        (a, b)
    }

    /// Feeds one day's pair to every engine.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        a: Participant,
        b: Participant,
        rng: &mut R,
    ) -> Result<(), SimError> {
        for engine in self.engines.iter_mut() {
            engine.resolve_day(a, b, rng)?;
        }
        self.days += 1;
        Ok(())
    }

    pub fn simulate_day<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(Participant, Participant), SimError> {
        let (a, b) = self.draw_pair(rng);
        self.resolve(a, b, rng)?;
        Ok((a, b))
    }

    pub fn result(&self) -> RunResult {
        RunResult {
            people: self.people,
            days: self.days,
            extremes: self
                .engines
                .iter()
                .map(|engine| (engine.strategy(), engine.extremes()))
                .collect(),
        }
    }
}

pub fn run_once<R: Rng + ?Sized>(
    people: u32,
    days: usize,
    rng: &mut R,
) -> Result<RunResult, SimError> {
    let mut sim = Simulation::new(people)?;
    for _ in 0..days {
        sim.simulate_day(rng)?;
    }

    let result = sim.result();
    debug!(
        people,
        days,
        extremes = ?result.extremes,
        "run complete"
    );
    Ok(result)
}
