//! Driver Allocation Strategies
//!
//! Four policies decide, for each day, which of two participants drives:
//! 1. Randomized deterministic local
//!    -> the first meeting of a pair is decided by a fair coin
//!    -> that fixes an order, and the pair strictly alternates from then on
//! 2. Randomized local greedy
//!    -> if the pair is out of balance, the one who drove less drives
//!    -> otherwise a fair coin decides
//! 3. Randomized global greedy
//!    -> whoever has the lower overall unfairness drives
//!    -> ties are decided by a fair coin
//! 4. Biased local greedy
//!    -> same as local greedy, but a balanced pair is decided by a coin
//!       biased towards the participant with the lower overall unfairness
//!
//! Each engine owns its own ledger, unfairness values and running extremes.
//! Nothing is shared between engines.

use std::cmp::Ordering;

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::ledger::{Ledger, LedgerKind};
use crate::pair::{Pair, Participant, Side};
use crate::unfairness::{Extremes, Unfairness};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    RandomDeterministicLocal,
    LocalGreedy,
    GlobalGreedy,
    LocalBiased,
}

impl Strategy {
    pub fn all() -> Vec<Self> {
        vec![
            Self::RandomDeterministicLocal,
            Self::LocalGreedy,
            Self::GlobalGreedy,
            Self::LocalBiased,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomDeterministicLocal => "Randomized Deterministic Local",
            Self::LocalGreedy => "Randomized Local Greedy",
            Self::GlobalGreedy => "Randomized Global Greedy",
            Self::LocalBiased => "Biased Local Greedy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RandomDeterministicLocal => "rand det",
            Self::LocalGreedy => "local greedy",
            Self::GlobalGreedy => "global greedy",
            Self::LocalBiased => "local biased",
        }
    }
}

fn fair_coin<R: Rng + ?Sized>(rng: &mut R) -> Side {
    if rng.gen_bool(0.5) {
        Side::Low
    } else {
        Side::High
    }
}

/// Probability that the participant with the lower (or equal) unfairness
/// wins the biased coin: `1 - 2^-(|a - b| + 1)`. Always in `[0.5, 1]`.
pub fn coin_probability(a: i64, b: i64) -> f64 {
    let diff = a.abs_diff(b) as f64 + 1.0;
    1.0 - (-diff).exp2()
}

fn biased_coin<R: Rng + ?Sized>(
    unfairness: &Unfairness,
    pair: Pair,
    rng: &mut R,
) -> Result<Side, SimError> {
    let low = unfairness.get(pair.low);
    let high = unfairness.get(pair.high);
    let favoured = if low <= high { Side::Low } else { Side::High };

    let p = coin_probability(low, high);
    let coin = Bernoulli::new(p).map_err(|_| SimError::InvalidProbability { p })?;
    if coin.sample(rng) {
        Ok(favoured)
    } else {
        Ok(favoured.other())
    }
}

/// Strict alternation once a pair has met.
#[derive(Clone, Debug)]
pub struct RandomDeterministicLocal {
    ledger: Ledger,
    unfairness: Unfairness,
    extremes: Extremes,
}

impl RandomDeterministicLocal {
    pub fn new(people: u32) -> Self {
        Self {
            ledger: Ledger::new(LedgerKind::Tagged, people),
            unfairness: Unfairness::new(people),
            extremes: Extremes::default(),
        }
    }

    pub fn resolve_day<R: Rng + ?Sized>(
        &mut self,
        a: Participant,
        b: Participant,
        rng: &mut R,
    ) -> Participant {
        let pair = Pair::new(a, b);
        let driver = match self.ledger.get(pair).last_driver() {
            None => fair_coin(rng),
            Some(last) => last.other(),
        };

        self.ledger.apply(pair, driver);
        let (driver, rider) = pair.split(driver);
        self.unfairness.record(driver, rider);
        self.extremes.fold(&self.unfairness);
        driver
    }
}

/// Restores the pair's local balance, coin flip when already balanced.
#[derive(Clone, Debug)]
pub struct LocalGreedy {
    ledger: Ledger,
    unfairness: Unfairness,
    extremes: Extremes,
}

impl LocalGreedy {
    pub fn new(people: u32) -> Self {
        Self {
            ledger: Ledger::new(LedgerKind::Balance, people),
            unfairness: Unfairness::new(people),
            extremes: Extremes::default(),
        }
    }

    pub fn resolve_day<R: Rng + ?Sized>(
        &mut self,
        a: Participant,
        b: Participant,
        rng: &mut R,
    ) -> Participant {
        let pair = Pair::new(a, b);
        let driver = match self.ledger.balance(pair).cmp(&0) {
            Ordering::Greater => Side::High,
            Ordering::Less => Side::Low,
            Ordering::Equal => fair_coin(rng),
        };

        self.ledger.apply(pair, driver);
        self.unfairness.recompute(&self.ledger);
        self.extremes.fold(&self.unfairness);
        pair.participant(driver)
    }
}

/// No ledger: decides on overall unfairness alone.
#[derive(Clone, Debug)]
pub struct GlobalGreedy {
    unfairness: Unfairness,
    extremes: Extremes,
}

impl GlobalGreedy {
    pub fn new(people: u32) -> Self {
        Self {
            unfairness: Unfairness::new(people),
            extremes: Extremes::default(),
        }
    }

    pub fn resolve_day<R: Rng + ?Sized>(
        &mut self,
        a: Participant,
        b: Participant,
        rng: &mut R,
    ) -> Participant {
        let pair = Pair::new(a, b);
        let low = self.unfairness.get(pair.low);
        let high = self.unfairness.get(pair.high);
        let driver = match low.cmp(&high) {
            Ordering::Greater => Side::High,
            Ordering::Less => Side::Low,
            Ordering::Equal => fair_coin(rng),
        };

        let (driver, rider) = pair.split(driver);
        self.unfairness.record(driver, rider);
        self.extremes.fold(&self.unfairness);
        driver
    }
}

/// Local greedy with a coin biased by overall unfairness.
#[derive(Clone, Debug)]
pub struct LocalBiased {
    ledger: Ledger,
    unfairness: Unfairness,
    extremes: Extremes,
}

impl LocalBiased {
    pub fn new(people: u32) -> Self {
        Self {
            ledger: Ledger::new(LedgerKind::Balance, people),
            unfairness: Unfairness::new(people),
            extremes: Extremes::default(),
        }
    }

    pub fn resolve_day<R: Rng + ?Sized>(
        &mut self,
        a: Participant,
        b: Participant,
        rng: &mut R,
    ) -> Result<Participant, SimError> {
        let pair = Pair::new(a, b);
        let driver = match self.ledger.balance(pair).cmp(&0) {
            Ordering::Greater => Side::High,
            Ordering::Less => Side::Low,
            Ordering::Equal => biased_coin(&self.unfairness, pair, rng)?,
        };

        self.ledger.apply(pair, driver);
        self.unfairness.recompute(&self.ledger);
        self.extremes.fold(&self.unfairness);
        Ok(pair.participant(driver))
    }
}

#[derive(Clone, Debug)]
pub enum Engine {
    RandomDeterministicLocal(RandomDeterministicLocal),
    LocalGreedy(LocalGreedy),
    GlobalGreedy(GlobalGreedy),
    LocalBiased(LocalBiased),
}

impl Engine {
    pub fn new(strategy: Strategy, people: u32) -> Self {
        match strategy {
            Strategy::RandomDeterministicLocal => {
                Self::RandomDeterministicLocal(RandomDeterministicLocal::new(people))
            }
            Strategy::LocalGreedy => Self::LocalGreedy(LocalGreedy::new(people)),
            Strategy::GlobalGreedy => Self::GlobalGreedy(GlobalGreedy::new(people)),
            Strategy::LocalBiased => Self::LocalBiased(LocalBiased::new(people)),
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::RandomDeterministicLocal(_) => Strategy::RandomDeterministicLocal,
            Self::LocalGreedy(_) => Strategy::LocalGreedy,
            Self::GlobalGreedy(_) => Strategy::GlobalGreedy,
            Self::LocalBiased(_) => Strategy::LocalBiased,
        }
    }

    /// Resolves one day between `a` and `b` (any order) and returns the
    /// participant who drove.
    pub fn resolve_day<R: Rng + ?Sized>(
        &mut self,
        a: Participant,
        b: Participant,
        rng: &mut R,
    ) -> Result<Participant, SimError> {
        match self {
            Self::RandomDeterministicLocal(engine) => Ok(engine.resolve_day(a, b, rng)),
            Self::LocalGreedy(engine) => Ok(engine.resolve_day(a, b, rng)),
            Self::GlobalGreedy(engine) => Ok(engine.resolve_day(a, b, rng)),
            Self::LocalBiased(engine) => engine.resolve_day(a, b, rng),
        }
    }

    pub fn unfairness(&self) -> &Unfairness {
        match self {
            Self::RandomDeterministicLocal(engine) => &engine.unfairness,
            Self::LocalGreedy(engine) => &engine.unfairness,
            Self::GlobalGreedy(engine) => &engine.unfairness,
            Self::LocalBiased(engine) => &engine.unfairness,
        }
    }

    pub fn ledger(&self) -> Option<&Ledger> {
        match self {
            Self::RandomDeterministicLocal(engine) => Some(&engine.ledger),
            Self::LocalGreedy(engine) => Some(&engine.ledger),
            Self::GlobalGreedy(_) => None,
            Self::LocalBiased(engine) => Some(&engine.ledger),
        }
    }

    pub fn extremes(&self) -> Extremes {
        match self {
            Self::RandomDeterministicLocal(engine) => engine.extremes,
            Self::LocalGreedy(engine) => engine.extremes,
            Self::GlobalGreedy(engine) => engine.extremes,
            Self::LocalBiased(engine) => engine.extremes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Strategy;
    use proptest::prelude::*;
    use proptest::strategy::Strategy as _;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Every uniform draw lands on its lowest value, every coin on `true`.
    fn low_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn test_first_meeting_uses_coin_then_alternates() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut engine = RandomDeterministicLocal::new(5);

        let first = engine.resolve_day(4, 2, &mut rng);
        let mut previous = first;
        for day in 0..20 {
            // Argument order must not matter.
            let driver = if day % 2 == 0 {
                engine.resolve_day(2, 4, &mut rng)
            } else {
                engine.resolve_day(4, 2, &mut rng)
            };
            assert_ne!(driver, previous, "same driver twice in a row on day {day}");
            previous = driver;
        }

        let balance = engine.ledger.balance(Pair::new(2, 4));
        assert!((-1..=1).contains(&balance));
        assert_eq!(engine.unfairness.total(), 0);
    }

    #[test]
    fn test_alternation_ignores_other_pairs() {
        let mut rng = low_rng();
        let mut engine = RandomDeterministicLocal::new(4);

        assert_eq!(engine.resolve_day(1, 2, &mut rng), 1);
        assert_eq!(engine.resolve_day(1, 3, &mut rng), 1);
        assert_eq!(engine.resolve_day(2, 1, &mut rng), 2);
        assert_eq!(engine.resolve_day(3, 1, &mut rng), 3);
        assert_eq!(engine.resolve_day(1, 2, &mut rng), 1);
        assert_eq!(engine.unfairness.values(), &[1, -1, 0, 0]);
    }

    #[test]
    fn test_local_greedy_restores_pair_balance() {
        let mut rng = low_rng();
        let mut engine = LocalGreedy::new(3);

        assert_eq!(engine.resolve_day(2, 3, &mut rng), 2);
        assert_eq!(engine.ledger.balance(Pair::new(2, 3)), 1);

        assert_eq!(engine.resolve_day(3, 2, &mut rng), 3);
        assert_eq!(engine.ledger.balance(Pair::new(2, 3)), 0);
        assert_eq!(engine.unfairness.values(), &[0, 0, 0]);
        assert_eq!(engine.extremes, Extremes { max: 1, min: -1 });
    }

    #[test]
    fn test_local_greedy_drives_lower_side_on_negative_balance() {
        let mut engine = LocalGreedy::new(3);
        engine.ledger.apply(Pair::new(1, 3), Side::High);
        engine.ledger.apply(Pair::new(1, 3), Side::High);

        // Any coin would do; the balance decides.
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(engine.resolve_day(3, 1, &mut rng), 1);
        assert_eq!(engine.ledger.balance(Pair::new(1, 3)), -1);
        assert_eq!(engine.unfairness.values(), &[-1, 0, 1]);
    }

    #[test]
    fn test_global_greedy_lower_unfairness_drives() {
        let mut rng = low_rng();
        let mut engine = GlobalGreedy::new(4);
        engine.unfairness.record(3, 1);
        engine.unfairness.record(3, 2);

        // 3 has driven twice, 4 never: 4 drives.
        assert_eq!(engine.resolve_day(3, 4, &mut rng), 4);
        assert_eq!(engine.unfairness.values(), &[-1, -1, 1, 1]);

        // 1 and 2 are tied, the coin picks the low id.
        assert_eq!(engine.resolve_day(2, 1, &mut rng), 1);
        assert_eq!(engine.unfairness.values(), &[0, -2, 1, 1]);
    }

    #[test]
    fn test_coin_probability_bounds() {
        assert_eq!(coin_probability(0, 0), 0.5);
        assert_eq!(coin_probability(-7, -7), 0.5);
        assert_eq!(coin_probability(3, 2), 0.75);
        assert_eq!(coin_probability(2, 3), 0.75);
        assert_eq!(coin_probability(i64::MIN / 2, i64::MAX / 2), 1.0);

        let mut last = 0.0;
        for diff in 0..80 {
            let p = coin_probability(0, diff);
            assert!(p > 0.0 && p <= 1.0);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn test_biased_coin_favours_lower_unfairness() {
        let mut rng = low_rng();
        let mut engine = LocalBiased::new(3);
        for _ in 0..20 {
            engine.ledger.apply(Pair::new(1, 3), Side::Low);
        }
        engine.unfairness.recompute(&engine.ledger);
        assert_eq!(engine.unfairness.values(), &[20, 0, -20]);

        // Pair (1, 2) is balanced; 2 is the favoured side of the coin.
        let driver = engine.resolve_day(1, 2, &mut rng).unwrap();
        assert_eq!(driver, 2);
        assert_eq!(engine.ledger.balance(Pair::new(1, 2)), -1);
    }

    #[test]
    fn test_biased_coin_rarely_picks_the_indebted_side() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut unfairness = Unfairness::new(2);
        for _ in 0..6 {
            unfairness.record(1, 2);
        }
        let pair = Pair::new(1, 2);

        let trials = 10_000;
        let upsets = (0..trials)
            .filter(|_| biased_coin(&unfairness, pair, &mut rng).unwrap() == Side::Low)
            .count();
        // Expected rate 2^-13.
        assert!(upsets < 20, "{upsets} upsets in {trials} trials");
    }

    #[test]
    fn test_engine_dispatch_reports_strategy() {
        for strategy in Strategy::all() {
            let engine = Engine::new(strategy, 5);
            assert_eq!(engine.strategy(), strategy);
            assert_eq!(engine.extremes(), Extremes::default());
            assert_eq!(engine.unfairness().values(), &[0; 5]);
            assert_eq!(engine.ledger().is_some(), strategy != Strategy::GlobalGreedy);
        }
    }

    #[test]
    #[should_panic(expected = "outside population")]
    fn test_engine_rejects_out_of_range_participant() {
        let mut engine = Engine::new(Strategy::GlobalGreedy, 3);
        let _ = engine.resolve_day(1, 4, &mut low_rng());
    }

    fn pairs(
        people: u32,
        days: usize,
    ) -> impl proptest::strategy::Strategy<Value = Vec<(u32, u32)>> {
        proptest::collection::vec((1..=people, 1..people), days).prop_map(move |raw| {
            raw.into_iter()
                .map(|(a, b)| if b >= a { (a, b + 1) } else { (a, b) })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn unfairness_sums_to_zero_every_day(
            days in pairs(8, 60),
            seed in any::<u64>(),
        ) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut engines: Vec<Engine> =
                Strategy::all().into_iter().map(|s| Engine::new(s, 8)).collect();
            for (a, b) in days {
                for engine in engines.iter_mut() {
                    engine.resolve_day(a, b, &mut rng).unwrap();
                    prop_assert_eq!(engine.unfairness().total(), 0);
                }
            }
        }

        #[test]
        fn global_greedy_moves_the_pair_together(
            days in pairs(6, 80),
            seed in any::<u64>(),
        ) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut engine = GlobalGreedy::new(6);
            for (a, b) in days {
                let (before_a, before_b) = (engine.unfairness.get(a), engine.unfairness.get(b));
                engine.resolve_day(a, b, &mut rng);
                let (after_a, after_b) = (engine.unfairness.get(a), engine.unfairness.get(b));

                match before_a.cmp(&before_b) {
                    Ordering::Greater => {
                        prop_assert_eq!(after_a, before_a - 1);
                        prop_assert_eq!(after_b, before_b + 1);
                    }
                    Ordering::Less => {
                        prop_assert_eq!(after_a, before_a + 1);
                        prop_assert_eq!(after_b, before_b - 1);
                    }
                    Ordering::Equal => prop_assert_eq!((after_a - after_b).abs(), 2),
                }
                let gap = (before_a - before_b).abs();
                if gap >= 2 {
                    prop_assert_eq!((after_a - after_b).abs(), gap - 2);
                }
            }
        }
    }
}
