//! Participant Pairs
//!
//! Participants are identified by a dense id in `1..=n`. Every unordered pair
//! of distinct participants maps to a single ledger key.
//!
//! ## Key Layout
//! Pairs are laid out in triangular order, grouped by the higher id:
//!
//! ```text
//! (1,2) -> 0
//! (1,3) -> 1   (2,3) -> 2
//! (1,4) -> 3   (2,4) -> 4   (3,4) -> 5
//! ```
//!
//! The layout is injective over `1 <= low < high`, invertible, and packs the
//! keys of a population of `n` into `0..n*(n-1)/2`, so a ledger can be a
//! plain vector.

pub type Participant = u32;

/// Which end of a pair an event was assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Low,
    High,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Ledger balance contribution when this side drives.
    pub fn sign(self) -> i64 {
        match self {
            Self::Low => 1,
            Self::High => -1,
        }
    }
}

/// An unordered pair of distinct participants, stored as `(low, high)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pair {
    pub low: Participant,
    pub high: Participant,
}

impl Pair {
    /// Orders `a` and `b`. Panics if they are the same participant or if
    /// either is the reserved id 0.
    pub fn new(a: Participant, b: Participant) -> Self {
        assert!(a != b, "a pair needs two distinct participants, got {a} twice");
        assert!(a >= 1 && b >= 1, "participant ids start at 1, got ({a}, {b})");
        if a < b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn key(&self) -> usize {
        encode(self.low, self.high)
    }

    pub fn participant(&self, side: Side) -> Participant {
        match side {
            Side::Low => self.low,
            Side::High => self.high,
        }
    }

    /// Returns `(driver, rider)` for an event won by `side`.
    pub fn split(&self, side: Side) -> (Participant, Participant) {
        (self.participant(side), self.participant(side.other()))
    }
}

/// Ledger key of the pair `(low, high)`. Callers order the ids first.
#[inline]
pub fn encode(low: Participant, high: Participant) -> usize {
    let low = low as usize;
    let high = high as usize;
    (high - 1) * (high - 2) / 2 + (low - 1)
}

/// Inverse of [`encode`].
pub fn decode(key: usize) -> (Participant, Participant) {
    // t = high - 1 is the largest t with t*(t-1)/2 <= key
    let mut t = ((1.0 + (1.0 + 8.0 * key as f64).sqrt()) / 2.0) as usize;
    while t * (t - 1) / 2 > key {
        t -= 1;
    }
    while (t + 1) * t / 2 <= key {
        t += 1;
    }
    let low = key - t * (t - 1) / 2 + 1;
    (low as Participant, (t + 1) as Participant)
}

/// Number of unordered pairs in a population of `people`.
pub fn pair_count(people: u32) -> usize {
    let n = people as usize;
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_triangular_layout() {
        assert_eq!(encode(1, 2), 0);
        assert_eq!(encode(1, 3), 1);
        assert_eq!(encode(2, 3), 2);
        assert_eq!(encode(1, 4), 3);
        assert_eq!(encode(3, 4), 5);
    }

    #[test]
    fn test_encoding_is_injective_and_dense() {
        let n = 50;
        let mut seen = HashSet::new();
        for high in 2..=n {
            for low in 1..high {
                assert!(seen.insert(encode(low, high)), "collision at ({low}, {high})");
            }
        }
        assert_eq!(seen.len(), pair_count(n));
        assert_eq!(seen.iter().max().copied(), Some(pair_count(n) - 1));
    }

    #[test]
    fn test_pair_orders_ids() {
        let pair = Pair::new(7, 3);
        assert_eq!((pair.low, pair.high), (3, 7));
        assert_eq!(pair.split(Side::High), (7, 3));
        assert_eq!(pair.key(), Pair::new(3, 7).key());
    }

    #[test]
    #[should_panic(expected = "distinct")]
    fn test_pair_rejects_self_pair() {
        Pair::new(4, 4);
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(4), 6);
        assert_eq!(pair_count(50), 1225);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(high in 2u32..5_000, low_frac in 0.0f64..1.0) {
            let low = 1 + ((high - 1) as f64 * low_frac) as u32;
            let low = low.min(high - 1);
            prop_assert_eq!(decode(encode(low, high)), (low, high));
        }
    }
}
