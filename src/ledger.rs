//! Balance Ledger
//!
//! Per-pair record of who has driven whom. A positive balance means the low
//! participant of the pair has driven more often, a negative one the high
//! participant.
//!
//! Two entry layouts exist, fixed when the ledger is created:
//! - `Balance`: the signed balance alone
//! - `Tagged`: the balance plus the last driver, so that a pair that has met
//!   and is exactly balanced can be told apart from one that never met

use crate::pair::{pair_count, Pair, Participant, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerKind {
    Balance,
    Tagged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerEntry {
    Balance(i64),
    /// `last == None` implies `balance == 0`; once set it stays set.
    Tagged { last: Option<Side>, balance: i64 },
}

impl LedgerEntry {
    fn empty(kind: LedgerKind) -> Self {
        match kind {
            LedgerKind::Balance => Self::Balance(0),
            LedgerKind::Tagged => Self::Tagged {
                last: None,
                balance: 0,
            },
        }
    }

    pub fn balance(&self) -> i64 {
        match *self {
            Self::Balance(balance) => balance,
            Self::Tagged { balance, .. } => balance,
        }
    }

    pub fn last_driver(&self) -> Option<Side> {
        match *self {
            Self::Balance(_) => None,
            Self::Tagged { last, .. } => last,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ledger {
    kind: LedgerKind,
    people: u32,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Allocates one entry per unordered pair, all in the never-met state.
    pub fn new(kind: LedgerKind, people: u32) -> Self {
        Self {
            kind,
            people,
            entries: vec![LedgerEntry::empty(kind); pair_count(people)],
        }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, pair: Pair) -> LedgerEntry {
        self.entries[self.index(pair)]
    }

    pub fn balance(&self, pair: Pair) -> i64 {
        self.get(pair).balance()
    }

    /// Signed balance of `person` against `other`, from `person`'s side.
    pub fn balance_between(&self, person: Participant, other: Participant) -> i64 {
        let pair = Pair::new(person, other);
        let balance = self.balance(pair);
        if person == pair.low {
            balance
        } else {
            -balance
        }
    }

    /// Records an event on `pair` driven by `driver`: +1 when the low
    /// participant drives, -1 when the high one does.
    pub fn apply(&mut self, pair: Pair, driver: Side) {
        let idx = self.index(pair);
        let entry = &mut self.entries[idx];
        match entry {
            LedgerEntry::Balance(balance) => *balance += driver.sign(),
            LedgerEntry::Tagged { last, balance } => {
                *balance += driver.sign();
                *last = Some(driver);
            }
        }
    }

    fn index(&self, pair: Pair) -> usize {
        assert!(
            pair.high <= self.people,
            "participant {} outside population of {}",
            pair.high,
            self.people
        );
        pair.key()
    }
}
