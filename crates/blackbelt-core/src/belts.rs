//! # Belts and the Belt Tally
//!
//! The kids' belt ladder used by the academy, and the per-belt athlete count
//! shown on the dashboard.
//!
//! Shares are computed in parts per thousand with integer arithmetic.

use crate::academy::Athlete;
use crate::types::BlackbeltError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Belt labels in chart order, as stored by the academy API.
pub const BELT_LABELS: [&str; 13] = [
    "Branca",
    "Cinza e Branca",
    "Cinza",
    "Cinza e Preta",
    "Amarela e Branca",
    "Amarela",
    "Amarela e Preta",
    "Laranja e Branca",
    "Laranja",
    "Laranja e Preta",
    "Verde e Branca",
    "Verde",
    "Verde e Preta",
];

// =============================================================================
// BELT
// =============================================================================

/// A belt colour. Declaration order is rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Belt {
    White,
    GreyWhite,
    Grey,
    GreyBlack,
    YellowWhite,
    Yellow,
    YellowBlack,
    OrangeWhite,
    Orange,
    OrangeBlack,
    GreenWhite,
    Green,
    GreenBlack,
}

impl Belt {
    /// Every belt in rank order.
    pub const ALL: [Belt; 13] = [
        Belt::White,
        Belt::GreyWhite,
        Belt::Grey,
        Belt::GreyBlack,
        Belt::YellowWhite,
        Belt::Yellow,
        Belt::YellowBlack,
        Belt::OrangeWhite,
        Belt::Orange,
        Belt::OrangeBlack,
        Belt::GreenWhite,
        Belt::Green,
        Belt::GreenBlack,
    ];

    /// Position in the rank order.
    #[must_use]
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// The label stored by the academy API.
    #[must_use]
    pub const fn label(self) -> &'static str {
        BELT_LABELS[self.rank()]
    }

    /// Look a belt up by its API label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|belt| belt.label() == label)
    }
}

impl fmt::Display for Belt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Belt {
    type Err = BlackbeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| BlackbeltError::UnknownBelt(s.trim().to_string()))
    }
}

impl TryFrom<String> for Belt {
    type Error = BlackbeltError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Belt> for String {
    fn from(belt: Belt) -> Self {
        belt.label().to_string()
    }
}

// =============================================================================
// BELT TALLY
// =============================================================================

/// One slice of the belt chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeltCount {
    pub belt: Belt,
    pub count: usize,
    /// Share of all athletes, in parts per thousand (rounded down).
    pub per_thousand: u32,
}

/// Athletes counted per belt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BeltTally {
    counts: [usize; 13],
    unassigned: usize,
    total: usize,
}

impl BeltTally {
    /// Empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a list of athletes.
    #[must_use]
    pub fn from_athletes(athletes: &[Athlete]) -> Self {
        let mut tally = Self::new();
        for athlete in athletes {
            tally.record(athlete.belt.as_deref());
        }
        tally
    }

    /// Count one athlete by belt label. Missing or unknown labels are counted
    /// as unassigned.
    pub fn record(&mut self, belt: Option<&str>) {
        self.total = self.total.saturating_add(1);
        match belt.and_then(Belt::from_label) {
            Some(belt) => {
                let slot = &mut self.counts[belt.rank()];
                *slot = slot.saturating_add(1);
            }
            None => self.unassigned = self.unassigned.saturating_add(1),
        }
    }

    /// Number of athletes on a belt.
    #[must_use]
    pub fn count(&self, belt: Belt) -> usize {
        self.counts[belt.rank()]
    }

    /// Athletes counted, including unassigned ones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Athletes without a recognised belt.
    #[must_use]
    pub fn unassigned(&self) -> usize {
        self.unassigned
    }

    /// Share of a count in parts per thousand of the total.
    #[must_use]
    pub fn per_thousand(&self, count: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let scaled = (count as u64).saturating_mul(1000) / self.total as u64;
        scaled.min(1000) as u32
    }

    /// Every belt in chart order, including empty ones.
    pub fn slices(&self) -> impl Iterator<Item = BeltCount> + '_ {
        Belt::ALL.into_iter().map(|belt| {
            let count = self.count(belt);
            BeltCount {
                belt,
                count,
                per_thousand: self.per_thousand(count),
            }
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
