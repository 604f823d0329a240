//! Day-offset time model.
//!
//! # Design
//!
//! Every date in the initializer is a signed day count relative to the
//! moment the simulation starts (t = 0):
//!
//!   date of birth  = -(age in days)   ≤ 0
//!   date of death  = days until death ≥ 0
//!
//! Years are a flat 365 days.  Leap days are ignored on purpose so that
//! `years * DAYS_PER_YEAR` round-trips exactly and age bins map onto
//! non-overlapping day ranges.
//!
//! An `i32` spans ±5.8 million years, far beyond any lifespan; the queue
//! stores the non-negative death offsets as `u32` priorities (see
//! [`Day::as_priority`]).

use std::fmt;

/// Days in one (flat) simulated year.
pub const DAYS_PER_YEAR: i32 = 365;

// ── Day ───────────────────────────────────────────────────────────────────────

/// A day offset relative to t = 0 (negative = past, positive = future).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day(pub i32);

impl Day {
    pub const ZERO: Day = Day(0);

    /// The first day of year `years` (counted from zero).
    #[inline]
    pub fn from_years(years: u32) -> Day {
        Day(years as i32 * DAYS_PER_YEAR)
    }

    /// Whole years contained in this offset, rounding toward negative
    /// infinity (`Day(-1).whole_years() == -1`).
    #[inline]
    pub fn whole_years(self) -> i32 {
        self.0.div_euclid(DAYS_PER_YEAR)
    }

    /// Position within the current year, always in `0..DAYS_PER_YEAR`.
    #[inline]
    pub fn day_of_year(self) -> i32 {
        self.0.rem_euclid(DAYS_PER_YEAR)
    }

    /// Convert a non-negative offset to a queue priority.
    ///
    /// Returns `None` for days before t = 0, which cannot be scheduled.
    #[inline]
    pub fn as_priority(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }

    /// Inverse of [`as_priority`](Self::as_priority).
    ///
    /// Returns `None` if `priority` exceeds `i32::MAX`.
    #[inline]
    pub fn from_priority(priority: u32) -> Option<Day> {
        i32::try_from(priority).ok().map(Day)
    }
}

impl std::ops::Add<i32> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: i32) -> Day {
        Day(self.0 + rhs)
    }
}

impl std::ops::Sub for Day {
    type Output = i32;
    #[inline]
    fn sub(self, rhs: Day) -> i32 {
        self.0 - rhs.0
    }
}

impl std::ops::Neg for Day {
    type Output = Day;
    #[inline]
    fn neg(self) -> Day {
        Day(-self.0)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}
