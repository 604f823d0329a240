//! Population-pyramid CSV loader.
//!
//! # CSV format
//!
//! One row per age bin, youngest first.  Counts are people, split by sex.
//!
//! ```csv
//! Age,M,F
//! 0-4,9600,9200
//! 5-9,10300,9900
//! ...
//! 95-99,120,300
//! 100+,20,70
//! ```
//!
//! **`Age`** field:
//!
//! | Value   | Meaning                                                    |
//! |---------|------------------------------------------------------------|
//! | `lo-hi` | Ages `lo..=hi` in whole years                              |
//! | `lo+`   | Open-ended top bin; spans as many years as the bin before it (one year if it is the only bin) |
//!
//! Bins must start at age 0 and be contiguous.  Only the last row may be
//! open-ended.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{PyramidError, PyramidResult};

/// Ages above this are rejected as malformed input.  Keeps every day offset
/// comfortably inside `i32`.
pub const MAX_AGE_YEARS: u32 = 200;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PyramidRecord {
    #[serde(rename = "Age")]
    age:    String,
    #[serde(rename = "M")]
    male:   u64,
    #[serde(rename = "F")]
    female: u64,
}

// ── AgeBin / Pyramid ──────────────────────────────────────────────────────────

/// One row of the pyramid: an inclusive range of whole-year ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBin {
    /// Youngest age in the bin (years, inclusive).
    pub min_age: u32,
    /// Oldest age in the bin (years, inclusive).
    pub max_age: u32,
    pub male:    u64,
    pub female:  u64,
}

impl AgeBin {
    /// Combined count.  Sex is not modelled separately by the sampler.
    #[inline]
    pub fn total(&self) -> u64 {
        self.male + self.female
    }

    /// Number of whole years covered.
    #[inline]
    pub fn width(&self) -> u32 {
        self.max_age.saturating_sub(self.min_age) + 1
    }
}

/// A validated, contiguous sequence of age bins starting at age 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pyramid {
    bins: Vec<AgeBin>,
}

impl Pyramid {
    /// Validate and wrap `bins`.
    pub fn new(bins: Vec<AgeBin>) -> PyramidResult<Self> {
        if bins.is_empty() {
            return Err(PyramidError::Empty);
        }

        let mut expected = 0u32;
        for (index, bin) in bins.iter().enumerate() {
            if bin.min_age != expected {
                return Err(PyramidError::NonContiguous { index, expected, found: bin.min_age });
            }
            if bin.max_age < bin.min_age {
                return Err(PyramidError::Parse(format!(
                    "age bin {index} ends ({}) before it starts ({})",
                    bin.max_age, bin.min_age
                )));
            }
            if bin.max_age > MAX_AGE_YEARS {
                return Err(PyramidError::Parse(format!(
                    "age bin {index} reaches {} years (limit {MAX_AGE_YEARS})",
                    bin.max_age
                )));
            }
            expected = bin.max_age + 1;
        }

        Ok(Self { bins })
    }

    pub fn bins(&self) -> &[AgeBin] {
        &self.bins
    }

    /// Number of age bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Always `false` for a validated pyramid; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Per-bin sampling weights (`male + female`).
    pub fn weights(&self) -> Vec<u64> {
        self.bins.iter().map(AgeBin::total).collect()
    }

    /// Oldest representable age in years.
    pub fn max_age(&self) -> u32 {
        self.bins.last().map_or(0, |b| b.max_age)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Pyramid`] from a CSV file.
pub fn load_pyramid_csv(path: &Path) -> PyramidResult<Pyramid> {
    let file = std::fs::File::open(path)?;
    load_pyramid_reader(file)
}

/// Like [`load_pyramid_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_pyramid_reader<R: Read>(reader: R) -> PyramidResult<Pyramid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = csv_reader
        .deserialize::<PyramidRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PyramidError::Parse(e.to_string()))?;

    let last = records.len().saturating_sub(1);
    let mut bins: Vec<AgeBin> = Vec::with_capacity(records.len());

    for (i, row) in records.into_iter().enumerate() {
        let (min_age, max_age) = match parse_age(&row.age)? {
            (lo, Some(hi)) => (lo, hi),
            (lo, None) if i == last => {
                let width = bins.last().map_or(1, AgeBin::width);
                (lo, lo.saturating_add(width - 1))
            }
            (_, None) => {
                return Err(PyramidError::Parse(format!(
                    "open-ended age bin {:?} must be the last row",
                    row.age
                )));
            }
        };
        bins.push(AgeBin { min_age, max_age, male: row.male, female: row.female });
    }

    Pyramid::new(bins)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `"0-4"` → `(0, Some(4))`, `"100+"` → `(100, None)`.
fn parse_age(s: &str) -> PyramidResult<(u32, Option<u32>)> {
    let bad = || PyramidError::Parse(format!("invalid age bin {s:?}: expected \"lo-hi\" or \"lo+\""));
    let years = |t: &str| t.trim().parse::<u32>().map_err(|_| bad());

    if let Some(lo) = s.strip_suffix('+') {
        return Ok((years(lo)?, None));
    }
    match s.split_once('-') {
        Some((lo, hi)) => Ok((years(lo)?, Some(years(hi)?))),
        None => Err(bad()),
    }
}
