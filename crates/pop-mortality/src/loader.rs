//! Life-table CSV loader.
//!
//! # CSV format
//!
//! One row per year of age, starting at 0, with the number of cohort members
//! who die during that year (the `d(x)` column of a period life table):
//!
//! ```csv
//! age,deaths
//! 0,560
//! 1,40
//! 2,25
//! ...
//! 100,1900
//! ```
//!
//! The cohort size is the sum of the `deaths` column.  Rows must be in
//! ascending, gap-free age order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{MortalityError, MortalityResult, SurvivalCurve};

#[derive(Deserialize)]
struct LifeTableRecord {
    age:    u32,
    deaths: u32,
}

/// Load a [`SurvivalCurve`] from a life-table CSV file.
pub fn load_life_table_csv(path: &Path) -> MortalityResult<SurvivalCurve> {
    let file = std::fs::File::open(path)?;
    load_life_table_reader(file)
}

/// Like [`load_life_table_csv`] but accepts any `Read` source.
pub fn load_life_table_reader<R: Read>(reader: R) -> MortalityResult<SurvivalCurve> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cumulative: Vec<u32> = Vec::with_capacity(128);
    let mut total = 0u32;

    for result in csv_reader.deserialize::<LifeTableRecord>() {
        let row = result.map_err(|e| MortalityError::Parse(e.to_string()))?;

        let expected = cumulative.len() as u32;
        if row.age != expected {
            return Err(MortalityError::Parse(format!(
                "expected age {expected}, found age {}",
                row.age
            )));
        }

        total = total.checked_add(row.deaths).ok_or_else(|| {
            MortalityError::Parse(format!("cumulative deaths overflow u32 at age {}", row.age))
        })?;
        cumulative.push(total);
    }

    SurvivalCurve::from_cumulative(cumulative)
}
