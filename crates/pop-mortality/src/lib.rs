//! `pop-mortality` — when agents die.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`curve`]   | `SurvivalCurve`, `GompertzMakeham`                         |
//! | [`loader`]  | `load_life_table_csv`, `load_life_table_reader`            |
//! | [`model`]   | `MortalityModel` trait                                     |
//! | [`error`]   | `MortalityError`, `MortalityResult<T>`                     |
//!
//! # Prediction (summary)
//!
//! A [`SurvivalCurve`] follows a notional birth cohort year by year.  For an
//! agent aged `a` years, pick one of the cohort members still alive at `a`
//! uniformly at random and report the year that member died in; then pick a
//! uniform day in that year, never earlier than the agent's current age.

pub mod curve;
pub mod error;
pub mod loader;
pub mod model;


pub use curve::{GompertzMakeham, SurvivalCurve};
pub use error::{MortalityError, MortalityResult};
pub use loader::{load_life_table_csv, load_life_table_reader};
pub use model::MortalityModel;
