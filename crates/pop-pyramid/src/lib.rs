//! `pop-pyramid` — where agents' ages come from.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`pyramid`] | `AgeBin`, `Pyramid`, `load_pyramid_csv`, `load_pyramid_reader` |
//! | [`alias`]   | `AliasedDistribution` (Vose alias method, integer weights) |
//! | [`birth`]   | `BirthSampler` — age bin → exact age in days → date of birth |
//! | [`error`]   | `PyramidError`, `PyramidResult<T>`                        |
//!
//! # Sampling model (summary)
//!
//! ```text
//! bin      ~ Categorical(bin.male + bin.female)          O(1) per draw
//! age_days ~ Uniform[min_age * 365, (max_age + 1) * 365)
//! dob      = -age_days                                    (t = 0 is "now")
//! ```

pub mod alias;
pub mod birth;
pub mod error;
pub mod pyramid;

#[cfg(test)]
mod tests;

pub use alias::AliasedDistribution;
pub use birth::BirthSampler;
pub use error::{PyramidError, PyramidResult};
pub use pyramid::{AgeBin, Pyramid, load_pyramid_csv, load_pyramid_reader};
