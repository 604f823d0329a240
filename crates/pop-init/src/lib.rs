//! `pop-init` — population initialization for agent-based simulations.
//!
//! # Pipeline
//!
//! ```text
//! ① SampleAges        bin_i  ~ alias(pyramid)        age_i ~ U[bin_i.min, bin_i.max + 1) years
//! ② AssignBirthDates  dob_i  = -age_i
//! ③ PredictDeaths     aad_i  = mortality(age_i, AgentRng(seed, i))     (parallel with `parallel`)
//! ④ QueueDeaths       dod_i  = aad_i - age_i  ≥ 0     push (i, dod_i) into PriorityQueue<u32, K>
//! ```
//!
//! All dates are day offsets from t = 0.  The result is an
//! [`InitializedPopulation`]: the SoA [`Population`] plus a death queue whose
//! front is always the next agent to die.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs phase ③ on Rayon's thread pool.                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pop_init::{InitConfig, NoopObserver, PopulationBuilder};
//! use pop_queue::NativeKernel;
//!
//! let config = InitConfig::new("pyramid.csv");
//! let mut init = PopulationBuilder::from_config(&config)?
//!     .build::<NativeKernel>(&mut NoopObserver)?;
//! while let Ok((agent, day)) = init.deaths.pop() {
//!     // ...
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod output;
pub mod population;

#[cfg(test)]
mod tests;

pub use builder::PopulationBuilder;
pub use config::{DEFAULT_COUNT, DEFAULT_SEED, InitConfig, KernelChoice};
pub use error::{InitError, InitResult};
pub use observer::{InitObserver, InitPhase, NoopObserver};
pub use output::{write_population, write_population_csv};
pub use population::{InitializedPopulation, Population};
