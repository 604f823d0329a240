//! Run configuration for the population initializer.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{InitError, InitResult};

/// Default agent count.
pub const DEFAULT_COUNT: usize = 1_000_000;

/// Default master seed.
pub const DEFAULT_SEED: u64 = 20240607;

// ── KernelChoice ──────────────────────────────────────────────────────────────

/// Which sift kernel drives the death queue.
///
/// Both kernels yield identical queues; `Native` is the faster one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelChoice {
    /// Bounds-checked [`pop_queue::PortableKernel`].
    Portable,
    /// Unchecked [`pop_queue::NativeKernel`].
    #[default]
    Native,
}

impl fmt::Display for KernelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KernelChoice::Portable => "portable",
            KernelChoice::Native => "native",
        })
    }
}

impl FromStr for KernelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portable" => Ok(KernelChoice::Portable),
            "native" => Ok(KernelChoice::Native),
            other => Err(format!("unknown kernel '{other}' (expected 'portable' or 'native')")),
        }
    }
}

// ── InitConfig ────────────────────────────────────────────────────────────────

/// Everything needed to initialize one population.
///
/// Typically loaded from a JSON file by the application crate and then
/// overridden by command-line flags.  Only `pyramid` is required in JSON:
///
/// ```json
/// { "pyramid": "data/pyramid.csv", "count": 250000, "kernel": "portable" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitConfig {
    /// Number of agents to create.  Must fit in a `u32` agent index.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Master RNG seed.  The same seed always produces identical results.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Population pyramid CSV (`Age,M,F`).
    pub pyramid: PathBuf,

    /// Life table CSV (`age,deaths`).  `None` uses the built-in
    /// Gompertz–Makeham curve.
    #[serde(default)]
    pub life_table: Option<PathBuf>,

    /// Sift kernel for the death queue.
    #[serde(default)]
    pub kernel: KernelChoice,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    /// Ignored without the `parallel` feature.
    #[serde(default)]
    pub num_threads: Option<usize>,
}

fn default_count() -> usize {
    DEFAULT_COUNT
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl InitConfig {
    /// A configuration with default count, seed and kernel.
    pub fn new(pyramid: impl Into<PathBuf>) -> Self {
        Self {
            count:       DEFAULT_COUNT,
            seed:        DEFAULT_SEED,
            pyramid:     pyramid.into(),
            life_table:  None,
            kernel:      KernelChoice::default(),
            num_threads: None,
        }
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> InitResult<()> {
        if self.count == 0 {
            return Err(InitError::Config("count must be at least 1".into()));
        }
        if self.count > u32::MAX as usize {
            return Err(InitError::Config(format!(
                "count {} exceeds the u32 agent index range ({})",
                self.count,
                u32::MAX
            )));
        }
        if self.num_threads == Some(0) {
            return Err(InitError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}
