//! Seeded random streams for population initialization.
//!
//! | Stream       | Seeded from                       | Drives                   |
//! |--------------|-----------------------------------|--------------------------|
//! | [`SimRng`]   | the run seed, split per phase     | age bins, exact ages     |
//! | [`AgentRng`] | `seed ^ (agent * GOLDEN_GAMMA)`   | mortality, one per agent |
//!
//! Because every agent's mortality draw has its own stream, agent `i`'s date
//! of death is a pure function of the seed, `i`, and its age.  It does not
//! depend on the worker count or on how many agents come after it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 2^64 / φ, the Weyl increment used by SplitMix64.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn mix(seed: u64, k: u64) -> u64 {
    seed ^ k.wrapping_mul(GOLDEN_GAMMA)
}

/// Per-agent stream.  Built on the fly; never stored.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        AgentRng(SmallRng::seed_from_u64(mix(global_seed, u64::from(agent.0))))
    }

    /// The underlying generator, for `rand` APIs.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

/// Population-wide sequential stream.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream for one phase of the pipeline.
    ///
    /// Children are taken in a fixed order, so the same root seed always
    /// yields the same child streams.
    pub fn child(&mut self, stream: u64) -> SimRng {
        SimRng(SmallRng::seed_from_u64(mix(self.0.r#gen::<u64>(), stream)))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}
