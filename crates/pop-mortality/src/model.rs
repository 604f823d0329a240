//! `MortalityModel` — the seam between the initializer and a death predictor.

use pop_core::{AgentRng, Day};

use crate::SurvivalCurve;

/// Predicts an agent's age at death from its current age.
///
/// # Contract
///
/// - The result must be `>= age` (nobody is scheduled to die in the past).
/// - Must be deterministic given the same `rng` state.
/// - Must not block or perform I/O.
/// - Implementations must be `Send + Sync` (shared across Rayon threads).
pub trait MortalityModel: Send + Sync {
    /// Age, in days, at which an agent currently `age` days old will die.
    fn predict_day_of_death(&self, age: Day, rng: &mut AgentRng) -> Day;
}

impl MortalityModel for SurvivalCurve {
    #[inline]
    fn predict_day_of_death(&self, age: Day, rng: &mut AgentRng) -> Day {
        self.predicted_day_of_death(age, rng.inner())
    }
}
