//! Progress callbacks for [`PopulationBuilder::build`][crate::PopulationBuilder::build].

use std::fmt;
use std::time::Duration;

/// The stages of population initialization, in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InitPhase {
    /// Draw an age bin per agent, then an exact age in days within it.
    SampleAges,
    /// Convert ages to (non-positive) dates of birth.
    AssignBirthDates,
    /// Ask the mortality model for each agent's age at death.
    PredictDeaths,
    /// Rebase deaths onto t = 0 and push them into the death queue.
    QueueDeaths,
}

impl InitPhase {
    pub const ALL: [InitPhase; 4] = [
        InitPhase::SampleAges,
        InitPhase::AssignBirthDates,
        InitPhase::PredictDeaths,
        InitPhase::QueueDeaths,
    ];
}

impl fmt::Display for InitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InitPhase::SampleAges => "sample ages",
            InitPhase::AssignBirthDates => "assign birth dates",
            InitPhase::PredictDeaths => "predict deaths",
            InitPhase::QueueDeaths => "queue deaths",
        })
    }
}

/// Callbacks invoked at phase boundaries and periodically within long phases.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl InitObserver for ProgressPrinter {
///     fn on_progress(&mut self, phase: InitPhase, done: usize) {
///         println!("{phase}: {done} agents");
///     }
/// }
/// ```
pub trait InitObserver {
    /// Called when `phase` begins; `total` is the number of agents it covers.
    fn on_phase_start(&mut self, _phase: InitPhase, _total: usize) {}

    /// Called after each batch of agents; `done` is cumulative within `phase`.
    fn on_progress(&mut self, _phase: InitPhase, _done: usize) {}

    /// Called when `phase` finishes.
    fn on_phase_end(&mut self, _phase: InitPhase, _elapsed: Duration) {}
}

/// An [`InitObserver`] that does nothing.
pub struct NoopObserver;

impl InitObserver for NoopObserver {}
