//! Fluent builder that runs the population initialization pipeline.

use std::time::Instant;

use tracing::{debug, info};

use pop_core::{AgentId, AgentRng, Day, SimRng};
use pop_mortality::{MortalityModel, SurvivalCurve, load_life_table_csv};
use pop_pyramid::{BirthSampler, Pyramid, load_pyramid_csv};
use pop_queue::{PriorityQueue, SiftKernel};

use crate::{
    InitConfig, InitError, InitObserver, InitPhase, InitResult, InitializedPopulation, Population,
};

/// Agents per progress callback in the long phases.
const PROGRESS_CHUNK: usize = 1 << 16;

/// Seed offsets for the two population-wide streams derived from the root.
const BIN_STREAM: u64 = 0;
const AGE_STREAM: u64 = 1;

/// Fluent builder for [`InitializedPopulation`].
///
/// # Required inputs
///
/// - agent count and master seed (constructor)
/// - a [`Pyramid`] via [`.pyramid(p)`](Self::pyramid)
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                       |
/// |---------------------|-------------------------------|
/// | `.mortality(m)`     | `SurvivalCurve::standard()`   |
/// | `.num_threads(n)`   | Rayon's global pool           |
///
/// # Example
///
/// ```rust,ignore
/// let pyramid = load_pyramid_csv(Path::new("pyramid.csv"))?;
/// let mut init = PopulationBuilder::new(100_000, 42)
///     .pyramid(pyramid)
///     .build::<NativeKernel>(&mut NoopObserver)?;
/// let first_year = init.deaths_through(Day(364))?;
/// ```
pub struct PopulationBuilder {
    count:       usize,
    seed:        u64,
    pyramid:     Option<Pyramid>,
    mortality:   Option<Box<dyn MortalityModel>>,
    num_threads: Option<usize>,
}

impl PopulationBuilder {
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            pyramid:     None,
            mortality:   None,
            num_threads: None,
        }
    }

    /// Validate `config` and load the files it names.
    pub fn from_config(config: &InitConfig) -> InitResult<Self> {
        config.validate()?;

        let pyramid = load_pyramid_csv(&config.pyramid)?;
        let curve = match &config.life_table {
            Some(path) => load_life_table_csv(path)?,
            None => SurvivalCurve::standard()?,
        };
        debug!(
            bins = pyramid.len(),
            oldest = pyramid.max_age(),
            table_years = curve.max_year() + 1,
            "loaded initializer inputs"
        );

        Ok(Self::new(config.count, config.seed)
            .pyramid(pyramid)
            .mortality(curve)
            .num_threads(config.num_threads))
    }

    /// Supply the age distribution agents are drawn from.
    pub fn pyramid(mut self, pyramid: Pyramid) -> Self {
        self.pyramid = Some(pyramid);
        self
    }

    /// Supply the death predictor.
    ///
    /// If not called, [`SurvivalCurve::standard`] is used.
    pub fn mortality<M: MortalityModel + 'static>(mut self, model: M) -> Self {
        self.mortality = Some(Box::new(model));
        self
    }

    /// Limit death prediction to `n` worker threads.
    ///
    /// Only has an effect with the `parallel` feature.
    pub fn num_threads(mut self, n: Option<usize>) -> Self {
        self.num_threads = n;
        self
    }

    /// Run the pipeline and return the population with its death queue.
    ///
    /// The death queue is driven by kernel `K` and sized to exactly `count`.
    pub fn build<K: SiftKernel<u32>>(
        self,
        observer: &mut impl InitObserver,
    ) -> InitResult<InitializedPopulation<K>> {
        let count = self.count;
        if count == 0 || count > u32::MAX as usize {
            return Err(InitError::Config(format!(
                "agent count {count} outside 1..={}",
                u32::MAX
            )));
        }
        let pyramid = self
            .pyramid
            .ok_or_else(|| InitError::Config("no population pyramid supplied".into()))?;
        let mortality: Box<dyn MortalityModel> = match self.mortality {
            Some(m) => m,
            None => Box::new(SurvivalCurve::standard()?),
        };
        let predictor = Predictor::new(&*mortality, self.seed, self.num_threads)?;

        info!(count, seed = self.seed, kernel = K::NAME, bins = pyramid.len(), "initializing population");

        // ── ① Age bins and exact ages ─────────────────────────────────────
        let started = Instant::now();
        observer.on_phase_start(InitPhase::SampleAges, count);

        let sampler = BirthSampler::new(&pyramid)?;
        let mut root = SimRng::new(self.seed);
        let mut bin_rng = root.child(BIN_STREAM);
        let mut age_rng = root.child(AGE_STREAM);

        let bins = sampler.sample_bins(bin_rng.inner(), count);
        let ages = sampler.sample_ages(age_rng.inner(), &bins);
        drop(bins);

        observer.on_progress(InitPhase::SampleAges, count);
        end_phase(observer, InitPhase::SampleAges, started);

        // ── ② Dates of birth ──────────────────────────────────────────────
        let started = Instant::now();
        observer.on_phase_start(InitPhase::AssignBirthDates, count);

        let date_of_birth: Vec<Day> = ages.iter().map(|&age| BirthSampler::date_of_birth(age)).collect();

        observer.on_progress(InitPhase::AssignBirthDates, count);
        end_phase(observer, InitPhase::AssignBirthDates, started);

        // ── ③ Age at death ────────────────────────────────────────────────
        let started = Instant::now();
        observer.on_phase_start(InitPhase::PredictDeaths, count);

        let mut age_at_death: Vec<Day> = Vec::with_capacity(count);
        for (chunk, block) in ages.chunks(PROGRESS_CHUNK).enumerate() {
            predictor.extend(chunk * PROGRESS_CHUNK, block, &mut age_at_death);
            observer.on_progress(InitPhase::PredictDeaths, age_at_death.len());
        }

        end_phase(observer, InitPhase::PredictDeaths, started);

        // ── ④ + ⑤ Rebase on t = 0 and queue ───────────────────────────────
        let started = Instant::now();
        observer.on_phase_start(InitPhase::QueueDeaths, count);

        let mut deaths = PriorityQueue::<u32, K>::new(count);
        let mut date_of_death: Vec<Day> = Vec::with_capacity(count);
        for (i, (&age, &at_death)) in ages.iter().zip(&age_at_death).enumerate() {
            // Overflow means the death lies further back than any i32 day.
            let rebased = at_death.0.checked_sub(age.0).map(Day);
            let Some((dod, priority)) = rebased.and_then(|d| d.as_priority().map(|p| (d, p))) else {
                return Err(InitError::DeathBeforeStart {
                    agent: i as u32,
                    days:  rebased.map_or(i32::MAX, |d| d.0.saturating_neg()),
                });
            };
            deaths.push(i as u32, priority)?;
            date_of_death.push(dod);

            if (i + 1) % PROGRESS_CHUNK == 0 {
                observer.on_progress(InitPhase::QueueDeaths, i + 1);
            }
        }
        if count % PROGRESS_CHUNK != 0 {
            observer.on_progress(InitPhase::QueueDeaths, count);
        }

        end_phase(observer, InitPhase::QueueDeaths, started);

        if let Ok((agent, day)) = deaths.peek() {
            debug!(agent, day, "earliest scheduled death");
        }

        Ok(InitializedPopulation {
            population: Population { date_of_birth, date_of_death, count },
            deaths,
        })
    }
}

fn end_phase(observer: &mut impl InitObserver, phase: InitPhase, started: Instant) {
    let elapsed = started.elapsed();
    info!(%phase, elapsed_ms = elapsed.as_millis() as u64, "phase complete");
    observer.on_phase_end(phase, elapsed);
}

// ── Predictor ─────────────────────────────────────────────────────────────────

/// Runs the mortality model over batches of agents.
///
/// Each agent draws from its own [`AgentRng`], so the result for agent `i`
/// is the same whether the batch runs sequentially or on Rayon.
struct Predictor<'a> {
    model: &'a dyn MortalityModel,
    seed:  u64,
    #[cfg(feature = "parallel")]
    pool:  Option<rayon::ThreadPool>,
}

impl<'a> Predictor<'a> {
    fn new(model: &'a dyn MortalityModel, seed: u64, num_threads: Option<usize>) -> InitResult<Self> {
        #[cfg(feature = "parallel")]
        let pool = match num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| InitError::Config(format!("cannot start {n} worker threads: {e}")))?,
            ),
            None => None,
        };

        #[cfg(not(feature = "parallel"))]
        {
            if let Some(n) = num_threads {
                debug!(n, "num_threads ignored: built without the `parallel` feature");
            }
        }

        Ok(Self {
            model,
            seed,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    #[inline]
    fn predict(&self, index: usize, age: Day) -> Day {
        let mut rng = AgentRng::new(self.seed, AgentId(index as u32));
        self.model.predict_day_of_death(age, &mut rng)
    }

    /// Append the predicted age at death of agents `base..base + ages.len()`.
    fn extend(&self, base: usize, ages: &[Day], out: &mut Vec<Day>) {
        #[cfg(not(feature = "parallel"))]
        {
            out.extend(ages.iter().enumerate().map(|(i, &age)| self.predict(base + i, age)));
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = |out: &mut Vec<Day>| {
                out.par_extend(ages.par_iter().enumerate().map(|(i, &age)| self.predict(base + i, age)));
            };
            match &self.pool {
                Some(pool) => pool.install(|| run(out)),
                None => run(out),
            }
        }
    }
}
