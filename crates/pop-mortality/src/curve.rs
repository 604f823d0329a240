//! Kaplan–Meier style survival curve over whole years of age.
//!
//! # Representation
//!
//! `cumulative_deaths[y]` is the number of members of a notional birth cohort
//! who died before their `(y + 1)`-th birthday.  The table is non-decreasing
//! and its last entry is the cohort size: everyone is dead by the end of
//! year `max_year`.
//!
//! ```text
//! year:              0      1      2    ...   100
//! cumulative_deaths: 560    600    625  ...   100000
//! ```
//!
//! The members still alive at the start of year `a` are exactly the draws in
//! `cumulative_deaths[a-1] .. cohort`; mapping a uniform draw from that range
//! back through the table yields a year of death conditioned on surviving to
//! age `a`.

use rand::Rng;

use pop_core::{DAYS_PER_YEAR, Day};

use crate::{MortalityError, MortalityResult};

// ── GompertzMakeham ───────────────────────────────────────────────────────────

/// Parametric hazard `μ(x) = lambda + alpha * exp(beta * x)` (x in years).
///
/// Survival to age `x` is `S(x) = exp(-lambda*x - alpha/beta * (exp(beta*x) - 1))`.
/// The defaults give a rough modern high-income profile: under 1 % of
/// deaths before 30, median age at death in the low 80s.  Load a real
/// life table with [`crate::load_life_table_csv`] for production runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GompertzMakeham {
    /// Age-independent background hazard.
    pub lambda: f64,
    /// Senescent hazard at age 0.
    pub alpha:  f64,
    /// Exponential rate at which senescent hazard grows per year.
    pub beta:   f64,
}

impl Default for GompertzMakeham {
    fn default() -> Self {
        Self { lambda: 5.0e-4, alpha: 5.5e-5, beta: 0.085 }
    }
}

impl GompertzMakeham {
    /// Probability of surviving from birth to exact age `years`.
    pub fn survival(&self, years: f64) -> f64 {
        let senescent = self.alpha / self.beta * ((self.beta * years).exp() - 1.0);
        (-self.lambda * years - senescent).exp()
    }

    fn validate(&self) -> MortalityResult<()> {
        let ok = |v: f64| v.is_finite() && v >= 0.0;
        if !(ok(self.lambda) && ok(self.alpha) && ok(self.beta)) || self.beta == 0.0 {
            return Err(MortalityError::InvalidTable(format!(
                "Gompertz–Makeham parameters must be finite and non-negative with beta > 0: {self:?}"
            )));
        }
        Ok(())
    }
}

// ── SurvivalCurve ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurvivalCurve {
    cumulative_deaths: Vec<u32>,
}

impl SurvivalCurve {
    /// Wrap a cumulative-deaths table.
    ///
    /// Fails if the table is empty, decreasing anywhere, or ends at zero.
    pub fn from_cumulative(cumulative_deaths: Vec<u32>) -> MortalityResult<Self> {
        let Some(&cohort) = cumulative_deaths.last() else {
            return Err(MortalityError::InvalidTable("empty table".into()));
        };
        if cohort == 0 {
            return Err(MortalityError::InvalidTable("cohort has no deaths".into()));
        }
        if let Some(y) = cumulative_deaths.windows(2).position(|w| w[1] < w[0]) {
            return Err(MortalityError::InvalidTable(format!(
                "cumulative deaths decrease between year {y} ({}) and year {} ({})",
                cumulative_deaths[y],
                y + 1,
                cumulative_deaths[y + 1]
            )));
        }
        Ok(Self { cumulative_deaths })
    }

    /// Build a table of `max_year + 1` years for a cohort of `cohort` people
    /// from a parametric hazard.  Anyone surviving past `max_year` is counted
    /// as dying in `max_year`.
    pub fn gompertz_makeham(
        params:   GompertzMakeham,
        max_year: u32,
        cohort:   u32,
    ) -> MortalityResult<Self> {
        params.validate()?;
        let mut table: Vec<u32> = (0..=max_year)
            .map(|y| {
                let dead = (1.0 - params.survival(f64::from(y) + 1.0)) * f64::from(cohort);
                dead.round().clamp(0.0, f64::from(cohort)) as u32
            })
            .collect();
        if let Some(last) = table.last_mut() {
            *last = cohort;
        }
        Self::from_cumulative(table)
    }

    /// The default curve: [`GompertzMakeham::default`] over 0..=100 years for
    /// a cohort of 100 000.
    pub fn standard() -> MortalityResult<Self> {
        Self::gompertz_makeham(GompertzMakeham::default(), 100, 100_000)
    }

    /// Last year of age covered by the table.
    pub fn max_year(&self) -> u32 {
        (self.cumulative_deaths.len() - 1) as u32
    }

    /// Size of the notional cohort.
    pub fn cohort(&self) -> u32 {
        self.cumulative_deaths[self.cumulative_deaths.len() - 1]
    }

    pub fn cumulative_deaths(&self) -> &[u32] {
        &self.cumulative_deaths
    }

    /// Cohort members dead before reaching `age_years`.
    fn dead_before(&self, age_years: u32) -> u32 {
        match age_years {
            0 => 0,
            a => self.cumulative_deaths[(a as usize - 1).min(self.cumulative_deaths.len() - 1)],
        }
    }

    /// Cohort members alive at the start of year `age_years`.
    pub fn survivors_at(&self, age_years: u32) -> u32 {
        self.cohort() - self.dead_before(age_years)
    }

    /// Year of age in which someone now `age_years` old will die.
    ///
    /// Always `>= age_years`.  Ages past the end of the table, or at which
    /// the table has no survivors left, die within their current year.
    pub fn predicted_year_of_death<R: Rng + ?Sized>(&self, age_years: u32, rng: &mut R) -> u32 {
        if age_years > self.max_year() {
            return age_years;
        }
        let dead = self.dead_before(age_years);
        let cohort = self.cohort();
        if dead >= cohort {
            return age_years;
        }
        let draw = rng.gen_range(dead..cohort);
        // First year whose cumulative deaths exceed the draw.
        self.cumulative_deaths.partition_point(|&c| c <= draw) as u32
    }

    /// Age in days at which someone now `age` days old will die.
    ///
    /// Picks the year with [`predicted_year_of_death`](Self::predicted_year_of_death),
    /// then a uniform day in that year.  A death in the current year falls in
    /// `[age, end of year)`, so the result is never earlier than `age`.
    /// Negative ages are treated as age 0.  The year containing `i32::MAX`
    /// is cut short at that day.
    pub fn predicted_day_of_death<R: Rng + ?Sized>(&self, age: Day, rng: &mut R) -> Day {
        let age_days = age.0.max(0);
        let age_years = (age_days / DAYS_PER_YEAR) as u32;
        let year = self.predicted_year_of_death(age_years, rng);

        let start = Day::from_years(year).0;
        let lo = if year == age_years { age_days } else { start };
        let last = start.saturating_add(DAYS_PER_YEAR - 1);
        Day(rng.gen_range(lo..=last))
    }
}
