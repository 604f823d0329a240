//! `BirthSampler` — turns a [`Pyramid`] into exact ages and dates of birth.

use rand::Rng;

use pop_core::Day;

use crate::{AliasedDistribution, Pyramid, PyramidResult};

/// Two-stage age sampler: age bin first, then a uniform day within the bin.
///
/// For bin `i` the age in days is drawn from
/// `[min_age * 365, (max_age + 1) * 365)`: the youngest day of the bin is
/// included, the first day of the next bin is not.
#[derive(Debug, Clone)]
pub struct BirthSampler {
    bins:    AliasedDistribution,
    /// Inclusive lower bound per bin, in days.
    min_day: Vec<i32>,
    /// Exclusive upper bound per bin, in days.
    lim_day: Vec<i32>,
}

impl BirthSampler {
    pub fn new(pyramid: &Pyramid) -> PyramidResult<Self> {
        let bins = AliasedDistribution::new(&pyramid.weights())?;
        let min_day = pyramid
            .bins()
            .iter()
            .map(|b| Day::from_years(b.min_age).0)
            .collect();
        let lim_day = pyramid
            .bins()
            .iter()
            .map(|b| Day::from_years(b.max_age + 1).0)
            .collect();
        Ok(Self { bins, min_day, lim_day })
    }

    /// Draw `count` age-bin indices.
    pub fn sample_bins<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<usize> {
        self.bins.sample_n(rng, count)
    }

    /// Draw an exact age (in days) uniformly within `bin`.
    ///
    /// # Panics
    /// Panics if `bin` is not an index into the pyramid's bins.
    #[inline]
    pub fn sample_age<R: Rng + ?Sized>(&self, rng: &mut R, bin: usize) -> Day {
        Day(rng.gen_range(self.min_day[bin]..self.lim_day[bin]))
    }

    /// Draw exact ages for a sequence of previously sampled bins.
    pub fn sample_ages<R: Rng + ?Sized>(&self, rng: &mut R, bins: &[usize]) -> Vec<Day> {
        bins.iter().map(|&b| self.sample_age(rng, b)).collect()
    }

    /// The date of birth of an agent aged `age` at t = 0.
    #[inline]
    pub fn date_of_birth(age: Day) -> Day {
        -age
    }
}
