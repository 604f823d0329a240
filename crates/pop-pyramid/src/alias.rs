//! `AliasedDistribution` — O(1) categorical sampling (Vose's alias method).
//!
//! # How it works
//!
//! With `n` categories and total weight `W`, picture `n` columns each of
//! height `W`.  Category `i` contributes `w_i * n` units of height.  Setup
//! fills every column to exactly `W` using at most two categories: the
//! column's own (`threshold[i]` units) and one donor (`alias[i]`).
//!
//! A draw picks a column uniformly, then a height uniformly in `0..W`:
//!
//! ```text
//! i = uniform(0..n)
//! h = uniform(0..W)
//! result = if h < threshold[i] { i } else { alias[i] }
//! ```
//!
//! All arithmetic is integer, so the table reproduces the weights exactly
//! (no floating-point probability drift) and a zero-weight category can
//! never be drawn.

use rand::Rng;

use crate::{PyramidError, PyramidResult};

/// Precomputed alias table over integer weights.
#[derive(Debug, Clone)]
pub struct AliasedDistribution {
    /// Units of column `i` that belong to category `i`; in `0..=total`.
    threshold: Vec<u64>,
    /// Donor category filling the rest of column `i`.
    alias:     Vec<usize>,
    total:     u64,
}

impl AliasedDistribution {
    /// Build the alias table for `weights`.
    ///
    /// Fails if the weights are empty, sum to zero, or overflow `u64`.
    pub fn new(weights: &[u64]) -> PyramidResult<Self> {
        if weights.is_empty() {
            return Err(PyramidError::Empty);
        }
        let total = weights
            .iter()
            .try_fold(0u64, |acc, &w| acc.checked_add(w))
            .ok_or(PyramidError::WeightOverflow)?;
        if total == 0 {
            return Err(PyramidError::ZeroTotal);
        }

        let n = weights.len();
        let column = total as u128;
        // Scaled heights: w_i * n.  u128 so the product cannot overflow.
        let mut height: Vec<u128> = weights.iter().map(|&w| w as u128 * n as u128).collect();

        let mut small: Vec<usize> = Vec::with_capacity(n);
        let mut large: Vec<usize> = Vec::with_capacity(n);
        for (i, &h) in height.iter().enumerate() {
            if h < column { small.push(i) } else { large.push(i) }
        }

        let mut threshold = vec![total; n];
        let mut alias: Vec<usize> = (0..n).collect();

        while let (Some(&s), Some(&g)) = (small.last(), large.last()) {
            small.pop();
            large.pop();

            threshold[s] = height[s] as u64;
            alias[s] = g;

            height[g] -= column - height[s];
            if height[g] < column { small.push(g) } else { large.push(g) }
        }

        // Leftovers are exactly full columns.
        for i in small.into_iter().chain(large) {
            threshold[i] = total;
            alias[i] = i;
        }

        Ok(Self { threshold, alias, total })
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.threshold.len()
    }

    /// Always `false`: construction rejects empty weight vectors.
    pub fn is_empty(&self) -> bool {
        self.threshold.is_empty()
    }

    /// Sum of the original weights.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Draw one category index.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let i = rng.gen_range(0..self.threshold.len());
        let h = rng.gen_range(0..self.total);
        if h < self.threshold[i] { i } else { self.alias[i] }
    }

    /// Draw `count` independent category indices.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<usize> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}
