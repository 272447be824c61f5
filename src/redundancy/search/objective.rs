//! Adapter that exposes the q7 score as an `argmin` cost over a bracket.
//!
//! The bounded strategy *maximizes* the best branch score at q7, so the cost
//! is `c(t) = -score(q7(t))`, with `+inf` where no branch is valid. The
//! bracket `[lo, hi]` is reparameterized to `t ∈ [1, 2]`, which keeps
//! argmin's relative golden-section stopping rule meaningful for brackets
//! that straddle or sit near `q7 = 0`.
use std::{cell::RefCell, collections::HashMap};

use argmin::core::{CostFunction, Error};

use crate::{
    kinematics::{errors::KinResult, oracle::IkOracle},
    redundancy::search::evaluator::Q7Evaluator,
};

/// Memoizing front of a [`Q7Evaluator`]: each distinct q7 reaches the oracle
/// once per search.
pub(crate) struct CachedSampler<'p, 'a, O: ?Sized> {
    eval: Q7Evaluator<'p, 'a, O>,
    cache: HashMap<u64, Option<f64>>,
}

impl<'p, 'a, O: IkOracle + ?Sized> CachedSampler<'p, 'a, O> {
    pub(crate) fn new(eval: Q7Evaluator<'p, 'a, O>) -> Self {
        Self { eval, cache: HashMap::new() }
    }

    /// Best valid score at `q7`, from the cache when already sampled.
    pub(crate) fn score_at(&mut self, q7: f64) -> KinResult<Option<f64>> {
        // `+ 0.0` folds -0.0 into +0.0 so both share one key.
        let key = (q7 + 0.0).to_bits();
        if let Some(&score) = self.cache.get(&key) {
            return Ok(score);
        }
        let score = self.eval.evaluate(q7)?;
        self.cache.insert(key, score);
        Ok(score)
    }

    pub(crate) fn evaluator(&self) -> &Q7Evaluator<'p, 'a, O> {
        &self.eval
    }

    pub(crate) fn into_evaluator(self) -> Q7Evaluator<'p, 'a, O> {
        self.eval
    }
}

/// Bridges a [`CachedSampler`] to `argmin`'s `CostFunction` on `t ∈ [1, 2]`.
///
/// - `q7(t) = lo + (t − 1)·(hi − lo)`, clamped to `[lo, hi]`.
/// - The seed `t` maps back to the seed q7 bit-for-bit so it is served from
///   the cache.
pub(crate) struct BracketObjective<'s, 'p, 'a, O: ?Sized> {
    sampler: &'s RefCell<CachedSampler<'p, 'a, O>>,
    lo: f64,
    hi: f64,
    seed_t: f64,
    seed_q7: f64,
}

impl<'s, 'p, 'a, O: IkOracle + ?Sized> BracketObjective<'s, 'p, 'a, O> {
    /// Bracket `[lo, hi]` (with `lo < hi`) around `seed_q7 ∈ [lo, hi]`.
    pub(crate) fn new(
        sampler: &'s RefCell<CachedSampler<'p, 'a, O>>, lo: f64, hi: f64, seed_q7: f64,
    ) -> Self {
        let seed_t = (1.0 + (seed_q7 - lo) / (hi - lo)).clamp(1.0, 2.0);
        Self { sampler, lo, hi, seed_t, seed_q7 }
    }

    pub(crate) fn seed_t(&self) -> f64 {
        self.seed_t
    }

    /// Map a normalized coordinate back to q7.
    pub(crate) fn q7_at(&self, t: f64) -> f64 {
        if t == self.seed_t {
            return self.seed_q7;
        }
        (self.lo + (t - 1.0) * (self.hi - self.lo)).clamp(self.lo, self.hi)
    }
}

impl<'s, 'p, 'a, O: IkOracle + ?Sized> CostFunction for BracketObjective<'s, 'p, 'a, O> {
    type Param = f64;
    type Output = f64;

    /// Evaluate `c(t) = −score(q7(t))`, or `+inf` when no branch is valid.
    ///
    /// # Errors
    /// Propagates oracle failures and contract violations; they surface from
    /// the executor as [`IkError::Kinematics`](crate::redundancy::errors::IkError::Kinematics).
    fn cost(&self, t: &Self::Param) -> Result<Self::Output, Error> {
        let q7 = self.q7_at(*t);
        let score = self.sampler.borrow_mut().score_at(q7)?;
        Ok(score.map_or(f64::INFINITY, |s| -s))
    }
}
