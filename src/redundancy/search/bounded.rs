//! search::bounded — two-phase bracket-then-refine q7 optimization.
//!
//! Purpose
//! -------
//! Approach grid-search quality with far fewer oracle calls. Up to eight
//! discontinuous branches compete at each q7, so the objective is not
//! unimodal; a coarse sweep first picks the most promising region and only
//! then does a golden-section search refine inside it.
//!
//! Key behaviors
//! -------------
//! - Coarse phase: `n = min(coarse_samples, max_iterations)` evenly spaced
//!   samples (`n == 1` samples the midpoint, a degenerate interval is
//!   sampled once).
//! - Refinement: bracket `[q* − h, q* + h] ∩ [start, end]` around the best
//!   coarse sample `q*` (`h` = coarse spacing), searched with argmin's
//!   [`GoldenSectionSearch`] on the normalized coordinate of
//!   [`BracketObjective`].
//! - The reported result is the best candidate seen in *either* phase, so
//!   refinement can never make it worse than the coarse winner.
//!
//! Invariants & assumptions
//! ------------------------
//! - Oracle calls never exceed `max_iterations`: the coarse phase uses at
//!   most `n`, golden-section init at most 2, and each refinement iteration
//!   at most 1 (cache hits are free).
//! - Refinement is skipped when fewer than two calls remain or the bracket
//!   is already no wider than `tolerance`.
//! - On convergence the final golden-section bracket is narrower than
//!   `tolerance` in q7 units: argmin stops once
//!   `tol_t·(|t1| + |t2|) >= |t3 − t0|` and `|t1| + |t2| <= 4` on `[1, 2]`,
//!   so `tol_t = tolerance / (4·width)` bounds the q7 bracket by `tolerance`.
//! - No randomness anywhere: fixed inputs give bit-identical results apart
//!   from `elapsed`.
//!
//! Conventions
//! -----------
//! - `optimization_iterations` and `q7_values_tested` both report oracle
//!   calls actually made across the two phases.
//!
//! Feature flags
//! -------------
//! With `obs_slog` and `RefineOptions::verbose`, a one-time line reports the
//! seed and bracket, and a terminal slog observer logs every golden-section
//! iteration.
use std::{cell::RefCell, time::Instant};

use argmin::{
    core::{Executor, State},
    solver::goldensectionsearch::GoldenSectionSearch,
};

use crate::{
    kinematics::oracle::IkOracle,
    redundancy::{
        errors::IkResult,
        search::{
            evaluator::{Q7Evaluator, SearchProblem},
            objective::{BracketObjective, CachedSampler},
            outcome::{SearchResult, SearchStatus},
            range::{BoundedRange, RefineOptions},
        },
    },
};

/// bounded_search — coarse bracketing followed by golden-section refinement.
///
/// Parameters
/// ----------
/// - `problem`: oracle, target, reference poses, and weights.
/// - `range`: q7 interval, bracket tolerance, and oracle-call budget.
/// - `options`: coarse sample count and verbosity.
///
/// Returns
/// -------
/// The best branch seen in either phase, or `success == false` when the
/// coarse phase found no valid branch (refinement is not attempted then).
///
/// # Errors
/// - Range or option errors when either was assembled by hand with invalid
///   fields.
/// - Oracle failures and oracle contract violations
///   ([`IkError::Kinematics`](crate::redundancy::errors::IkError::Kinematics)).
/// - argmin backend errors mapped through `From<argmin::core::Error>`.
pub fn bounded_search<O: IkOracle + ?Sized>(
    problem: &SearchProblem<'_, O>, range: &BoundedRange, options: &RefineOptions,
) -> IkResult<SearchResult> {
    range.validate()?;
    options.validate()?;
    let started = Instant::now();
    let sampler = RefCell::new(CachedSampler::new(Q7Evaluator::new(problem)));

    let n = options.coarse_samples.min(range.max_iterations);
    for q7 in coarse_samples(range, n) {
        sampler.borrow_mut().score_at(q7)?;
    }

    let seed = sampler.borrow().evaluator().best_q7();
    let status = match seed {
        None => SearchStatus::NoValidBranch,
        Some(q_star) => refine(&sampler, range, options, q_star, coarse_spacing(range, n))?,
    };

    let eval = sampler.into_inner().into_evaluator();
    let calls = eval.oracle_calls();
    Ok(eval.into_result(status, calls, started.elapsed()))
}

// ---- Helper methods ----

/// Evenly spaced coarse samples over `[start, end]`.
fn coarse_samples(range: &BoundedRange, n: usize) -> Vec<f64> {
    let (start, end) = (range.start, range.end);
    if start == end {
        return vec![start];
    }
    if n == 1 {
        return vec![start + 0.5 * (end - start)];
    }
    let spacing = coarse_spacing(range, n);
    (0..n).map(|i| if i + 1 == n { end } else { start + i as f64 * spacing }).collect()
}

/// Half-width of the refinement bracket.
fn coarse_spacing(range: &BoundedRange, n: usize) -> f64 {
    let width = range.end - range.start;
    if n <= 1 { 0.5 * width } else { width / (n - 1) as f64 }
}

#[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
fn refine<O: IkOracle + ?Sized>(
    sampler: &RefCell<CachedSampler<'_, '_, O>>, range: &BoundedRange, options: &RefineOptions,
    q_star: f64, spacing: f64,
) -> IkResult<SearchStatus> {
    let lo = (q_star - spacing).max(range.start);
    let hi = (q_star + spacing).min(range.end);
    let width = hi - lo;
    let budget = range.max_iterations.saturating_sub(sampler.borrow().evaluator().oracle_calls());
    if budget < 2 || width <= range.tolerance {
        return Ok(SearchStatus::RefinementSkipped);
    }

    #[cfg(feature = "obs_slog")]
    if options.verbose {
        log_initial_state(sampler, q_star, lo, hi, budget);
    }

    let objective = BracketObjective::new(sampler, lo, hi, q_star);
    let seed_t = objective.seed_t();
    let solver = GoldenSectionSearch::new(1.0, 2.0)?.with_tolerance(range.tolerance / (4.0 * width))?;
    let max_iters = (budget - 2) as u64;

    let mut optimizer = Executor::new(objective, solver);
    optimizer = optimizer.configure(|state| state.param(seed_t).max_iters(max_iters));
    #[cfg(feature = "obs_slog")]
    if options.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let result = optimizer.run()?;
    Ok(SearchStatus::from_termination(result.state().get_termination_status()))
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<O: IkOracle + ?Sized>(
    sampler: &RefCell<CachedSampler<'_, '_, O>>, q_star: f64, lo: f64, hi: f64, budget: usize,
) {
    let score = sampler.borrow().evaluator().best_score().unwrap_or(f64::NEG_INFINITY);
    eprintln!(
        "init: q7* = {q_star:.6}, score = {score:.6}, bracket = [{lo:.6}, {hi:.6}], \
         oracle calls left = {budget}"
    );
}
