//! search::grid — exhaustive fixed-step q7 sweep.
//!
//! Calls the oracle once per grid sample, in increasing q7 order, and keeps
//! the best-scoring valid branch. Exhaustive at the chosen resolution: an
//! optimum wider than `step` cannot be missed. Oracle calls equal
//! [`GridRange::sample_count`] exactly.
//!
//! With the `obs_slog` feature and `verbose`, a header (target, range,
//! weights) is written to stderr before the sweep and a summary of the
//! result after it. Logging never changes the result.
use std::time::Instant;

use crate::{
    kinematics::oracle::IkOracle,
    redundancy::{
        errors::IkResult,
        search::{
            evaluator::{Q7Evaluator, SearchProblem},
            outcome::{SearchResult, SearchStatus},
            range::GridRange,
        },
    },
};

/// grid_search — best branch over every sample of `range`.
///
/// Returns `success == false` (score `-inf`) when no sample produced a valid
/// branch; that is not an error.
///
/// # Errors
/// - Range errors when `range` was assembled by hand with invalid fields.
/// - Oracle failures and oracle contract violations, surfaced as
///   [`IkError::Kinematics`](crate::redundancy::errors::IkError::Kinematics).
#[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
pub fn grid_search<O: IkOracle + ?Sized>(
    problem: &SearchProblem<'_, O>, range: &GridRange, verbose: bool,
) -> IkResult<SearchResult> {
    range.validate()?;
    #[cfg(feature = "obs_slog")]
    if verbose {
        eprintln!("{}", sweep_header(problem, range));
    }

    let started = Instant::now();
    let mut eval = Q7Evaluator::new(problem);
    for q7 in range.samples() {
        eval.evaluate(q7)?;
    }
    let status =
        if eval.best_q7().is_some() { SearchStatus::Exhaustive } else { SearchStatus::NoValidBranch };
    let result = eval.into_result(status, 0, started.elapsed());

    #[cfg(feature = "obs_slog")]
    if verbose {
        eprintln!("{}", sweep_summary(&result));
    }
    Ok(result)
}

// ---- Helper methods ----

#[cfg(feature = "obs_slog")]
fn sweep_header<O: IkOracle + ?Sized>(problem: &SearchProblem<'_, O>, range: &GridRange) -> String {
    let [x, y, z] = *problem.target.position();
    let w = problem.weights;
    format!(
        "grid sweep: target = [{x:.6}, {y:.6}, {z:.6}], q7 = [{:.6}, {:.6}] step {} \
         ({} samples), weights = (manip {}, neutral {}, current {})",
        range.start,
        range.end,
        range.step,
        range.sample_count(),
        w.manipulability,
        w.neutral,
        w.current
    )
}

#[cfg(feature = "obs_slog")]
fn sweep_summary(result: &SearchResult) -> String {
    let d = &result.diagnostics;
    let selection = match result.branch_index {
        Some(index) => format!(
            "q7* = {:.6}, branch = {index}, score = {:.6}, manipulability = {:.6}",
            result.q7, result.score, result.manipulability
        ),
        None => "no valid branch".to_string(),
    };
    format!(
        "grid done: {selection}; q7 tested = {}, branches = {} ({} valid), elapsed = {} us",
        d.q7_values_tested,
        d.total_solutions_found,
        d.valid_solutions_count,
        d.elapsed.as_micros()
    )
}
