//! search::outcome — the record returned by every q7 search.
//!
//! Purpose
//! -------
//! Carry the selected configuration, its score and component metrics, and
//! the diagnostics of the run that produced it.
//!
//! Key behaviors
//! -------------
//! - [`SearchResult::empty`] is the "nothing found yet" state: `success`
//!   false, score `-inf`, zeroed configuration and metrics.
//! - [`SearchStatus`] says how a strategy stopped, folding argmin's
//!   termination status into crate terms for the bounded strategy.
//!
//! Invariants & assumptions
//! ------------------------
//! - `success == true` implies a finite score, a NaN-free configuration,
//!   `branch_index.is_some()` and `jacobian.is_some()`.
//! - `success == false` implies `score == -inf`; the remaining selection
//!   fields keep their zeroed values and must not be interpreted.
//! - Every field except `diagnostics.elapsed` is a deterministic function
//!   of the search inputs.
use std::time::Duration;

use argmin::core::{TerminationReason, TerminationStatus};

use crate::kinematics::types::{JOINT_COUNT, Jacobian, JointAngles};

/// How a search stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// The grid strategy visited every sample.
    Exhaustive,
    /// Refinement shrank the bracket below the tolerance.
    Converged,
    /// The oracle-call budget ran out during refinement.
    BudgetExhausted,
    /// The coarse bracket was already within tolerance, or fewer than two
    /// oracle calls were left after the coarse phase.
    RefinementSkipped,
    /// No valid branch was seen, so nothing was refined.
    NoValidBranch,
    /// Refinement stopped for a backend reason not listed above.
    Stopped(String),
}

impl SearchStatus {
    /// Map argmin's termination status after a refinement run.
    pub(crate) fn from_termination(status: &TerminationStatus) -> Self {
        match status {
            TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
                SearchStatus::Converged
            }
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                SearchStatus::BudgetExhausted
            }
            other => SearchStatus::Stopped(format!("{other:?}")),
        }
    }
}

/// Per-run counters.
///
/// - `total_solutions_found`: branches returned by the oracle, valid or not.
/// - `valid_solutions_count`: branches that passed the validity filter.
/// - `q7_values_tested`: oracle calls made.
/// - `optimization_iterations`: oracle calls made by the bounded strategy
///   (coarse plus refinement); `0` for the grid strategy.
/// - `elapsed`: wall-clock time of the search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDiagnostics {
    pub total_solutions_found: usize,
    pub valid_solutions_count: usize,
    pub q7_values_tested: usize,
    pub optimization_iterations: usize,
    pub elapsed: Duration,
    pub status: SearchStatus,
}

/// SearchResult — best branch found over a q7 range.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub success: bool,
    pub joint_angles: JointAngles,
    pub q7: f64,
    pub score: f64,
    pub manipulability: f64,
    pub neutral_distance: f64,
    pub current_distance: f64,
    pub branch_index: Option<usize>,
    pub jacobian: Option<Jacobian>,
    pub diagnostics: SearchDiagnostics,
}

impl SearchResult {
    /// A result with nothing selected and zeroed counters.
    pub fn empty(status: SearchStatus) -> Self {
        Self {
            success: false,
            joint_angles: [0.0; JOINT_COUNT],
            q7: 0.0,
            score: f64::NEG_INFINITY,
            manipulability: 0.0,
            neutral_distance: 0.0,
            current_distance: 0.0,
            branch_index: None,
            jacobian: None,
            diagnostics: SearchDiagnostics {
                total_solutions_found: 0,
                valid_solutions_count: 0,
                q7_values_tested: 0,
                optimization_iterations: 0,
                elapsed: Duration::ZERO,
                status,
            },
        }
    }
}
