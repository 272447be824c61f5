//! search::evaluator — one q7 sample: oracle call, filter, score, track best.
//!
//! Purpose
//! -------
//! Hold the per-call inputs of a search ([`SearchProblem`]) and the mutable
//! bookkeeping both strategies share: the best candidate so far and the
//! diagnostic counters. Strategies differ only in *which* q7 values they
//! feed to [`Q7Evaluator::evaluate`].
//!
//! Key behaviors
//! -------------
//! - Always requests Jacobians, validates the oracle answer's structure, and
//!   drops NaN-flagged branches before scoring.
//! - A valid branch without a Jacobian aborts the search with
//!   [`KinematicsError::MissingJacobian`].
//! - Candidate ranking: higher score wins; ties go to the lower q7, then the
//!   lower branch index. The selected branch therefore does not depend on
//!   the order in which samples or branches are visited.
//!
//! Invariants & assumptions
//! ------------------------
//! - Reference poses are validated once in [`SearchProblem::new`].
//! - A candidate is only accepted with a score strictly above `-inf`; NaN
//!   scores never win.
//! - Counters are monotone and count exactly what the oracle returned.
use std::time::Duration;

use crate::{
    kinematics::{
        errors::{KinResult, KinematicsError},
        oracle::{IkOracle, validate_branches},
        types::{Jacobian, JointAngles, Pose},
    },
    redundancy::{
        errors::IkResult,
        scoring::{
            score::{BranchScore, score_branch},
            validity::{is_valid_branch, validate_reference_pose},
            weights::WeightConfig,
        },
        search::outcome::{SearchResult, SearchStatus},
    },
};

/// SearchProblem — borrowed inputs of one search.
///
/// Fields
/// ------
/// - `oracle`: IK oracle queried once per distinct q7.
/// - `target`: end-effector pose.
/// - `neutral`, `current`: finite reference postures.
/// - `weights`: score weights.
pub struct SearchProblem<'a, O: ?Sized> {
    pub(crate) oracle: &'a O,
    pub(crate) target: &'a Pose,
    pub(crate) neutral: &'a JointAngles,
    pub(crate) current: &'a JointAngles,
    pub(crate) weights: &'a WeightConfig,
}

impl<'a, O: IkOracle + ?Sized> SearchProblem<'a, O> {
    /// # Errors
    /// - [`IkError::InvalidReferencePose`](crate::redundancy::errors::IkError::InvalidReferencePose)
    ///   when `neutral` or `current` holds a non-finite joint.
    pub fn new(
        oracle: &'a O, target: &'a Pose, neutral: &'a JointAngles, current: &'a JointAngles,
        weights: &'a WeightConfig,
    ) -> IkResult<Self> {
        validate_reference_pose("neutral", neutral)?;
        validate_reference_pose("current", current)?;
        Ok(Self { oracle, target, neutral, current, weights })
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    q7: f64,
    index: usize,
    joints: JointAngles,
    jacobian: Jacobian,
    metrics: BranchScore,
}

impl Candidate {
    fn beats(&self, incumbent: &Candidate) -> bool {
        if self.metrics.score != incumbent.metrics.score {
            return self.metrics.score > incumbent.metrics.score;
        }
        (self.q7, self.index) < (incumbent.q7, incumbent.index)
    }
}

/// Q7Evaluator — shared sampling state of one search run.
pub(crate) struct Q7Evaluator<'p, 'a, O: ?Sized> {
    problem: &'p SearchProblem<'a, O>,
    best: Option<Candidate>,
    total_solutions_found: usize,
    valid_solutions_count: usize,
    oracle_calls: usize,
}

impl<'p, 'a, O: IkOracle + ?Sized> Q7Evaluator<'p, 'a, O> {
    pub(crate) fn new(problem: &'p SearchProblem<'a, O>) -> Self {
        Self {
            problem,
            best: None,
            total_solutions_found: 0,
            valid_solutions_count: 0,
            oracle_calls: 0,
        }
    }

    /// Query the oracle at `q7` and fold every valid branch into the tracker.
    ///
    /// Returns the best score among the valid branches at this q7, or `None`
    /// when none survives the filter.
    ///
    /// # Errors
    /// - Oracle failures and structural violations from
    ///   [`validate_branches`].
    /// - [`KinematicsError::MissingJacobian`] for a valid branch without one.
    pub(crate) fn evaluate(&mut self, q7: f64) -> KinResult<Option<f64>> {
        self.oracle_calls += 1;
        let branches = self.problem.oracle.solve_branches(self.problem.target, q7, true)?;
        validate_branches(&branches, q7)?;
        self.total_solutions_found += branches.len();

        let mut best_here: Option<f64> = None;
        for branch in branches {
            if !is_valid_branch(&branch) {
                continue;
            }
            self.valid_solutions_count += 1;
            let jacobian = branch
                .jacobian
                .ok_or(KinematicsError::MissingJacobian { q7, index: branch.index })?;
            let metrics = score_branch(
                &branch.joints,
                &jacobian,
                self.problem.neutral,
                self.problem.current,
                self.problem.weights,
            );
            if metrics.score > best_here.unwrap_or(f64::NEG_INFINITY) {
                best_here = Some(metrics.score);
            }
            self.offer(Candidate { q7, index: branch.index, joints: branch.joints, jacobian, metrics });
        }
        Ok(best_here)
    }

    /// q7 of the best candidate so far.
    pub(crate) fn best_q7(&self) -> Option<f64> {
        self.best.as_ref().map(|c| c.q7)
    }

    #[cfg(feature = "obs_slog")]
    pub(crate) fn best_score(&self) -> Option<f64> {
        self.best.as_ref().map(|c| c.metrics.score)
    }

    pub(crate) fn oracle_calls(&self) -> usize {
        self.oracle_calls
    }

    /// Freeze the tracker into a [`SearchResult`].
    pub(crate) fn into_result(
        self, status: SearchStatus, optimization_iterations: usize, elapsed: Duration,
    ) -> SearchResult {
        let mut result = SearchResult::empty(status);
        if let Some(best) = self.best {
            result.success = true;
            result.joint_angles = best.joints;
            result.q7 = best.q7;
            result.score = best.metrics.score;
            result.manipulability = best.metrics.manipulability;
            result.neutral_distance = best.metrics.neutral_distance;
            result.current_distance = best.metrics.current_distance;
            result.branch_index = Some(best.index);
            result.jacobian = Some(best.jacobian);
        }
        let diagnostics = &mut result.diagnostics;
        diagnostics.total_solutions_found = self.total_solutions_found;
        diagnostics.valid_solutions_count = self.valid_solutions_count;
        diagnostics.q7_values_tested = self.oracle_calls;
        diagnostics.optimization_iterations = optimization_iterations;
        diagnostics.elapsed = elapsed;
        result
    }

    // ---- Helper methods ----

    fn offer(&mut self, candidate: Candidate) {
        let score = candidate.metrics.score;
        if score.is_nan() || score == f64::NEG_INFINITY {
            return;
        }
        if self.best.as_ref().is_none_or(|incumbent| candidate.beats(incumbent)) {
            self.best = Some(candidate);
        }
    }
}
