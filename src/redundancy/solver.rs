//! redundancy::solver — reusable solver context and one-shot entry point.
//!
//! Purpose
//! -------
//! Bundle the parts of a weighted q7 search that stay fixed across many
//! targets (the IK oracle, the neutral posture, the weights, and the
//! refinement options) so a moving robot can re-solve successive targets,
//! feeding each result back as the next "current" posture.
//!
//! Key behaviors
//! -------------
//! - [`SolverContext::solve`]: grid strategy over a [`GridRange`].
//! - [`SolverContext::solve_optimized`]: bounded strategy over a
//!   [`BoundedRange`].
//! - [`weighted_ik_q7`]: build a context for a single grid solve.
//!
//! Invariants & assumptions
//! ------------------------
//! - The neutral pose is validated once at construction; the current pose is
//!   validated on every call before the first oracle call.
//! - Both solve methods take `&self` and mutate nothing, so a context can be
//!   shared across threads whenever its oracle is `Sync` (i.e. reentrant).
//!
//! Downstream usage
//! ----------------
//! ```ignore
//! let ctx = SolverContext::new(oracle, DEFAULT_NEUTRAL_POSE, WeightConfig::default(), false)?;
//! let mut current = start_pose;
//! for target in trajectory {
//!     let res = ctx.solve_optimized(&target, &current, &BoundedRange::with_bounds(-2.9, 2.9)?)?;
//!     if res.success { current = res.joint_angles; }
//! }
//! ```
use crate::{
    kinematics::{
        oracle::IkOracle,
        types::{JointAngles, Pose},
    },
    redundancy::{
        errors::IkResult,
        scoring::{validity::validate_reference_pose, weights::WeightConfig},
        search::{
            bounded::bounded_search,
            evaluator::SearchProblem,
            grid::grid_search,
            outcome::SearchResult,
            range::{BoundedRange, GridRange, RefineOptions},
        },
    },
};

/// Neutral posture used by the reference setup of the 7-DOF arm (radians).
pub const DEFAULT_NEUTRAL_POSE: JointAngles = [0.0, 0.0, 0.0, -1.5, 0.0, 1.86, 0.0];

/// SolverContext — oracle, neutral posture, weights, and refinement options.
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct SolverContext<O> {
    oracle: O,
    neutral: JointAngles,
    weights: WeightConfig,
    refine: RefineOptions,
}

impl<O: IkOracle> SolverContext<O> {
    /// Build a context with default refinement options and the given
    /// verbosity.
    ///
    /// # Errors
    /// - [`IkError::InvalidReferencePose`](crate::redundancy::errors::IkError::InvalidReferencePose)
    ///   when `neutral` holds a non-finite joint.
    pub fn new(
        oracle: O, neutral: JointAngles, weights: WeightConfig, verbose: bool,
    ) -> IkResult<Self> {
        validate_reference_pose("neutral", &neutral)?;
        let refine = RefineOptions { verbose, ..RefineOptions::default() };
        Ok(Self { oracle, neutral, weights, refine })
    }

    /// Replace the refinement options used by [`Self::solve_optimized`].
    pub fn with_refine_options(mut self, refine: RefineOptions) -> Self {
        self.refine = refine;
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn neutral(&self) -> &JointAngles {
        &self.neutral
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    pub fn refine_options(&self) -> &RefineOptions {
        &self.refine
    }

    /// Grid search over `range` for `target`, scoring continuity against
    /// `current`. A verbose context logs the sweep header and summary when
    /// built with `obs_slog`.
    ///
    /// # Errors
    /// - `InvalidReferencePose` for a non-finite `current` (no oracle call).
    /// - Oracle failures and contract violations.
    pub fn solve(
        &self, target: &Pose, current: &JointAngles, range: &GridRange,
    ) -> IkResult<SearchResult> {
        let problem = self.problem(target, current)?;
        grid_search(&problem, range, self.refine.verbose)
    }

    /// Bounded two-phase search over `range`.
    ///
    /// # Errors
    /// - `InvalidReferencePose` for a non-finite `current` (no oracle call).
    /// - Oracle failures, contract violations, and argmin backend errors.
    pub fn solve_optimized(
        &self, target: &Pose, current: &JointAngles, range: &BoundedRange,
    ) -> IkResult<SearchResult> {
        let problem = self.problem(target, current)?;
        bounded_search(&problem, range, &self.refine)
    }

    fn problem<'a>(
        &'a self, target: &'a Pose, current: &'a JointAngles,
    ) -> IkResult<SearchProblem<'a, O>> {
        SearchProblem::new(&self.oracle, target, &self.neutral, current, &self.weights)
    }
}

/// WeightedIkRequest — every input of a one-shot grid solve.
///
/// `verbose` turns on the sweep header and summary of [`grid_search`]
/// (effective with the `obs_slog` feature).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedIkRequest {
    pub target: Pose,
    pub neutral: JointAngles,
    pub current: JointAngles,
    pub range: GridRange,
    pub weights: WeightConfig,
    pub verbose: bool,
}

/// weighted_ik_q7 — one grid solve without keeping a context around.
///
/// # Errors
/// Same as [`SolverContext::new`] followed by [`SolverContext::solve`].
pub fn weighted_ik_q7<O: IkOracle>(
    oracle: O, request: &WeightedIkRequest,
) -> IkResult<SearchResult> {
    let ctx = SolverContext::new(oracle, request.neutral, request.weights, request.verbose)?;
    ctx.solve(&request.target, &request.current, &request.range)
}
