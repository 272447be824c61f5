//! Integration tests for weighted q7 redundancy resolution.
//!
//! Purpose
//! -------
//! - Validate the end-to-end flow: target pose and reference postures in,
//!   selected branch and diagnostics out, through the public
//!   `SolverContext` API only.
//! - Compare the grid and bounded strategies on the same problems.
//!
//! Coverage
//! --------
//! - `redundancy::solver`: `solve`, `solve_optimized`, `weighted_ik_q7`.
//! - `redundancy::search`: call counts, determinism, the all-invalid case,
//!   and error propagation out of the argmin refinement loop.
//! - Continuity along a short trajectory where each result becomes the next
//!   current posture.
//!
//! Exclusions
//! ----------
//! - Closed-form IK of a real arm; a synthetic, deterministic oracle with
//!   joint limits, several branches, and smooth Jacobians stands in.
//! - Python bindings.
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use ndarray::Array2;
use weighted_ik::{
    kinematics::{
        Branch, IkOracle, JOINT_COUNT, Jacobian, JointAngles, KinResult, KinematicsError, Pose,
        TASK_DIM,
    },
    redundancy::{
        BoundedRange, DEFAULT_NEUTRAL_POSE, GridRange, IkError, RefineOptions, SearchResult,
        SearchStatus, SolverContext, WeightConfig, WeightedIkRequest,
        search::DEFAULT_COARSE_SAMPLES, weighted_ik_q7,
    },
};

/// Absolute joint limits (radians) of the synthetic arm.
const LIMITS: [f64; JOINT_COUNT] = [2.8973, 1.7628, 2.8973, 3.0718, 2.8973, 3.7525, 2.8973];

/// Purpose
/// -------
/// Deterministic stand-in for a closed-form 7-DOF IK solver.
///
/// Behavior
/// --------
/// - Four branch slots (0, 1, 4, 6) whose joints are smooth functions of the
///   target position and q7, mirrored by two sign choices.
/// - A branch outside `LIMITS` keeps its slot but is NaN-flagged.
/// - Jacobians are diagonally dominant and vary smoothly with the joints.
/// - Counts calls atomically, so it is reentrant.
struct SyntheticArm {
    calls: AtomicUsize,
}

impl SyntheticArm {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IkOracle for SyntheticArm {
    fn solve_branches(
        &self, target: &Pose, q7: f64, want_jacobian: bool,
    ) -> KinResult<Vec<Branch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let [x, y, z] = *target.position();
        let reach = (x * x + y * y).sqrt();
        let mut out = Vec::new();
        for (slot, a, b) in [(0, 1.0, 1.0), (1, 1.0, -1.0), (4, -1.0, 1.0), (6, -1.0, -1.0)] {
            let q: JointAngles = [
                y.atan2(x) + 0.3 * a * q7.sin(),
                a * (0.4 + 0.2 * z) - 0.6 * q7,
                b * 0.5 * q7.cos(),
                -1.2 - 0.3 * reach + 0.1 * b * q7,
                b * 0.25 * (2.0 * q7).sin(),
                1.5 + 0.2 * a * q7,
                q7,
            ];
            if q.iter().zip(LIMITS.iter()).any(|(v, lim)| v.abs() > *lim) {
                out.push(Branch::new(slot, [f64::NAN; JOINT_COUNT], None));
                continue;
            }
            let jacobian = if want_jacobian { Some(jacobian_for(&q, slot)?) } else { None };
            out.push(Branch::new(slot, q, jacobian));
        }
        Ok(out)
    }
}

fn jacobian_for(q: &JointAngles, slot: usize) -> KinResult<Jacobian> {
    Jacobian::new(Array2::from_shape_fn((TASK_DIM, JOINT_COUNT), |(r, c)| {
        if r == c {
            1.0 + 0.3 * (q[c] + 0.5 * slot as f64).cos()
        } else {
            0.05 * (q[c] * (r + 1) as f64).sin()
        }
    }))
}

/// Purpose
/// -------
/// Single-branch oracle with a smooth, unimodal score in q7.
///
/// Manipulability is `(1 + exp(−4 (q7 − 0.8)²))⁶`; only joint 6 moves, so
/// with zero posture weights the optimum sits exactly at q7 = 0.8.
struct SmoothArm {
    calls: AtomicUsize,
}

impl IkOracle for SmoothArm {
    fn solve_branches(&self, _: &Pose, q7: f64, _: bool) -> KinResult<Vec<Branch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gain = 1.0 + (-4.0 * (q7 - 0.8).powi(2)).exp();
        let jac = Jacobian::new(Array2::from_shape_fn((TASK_DIM, JOINT_COUNT), |(r, c)| {
            if r == c { gain } else { 0.0 }
        }))?;
        let mut q = DEFAULT_NEUTRAL_POSE;
        q[6] = q7;
        Ok(vec![Branch::new(3, q, Some(jac))])
    }
}

/// Every branch is out of limits for every q7.
struct LockedArm;

impl IkOracle for LockedArm {
    fn solve_branches(&self, _: &Pose, _: f64, _: bool) -> KinResult<Vec<Branch>> {
        Ok((0..8).map(|slot| Branch::new(slot, [f64::NAN; JOINT_COUNT], None)).collect())
    }
}

/// Delegates to `SyntheticArm` for the first `healthy_calls` calls, then
/// fails.
struct FlakyArm {
    inner: SyntheticArm,
    healthy_calls: usize,
}

impl IkOracle for FlakyArm {
    fn solve_branches(
        &self, target: &Pose, q7: f64, want_jacobian: bool,
    ) -> KinResult<Vec<Branch>> {
        if self.inner.calls() >= self.healthy_calls {
            return Err(KinematicsError::OracleFailure { q7, text: "solver timed out".into() });
        }
        self.inner.solve_branches(target, q7, want_jacobian)
    }
}

fn golden_target() -> Pose {
    Pose::new(
        [0.23189, -0.0815989, 0.607269],
        [
            -0.189536, 0.0420467, -0.980973, 0.404078, -0.907217, -0.116958, -0.894873,
            -0.418557, 0.15496,
        ],
    )
    .expect("finite pose")
}

const GOLDEN_CURRENT: JointAngles = [-1.5, 0.5, 1.5, -1.5, 0.5, 0.5, 1.5];

fn context<O: IkOracle>(oracle: O) -> SolverContext<O> {
    SolverContext::new(oracle, DEFAULT_NEUTRAL_POSE, WeightConfig::default(), false)
        .expect("valid context")
}

fn without_timing(mut res: SearchResult) -> SearchResult {
    res.diagnostics.elapsed = Duration::ZERO;
    res
}

#[test]
// Purpose
// -------
// Reference scenario: default weights, q7 ∈ [0.3, 0.5] at step 0.01.
//
// Given
// -----
// - The reference target pose and current posture.
//
// Expect
// ------
// - success, finite score, NaN-free joints, q7 inside the range.
// - 21 oracle calls; valid <= total <= 8·21; a branch index and Jacobian.
fn golden_case_returns_finite_solution() {
    // Arrange
    let ctx = context(SyntheticArm::new());
    let range = GridRange::new(0.3, 0.5, 0.01).expect("valid range");

    // Act
    let res = ctx.solve(&golden_target(), &GOLDEN_CURRENT, &range).expect("solve ok");

    // Assert
    assert!(res.success);
    assert!(res.score.is_finite());
    assert!(res.joint_angles.iter().all(|q| !q.is_nan()));
    assert!((0.3..=0.5).contains(&res.q7));
    assert_eq!(res.diagnostics.q7_values_tested, 21);
    assert_eq!(ctx.oracle().calls(), 21);
    let d = &res.diagnostics;
    assert!(d.valid_solutions_count <= d.total_solutions_found);
    assert!(d.total_solutions_found <= 8 * 21);
    assert!(res.branch_index.is_some() && res.jacobian.is_some());
    assert!(res.manipulability > 0.0);
}

#[test]
// Purpose
// -------
// The grid strategy calls the oracle exactly floor((end − start)/step) + 1
// times.
//
// Given
// -----
// - Ranges [0.3, 0.5]/0.001, [-1, 1]/0.1, [0.4, 0.4]/0.1, [-2.5, 2.5]/0.25.
//
// Expect
// ------
// - 201, 21, 1, and 21 oracle calls respectively.
fn grid_oracle_calls_follow_sample_count() {
    for (start, end, step, expected) in
        [(0.3, 0.5, 0.001, 201), (-1.0, 1.0, 0.1, 21), (0.4, 0.4, 0.1, 1), (-2.5, 2.5, 0.25, 21)]
    {
        // Arrange
        let ctx = context(SyntheticArm::new());
        let range = GridRange::new(start, end, step).expect("valid range");

        // Act
        let res = ctx.solve(&golden_target(), &GOLDEN_CURRENT, &range).expect("solve ok");

        // Assert
        assert_eq!(ctx.oracle().calls(), expected, "range [{start}, {end}] / {step}");
        assert_eq!(res.diagnostics.q7_values_tested, expected);
    }
}

#[test]
// Purpose
// -------
// Repeated calls with identical inputs are bit-identical apart from timing,
// for both strategies, and the one-shot helper agrees with the context.
//
// Given
// -----
// - One context; each strategy run twice on the same inputs.
//
// Expect
// ------
// - Equal results after zeroing `elapsed`.
fn repeated_solves_are_identical() {
    // Arrange
    let ctx = context(SyntheticArm::new());
    let grid = GridRange::new(-2.0, 2.0, 0.02).expect("valid");
    let bounded = BoundedRange::with_bounds(-2.0, 2.0).expect("valid");
    let target = golden_target();
    let request = WeightedIkRequest {
        target,
        neutral: DEFAULT_NEUTRAL_POSE,
        current: GOLDEN_CURRENT,
        range: grid,
        weights: WeightConfig::default(),
        verbose: false,
    };

    // Act
    let g1 = without_timing(ctx.solve(&target, &GOLDEN_CURRENT, &grid).expect("ok"));
    let g2 = without_timing(ctx.solve(&target, &GOLDEN_CURRENT, &grid).expect("ok"));
    let b1 = without_timing(ctx.solve_optimized(&target, &GOLDEN_CURRENT, &bounded).expect("ok"));
    let b2 = without_timing(ctx.solve_optimized(&target, &GOLDEN_CURRENT, &bounded).expect("ok"));
    let one_shot = without_timing(weighted_ik_q7(SyntheticArm::new(), &request).expect("ok"));

    // Assert
    assert_eq!(g1, g2);
    assert_eq!(b1, b2);
    assert_eq!(g1, one_shot);
}

#[test]
// Purpose
// -------
// When every branch violates joint limits the call still succeeds and
// reports "no solution".
//
// Given
// -----
// - An oracle that NaN-flags all 8 slots; both strategies.
//
// Expect
// ------
// - `success == false`, score -inf, zero valid branches, no error.
fn all_branches_out_of_limits_is_not_an_error() {
    // Arrange
    let ctx = context(LockedArm);
    let grid = GridRange::new(-1.0, 1.0, 0.1).expect("valid");
    let bounded = BoundedRange::with_bounds(-1.0, 1.0).expect("valid");

    // Act
    let g = ctx.solve(&golden_target(), &GOLDEN_CURRENT, &grid).expect("no error");
    let b = ctx.solve_optimized(&golden_target(), &GOLDEN_CURRENT, &bounded).expect("no error");

    // Assert
    for res in [&g, &b] {
        assert!(!res.success);
        assert_eq!(res.score, f64::NEG_INFINITY);
        assert_eq!(res.diagnostics.valid_solutions_count, 0);
        assert_eq!(res.diagnostics.status, SearchStatus::NoValidBranch);
    }
    assert_eq!(g.diagnostics.total_solutions_found, 8 * 21);
}

#[test]
// Purpose
// -------
// On a smooth unimodal objective the bounded strategy matches a fine grid
// with two orders of magnitude fewer oracle calls.
//
// Given
// -----
// - `SmoothArm` (optimum at q7 = 0.8), manipulability-only weights.
// - Grid [-2.8, 2.8] at step 0.001; bounded with tolerance 1e-6 and the
//   default budget.
//
// Expect
// ------
// - bounded score >= grid score − 1e-6; |q7 − 0.8| < 1e-4.
// - Bounded uses at most 50 calls versus 5601 for the grid.
fn bounded_matches_fine_grid_with_far_fewer_calls() {
    // Arrange
    let weights = WeightConfig::new(1.0, 0.0, 0.0).expect("valid");
    let grid_ctx = SolverContext::new(
        SmoothArm { calls: AtomicUsize::new(0) },
        DEFAULT_NEUTRAL_POSE,
        weights,
        false,
    )
    .expect("valid");
    let bounded_ctx = SolverContext::new(
        SmoothArm { calls: AtomicUsize::new(0) },
        DEFAULT_NEUTRAL_POSE,
        weights,
        false,
    )
    .expect("valid");
    let grid = GridRange::new(-2.8, 2.8, 0.001).expect("valid");
    let bounded = BoundedRange::new(-2.8, 2.8, 1e-6, 50).expect("valid");

    // Act
    let g = grid_ctx.solve(&golden_target(), &GOLDEN_CURRENT, &grid).expect("ok");
    let b = bounded_ctx.solve_optimized(&golden_target(), &GOLDEN_CURRENT, &bounded).expect("ok");

    // Assert
    assert!(b.success && g.success);
    assert!(b.score >= g.score - 1e-6, "bounded {} vs grid {}", b.score, g.score);
    assert!((b.q7 - 0.8).abs() < 1e-4, "q7 = {}", b.q7);
    assert_eq!(g.diagnostics.q7_values_tested, 5601);
    assert!(b.diagnostics.q7_values_tested <= 50);
    assert_eq!(b.diagnostics.optimization_iterations, b.diagnostics.q7_values_tested);
}

#[test]
// Purpose
// -------
// With branch switching, the bounded result is never worse than the coarse
// grid it starts from.
//
// Given
// -----
// - `SyntheticArm` over [-2.8, 2.8]; bounded with 9 coarse samples
//   (spacing 0.7) versus a grid at step 0.7 over the same range.
//
// Expect
// ------
// - Both succeed; bounded score >= coarse grid score; bounded stays within
//   its budget and the range.
fn bounded_never_worse_than_its_coarse_grid() {
    // Arrange
    let nine = RefineOptions::new(9, false).expect("valid");
    let ctx = context(SyntheticArm::new()).with_refine_options(nine);
    let coarse = GridRange::new(-2.8, 2.8, 0.7).expect("valid");
    let bounded = BoundedRange::with_bounds(-2.8, 2.8).expect("valid");

    // Act
    let g = ctx.solve(&golden_target(), &GOLDEN_CURRENT, &coarse).expect("ok");
    let b = ctx.solve_optimized(&golden_target(), &GOLDEN_CURRENT, &bounded).expect("ok");

    // Assert
    assert!(g.success && b.success);
    assert_eq!(g.diagnostics.q7_values_tested, 9);
    assert!(b.score >= g.score - 1e-12, "bounded {} vs coarse {}", b.score, g.score);
    assert!(b.diagnostics.q7_values_tested <= 50);
    assert!((-2.8..=2.8).contains(&b.q7));
}

#[test]
// Purpose
// -------
// Default bounded settings stay within about thirty oracle calls over the
// full q7 range.
//
// Given
// -----
// - `SyntheticArm` over [-2.8, 2.8] with default tolerance, budget, and
//   coarse samples.
//
// Expect
// ------
// - success; at most 30 oracle calls, all reported as optimization
//   iterations.
fn default_bounded_search_is_call_frugal() {
    // Arrange
    let arm = SyntheticArm::new();
    let ctx = context(&arm);
    let bounded = BoundedRange::with_bounds(-2.8, 2.8).expect("valid");

    // Act
    let b = ctx.solve_optimized(&golden_target(), &GOLDEN_CURRENT, &bounded).expect("ok");

    // Assert
    assert!(b.success);
    assert!(arm.calls() <= 30, "oracle calls = {}", arm.calls());
    assert_eq!(b.diagnostics.q7_values_tested, arm.calls());
    assert_eq!(b.diagnostics.optimization_iterations, arm.calls());
}

#[test]
// Purpose
// -------
// Malformed requests are rejected before any oracle call.
//
// Given
// -----
// - start > end, zero step, non-positive tolerance, zero budget, ranges
//   assembled field by field, and a NaN current posture passed to a live
//   context.
//
// Expect
// ------
// - The matching `IkError` variant each time; the oracle is never called.
fn malformed_requests_never_reach_the_oracle() {
    // Arrange
    let ctx = context(SyntheticArm::new());
    let mut nan_current = GOLDEN_CURRENT;
    nan_current[2] = f64::NAN;
    let valid_grid = GridRange::new(0.0, 1.0, 0.1).expect("valid");
    let valid_bounded = BoundedRange::with_bounds(0.0, 1.0).expect("valid");

    // Act / Assert
    assert!(matches!(GridRange::new(0.5, 0.3, 0.01), Err(IkError::InvalidBounds { .. })));
    assert!(matches!(GridRange::new(0.3, 0.5, 0.0), Err(IkError::InvalidStep { .. })));
    assert!(matches!(
        BoundedRange::new(0.3, 0.5, 0.0, 50),
        Err(IkError::InvalidTolerance { .. })
    ));
    assert!(matches!(
        BoundedRange::new(0.3, 0.5, 1e-6, 0),
        Err(IkError::InvalidMaxIterations { .. })
    ));
    let hand_built = GridRange { start: 0.5, end: 0.3, step: 0.01 };
    assert!(matches!(
        ctx.solve(&golden_target(), &GOLDEN_CURRENT, &hand_built),
        Err(IkError::InvalidBounds { .. })
    ));
    let hand_bounded = BoundedRange { tolerance: -1.0, ..valid_bounded };
    assert!(matches!(
        ctx.solve_optimized(&golden_target(), &GOLDEN_CURRENT, &hand_bounded),
        Err(IkError::InvalidTolerance { .. })
    ));
    assert!(matches!(
        ctx.solve(&golden_target(), &nan_current, &valid_grid),
        Err(IkError::InvalidReferencePose { which: "current", index: 2, .. })
    ));
    assert_eq!(ctx.oracle().calls(), 0);
}

#[test]
// Purpose
// -------
// Along a short trajectory, feeding each result back as the current posture
// keeps successive solutions at least as close as ignoring continuity.
//
// Given
// -----
// - Five targets moving along a small arc.
// - Context A with default weights (w_c = 2), context B with w_c = 0; both
//   receive the same `current` at every step (A's previous result).
//
// Expect
// ------
// - Every step succeeds and A's current distance <= B's (up to 1e-12).
fn continuity_weight_keeps_trajectory_close() {
    // Arrange
    let with_continuity = context(SyntheticArm::new());
    let without_continuity = SolverContext::new(
        SyntheticArm::new(),
        DEFAULT_NEUTRAL_POSE,
        WeightConfig::new(1.0, 0.5, 0.0).expect("valid"),
        false,
    )
    .expect("valid");
    let range = GridRange::new(-2.5, 2.5, 0.05).expect("valid");
    let base = golden_target();
    let mut current = GOLDEN_CURRENT;

    for k in 0..5 {
        let angle = 0.05 * k as f64;
        let [x, y, z] = *base.position();
        let target = Pose::new(
            [x * angle.cos() - y * angle.sin(), x * angle.sin() + y * angle.cos(), z],
            *base.orientation(),
        )
        .expect("finite");

        // Act
        let a = with_continuity.solve(&target, &current, &range).expect("ok");
        let b = without_continuity.solve(&target, &current, &range).expect("ok");

        // Assert
        assert!(a.success && b.success, "step {k}");
        assert!(
            a.current_distance <= b.current_distance + 1e-12,
            "step {k}: {} > {}",
            a.current_distance,
            b.current_distance
        );
        current = a.joint_angles;
    }
}

#[test]
// Purpose
// -------
// An oracle failure raised inside the golden-section refinement comes back
// out of argmin as the original kinematics error.
//
// Given
// -----
// - An oracle that answers the default coarse samples, then fails.
//
// Expect
// ------
// - `IkError::Kinematics(OracleFailure { .. })` from `solve_optimized`.
fn oracle_failure_during_refinement_is_recovered() {
    // Arrange
    let ctx = context(FlakyArm { inner: SyntheticArm::new(), healthy_calls: DEFAULT_COARSE_SAMPLES });
    let bounded = BoundedRange::with_bounds(-2.8, 2.8).expect("valid");

    // Act
    let err = ctx.solve_optimized(&golden_target(), &GOLDEN_CURRENT, &bounded).unwrap_err();

    // Assert
    assert!(
        matches!(err, IkError::Kinematics(KinematicsError::OracleFailure { .. })),
        "unexpected error: {err:?}"
    );
}
