//! scoring::score — manipulability, posture distances, and the weighted score.
//!
//! Purpose
//! -------
//! Turn one valid IK branch into a single real score so the search
//! strategies can rank branches across q7 samples. Higher is better.
//!
//! Key behaviors
//! -------------
//! - [`manipulability`]: Yoshikawa index `sqrt(det(J·Jᵀ))`, with a negative
//!   determinant (floating noise on near-singular J) clamped to zero.
//! - [`joint_distance`]: plain Euclidean norm of joint-angle differences.
//! - [`score_branch`]:
//!   `w_m·m − w_n·d_neutral/(7·2π) − w_c·d_current/(7·2π)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are a branch that passed the validity filter and a validated
//!   [`Jacobian`]; under those preconditions manipulability is finite and
//!   `>= 0`.
//! - Distances are not wrapped into (−π, π]; a joint near ±π compared with
//!   a reference on the other side reports the long way round.
//! - [`JOINT_RANGE_NORMALIZER`] is shared by every strategy so grid and
//!   bounded scores are directly comparable.
//!
//! Conventions
//! -----------
//! - `J·Jᵀ` is formed with `ndarray`; the 6 × 6 determinant is taken with
//!   `nalgebra` after copying into a `DMatrix`.
//! - [`BranchScore`] reports the raw (unnormalized) distances; only the
//!   score uses the normalized ones.
//!
//! Testing notes
//! -------------
//! - Unit tests check the index on diagonal Jacobians with known
//!   determinants, the zero clamp on rank-deficient Jacobians, and the
//!   sign/monotonicity of each weight's contribution.
use std::f64::consts::TAU;

use nalgebra::DMatrix;
use ndarray::Array2;

use crate::{
    kinematics::types::{JOINT_COUNT, Jacobian, JointAngles, TASK_DIM},
    redundancy::scoring::weights::WeightConfig,
};

/// Heuristic joint-range normalization: 7 joints × 2π.
pub const JOINT_RANGE_NORMALIZER: f64 = JOINT_COUNT as f64 * TAU;

/// Score of one branch together with its component metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchScore {
    pub score: f64,
    pub manipulability: f64,
    /// Unnormalized distance to the neutral pose (radians).
    pub neutral_distance: f64,
    /// Unnormalized distance to the current pose (radians).
    pub current_distance: f64,
}

/// manipulability — Yoshikawa index of a 6 × 7 Jacobian.
///
/// Returns `sqrt(det(J·Jᵀ))`, or `0.0` when the determinant is not strictly
/// positive (rank deficiency plus rounding can push it slightly below 0).
pub fn manipulability(jacobian: &Jacobian) -> f64 {
    let det = gram_determinant(jacobian);
    if det > 0.0 { det.sqrt() } else { 0.0 }
}

/// Euclidean norm of `a − b` over all joints.
pub fn joint_distance(a: &JointAngles, b: &JointAngles) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

/// score_branch — weighted multi-objective score of one valid branch.
///
/// Parameters
/// ----------
/// - `joints`: branch configuration (no NaN entries).
/// - `jacobian`: the branch's Jacobian.
/// - `neutral`, `current`: reference postures.
/// - `weights`: objective weights.
///
/// Returns
/// -------
/// [`BranchScore`] with the score and the three component metrics.
pub fn score_branch(
    joints: &JointAngles, jacobian: &Jacobian, neutral: &JointAngles, current: &JointAngles,
    weights: &WeightConfig,
) -> BranchScore {
    let manipulability = manipulability(jacobian);
    let neutral_distance = joint_distance(joints, neutral);
    let current_distance = joint_distance(joints, current);
    let score = weights.manipulability * manipulability
        - weights.neutral * (neutral_distance / JOINT_RANGE_NORMALIZER)
        - weights.current * (current_distance / JOINT_RANGE_NORMALIZER);
    BranchScore { score, manipulability, neutral_distance, current_distance }
}

// ---- Helper methods ----

/// `det(J·Jᵀ)` as computed in floating point; may dip below zero.
fn gram_determinant(jacobian: &Jacobian) -> f64 {
    let j = jacobian.as_array();
    let jjt = j.dot(&j.t());
    let mut jjt_nalg = DMatrix::<f64>::zeros(TASK_DIM, TASK_DIM);
    fill_dmatrix(&jjt, &mut jjt_nalg);
    jjt_nalg.determinant()
}

/// Copy a dense `ndarray` matrix into a preallocated `DMatrix` of equal shape.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for ((i, j), &value) in src.indexed_iter() {
        dst[(i, j)] = value;
    }
}
