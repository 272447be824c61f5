//! kinematics::oracle — injectable IK / FK collaborators and their contracts.
//!
//! Purpose
//! -------
//! Define the seams through which the redundancy search talks to the outside
//! world: an analytic inverse-kinematics oracle parameterized by q7, and an
//! optional forward-kinematics model used only for verification.
//!
//! Key behaviors
//! -------------
//! - [`IkOracle`]: `(pose, q7, want_jacobian) → 0..=8 branches`.
//! - [`validate_branches`]: structural checks on one oracle answer (branch
//!   count, slot range, unique slots) run by every strategy.
//! - [`ForwardKinematics`] and [`pose_residual`]: compare `fk(q)` against the
//!   target pose after a solve.
//!
//! Invariants & assumptions
//! ------------------------
//! - Oracles are pure from the caller's point of view: the same
//!   `(pose, q7, want_jacobian)` must produce the same branches. Concurrent
//!   use of one solver context additionally requires the oracle to be
//!   reentrant; the type system expresses that as `Sync`.
//! - Joint-limit violations are signaled by NaN joint entries, never by
//!   `Err`. `Err` is reserved for the oracle being unable to answer at all.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the structural validator and the residual helper with
//!   a closed-form FK fixture.
use crate::kinematics::{
    errors::{KinResult, KinematicsError},
    types::{Branch, JointAngles, MAX_BRANCHES, Pose},
};

/// Analytic IK oracle parameterized by the redundant joint q7.
///
/// Implementors return every branch slot they computed for `q7`, in slot
/// order. Branches violating joint limits keep their slot and carry NaN
/// joint entries. When `want_jacobian` is `true`, every branch without NaN
/// joints must carry its 6 × 7 Jacobian.
pub trait IkOracle {
    fn solve_branches(
        &self, target: &Pose, q7: f64, want_jacobian: bool,
    ) -> KinResult<Vec<Branch>>;
}

impl<T: IkOracle + ?Sized> IkOracle for &T {
    fn solve_branches(
        &self, target: &Pose, q7: f64, want_jacobian: bool,
    ) -> KinResult<Vec<Branch>> {
        (**self).solve_branches(target, q7, want_jacobian)
    }
}

/// Forward kinematics: joint angles → 4 × 4 homogeneous end-effector transform.
pub trait ForwardKinematics {
    fn forward(&self, joints: &JointAngles) -> [[f64; 4]; 4];
}

/// Validate the structure of one oracle answer.
///
/// Checks
/// ------
/// - at most [`MAX_BRANCHES`] branches,
/// - every slot index `< MAX_BRANCHES`,
/// - no slot index repeated.
///
/// # Errors
/// - [`KinematicsError::TooManyBranches`], [`KinematicsError::BranchIndexOutOfRange`],
///   or [`KinematicsError::DuplicateBranchIndex`], each tagged with `q7`.
pub fn validate_branches(branches: &[Branch], q7: f64) -> KinResult<()> {
    if branches.len() > MAX_BRANCHES {
        return Err(KinematicsError::TooManyBranches { q7, found: branches.len() });
    }
    let mut seen = [false; MAX_BRANCHES];
    for branch in branches {
        if branch.index >= MAX_BRANCHES {
            return Err(KinematicsError::BranchIndexOutOfRange { q7, index: branch.index });
        }
        if seen[branch.index] {
            return Err(KinematicsError::DuplicateBranchIndex { q7, index: branch.index });
        }
        seen[branch.index] = true;
    }
    Ok(())
}

/// Position and orientation mismatch between `fk(q)` and a target pose.
///
/// - `position_error`: Euclidean distance between translations.
/// - `orientation_error`: Frobenius norm of `R_fk − R_target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseResidual {
    pub position_error: f64,
    pub orientation_error: f64,
}

impl PoseResidual {
    /// `true` when both errors are at most `tol`.
    pub fn within(&self, tol: f64) -> bool {
        self.position_error <= tol && self.orientation_error <= tol
    }
}

/// Compare the forward kinematics of `joints` against `target`.
pub fn pose_residual<F: ForwardKinematics + ?Sized>(
    fk: &F, joints: &JointAngles, target: &Pose,
) -> PoseResidual {
    let t = fk.forward(joints);
    let position_error = (0..3)
        .map(|i| {
            let d = t[i][3] - target.position()[i];
            d * d
        })
        .sum::<f64>()
        .sqrt();
    let orientation_error = (0..3)
        .flat_map(|r| (0..3).map(move |c| (r, c)))
        .map(|(r, c)| {
            let d = t[r][c] - target.rotation(r, c);
            d * d
        })
        .sum::<f64>()
        .sqrt();
    PoseResidual { position_error, orientation_error }
}
