//! Validity filter for oracle branches and reference-pose checks.
//!
//! A branch is usable iff none of its joint angles is the NaN joint-limit
//! sentinel. This is the oracle's only per-branch failure channel; filtered
//! branches are skipped silently and never reach the score function.
use crate::{
    kinematics::types::{Branch, JointAngles},
    redundancy::errors::{IkError, IkResult},
};

/// `true` iff no joint angle is NaN.
#[inline]
pub fn is_valid_configuration(joints: &JointAngles) -> bool {
    !joints.iter().any(|q| q.is_nan())
}

/// `true` iff the branch's joint configuration passes [`is_valid_configuration`].
#[inline]
pub fn is_valid_branch(branch: &Branch) -> bool {
    is_valid_configuration(&branch.joints)
}

/// Reject a neutral/current reference pose with any non-finite joint.
///
/// # Errors
/// - [`IkError::InvalidReferencePose`] with `which` ("neutral" or "current")
///   and the first offending joint.
pub fn validate_reference_pose(which: &'static str, joints: &JointAngles) -> IkResult<()> {
    for (index, &value) in joints.iter().enumerate() {
        if !value.is_finite() {
            return Err(IkError::InvalidReferencePose { which, index, value });
        }
    }
    Ok(())
}
