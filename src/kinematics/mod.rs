//! kinematics — data model and external collaborator seams.
//!
//! Purpose
//! -------
//! Hold everything the redundancy search needs to know about the robot
//! without knowing how its kinematics are computed: the target pose, joint
//! configurations, Jacobians, IK branches, and the traits through which an
//! analytic IK oracle and a forward-kinematics model are injected.
//!
//! Key behaviors
//! -------------
//! - Validated value types ([`Pose`], [`Jacobian`]) so the search can assume
//!   finite inputs.
//! - The [`IkOracle`] seam, consumed by both search strategies, and the
//!   [`ForwardKinematics`] seam, used only for post-solve verification.
//! - A single error surface ([`KinematicsError`]) for contract violations.
//!
//! Conventions
//! -----------
//! - Fixed dimensions: [`JOINT_COUNT`] joints, [`TASK_DIM`] task components,
//!   at most [`MAX_BRANCHES`] branches per q7.
//! - The closed-form IK equations themselves are out of scope; synthetic
//!   oracles in tests stand in for a real solver.

pub mod errors;
pub mod oracle;
pub mod types;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{KinResult, KinematicsError};
pub use self::oracle::{
    ForwardKinematics, IkOracle, PoseResidual, pose_residual, validate_branches,
};
pub use self::types::{
    Branch, JOINT_COUNT, Jacobian, JointAngles, MAX_BRANCHES, Orientation, Pose, Position,
    TASK_DIM,
};

pub mod prelude {
    pub use super::errors::{KinResult, KinematicsError};
    pub use super::oracle::{ForwardKinematics, IkOracle, pose_residual};
    pub use super::types::{Branch, Jacobian, JointAngles, Pose};
}
