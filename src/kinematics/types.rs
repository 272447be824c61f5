//! kinematics::types — poses, joint configurations, Jacobians, and branches.
//!
//! Purpose
//! -------
//! Centralize the data model shared by the oracle seam and the redundancy
//! search: the target [`Pose`], 7-joint configurations ([`JointAngles`]),
//! the task-space [`Jacobian`], and a single analytic IK [`Branch`].
//!
//! Key behaviors
//! -------------
//! - Validate target poses on construction (finite position and rotation).
//! - Validate Jacobians on construction (shape 6 × 7, finite entries) and
//!   accept the per-joint 7 × 6 layout through [`Jacobian::from_joint_rows`].
//! - Keep [`Branch`] a plain record; validity (NaN joints) is decided by the
//!   scoring layer, not here.
//!
//! Invariants & assumptions
//! ------------------------
//! - Orientation is a 3 × 3 rotation stored row-major in 9 entries, as the
//!   oracle expects it. Orthonormality is the caller's responsibility; only
//!   finiteness is enforced.
//! - Jacobians are stored task-major: row `r` is a task-space velocity
//!   component (3 linear + 3 angular), column `j` is joint `j`.
//! - A NaN joint angle in a [`Branch`] is the oracle's joint-limit sentinel.
//!
//! Conventions
//! -----------
//! - Angles are radians, positions are meters (whatever unit the oracle
//!   uses; the search never mixes the two).
//! - Branch indices are the oracle's slot indices `0..MAX_BRANCHES`.
use ndarray::Array2;

use crate::kinematics::errors::{KinResult, KinematicsError};

/// Number of joints of the manipulator.
pub const JOINT_COUNT: usize = 7;

/// Number of task-space velocity components (3 linear + 3 angular).
pub const TASK_DIM: usize = 6;

/// Maximum number of analytic branches per q7 sample.
pub const MAX_BRANCHES: usize = 8;

/// One joint configuration in radians. NaN entries mark joint-limit violations.
pub type JointAngles = [f64; JOINT_COUNT];

/// End-effector position `[x, y, z]`.
pub type Position = [f64; 3];

/// 3 × 3 rotation matrix, row-major.
pub type Orientation = [f64; 9];

/// Target end-effector pose: position plus row-major rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    position: Position,
    orientation: Orientation,
}

impl Pose {
    /// Build a validated pose.
    ///
    /// # Errors
    /// - [`KinematicsError::InvalidPosition`] for a non-finite position entry.
    /// - [`KinematicsError::InvalidOrientation`] for a non-finite rotation entry.
    pub fn new(position: Position, orientation: Orientation) -> KinResult<Self> {
        for (index, &value) in position.iter().enumerate() {
            if !value.is_finite() {
                return Err(KinematicsError::InvalidPosition { index, value });
            }
        }
        for (index, &value) in orientation.iter().enumerate() {
            if !value.is_finite() {
                return Err(KinematicsError::InvalidOrientation { index, value });
            }
        }
        Ok(Self { position, orientation })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Row-major rotation matrix entries.
    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    /// Rotation entry at `(row, col)`, both in `0..3`.
    pub fn rotation(&self, row: usize, col: usize) -> f64 {
        self.orientation[row * 3 + col]
    }
}

/// Jacobian — validated 6 × 7 task-space Jacobian of one branch.
///
/// Purpose
/// -------
/// Wrap an `ndarray` matrix so downstream scoring can assume the shape and
/// finiteness invariants without rechecking.
///
/// Invariants
/// ----------
/// - `shape == (TASK_DIM, JOINT_COUNT)`.
/// - Every entry is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Jacobian(Array2<f64>);

impl Jacobian {
    /// Validate and wrap a task-major `6 × 7` matrix.
    ///
    /// # Errors
    /// - [`KinematicsError::JacobianShapeMismatch`] for any other shape.
    /// - [`KinematicsError::NonFiniteJacobian`] for the first non-finite entry.
    pub fn new(matrix: Array2<f64>) -> KinResult<Self> {
        if matrix.dim() != (TASK_DIM, JOINT_COUNT) {
            return Err(KinematicsError::JacobianShapeMismatch {
                expected: (TASK_DIM, JOINT_COUNT),
                found: matrix.dim(),
            });
        }
        for ((row, col), &value) in matrix.indexed_iter() {
            if !value.is_finite() {
                return Err(KinematicsError::NonFiniteJacobian { row, col, value });
            }
        }
        Ok(Self(matrix))
    }

    /// Build from the per-joint layout `rows[joint][component]` (7 × 6),
    /// transposing into the task-major storage.
    ///
    /// # Errors
    /// - [`KinematicsError::NonFiniteJacobian`] reported in task-major
    ///   coordinates.
    pub fn from_joint_rows(rows: &[[f64; TASK_DIM]; JOINT_COUNT]) -> KinResult<Self> {
        let matrix = Array2::from_shape_fn((TASK_DIM, JOINT_COUNT), |(r, j)| rows[j][r]);
        Self::new(matrix)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.0
    }
}

/// Branch — one closed-form IK solution returned by the oracle for one q7.
///
/// Fields
/// ------
/// - `index`: oracle slot `0..MAX_BRANCHES`.
/// - `joints`: joint angles, possibly NaN-flagged.
/// - `jacobian`: present when the oracle was asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub index: usize,
    pub joints: JointAngles,
    pub jacobian: Option<Jacobian>,
}

impl Branch {
    pub fn new(index: usize, joints: JointAngles, jacobian: Option<Jacobian>) -> Self {
        Self { index, joints, jacobian }
    }

    /// Assemble a branch from unvalidated oracle output.
    ///
    /// A slot with any NaN joint is a joint-limit violation and is never
    /// scored, so its matrix is dropped without inspection (oracles commonly
    /// fill it with NaN as well). Otherwise a `7 × 6` per-joint matrix is
    /// transposed to task-major and the result goes through
    /// [`Jacobian::new`].
    ///
    /// # Errors
    /// - [`KinematicsError::JacobianShapeMismatch`] or
    ///   [`KinematicsError::NonFiniteJacobian`] for a NaN-free slot whose
    ///   matrix is malformed.
    pub fn from_raw_parts(
        index: usize, joints: JointAngles, jacobian: Option<Array2<f64>>,
    ) -> KinResult<Self> {
        if joints.iter().any(|q| q.is_nan()) {
            return Ok(Self::new(index, joints, None));
        }
        let jacobian = match jacobian {
            Some(matrix) if matrix.dim() == (JOINT_COUNT, TASK_DIM) => {
                Some(Jacobian::new(matrix.reversed_axes().as_standard_layout().into_owned())?)
            }
            Some(matrix) => Some(Jacobian::new(matrix)?),
            None => None,
        };
        Ok(Self::new(index, joints, jacobian))
    }
}
