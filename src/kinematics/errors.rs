//! kinematics::errors — oracle-contract and pose-validation errors.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for everything that crosses the
//! kinematics boundary: target poses handed to the search, and branches
//! handed back by an [`IkOracle`](crate::kinematics::oracle::IkOracle).
//!
//! Key behaviors
//! -------------
//! - Define [`KinResult`] and [`KinematicsError`] as the canonical result and
//!   error types for pose construction and oracle-output validation.
//! - Attach human-readable `Display` messages that embed the offending value.
//! - Implement `From<KinematicsError> for PyErr` behind `python-bindings`.
//!
//! Invariants & assumptions
//! ------------------------
//! - A branch with NaN joint angles is **not** an error; it is the oracle's
//!   joint-limit signal and is filtered by the search layer. Only violations
//!   of the oracle's structural contract (branch count, index range, Jacobian
//!   shape/finiteness) are reported here.
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` messages embed their payloads.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for kinematics-level operations.
pub type KinResult<T> = Result<T, KinematicsError>;

/// KinematicsError — malformed poses and oracle contract violations.
///
/// Variants
/// --------
/// - `InvalidPosition` / `InvalidOrientation`: a target pose entry is
///   non-finite.
/// - `OracleFailure`: the oracle itself reported a failure at `q7`.
/// - `TooManyBranches`: more than [`MAX_BRANCHES`](crate::kinematics::types::MAX_BRANCHES)
///   branches were returned for a single q7.
/// - `BranchIndexOutOfRange`: a branch carried an index outside `0..8`.
/// - `DuplicateBranchIndex`: two branches at the same q7 share an index.
/// - `MissingJacobian`: a valid branch was returned without the Jacobian
///   that was requested.
/// - `JacobianShapeMismatch` / `NonFiniteJacobian`: the Jacobian is not a
///   finite 6 × 7 matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    // ---- Pose ----
    InvalidPosition { index: usize, value: f64 },
    InvalidOrientation { index: usize, value: f64 },

    // ---- Oracle output ----
    OracleFailure { q7: f64, text: String },
    TooManyBranches { q7: f64, found: usize },
    BranchIndexOutOfRange { q7: f64, index: usize },
    DuplicateBranchIndex { q7: f64, index: usize },
    MissingJacobian { q7: f64, index: usize },
    JacobianShapeMismatch { expected: (usize, usize), found: (usize, usize) },
    NonFiniteJacobian { row: usize, col: usize, value: f64 },
}

impl std::error::Error for KinematicsError {}

impl std::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KinematicsError::InvalidPosition { index, value } => {
                write!(f, "Invalid target position at index {index}: {value}, must be finite")
            }
            KinematicsError::InvalidOrientation { index, value } => {
                write!(f, "Invalid target orientation at index {index}: {value}, must be finite")
            }
            KinematicsError::OracleFailure { q7, text } => {
                write!(f, "IK oracle failed at q7 = {q7}: {text}")
            }
            KinematicsError::TooManyBranches { q7, found } => {
                write!(f, "IK oracle returned {found} branches at q7 = {q7}, at most 8 allowed")
            }
            KinematicsError::BranchIndexOutOfRange { q7, index } => {
                write!(f, "IK oracle returned branch index {index} at q7 = {q7}, must be < 8")
            }
            KinematicsError::DuplicateBranchIndex { q7, index } => {
                write!(f, "IK oracle returned branch index {index} twice at q7 = {q7}")
            }
            KinematicsError::MissingJacobian { q7, index } => {
                write!(f, "IK oracle omitted the Jacobian of branch {index} at q7 = {q7}")
            }
            KinematicsError::JacobianShapeMismatch { expected, found } => {
                write!(f, "Jacobian shape mismatch: expected {expected:?}, found {found:?}")
            }
            KinematicsError::NonFiniteJacobian { row, col, value } => {
                write!(f, "Invalid Jacobian entry at ({row}, {col}): {value}, must be finite")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<KinematicsError> for PyErr {
    fn from(err: KinematicsError) -> PyErr {
        PyValueError::new_err(format!("KinematicsError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that oracle failures keep both the q7 sample and the oracle's
    // own message in the rendered error.
    //
    // Given
    // -----
    // - `KinematicsError::OracleFailure` at q7 = 0.25 with text "boom".
    //
    // Expect
    // ------
    // - The message contains "0.25" and "boom".
    fn oracle_failure_display_includes_q7_and_text() {
        // Arrange
        let err = KinematicsError::OracleFailure { q7: 0.25, text: "boom".to_string() };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("0.25"), "message should embed q7: {msg}");
        assert!(msg.contains("boom"), "message should embed oracle text: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that Jacobian shape mismatches report both shapes.
    //
    // Given
    // -----
    // - Expected (6, 7), found (7, 6).
    //
    // Expect
    // ------
    // - The message contains "(6, 7)" and "(7, 6)".
    fn jacobian_shape_mismatch_display_includes_both_shapes() {
        // Arrange
        let err = KinematicsError::JacobianShapeMismatch { expected: (6, 7), found: (7, 6) };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("(6, 7)") && msg.contains("(7, 6)"), "unexpected message: {msg}");
    }
}
