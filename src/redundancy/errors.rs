//! redundancy::errors — unified error surface for the q7 search.
//!
//! Purpose
//! -------
//! Normalize every failure the search layer can report into one enum,
//! [`IkError`], with a common alias [`IkResult<T>`]: malformed search ranges
//! and weights (rejected before any oracle call), oracle contract
//! violations, and backend failures surfaced by argmin during refinement.
//!
//! Key behaviors
//! -------------
//! - Hand-written `Display` messages embedding the offending value and a
//!   short reason.
//! - `From<argmin::core::Error>`: recovers our own errors that travelled
//!   through argmin's cost callback, otherwise maps `ArgminError` variants.
//! - `From<KinematicsError>` for oracle and pose errors.
//! - `From<IkError> for PyErr` behind `python-bindings`.
//!
//! Invariants & assumptions
//! ------------------------
//! - "No valid branch found" is **not** an error. It is reported through
//!   `SearchResult::success == false`.
//! - Invalid-argument variants are only produced by validating constructors
//!   and by the solver context before the first oracle call.
use argmin::core::{ArgminError, Error};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::kinematics::errors::KinematicsError;

/// Crate-wide result alias for redundancy-resolution operations.
pub type IkResult<T> = Result<T, IkError>;

#[derive(Debug, Clone, PartialEq)]
pub enum IkError {
    // ---- Search ranges ----
    /// `start`/`end` must be finite with `start <= end`.
    InvalidBounds { start: f64, end: f64, reason: &'static str },
    /// Grid step must be finite and strictly positive.
    InvalidStep { step: f64, reason: &'static str },
    /// Refinement tolerance must be finite and strictly positive.
    InvalidTolerance { tol: f64, reason: &'static str },
    /// Oracle-call budget must be positive.
    InvalidMaxIterations { max_iter: usize, reason: &'static str },
    /// Coarse sample count must be positive.
    InvalidCoarseSamples { samples: usize, reason: &'static str },

    // ---- Weights and reference poses ----
    /// Score weights must be finite and non-negative.
    InvalidWeight { name: &'static str, value: f64, reason: &'static str },
    /// Neutral/current joint configurations must be finite.
    InvalidReferencePose { which: &'static str, index: usize, value: f64 },

    // ---- Oracle ----
    Kinematics(KinematicsError),

    // ---- Argmin ----
    InvalidParameter { text: String },
    NotImplemented { text: String },
    NotInitialized { text: String },
    ConditionViolated { text: String },
    CheckPointNotFound { text: String },
    PotentialBug { text: String },
    ImpossibleError { text: String },
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for IkError {}

impl std::fmt::Display for IkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Search ranges ----
            IkError::InvalidBounds { start, end, reason } => {
                write!(f, "Invalid q7 bounds [{start}, {end}]: {reason}")
            }
            IkError::InvalidStep { step, reason } => {
                write!(f, "Invalid q7 step {step}: {reason}")
            }
            IkError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid q7 tolerance {tol}: {reason}")
            }
            IkError::InvalidMaxIterations { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            IkError::InvalidCoarseSamples { samples, reason } => {
                write!(f, "Invalid coarse sample count {samples}: {reason}")
            }

            // ---- Weights and reference poses ----
            IkError::InvalidWeight { name, value, reason } => {
                write!(f, "Invalid {name} weight {value}: {reason}")
            }
            IkError::InvalidReferencePose { which, index, value } => {
                write!(f, "Invalid {which} pose at joint {index}: {value}, must be finite")
            }

            // ---- Oracle ----
            IkError::Kinematics(err) => write!(f, "{err}"),

            // ---- Argmin ----
            IkError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            IkError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            IkError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            IkError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            IkError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            IkError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            IkError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            IkError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Fallback ----
            IkError::UnknownError => write!(f, "Unknown error"),
        }
    }
}

impl From<KinematicsError> for IkError {
    fn from(err: KinematicsError) -> Self {
        IkError::Kinematics(err)
    }
}

impl From<Error> for IkError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<IkError>() {
            Ok(ik_err) => return ik_err,
            Err(err) => err,
        };
        let original_err = match original_err.downcast::<KinematicsError>() {
            Ok(kin_err) => return IkError::Kinematics(kin_err),
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => IkError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => IkError::NotImplemented { text },
                ArgminError::NotInitialized { text } => IkError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => IkError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => IkError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => IkError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => IkError::ImpossibleError { text },
                _ => IkError::UnknownError,
            },
            Err(err) => IkError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<IkError> for PyErr {
    fn from(err: IkError) -> PyErr {
        PyValueError::new_err(format!("IkError: {err}"))
    }
}
