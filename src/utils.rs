//! utils — PyO3 extraction helpers and the Python-callable oracle bridge.
//!
//! Everything here is compiled only with the `python-bindings` feature.
//!
//! Python oracle contract
//! ----------------------
//! `oracle(position, orientation, q7, want_jacobian)` is called with a
//! 3-element list, a 9-element row-major rotation list, a float, and a bool.
//! It must return a sequence of `(index, joints, jacobian)` tuples where
//! `joints` has 7 floats (NaN marks a joint-limit violation) and `jacobian`
//! is `None` or a 6 × 7 (task-major) or 7 × 6 (per-joint) float array.
//!
//! Joints are checked first: when any joint is NaN the `jacobian` entry is
//! dropped without being read, so a NaN-filled matrix on a joint-limit slot
//! is harmless. On every other slot a malformed or non-finite matrix is an
//! error.
#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
use crate::kinematics::{
    errors::{KinResult, KinematicsError},
    oracle::IkOracle,
    types::{Branch, JOINT_COUNT, JointAngles, Pose},
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Extract exactly `N` floats from an array-like.
#[cfg(feature = "python-bindings")]
pub fn extract_fixed<'py, const N: usize>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<[f64; N]> {
    let arr = extract_f64_array(py, raw)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    <[f64; N]>::try_from(slice).map_err(|_| {
        PyValueError::new_err(format!("{name} must have {N} entries, got {}", slice.len()))
    })
}

#[cfg(feature = "python-bindings")]
pub fn extract_joint_angles<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<JointAngles> {
    extract_fixed::<JOINT_COUNT>(py, raw, name)
}

/// Build a validated [`Pose`] from Python position and orientation inputs.
#[cfg(feature = "python-bindings")]
pub fn extract_pose<'py>(
    py: Python<'py>, position: &Bound<'py, PyAny>, orientation: &Bound<'py, PyAny>,
) -> PyResult<Pose> {
    let position = extract_fixed::<3>(py, position, "target_position")?;
    let orientation = extract_fixed::<9>(py, orientation, "target_orientation")?;
    Ok(Pose::new(position, orientation)?)
}

/// PyOracle — [`IkOracle`] backed by a Python callable.
///
/// Any Python exception raised by the callable, or a return value that does
/// not follow the module-level contract, becomes
/// [`KinematicsError::OracleFailure`] (or a Jacobian shape error) and aborts
/// the search.
#[cfg(feature = "python-bindings")]
pub struct PyOracle {
    callable: Py<PyAny>,
}

#[cfg(feature = "python-bindings")]
impl PyOracle {
    pub fn new(callable: Py<PyAny>) -> Self {
        Self { callable }
    }
}

#[cfg(feature = "python-bindings")]
impl IkOracle for PyOracle {
    fn solve_branches(
        &self, target: &Pose, q7: f64, want_jacobian: bool,
    ) -> KinResult<Vec<Branch>> {
        Python::with_gil(|py| {
            let args =
                (target.position().to_vec(), target.orientation().to_vec(), q7, want_jacobian);
            let out = self.callable.bind(py).call1(args).map_err(|e| oracle_failure(q7, e))?;
            let items: Vec<Bound<'_, PyAny>> = out.extract().map_err(|e| oracle_failure(q7, e))?;
            items.iter().map(|item| extract_branch(item, q7)).collect()
        })
    }
}

// ---- Helper methods ----

#[cfg(feature = "python-bindings")]
fn extract_branch(item: &Bound<'_, PyAny>, q7: f64) -> KinResult<Branch> {
    let (index, joints, jacobian): (usize, Vec<f64>, Option<Bound<'_, PyAny>>) =
        item.extract().map_err(|e| oracle_failure(q7, e))?;
    let joints = JointAngles::try_from(joints).map_err(|v: Vec<f64>| {
        KinematicsError::OracleFailure {
            q7,
            text: format!("expected {JOINT_COUNT} joint angles, got {}", v.len()),
        }
    })?;
    let flagged = joints.iter().any(|q| q.is_nan());
    let matrix = match jacobian {
        Some(raw) if !flagged && !raw.is_none() => Some(extract_matrix(&raw, q7)?),
        _ => None,
    };
    Branch::from_raw_parts(index, joints, matrix)
}

/// Read a 2-D float array (numpy or nested lists); shape checks happen in
/// [`Branch::from_raw_parts`].
#[cfg(feature = "python-bindings")]
fn extract_matrix(raw: &Bound<'_, PyAny>, q7: f64) -> KinResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    let rows: Vec<Vec<f64>> = raw.extract().map_err(|e| oracle_failure(q7, e))?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(KinematicsError::OracleFailure {
            q7,
            text: "Jacobian rows have unequal lengths".to_string(),
        });
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| KinematicsError::OracleFailure { q7, text: e.to_string() })
}

#[cfg(feature = "python-bindings")]
fn oracle_failure(q7: f64, err: PyErr) -> KinematicsError {
    KinematicsError::OracleFailure { q7, text: err.to_string() }
}
