//! weighted_ik — weighted q7 redundancy resolution for 7-DOF manipulators.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the solver to Python via the `_weighted_ik` extension module.
//! Given a target end-effector pose and a closed-form IK oracle
//! parameterized by the redundant joint q7, the crate picks the q7 value and
//! analytic branch that best trade off manipulability against distance from
//! a neutral posture and from the robot's current posture.
//!
//! Key behaviors
//! -------------
//! - [`kinematics`]: data model (poses, joint configurations, Jacobians,
//!   branches) and the oracle / forward-kinematics seams.
//! - [`redundancy`]: score function, validity filter, the grid and bounded
//!   search strategies, and the reusable [`SolverContext`].
//! - With `python-bindings`: `WeightedIKSolver` / `WeightedIKOutcome` classes
//!   in the `weighted_ik.solvers` submodule.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; the PyO3 items here only
//!   convert inputs, dispatch, and map errors.
//! - Python oracles must follow the contract documented in [`utils`].
//!
//! Conventions
//! -----------
//! - Angles in radians; Jacobians task-major (6 × 7); rotations row-major.
//! - Errors are rich Rust enums internally and `ValueError` at the Python
//!   boundary.
//!
//! Downstream usage
//! ----------------
//! - Rust callers implement [`IkOracle`] for their arm and use
//!   [`SolverContext`] directly; the PyO3 items can be ignored.
//! - The Python package imports `_weighted_ik` and re-exports its classes.
//!
//! [`IkOracle`]: crate::kinematics::IkOracle
//! [`SolverContext`]: crate::redundancy::SolverContext

pub mod kinematics;
pub mod redundancy;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2, ToPyArray};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    redundancy::{
        scoring::weights::WeightConfig,
        search::{
            outcome::SearchResult,
            range::{BoundedRange, GridRange, RefineOptions},
        },
        solver::{DEFAULT_NEUTRAL_POSE, SolverContext},
    },
    utils::{PyOracle, extract_joint_angles, extract_pose},
};

/// WeightedIKSolver — Python-facing wrapper for [`SolverContext`].
///
/// Purpose
/// -------
/// Hold a Python IK oracle, the neutral posture, and the score weights once,
/// then answer many `(target, current)` queries.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `WeightedIKSolver(oracle, neutral_pose=None, weight_manip=1.0,
/// weight_neutral=0.5, weight_current=2.0, verbose=False, coarse_samples=7)`:
/// - `oracle`: callable following the contract in [`utils`].
/// - `neutral_pose`: 7 floats; defaults to [`DEFAULT_NEUTRAL_POSE`].
/// - `weight_*`: finite, non-negative score weights.
/// - `verbose`: log sweep summaries and refinement progress (effective with
///   `obs_slog`).
/// - `coarse_samples`: coarse bracketing samples of `solve_optimized`.
///
/// Notes
/// -----
/// - Native Rust callers should use [`SolverContext`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "weighted_ik.solvers", frozen)]
pub struct WeightedIKSolver {
    inner: SolverContext<PyOracle>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl WeightedIKSolver {
    #[new]
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (
        oracle, neutral_pose = None, weight_manip = 1.0, weight_neutral = 0.5,
        weight_current = 2.0, verbose = false, coarse_samples = 7
    ))]
    pub fn new<'py>(
        py: Python<'py>, oracle: &Bound<'py, PyAny>, neutral_pose: Option<&Bound<'py, PyAny>>,
        weight_manip: f64, weight_neutral: f64, weight_current: f64, verbose: bool,
        coarse_samples: usize,
    ) -> PyResult<Self> {
        if !oracle.is_callable() {
            return Err(PyTypeError::new_err("oracle must be callable"));
        }
        let neutral = match neutral_pose {
            Some(raw) => extract_joint_angles(py, raw, "neutral_pose")?,
            None => DEFAULT_NEUTRAL_POSE,
        };
        let weights = WeightConfig::new(weight_manip, weight_neutral, weight_current)?;
        let refine = RefineOptions::new(coarse_samples, verbose)?;
        let oracle = PyOracle::new(oracle.clone().unbind());
        let inner =
            SolverContext::new(oracle, neutral, weights, verbose)?.with_refine_options(refine);
        Ok(Self { inner })
    }

    /// Grid search over `[q7_start, q7_end]` with `step_size`.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (
        target_position, target_orientation, current_pose, q7_start, q7_end, step_size = 0.01
    ))]
    pub fn solve<'py>(
        &self, py: Python<'py>, target_position: &Bound<'py, PyAny>,
        target_orientation: &Bound<'py, PyAny>, current_pose: &Bound<'py, PyAny>, q7_start: f64,
        q7_end: f64, step_size: f64,
    ) -> PyResult<WeightedIKOutcome> {
        let target = extract_pose(py, target_position, target_orientation)?;
        let current = extract_joint_angles(py, current_pose, "current_pose")?;
        let range = GridRange::new(q7_start, q7_end, step_size)?;
        let inner = self.inner.solve(&target, &current, &range)?;
        Ok(WeightedIKOutcome { inner })
    }

    /// Bounded two-phase search over `[q7_min, q7_max]`.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (
        target_position, target_orientation, current_pose, q7_min, q7_max,
        tolerance = 1e-4, max_iterations = 50
    ))]
    pub fn solve_optimized<'py>(
        &self, py: Python<'py>, target_position: &Bound<'py, PyAny>,
        target_orientation: &Bound<'py, PyAny>, current_pose: &Bound<'py, PyAny>, q7_min: f64,
        q7_max: f64, tolerance: f64, max_iterations: usize,
    ) -> PyResult<WeightedIKOutcome> {
        let target = extract_pose(py, target_position, target_orientation)?;
        let current = extract_joint_angles(py, current_pose, "current_pose")?;
        let range = BoundedRange::new(q7_min, q7_max, tolerance, max_iterations)?;
        let inner = self.inner.solve_optimized(&target, &current, &range)?;
        Ok(WeightedIKOutcome { inner })
    }

    #[getter]
    pub fn neutral_pose(&self) -> Vec<f64> {
        self.inner.neutral().to_vec()
    }

    /// `(manipulability, neutral, current)` weights.
    #[getter]
    pub fn weights(&self) -> (f64, f64, f64) {
        let w = self.inner.weights();
        (w.manipulability, w.neutral, w.current)
    }
}

/// WeightedIKOutcome — read-only Python view of a [`SearchResult`].
///
/// Selection fields (`joint_angles`, `q7_optimal`, metrics, `solution_index`,
/// `jacobian`) are meaningful only when `success` is true; `score` is `-inf`
/// otherwise.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "weighted_ik.solvers", frozen)]
pub struct WeightedIKOutcome {
    inner: SearchResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl WeightedIKOutcome {
    #[getter]
    pub fn success(&self) -> bool {
        self.inner.success
    }

    #[getter]
    pub fn joint_angles<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.joint_angles.to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn q7_optimal(&self) -> f64 {
        self.inner.q7
    }

    #[getter]
    pub fn score(&self) -> f64 {
        self.inner.score
    }

    #[getter]
    pub fn manipulability(&self) -> f64 {
        self.inner.manipulability
    }

    #[getter]
    pub fn neutral_distance(&self) -> f64 {
        self.inner.neutral_distance
    }

    #[getter]
    pub fn current_distance(&self) -> f64 {
        self.inner.current_distance
    }

    #[getter]
    pub fn solution_index(&self) -> Option<usize> {
        self.inner.branch_index
    }

    /// 6 × 7 task-major Jacobian of the selected branch, or `None`.
    #[getter]
    pub fn jacobian<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray2<f64>>> {
        self.inner.jacobian.as_ref().map(|j| j.as_array().to_pyarray(py))
    }

    #[getter]
    pub fn total_solutions_found(&self) -> usize {
        self.inner.diagnostics.total_solutions_found
    }

    #[getter]
    pub fn valid_solutions_count(&self) -> usize {
        self.inner.diagnostics.valid_solutions_count
    }

    #[getter]
    pub fn q7_values_tested(&self) -> usize {
        self.inner.diagnostics.q7_values_tested
    }

    #[getter]
    pub fn optimization_iterations(&self) -> usize {
        self.inner.diagnostics.optimization_iterations
    }

    #[getter]
    pub fn duration_microseconds(&self) -> u64 {
        u64::try_from(self.inner.diagnostics.elapsed.as_micros()).unwrap_or(u64::MAX)
    }

    #[getter]
    pub fn status(&self) -> String {
        format!("{:?}", self.inner.diagnostics.status)
    }

    fn __repr__(&self) -> String {
        format!(
            "WeightedIKOutcome(success={}, q7_optimal={}, score={}, solution_index={:?})",
            self.inner.success, self.inner.q7, self.inner.score, self.inner.branch_index
        )
    }
}

/// _weighted_ik — PyO3 module initializer for the Python extension.
///
/// Creates the `solvers` submodule, attaches it to `_weighted_ik`, and
/// registers it in `sys.modules` as `weighted_ik.solvers` so dotted imports
/// work.
///
/// Errors
/// ------
/// - `PyErr` if creating the submodule or touching `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _weighted_ik<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let solvers_mod = PyModule::new(_py, "solvers")?;
    solvers(_py, m, &solvers_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("weighted_ik.solvers", solvers_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn solvers<'py>(
    _py: Python, weighted_ik: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<WeightedIKSolver>()?;
    m.add_class::<WeightedIKOutcome>()?;
    weighted_ik.add_submodule(m)?;
    Ok(())
}
