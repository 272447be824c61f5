//! search — q7 search strategies and their inputs/outputs.
//!
//! Purpose
//! -------
//! Find the q7 value and analytic branch that maximize the weighted score
//! for one target pose. Two strategies share a single per-sample evaluator
//! and differ only in which q7 values they visit.
//!
//! Key behaviors
//! -------------
//! - [`grid_search`]: exhaustive sweep on a fixed step ([`GridRange`]).
//! - [`bounded_search`]: coarse bracketing plus golden-section refinement
//!   under an oracle-call budget ([`BoundedRange`], [`RefineOptions`]).
//! - Both return a [`SearchResult`] whose diagnostics report branch and
//!   oracle-call counts, the elapsed time, and how the search stopped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Range and option values are validated at construction, so a malformed
//!   request never reaches the oracle.
//! - Strategies own their bookkeeping; nothing outlives a call, so concurrent
//!   searches only share the (read-only) oracle and references.
//! - "No valid branch anywhere" is `success == false`, never `Err`.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests with small synthetic oracles;
//!   cross-strategy comparisons live in `tests/integration_weighted_ik.rs`.

pub mod bounded;
pub mod evaluator;
pub mod grid;
pub(crate) mod objective;
pub mod outcome;
pub mod range;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bounded::bounded_search;
pub use self::evaluator::SearchProblem;
pub use self::grid::grid_search;
pub use self::outcome::{SearchDiagnostics, SearchResult, SearchStatus};
pub use self::range::{
    BoundedRange, DEFAULT_COARSE_SAMPLES, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, GridRange,
    MAX_GRID_SAMPLES, RefineOptions,
};
