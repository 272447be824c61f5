//! redundancy — weighted resolution of the free joint q7.
//!
//! Purpose
//! -------
//! Choose, for one target pose, the q7 value and analytic IK branch that
//! maximize a weighted score of manipulability, distance from a neutral
//! posture, and distance from the current posture. This is the core of the
//! crate; everything outside it is data model or binding glue.
//!
//! Key behaviors
//! -------------
//! - [`scoring`]: validity filter (NaN sentinel), Yoshikawa manipulability,
//!   posture distances, and the weighted score under a [`WeightConfig`].
//! - [`search`]: the exhaustive grid strategy and the bounded
//!   bracket-then-refine strategy, both producing a [`SearchResult`].
//! - [`solver`]: [`SolverContext`], the reusable front door holding the
//!   oracle, neutral posture, weights, and refinement options, plus the
//!   one-shot [`weighted_ik_q7`].
//! - [`errors`]: [`IkError`] / [`IkResult`], the single error surface.
//!
//! Invariants & assumptions
//! ------------------------
//! - Malformed inputs (ranges, weights, reference postures) are rejected
//!   before the first oracle call.
//! - "No valid branch in range" is a successful call returning
//!   `success == false` and score `-inf`.
//! - Fixed inputs give bit-identical results apart from elapsed time; no
//!   randomness is used anywhere.
//!
//! Conventions
//! -----------
//! - Higher score is better. Distances are Euclidean in joint space and are
//!   normalized by `7·2π` inside the score only.
//! - The core performs no I/O; the optional `obs_slog` feature adds
//!   refinement logging when a context is built with `verbose = true`.

pub mod errors;
pub mod scoring;
pub mod search;
pub mod solver;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{IkError, IkResult};
pub use self::scoring::{BranchScore, WeightConfig, manipulability, score_branch};
pub use self::search::{
    BoundedRange, GridRange, RefineOptions, SearchDiagnostics, SearchProblem, SearchResult,
    SearchStatus, bounded_search, grid_search,
};
pub use self::solver::{DEFAULT_NEUTRAL_POSE, SolverContext, WeightedIkRequest, weighted_ik_q7};

pub mod prelude {
    pub use super::errors::{IkError, IkResult};
    pub use super::scoring::WeightConfig;
    pub use super::search::{BoundedRange, GridRange, RefineOptions, SearchResult, SearchStatus};
    pub use super::solver::{DEFAULT_NEUTRAL_POSE, SolverContext, weighted_ik_q7};
}
