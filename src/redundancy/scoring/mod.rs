//! scoring — weights, validity filter, and the per-branch score.
//!
//! Purpose
//! -------
//! Group the pure functions the search strategies apply to every branch the
//! oracle returns: drop NaN-flagged branches ([`validity`]), then rank the
//! rest by a weighted combination of manipulability and posture distances
//! ([`score`]) under a validated [`WeightConfig`] ([`weights`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything here is side-effect free and allocation-light; the same
//!   inputs always give bit-identical outputs.
//! - Scoring assumes a branch already passed the validity filter.

pub mod score;
pub mod validity;
pub mod weights;

pub use self::score::{
    BranchScore, JOINT_RANGE_NORMALIZER, joint_distance, manipulability, score_branch,
};
pub use self::validity::{is_valid_branch, is_valid_configuration, validate_reference_pose};
pub use self::weights::WeightConfig;
