//! Score weights for the three redundancy-resolution objectives.
use crate::redundancy::errors::{IkError, IkResult};

/// WeightConfig — non-negative weights of the q7 selection score.
///
/// Purpose
/// -------
/// Hold the trade-off between manipulability (rewarded) and the normalized
/// distances to the neutral and current postures (penalized). Built once and
/// shared by every solve of a [`SolverContext`](crate::redundancy::solver::SolverContext).
///
/// Fields
/// ------
/// - `manipulability`: weight on the Yoshikawa index.
/// - `neutral`: weight on the normalized distance to the neutral pose.
/// - `current`: weight on the normalized distance to the current pose.
///
/// Invariants
/// ----------
/// - Every weight is finite and `>= 0.0` when built through [`WeightConfig::new`].
///
/// Default
/// -------
/// - `(1.0, 0.5, 2.0)`: favor continuity with the current posture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightConfig {
    pub manipulability: f64,
    pub neutral: f64,
    pub current: f64,
}

impl WeightConfig {
    /// Construct validated weights.
    ///
    /// # Errors
    /// - [`IkError::InvalidWeight`] naming the first weight that is
    ///   non-finite or negative.
    pub fn new(manipulability: f64, neutral: f64, current: f64) -> IkResult<Self> {
        verify_weight("manipulability", manipulability)?;
        verify_weight("neutral", neutral)?;
        verify_weight("current", current)?;
        Ok(Self { manipulability, neutral, current })
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self { manipulability: 1.0, neutral: 0.5, current: 2.0 }
    }
}

fn verify_weight(name: &'static str, value: f64) -> IkResult<()> {
    if !value.is_finite() {
        return Err(IkError::InvalidWeight { name, value, reason: "Weight must be finite." });
    }
    if value < 0.0 {
        return Err(IkError::InvalidWeight { name, value, reason: "Weight must be non-negative." });
    }
    Ok(())
}
