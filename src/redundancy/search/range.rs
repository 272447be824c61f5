//! search::range — validated q7 search ranges and refinement options.
//!
//! Purpose
//! -------
//! Define the two q7 range shapes accepted by the strategies, plus the
//! tuning knobs of the bounded strategy, and reject malformed values before
//! any oracle call is made.
//!
//! Key behaviors
//! -------------
//! - [`GridRange`]: `(start, end, step)`; enumerates samples from an integer
//!   index so floating accumulation cannot skip or duplicate the last sample.
//! - [`BoundedRange`]: `(start, end, tolerance, max_iterations)`.
//! - [`RefineOptions`]: coarse sample count and verbosity for the bounded
//!   strategy.
//!
//! Invariants & assumptions
//! ------------------------
//! - `start` and `end` are finite, `start <= end`, and `end − start` is
//!   finite.
//! - `step > 0`, `tolerance > 0` (finite), `max_iterations > 0`,
//!   `coarse_samples > 0`.
//! - The grid sample count is `floor((end − start)/step) + 1`, evaluated with
//!   a `1e-9`-step slack so an `end` that is a whole number of steps away
//!   (up to rounding) is included.
//!
//! Testing notes
//! -------------
//! - Unit tests cover every rejection path, the inclusive upper bound on
//!   classic decimal ranges, and the degenerate `start == end` grid.
use crate::redundancy::errors::{IkError, IkResult};

/// Slack (in units of `step`) when counting grid samples.
const GRID_COUNT_SLACK: f64 = 1e-9;

/// Upper bound on grid samples to keep `step` from exhausting memory/time.
pub const MAX_GRID_SAMPLES: usize = 100_000_000;

/// Default refinement tolerance on the q7 bracket width (radians).
///
/// Together with [`DEFAULT_COARSE_SAMPLES`] this keeps a default bounded
/// search over the full q7 range near 30 oracle calls. Tightening it to
/// `1e-6` buys sub-microradian q7 at roughly ten extra calls.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Default oracle-call budget of the bounded strategy.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Default number of coarse bracketing samples.
///
/// Fewer samples widen the refinement bracket and raise the chance of
/// locking onto a branch-local optimum; see the integration tests for the
/// quality check against a fine grid.
pub const DEFAULT_COARSE_SAMPLES: usize = 7;

/// GridRange — inclusive q7 interval sampled on a fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl GridRange {
    /// Construct a validated grid range.
    ///
    /// # Errors
    /// - [`IkError::InvalidBounds`] for non-finite bounds or `start > end`.
    /// - [`IkError::InvalidStep`] for a non-finite or non-positive step, or a
    ///   step so small the grid would exceed [`MAX_GRID_SAMPLES`].
    pub fn new(start: f64, end: f64, step: f64) -> IkResult<Self> {
        verify_bounds(start, end)?;
        if !step.is_finite() {
            return Err(IkError::InvalidStep { step, reason: "Step must be finite." });
        }
        if step <= 0.0 {
            return Err(IkError::InvalidStep { step, reason: "Step must be positive." });
        }
        let range = Self { start, end, step };
        if range.raw_count() >= MAX_GRID_SAMPLES as f64 {
            return Err(IkError::InvalidStep {
                step,
                reason: "Step is too small for the range; grid would be too large.",
            });
        }
        Ok(range)
    }

    /// Re-check a range whose public fields may have been set directly.
    ///
    /// # Errors
    /// Same as [`GridRange::new`].
    pub fn validate(&self) -> IkResult<()> {
        Self::new(self.start, self.end, self.step).map(|_| ())
    }

    /// Number of q7 samples, `floor((end − start)/step) + 1`.
    pub fn sample_count(&self) -> usize {
        self.raw_count() as usize + 1
    }

    /// The `i`-th sample `start + i·step`, clamped to `end`.
    pub fn sample(&self, i: usize) -> f64 {
        (self.start + i as f64 * self.step).min(self.end)
    }

    /// All samples in increasing order.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count()).map(move |i| self.sample(i))
    }

    fn raw_count(&self) -> f64 {
        ((self.end - self.start) / self.step + GRID_COUNT_SLACK).floor()
    }
}

/// BoundedRange — q7 interval, bracket tolerance, and oracle-call budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedRange {
    pub start: f64,
    pub end: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl BoundedRange {
    /// Construct a validated bounded range.
    ///
    /// # Errors
    /// - [`IkError::InvalidBounds`] for non-finite bounds or `start > end`.
    /// - [`IkError::InvalidTolerance`] for a non-finite or non-positive tolerance.
    /// - [`IkError::InvalidMaxIterations`] when `max_iterations == 0`.
    pub fn new(start: f64, end: f64, tolerance: f64, max_iterations: usize) -> IkResult<Self> {
        verify_bounds(start, end)?;
        if !tolerance.is_finite() {
            return Err(IkError::InvalidTolerance {
                tol: tolerance,
                reason: "Tolerance must be finite.",
            });
        }
        if tolerance <= 0.0 {
            return Err(IkError::InvalidTolerance {
                tol: tolerance,
                reason: "Tolerance must be positive.",
            });
        }
        if max_iterations == 0 {
            return Err(IkError::InvalidMaxIterations {
                max_iter: max_iterations,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { start, end, tolerance, max_iterations })
    }

    /// Bounds with [`DEFAULT_TOLERANCE`] and [`DEFAULT_MAX_ITERATIONS`].
    pub fn with_bounds(start: f64, end: f64) -> IkResult<Self> {
        Self::new(start, end, DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS)
    }

    /// # Errors
    /// Same as [`BoundedRange::new`].
    pub fn validate(&self) -> IkResult<()> {
        Self::new(self.start, self.end, self.tolerance, self.max_iterations).map(|_| ())
    }
}

/// RefineOptions — tuning of the bounded strategy.
///
/// - `coarse_samples`: evenly spaced bracketing samples (capped by the
///   range's `max_iterations` at run time).
/// - `verbose`: with the `obs_slog` feature, log refinement progress to the
///   terminal through argmin's slog observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOptions {
    pub coarse_samples: usize,
    pub verbose: bool,
}

impl RefineOptions {
    /// # Errors
    /// - [`IkError::InvalidCoarseSamples`] when `coarse_samples == 0`.
    pub fn new(coarse_samples: usize, verbose: bool) -> IkResult<Self> {
        if coarse_samples == 0 {
            return Err(IkError::InvalidCoarseSamples {
                samples: coarse_samples,
                reason: "At least one coarse sample is required.",
            });
        }
        Ok(Self { coarse_samples, verbose })
    }

    /// # Errors
    /// Same as [`RefineOptions::new`].
    pub fn validate(&self) -> IkResult<()> {
        Self::new(self.coarse_samples, self.verbose).map(|_| ())
    }
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self { coarse_samples: DEFAULT_COARSE_SAMPLES, verbose: false }
    }
}

fn verify_bounds(start: f64, end: f64) -> IkResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(IkError::InvalidBounds { start, end, reason: "Bounds must be finite." });
    }
    if start > end {
        return Err(IkError::InvalidBounds { start, end, reason: "Start must not exceed end." });
    }
    if !(end - start).is_finite() {
        return Err(IkError::InvalidBounds { start, end, reason: "Interval width overflows." });
    }
    Ok(())
}
