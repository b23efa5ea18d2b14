//! Parameter sweeps over one input variable.
//!
//! A sweep solves a formula for its output symbol at evenly spaced values of
//! one input, holding every other value fixed. Points that cannot be solved
//! are recorded as `None` and the sweep moves on, so a single request yields
//! one point per sample regardless of individual failures.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    KnownValues,
    calculation::convection_inputs,
    catalog::UnknownFormula,
    convection::{COEFFICIENT, RegimeContext},
    equation::SymbolicSolver,
    resolver::Resolver,
    support::constraint::{Constrained, ConstraintError, StrictlyPositive},
};

/// Upper bound on the number of samples in one sweep.
pub const MAX_SAMPLES: usize = 100_000;

/// Default ranges for the catalog's inputs: `(symbol, min, max, step)`.
const DEFAULT_RANGES: &[(&str, f64, f64, f64)] = &[
    ("Ta", 10.0, 50.0, 1.0),
    ("Te", 10.0, 100.0, 5.0),
    ("Ti", 20.0, 300.0, 5.0),
    ("v", 0.1, 10.0, 0.2),
    ("k", 0.01, 0.2, 0.005),
    ("diameter", 0.01, 1.0, 0.02),
    ("C", 100.0, 10000.0, 200.0),
    ("w", 0.01, 0.2, 0.005),
    ("beta", 0.0, 8760.0, 24.0),
    ("life", 1.0, 30.0, 1.0),
    ("eta", 10.0, 100.0, 5.0),
];

const FALLBACK_RANGE: RangeParams = RangeParams {
    min: 0.0,
    max: 10.0,
    step: 1.0,
};

/// Unvalidated sweep bounds, as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeParams {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl RangeParams {
    /// The default range for `variable`, or `0..10` in steps of 1.
    #[must_use]
    pub fn default_for(variable: &str) -> Self {
        DEFAULT_RANGES
            .iter()
            .find(|(name, ..)| *name == variable)
            .map_or(FALLBACK_RANGE, |&(_, min, max, step)| Self { min, max, step })
    }
}

/// A validated sweep range with a strictly positive step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
    step: Constrained<f64, StrictlyPositive>,
}

impl Range {
    /// Validates `params`.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidRangeParameters`] for non-finite bounds,
    /// a step that is not strictly positive, or more than [`MAX_SAMPLES`]
    /// samples.
    pub fn new(params: RangeParams) -> Result<Self, SweepError> {
        let RangeParams { min, max, step } = params;
        let invalid = |issue| SweepError::InvalidRangeParameters {
            min,
            max,
            step,
            issue,
        };

        if !min.is_finite() || !max.is_finite() || !step.is_finite() {
            return Err(invalid(RangeIssue::NotFinite));
        }
        let step = StrictlyPositive::new(step).map_err(|err| invalid(RangeIssue::Step(err)))?;

        let range = Self { min, max, step };
        if range.len() > MAX_SAMPLES {
            return Err(invalid(RangeIssue::TooManySamples(range.len())));
        }
        Ok(range)
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        *self.step.as_ref()
    }

    /// Number of samples: `ceil((max + step - min) / step)`, at least zero.
    ///
    /// The upper bound is included when it falls on the grid, and may be
    /// overshot by less than one step when it does not.
    #[must_use]
    pub fn len(&self) -> usize {
        let count = ((self.max + self.step() - self.min) / self.step()).ceil();
        if count > 0.0 {
            // Saturates for huge counts.
            count as usize
        } else {
            0
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sample values `min + i × step`.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.min + i as f64 * self.step())
    }
}

/// A sweep over `variable` for one formula.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRequest {
    pub formula_key: String,
    pub variable: String,

    /// Values held fixed at every point.
    pub base: KnownValues,

    /// When given, `h` is recomputed at every point for formulas that use it.
    pub regime: Option<RegimeContext>,

    /// Defaults to [`RangeParams::default_for`] the variable.
    pub range: Option<RangeParams>,
}

/// One sample of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub x: f64,

    /// The solved output, or `None` if this point failed.
    pub y: Option<f64>,

    /// The convection coefficient computed at this point.
    ///
    /// `None` when no regime was given or the formula does not use `h`, even
    /// if the base values supply one.
    pub h: Option<f64>,
}

/// The result of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    /// The symbol solved for at each point.
    pub output: &'static str,
    pub range: Range,
    pub points: Vec<SweepPoint>,
}

/// Why a sweep's bounds were rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeIssue {
    #[error("bounds and step must be finite")]
    NotFinite,

    #[error("invalid step: {0}")]
    Step(ConstraintError),

    #[error("{0} samples exceeds the limit of {max}", max = MAX_SAMPLES)]
    TooManySamples(usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("invalid range parameters (min={min}, max={max}, step={step}): {issue}")]
    InvalidRangeParameters {
        min: f64,
        max: f64,
        step: f64,
        issue: RangeIssue,
    },

    #[error(transparent)]
    EquationNotFound(#[from] UnknownFormula),
}

/// Solves the formula's output at every sample of the range.
///
/// # Errors
///
/// Returns [`SweepError::InvalidRangeParameters`] before any point is
/// evaluated if the range is invalid, or [`SweepError::EquationNotFound`] if
/// the formula key is unknown. Individual point failures are not errors.
pub fn sweep<S: SymbolicSolver>(
    resolver: &Resolver<'_, S>,
    request: &SweepRequest,
) -> Result<Sweep, SweepError> {
    let params = request
        .range
        .unwrap_or_else(|| RangeParams::default_for(&request.variable));
    let range = Range::new(params)?;
    let spec = resolver.lookup_formula(&request.formula_key)?;

    debug!(
        formula_key = request.formula_key,
        variable = request.variable,
        samples = range.len(),
        "starting sweep"
    );

    let points = range
        .samples()
        .map(|x| {
            let mut values = request.base.clone();
            values.insert(request.variable.clone(), x);

            let mut h = None;
            if let (true, Some(regime)) = (spec.needs_convection, request.regime) {
                match resolver.resolve_convection_coefficient(&convection_inputs(&values), regime) {
                    Ok(value) => {
                        values.insert(COEFFICIENT.to_string(), value);
                        h = Some(value);
                    }
                    Err(err) => {
                        debug!(x, %err, "no convection coefficient at this point");
                        values.remove(COEFFICIENT);
                    }
                }
            }

            let y = match resolver.resolve(spec.key, &values, spec.output) {
                Ok(outcome) => Some(outcome.value),
                Err(err) => {
                    debug!(x, %err, "sweep point failed");
                    None
                }
            };
            SweepPoint { x, y, h }
        })
        .collect::<Vec<_>>();

    let failed = points.iter().filter(|point| point.y.is_none()).count();
    if failed == points.len() && !points.is_empty() {
        warn!(formula_key = request.formula_key, "every sweep point failed");
    }

    Ok(Sweep {
        output: spec.output,
        range,
        points,
    })
}
