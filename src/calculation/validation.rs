//! Physical domains of calculation inputs.
//!
//! Only values that are present and are not the target are checked, so a
//! request may carry inputs its formula never reads.

use std::cmp::Ordering;

use thiserror::Error;

use crate::{
    KnownValues,
    convection::COEFFICIENT,
    support::constraint::{
        Constrained, Constraint, ConstraintError, NonNegative, StrictlyPositive,
        UnitIntervalLowerOpen,
    },
};

/// Upper bound on the annual operating hours `beta` (365 × 24).
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Annual operating hours: `0 < beta ≤ HOURS_PER_YEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours;

impl Constraint<f64> for OperatingHours {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&0.0), value.partial_cmp(&HOURS_PER_YEAR)) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less | Ordering::Equal), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

/// Service life in years: at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLife;

impl Constraint<f64> for ServiceLife {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        match value.partial_cmp(&1.0) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::BelowMinimum),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

type Check = fn(f64) -> Result<(), ConstraintError>;

fn check<C: Constraint<f64>>(value: f64) -> Result<(), ConstraintError> {
    Constrained::<f64, C>::new(value).map(drop)
}

const BOUNDS: [(&str, Check); 9] = [
    ("life", check::<ServiceLife>),
    ("w", check::<StrictlyPositive>),
    ("beta", check::<OperatingHours>),
    ("C", check::<StrictlyPositive>),
    ("k", check::<StrictlyPositive>),
    ("v", check::<NonNegative>),
    ("eta", check::<UnitIntervalLowerOpen>),
    ("diameter", check::<StrictlyPositive>),
    (COEFFICIENT, check::<StrictlyPositive>),
];

/// Pairs that must satisfy `lower < upper`: ambient, surface, then interior.
const TEMPERATURE_ORDER: [(&str, &str); 2] = [("Ta", "Te"), ("Te", "Ti")];

/// An input outside its physical domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("`{symbol}` = {value} is out of range: {source}")]
    OutOfRange {
        symbol: &'static str,
        value: f64,
        source: ConstraintError,
    },

    #[error("expected {lower} < {upper}, got {lower} = {low} and {upper} = {high}")]
    TemperatureOrder {
        lower: &'static str,
        upper: &'static str,
        low: f64,
        high: f64,
    },
}

pub(super) fn validate(known: &KnownValues, target: &str) -> Result<(), InputError> {
    let given = |symbol: &str| known.get(symbol).copied().filter(|_| symbol != target);

    for (symbol, check) in BOUNDS {
        let Some(value) = given(symbol) else {
            continue;
        };
        // A zero `h` asks for the coefficient to be computed.
        if symbol == COEFFICIENT && value == 0.0 {
            continue;
        }
        check(value).map_err(|source| InputError::OutOfRange {
            symbol,
            value,
            source,
        })?;
    }

    for (lower, upper) in TEMPERATURE_ORDER {
        let (Some(low), Some(high)) = (given(lower), given(upper)) else {
            continue;
        };
        if low.partial_cmp(&high) != Some(Ordering::Less) {
            return Err(InputError::TemperatureOrder {
                lower,
                upper,
                low,
                high,
            });
        }
    }

    Ok(())
}
