//! Single-point calculations with automatic convection coefficients.
//!
//! Economic-thickness formulas take `h` as an input. When the caller does
//! not supply it (or supplies zero), it is computed from the regime's
//! convection correlations before the formula itself is solved.
//!
//! Inputs are checked against their physical domains first; see
//! [`CalculationRequest::validate`].

mod validation;

use thiserror::Error;
use tracing::debug;

use crate::{
    KnownValues,
    convection::{COEFFICIENT, ConvectionError, RegimeContext},
    equation::{ResolutionOutcome, ResolveError, SymbolicSolver},
    resolver::Resolver,
};

pub use validation::{HOURS_PER_YEAR, InputError, OperatingHours, ServiceLife};

/// Inputs to the convection correlations, taken from the caller's values.
const CONVECTION_INPUTS: [&str; 4] = ["Te", "Ta", "H", "v"];

/// Substitute for `H` when only the diameter is known.
const HEIGHT_FALLBACK: &str = "diameter";

/// A request to solve one formula for one unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub formula_key: String,
    pub known: KnownValues,
    pub target: String,

    /// Needed only when `h` must be computed.
    pub regime: Option<RegimeContext>,
}

impl CalculationRequest {
    /// Checks every supplied input except the target against its domain.
    ///
    /// | Input | Domain |
    /// |---|---|
    /// | `life` | `≥ 1` |
    /// | `w`, `C`, `k`, `diameter` | `> 0` |
    /// | `beta` | `(0, 8760]` |
    /// | `v` | `≥ 0` |
    /// | `eta` | `(0, 1]` |
    /// | `h` | `> 0`, or `0` to have it computed |
    /// | `Ta`, `Te`, `Ti` | `Ta < Te < Ti` |
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] found.
    pub fn validate(&self) -> Result<(), InputError> {
        validation::validate(&self.known, &self.target)
    }
}

/// The solved value and the convection coefficient it was computed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub outcome: ResolutionOutcome,

    /// The `h` used, whether supplied or computed.
    pub coefficient: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("`{formula_key}` needs a convection coefficient: provide `h` or a flow type and orientation")]
    MissingRegimeContext { formula_key: String },

    #[error("could not compute the convection coefficient")]
    Convection(#[from] ConvectionError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Solves the requested formula, computing `h` first when needed.
///
/// # Errors
///
/// Returns a [`CalculationError`] if an input is out of its domain, if the
/// formula is unknown, if `h` is needed without a regime, or if either
/// resolution fails.
pub fn calculate<S: SymbolicSolver>(
    resolver: &Resolver<'_, S>,
    request: &CalculationRequest,
) -> Result<Calculation, CalculationError> {
    request.validate()?;

    let CalculationRequest {
        formula_key,
        known,
        target,
        regime,
    } = request;

    let spec = resolver
        .lookup_formula(formula_key)
        .map_err(ResolveError::from)?;

    let mut values = known.clone();
    if spec.needs_convection && target != COEFFICIENT && coefficient_missing(&values) {
        let regime = regime.ok_or_else(|| CalculationError::MissingRegimeContext {
            formula_key: formula_key.clone(),
        })?;
        let h = resolver.resolve_convection_coefficient(&convection_inputs(&values), regime)?;
        debug!(formula_key, h, "computed convection coefficient");
        values.insert(COEFFICIENT.to_string(), h);
    }

    let outcome = resolver.resolve(formula_key, &values, target)?;
    let coefficient = if target == COEFFICIENT {
        None
    } else {
        values.get(COEFFICIENT).copied()
    };

    Ok(Calculation {
        outcome,
        coefficient,
    })
}

fn coefficient_missing(values: &KnownValues) -> bool {
    values.get(COEFFICIENT).is_none_or(|h| *h == 0.0)
}

/// The subset of `values` the convection correlations read.
///
/// `H` falls back to the diameter when absent.
pub(crate) fn convection_inputs(values: &KnownValues) -> KnownValues {
    let mut inputs: KnownValues = CONVECTION_INPUTS
        .iter()
        .filter_map(|name| values.get(*name).map(|value| ((*name).to_string(), *value)))
        .collect();
    if let Some(&diameter) = values.get(HEIGHT_FALLBACK) {
        inputs.entry("H".to_string()).or_insert(diameter);
    }
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        catalog::Catalog,
        convection::{FlowType, Orientation},
        equation::Method,
        test_support::known,
    };

    fn economic_inputs() -> KnownValues {
        known(&[
            ("k", 0.04),
            ("Ti", 150.0),
            ("Te", 30.0),
            ("Ta", 25.0),
            ("w", 0.1),
            ("beta", 8000.0),
            ("life", 10.0),
            ("eta", 0.9),
            ("C", 1000.0),
            ("H", 1.0),
        ])
    }

    fn request(known: KnownValues, regime: Option<RegimeContext>) -> CalculationRequest {
        CalculationRequest {
            formula_key: "economic_thickness_flat".into(),
            known,
            target: "e".into(),
            regime,
        }
    }

    #[test]
    fn supplied_coefficient_is_used() {
        let resolver = Resolver::new(Catalog::standard());
        let mut values = economic_inputs();
        values.insert("h".into(), 10.0);

        let calculation = calculate(&resolver, &request(values, None)).unwrap();
        assert_eq!(calculation.coefficient, Some(10.0));
        assert_eq!(calculation.outcome.method, Method::Symbolic);
    }

    #[test]
    fn coefficient_computed_from_regime() {
        let resolver = Resolver::new(Catalog::standard());
        let regime = RegimeContext::new(FlowType::Interior, Orientation::Vertical);

        let calculation = calculate(&resolver, &request(economic_inputs(), Some(regime))).unwrap();
        let h = calculation.coefficient.unwrap();
        assert_relative_eq!(h, 1.32 * 5f64.powf(0.25), epsilon = 1e-9);
        assert!(calculation.outcome.value > 0.0);
    }

    #[test]
    fn zero_coefficient_counts_as_missing() {
        let resolver = Resolver::new(Catalog::standard());
        let mut values = economic_inputs();
        values.insert("h".into(), 0.0);

        let err = calculate(&resolver, &request(values, None)).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::MissingRegimeContext { formula_key } if formula_key == "economic_thickness_flat"
        ));
    }

    #[test]
    fn diameter_stands_in_for_height() {
        let values = known(&[("Te", 30.0), ("Ta", 20.0), ("diameter", 0.3), ("k", 1.0)]);
        let inputs = convection_inputs(&values);
        assert_eq!(inputs, known(&[("Te", 30.0), ("Ta", 20.0), ("H", 0.3)]));

        let values = known(&[("H", 2.0), ("diameter", 0.3)]);
        assert_eq!(convection_inputs(&values).get("H"), Some(&2.0));
    }

    #[test]
    fn formulas_without_convection_ignore_the_regime() {
        let resolver = Resolver::new(Catalog::standard());
        let request = CalculationRequest {
            formula_key: "critical_radius_cylinder".into(),
            known: known(&[("k", 0.04), ("h", 8.0)]),
            target: "r_c".into(),
            regime: None,
        };

        let calculation = calculate(&resolver, &request).unwrap();
        assert_relative_eq!(calculation.outcome.value, 0.005);
    }

    #[test]
    fn convection_failure() {
        let resolver = Resolver::new(Catalog::standard());
        let mut values = economic_inputs();
        // Still air: both exterior correlations need wind.
        values.insert("v".into(), 0.0);
        let regime = RegimeContext::new(FlowType::Exterior, Orientation::Vertical);

        let err = calculate(&resolver, &request(values, Some(regime))).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::Convection(ConvectionError::NoApplicableFormula { .. })
        ));
    }

    #[test]
    fn out_of_domain_inputs_are_rejected_before_solving() {
        let resolver = Resolver::new(Catalog::standard());

        // A chilled line: the interior is colder than the surroundings.
        let mut values = economic_inputs();
        values.insert("Ti".into(), 5.0);
        values.insert("h".into(), 10.0);
        let err = calculate(&resolver, &request(values, None)).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::InvalidInput(InputError::TemperatureOrder { upper: "Ti", .. })
        ));

        let mut values = economic_inputs();
        values.insert("eta".into(), 90.0);
        let err = calculate(&resolver, &request(values, None)).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::InvalidInput(InputError::OutOfRange { symbol: "eta", .. })
        ));
    }

    #[test]
    fn unknown_formula() {
        let resolver = Resolver::new(Catalog::standard());
        let mut request = request(economic_inputs(), None);
        request.formula_key = "nope".into();

        let err = calculate(&resolver, &request).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::Resolve(ResolveError::EquationNotFound(_))
        ));
    }
}
