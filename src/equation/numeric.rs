use tracing::{debug, trace};

use crate::{
    KnownValues,
    support::{brent, expr::Equality},
};

use super::{BracketConfig, Method, ResolutionOutcome, ResolveError, SolveConfig};

/// Number of evenly spaced residual samples logged before each search.
const DIAGNOSTIC_SAMPLES: usize = 11;

/// The closed interval searched by the numeric fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub low: f64,
    pub high: f64,
}

impl Bracket {
    /// `[0, span × r]`, with `r` taken from `values` when known.
    #[must_use]
    pub fn from_values(values: &KnownValues, config: &BracketConfig) -> Self {
        let radius = values
            .get(config.radius_symbol)
            .copied()
            .unwrap_or(config.default_radius);
        Self {
            low: 0.0,
            high: config.span * radius,
        }
    }

    fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        let step = (self.high - self.low) / (DIAGNOSTIC_SAMPLES - 1) as f64;
        (0..DIAGNOSTIC_SAMPLES).map(move |i| self.low + step * i as f64)
    }
}

/// Finds a root of `equality` in `variable` with Brent's method.
///
/// Residual evaluations that fail or are not finite are replaced by
/// `config.sentinel`.
pub(super) fn solve(
    equality: &Equality,
    variable: &str,
    values: &KnownValues,
    config: &SolveConfig,
) -> Result<ResolutionOutcome, ResolveError> {
    let bracket = Bracket::from_values(values, &config.bracket);
    let residual = |x: f64| match equality.residual_at(variable, x) {
        Ok(f) if f.is_finite() => f,
        _ => config.sentinel,
    };

    for x in bracket.samples() {
        trace!(variable, x, f = residual(x), "residual sample");
    }

    let Bracket { low, high } = bracket;
    let (f_low, f_high) = (residual(low), residual(high));
    if f_low * f_high > 0.0 {
        debug!(variable, low, high, f_low, f_high, "residual does not change sign");
        return Err(ResolveError::NoRootInBracket {
            variable: variable.to_string(),
            low,
            high,
            f_low,
            f_high,
        });
    }

    let solution = brent::solve(residual, [low, high], &config.brent())?;
    match solution.status {
        brent::Status::Converged => {
            debug!(variable, x = solution.x, iters = solution.iters, "numeric root found");
            Ok(ResolutionOutcome {
                value: solution.x,
                method: Method::Numeric {
                    iterations: solution.iters,
                },
            })
        }
        brent::Status::MaxIters => Err(ResolveError::NotConverged {
            variable: variable.to_string(),
            iterations: solution.iters,
            low,
            high,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{support::expr::parse_equality, test_support::known};

    #[test]
    fn bracket_scales_with_radius() {
        let config = BracketConfig::default();

        let bracket = Bracket::from_values(&KnownValues::new(), &config);
        assert_eq!(bracket.low, 0.0);
        assert_relative_eq!(bracket.high, 0.1);

        let bracket = Bracket::from_values(&known(&[("r", 0.02)]), &config);
        assert_relative_eq!(bracket.high, 0.2);
    }

    #[test]
    fn samples_cover_the_bracket() {
        let bracket = Bracket { low: 0.0, high: 1.0 };
        let samples: Vec<_> = bracket.samples().collect();
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0], 0.0);
        assert_relative_eq!(samples[10], 1.0);
    }

    #[test]
    fn root_inside_bracket() {
        let eq = parse_equality("x**2 == 0.0025").unwrap();
        let outcome = solve(&eq, "x", &KnownValues::new(), &SolveConfig::default()).unwrap();

        assert_relative_eq!(outcome.value, 0.05, epsilon = 1e-6);
        assert!(matches!(outcome.method, Method::Numeric { iterations } if iterations > 0));
    }

    #[test]
    fn no_sign_change_reports_both_ends() {
        let eq = parse_equality("x == 5").unwrap();
        let err = solve(&eq, "x", &KnownValues::new(), &SolveConfig::default()).unwrap_err();

        let ResolveError::NoRootInBracket {
            low,
            high,
            f_low,
            f_high,
            ..
        } = err
        else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(low, 0.0);
        assert_relative_eq!(high, 0.1);
        assert_relative_eq!(f_low, -5.0);
        assert_relative_eq!(f_high, -4.9);
    }

    #[test]
    fn undefined_residuals_use_the_sentinel() {
        // log(0) is -inf at the lower end, replaced by +1e6.
        let eq = parse_equality("log(x) == -10").unwrap();
        let err = solve(&eq, "x", &KnownValues::new(), &SolveConfig::default()).unwrap_err();
        assert!(matches!(err, ResolveError::NoRootInBracket { f_low, .. } if f_low == 1e6));
    }

    #[test]
    fn iteration_budget() {
        let eq = parse_equality("x**3 == 0.000123").unwrap();
        let config = SolveConfig {
            max_iters: 2,
            x_tol: 1e-15,
            ..SolveConfig::default()
        };
        let err = solve(&eq, "x", &KnownValues::new(), &config).unwrap_err();
        assert!(matches!(err, ResolveError::NotConverged { iterations: 2, .. }));
    }
}
