//! Exact resolution of an equality for one symbol.
//!
//! The resolver talks to exact solvers through [`SymbolicSolver`], so a
//! full computer-algebra backend can be plugged in without touching the
//! numeric fallback or root selection. Two implementations ship here:
//!
//! - [`Isolation`] inverts the expression tree around a single occurrence of
//!   the unknown, producing every complex branch of integer powers.
//! - [`Disabled`] never produces candidates, forcing the numeric path.

use std::f64::consts::PI;

use num_complex::Complex64;
use thiserror::Error;

use crate::support::expr::{BinOp, Equality, Expr, Func};

use super::roots::is_real;

/// A candidate value produced by exact resolution.
pub type Candidate = Complex64;

/// Why an exact solver could not produce candidates.
///
/// The resolver logs these and falls back to the numeric strategy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolicError {
    #[error("`{variable}` occurs {count} times; only a single occurrence can be isolated")]
    RepeatedSymbol { variable: String, count: usize },

    #[error("cannot invert `{0}`")]
    Unsupported(String),

    #[error("the side without `{0}` does not reduce to a number")]
    NotNumeric(String),
}

/// An exact solver that returns candidate values for one symbol.
pub trait SymbolicSolver {
    /// Returns the candidates of `variable` that satisfy `equality`.
    ///
    /// Every other symbol has already been substituted. An empty list means
    /// "no exact solution found", not "no solution exists".
    ///
    /// # Errors
    ///
    /// Returns a [`SymbolicError`] if the equality is outside what this
    /// solver can handle.
    fn solve_for(
        &self,
        equality: &Equality,
        variable: &str,
    ) -> Result<Vec<Candidate>, SymbolicError>;
}

impl<S: SymbolicSolver + ?Sized> SymbolicSolver for &S {
    fn solve_for(
        &self,
        equality: &Equality,
        variable: &str,
    ) -> Result<Vec<Candidate>, SymbolicError> {
        (**self).solve_for(equality, variable)
    }
}

/// A solver that never finds an exact solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl SymbolicSolver for Disabled {
    fn solve_for(&self, _: &Equality, _: &str) -> Result<Vec<Candidate>, SymbolicError> {
        Ok(Vec::new())
    }
}

/// Solves by inverting operations around a single occurrence of the unknown.
///
/// Integer powers up to `max_power_branches` yield all their complex roots;
/// other powers and inverse trigonometric functions use principal branches.
/// Real candidates that do not satisfy the equality itself are dropped.
#[derive(Debug, Clone, Copy)]
pub struct Isolation {
    pub max_power_branches: u32,

    /// Tolerance on `|lhs - rhs|` relative to the larger side, when checking
    /// real candidates.
    pub check_tol: f64,
}

impl Default for Isolation {
    fn default() -> Self {
        Self {
            max_power_branches: 8,
            check_tol: 1e-9,
        }
    }
}

impl SymbolicSolver for Isolation {
    fn solve_for(
        &self,
        equality: &Equality,
        variable: &str,
    ) -> Result<Vec<Candidate>, SymbolicError> {
        let count = equality.occurrences(variable);
        if count != 1 {
            return Err(SymbolicError::RepeatedSymbol {
                variable: variable.to_string(),
                count,
            });
        }

        let (side, other) = if equality.lhs.contains(variable) {
            (&equality.lhs, &equality.rhs)
        } else {
            (&equality.rhs, &equality.lhs)
        };
        let value = constant(other, variable)?;

        let candidates = self.isolate(side, variable, vec![value])?;
        Ok(candidates
            .into_iter()
            .filter(|c| c.re.is_finite() && c.im.is_finite())
            .filter(|c| !is_real(c) || self.satisfies(equality, variable, c.re))
            .collect())
    }
}

impl Isolation {
    /// Peels operations off `expr` until only `variable` remains.
    ///
    /// `targets` holds the values `expr` must take.
    fn isolate(
        &self,
        expr: &Expr,
        variable: &str,
        targets: Vec<Candidate>,
    ) -> Result<Vec<Candidate>, SymbolicError> {
        match expr {
            Expr::Var(name) if name == variable => Ok(targets),
            Expr::Neg(inner) => self.isolate(inner, variable, targets.iter().map(|t| -t).collect()),
            Expr::Binary { op, lhs, rhs } => {
                let unknown_on_left = lhs.contains(variable);
                let (inner, known) = if unknown_on_left { (lhs, rhs) } else { (rhs, lhs) };
                let k = constant(known, variable)?;

                let next = match (op, unknown_on_left) {
                    (BinOp::Add, _) => targets.iter().map(|t| t - k).collect(),
                    (BinOp::Sub, true) => targets.iter().map(|t| t + k).collect(),
                    (BinOp::Sub, false) => targets.iter().map(|t| k - t).collect(),
                    (BinOp::Mul, _) if k == Candidate::new(0.0, 0.0) => Vec::new(),
                    (BinOp::Mul, _) => targets.iter().map(|t| t / k).collect(),
                    (BinOp::Div, true) => targets.iter().map(|t| t * k).collect(),
                    (BinOp::Div, false) => targets
                        .iter()
                        .filter(|t| t.norm() > 0.0)
                        .map(|t| k / t)
                        .collect(),
                    (BinOp::Pow, true) => targets
                        .iter()
                        .flat_map(|t| self.power_roots(*t, k.re))
                        .collect(),
                    (BinOp::Pow, false) => targets.iter().map(|t| t.ln() / k.ln()).collect(),
                };
                self.isolate(inner, variable, next)
            }
            Expr::Call { func, args } => {
                let (inner, next) = invert_call(*func, args, variable, &targets)?;
                self.isolate(inner, variable, next)
            }
            _ => Err(SymbolicError::Unsupported(format!("{expr:?}"))),
        }
    }

    /// All values `x` with `x ** exponent == t`.
    fn power_roots(&self, t: Candidate, exponent: f64) -> Vec<Candidate> {
        if exponent == 0.0 {
            return Vec::new();
        }
        let degree = exponent.round();
        let is_integer = (exponent - degree).abs() < 1e-12;
        if !is_integer || degree.abs() < 2.0 || degree.abs() > f64::from(self.max_power_branches) {
            return vec![t.powf(exponent.recip())];
        }

        let t = if degree < 0.0 { t.inv() } else { t };
        let n = degree.abs();
        let (radius, theta) = t.to_polar();
        let magnitude = radius.powf(n.recip());
        (0..self.max_power_branches)
            .map(f64::from)
            .take_while(|k| *k < n)
            .map(|k| Candidate::from_polar(magnitude, (theta + 2.0 * PI * k) / n))
            .collect()
    }

    fn satisfies(&self, equality: &Equality, variable: &str, x: f64) -> bool {
        let lookup = |name: &str| (name == variable).then_some(x);
        match (equality.lhs.eval(&lookup), equality.rhs.eval(&lookup)) {
            (Ok(lhs), Ok(rhs)) => {
                let scale = lhs.abs().max(rhs.abs());
                (lhs - rhs).abs() <= self.check_tol * scale
            }
            _ => false,
        }
    }
}

/// Inverts one function call, returning its argument and the new targets.
fn invert_call<'a>(
    func: Func,
    args: &'a [Expr],
    variable: &str,
    targets: &[Candidate],
) -> Result<(&'a Expr, Vec<Candidate>), SymbolicError> {
    let unsupported = || SymbolicError::Unsupported(format!("{}(..)", func.name()));

    match (func, args) {
        (Func::Log | Func::Ln, [arg]) => Ok((arg, targets.iter().map(|t| t.exp()).collect())),
        (Func::Log, [arg, base]) if !base.contains(variable) => {
            let base = constant(base, variable)?;
            Ok((arg, targets.iter().map(|t| (t * base.ln()).exp()).collect()))
        }
        (Func::Exp, [arg]) => Ok((
            arg,
            targets
                .iter()
                .filter(|t| t.norm() > 0.0)
                .map(|t| t.ln())
                .collect(),
        )),
        (Func::Sqrt, [arg]) => Ok((arg, targets.iter().map(|t| t * t).collect())),
        (Func::Abs, [arg]) => Ok((
            arg,
            targets
                .iter()
                .filter(|t| is_real(t) && t.re >= 0.0)
                .flat_map(|t| [Candidate::new(t.re, 0.0), Candidate::new(-t.re, 0.0)])
                .collect(),
        )),
        (Func::Sin, [arg]) => Ok((arg, targets.iter().map(|t| t.asin()).collect())),
        (Func::Cos, [arg]) => Ok((arg, targets.iter().map(|t| t.acos()).collect())),
        (Func::Tan, [arg]) => Ok((arg, targets.iter().map(|t| t.atan()).collect())),
        _ => Err(unsupported()),
    }
}

/// Evaluates a side that no longer contains the unknown.
fn constant(expr: &Expr, variable: &str) -> Result<Candidate, SymbolicError> {
    expr.eval_constant()
        .map(|value| Candidate::new(value, 0.0))
        .map_err(|_| SymbolicError::NotNumeric(variable.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::expr::parse_equality;

    fn real_parts(text: &str, variable: &str) -> Vec<f64> {
        let eq = parse_equality(text).unwrap();
        let mut out: Vec<f64> = Isolation::default()
            .solve_for(&eq, variable)
            .unwrap()
            .into_iter()
            .filter(is_real)
            .map(|c| c.re)
            .collect();
        out.sort_by(f64::total_cmp);
        out
    }

    #[test]
    fn linear() {
        let roots = real_parts("2 * x + 1 == 7", "x");
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 3.0);

        let roots = real_parts("0.04 == 8 / x", "x");
        assert_relative_eq!(roots[0], 200.0);
    }

    #[test]
    fn square_yields_both_branches() {
        let roots = real_parts("(x + 1)**2 == 9", "x");
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -4.0);
        assert_relative_eq!(roots[1], 2.0);
    }

    #[test]
    fn cube_root_of_negative_keeps_complex_branches() {
        let eq = parse_equality("x**3 == -8").unwrap();
        let candidates = Isolation::default().solve_for(&eq, "x").unwrap();
        assert_eq!(candidates.len(), 3);

        let reals = real_parts("x**3 == -8", "x");
        assert_eq!(reals.len(), 1);
        assert_relative_eq!(reals[0], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn fractional_power() {
        let roots = real_parts("h == 1.32 * (5)**0.25", "h");
        assert_relative_eq!(roots[0], 1.32 * 5f64.powf(0.25));

        let roots = real_parts("2 == x**0.5", "x");
        assert_relative_eq!(roots[0], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn functions_are_inverted() {
        assert_relative_eq!(real_parts("log(x) == 1", "x")[0], std::f64::consts::E);
        assert_relative_eq!(real_parts("log(x, 10) == 2", "x")[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(real_parts("exp(x) == 1", "x")[0], 0.0);
        assert_relative_eq!(real_parts("sqrt(x) == 3", "x")[0], 9.0);
        assert_eq!(real_parts("Abs(x) == 2", "x"), vec![-2.0, 2.0]);
        assert_relative_eq!(real_parts("2**x == 8", "x")[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn extraneous_roots_are_dropped() {
        // sqrt is never negative, so squaring the target is not enough.
        assert!(real_parts("sqrt(x) == -3", "x").is_empty());
        assert!(real_parts("sqrt(x) == -1e-10", "x").is_empty());
    }

    #[test]
    fn small_roots_are_kept() {
        let roots = real_parts("sqrt(x) == 1e-10", "x");
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 1e-20, max_relative = 1e-12);

        let roots = real_parts("e_c == 0.0004 / 10", "e_c");
        assert_relative_eq!(roots[0], 4e-5, max_relative = 1e-12);
    }

    #[test]
    fn repeated_symbol_is_declined() {
        let eq = parse_equality("x * x == 4").unwrap();
        let err = Isolation::default().solve_for(&eq, "x").unwrap_err();
        assert_eq!(
            err,
            SymbolicError::RepeatedSymbol {
                variable: "x".into(),
                count: 2
            }
        );
    }

    #[test]
    fn min_max_are_not_inverted() {
        let eq = parse_equality("max(x, 1) == 4").unwrap();
        let err = Isolation::default().solve_for(&eq, "x");
        assert!(matches!(err, Err(SymbolicError::Unsupported(_))));
    }

    #[test]
    fn disabled_finds_nothing() {
        let eq = parse_equality("x == 1").unwrap();
        assert!(Disabled.solve_for(&eq, "x").unwrap().is_empty());
    }
}
