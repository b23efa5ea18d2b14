//! Brent's method for bracketed scalar root finding.
//!
//! Combines bisection, secant steps and inverse quadratic interpolation.
//! Each iteration keeps a sign change between the current estimate and a
//! "block" point, so the root stays bracketed while the fast steps converge
//! superlinearly on smooth residuals.

use thiserror::Error;

/// Solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Maximum iteration count.
    pub max_iters: usize,

    /// Absolute tolerance on the root location.
    pub x_abs_tol: f64,

    /// Relative tolerance on the root location.
    pub x_rel_tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            x_abs_tol: 2e-12,
            x_rel_tol: 4.0 * f64::EPSILON,
        }
    }
}

/// Outcome of a Brent solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Converged,
    MaxIters,
}

/// The best estimate found by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub x: f64,
    pub residual: f64,
    pub iters: usize,
    pub status: Status,
}

/// Errors that prevent the solver from starting.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("residual has the same sign at both ends: f({low})={f_low}, f({high})={f_high}")]
    NotBracketed {
        low: f64,
        high: f64,
        f_low: f64,
        f_high: f64,
    },

    #[error("invalid tolerance: abs={abs}, rel={rel}")]
    InvalidTolerance { abs: f64, rel: f64 },
}

/// Finds a root of `f` within `bracket`.
///
/// A non-converged run is reported through [`Status::MaxIters`] rather than
/// an error, so callers still see the best estimate and iteration count.
///
/// # Example
///
/// ```
/// use insulation_solver::support::brent::{self, Status};
///
/// let solution = brent::solve(|x| x * x - 2.0, [0.0, 2.0], &brent::Config::default()).unwrap();
/// assert_eq!(solution.status, Status::Converged);
/// assert!((solution.x - 2f64.sqrt()).abs() < 1e-10);
/// ```
///
/// # Errors
///
/// Returns [`Error::NotBracketed`] if `f` has the same strict sign at both
/// ends, or [`Error::InvalidTolerance`] for a negative or non-finite
/// tolerance.
pub fn solve(
    mut f: impl FnMut(f64) -> f64,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution, Error> {
    let Config {
        max_iters,
        x_abs_tol,
        x_rel_tol,
    } = *config;
    if !(x_abs_tol >= 0.0 && x_rel_tol >= 0.0 && x_abs_tol.is_finite() && x_rel_tol.is_finite())
    {
        return Err(Error::InvalidTolerance {
            abs: x_abs_tol,
            rel: x_rel_tol,
        });
    }

    let [mut x_pre, mut x_cur] = bracket;
    let mut f_pre = f(x_pre);
    let mut f_cur = f(x_cur);

    if f_pre * f_cur > 0.0 {
        return Err(Error::NotBracketed {
            low: x_pre,
            high: x_cur,
            f_low: f_pre,
            f_high: f_cur,
        });
    }
    if f_pre == 0.0 {
        return Ok(converged(x_pre, f_pre, 0));
    }
    if f_cur == 0.0 {
        return Ok(converged(x_cur, f_cur, 0));
    }

    let (mut x_blk, mut f_blk) = (0.0, 0.0);
    let (mut s_pre, mut s_cur) = (0.0_f64, 0.0_f64);

    for iter in 1..=max_iters {
        if f_pre != 0.0 && f_cur != 0.0 && (f_pre.is_sign_negative() != f_cur.is_sign_negative())
        {
            x_blk = x_pre;
            f_blk = f_pre;
            s_cur = x_cur - x_pre;
            s_pre = s_cur;
        }
        if f_blk.abs() < f_cur.abs() {
            x_pre = x_cur;
            x_cur = x_blk;
            x_blk = x_pre;

            f_pre = f_cur;
            f_cur = f_blk;
            f_blk = f_pre;
        }

        let delta = (x_abs_tol + x_rel_tol * x_cur.abs()) / 2.0;
        let s_bis = (x_blk - x_cur) / 2.0;
        if f_cur == 0.0 || s_bis.abs() < delta {
            return Ok(converged(x_cur, f_cur, iter));
        }

        if s_pre.abs() > delta && f_cur.abs() < f_pre.abs() {
            let s_try = if x_pre == x_blk {
                // Secant.
                -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
            } else {
                // Inverse quadratic interpolation.
                let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
            };

            if 2.0 * s_try.abs() < s_pre.abs().min(3.0 * s_bis.abs() - delta) {
                s_pre = s_cur;
                s_cur = s_try;
            } else {
                s_pre = s_bis;
                s_cur = s_bis;
            }
        } else {
            s_pre = s_bis;
            s_cur = s_bis;
        }

        x_pre = x_cur;
        f_pre = f_cur;
        if s_cur.abs() > delta {
            x_cur += s_cur;
        } else {
            x_cur += if s_bis > 0.0 { delta } else { -delta };
        }
        f_cur = f(x_cur);
    }

    Ok(Solution {
        x: x_cur,
        residual: f_cur,
        iters: max_iters,
        status: Status::MaxIters,
    })
}

fn converged(x: f64, residual: f64, iters: usize) -> Solution {
    Solution {
        x,
        residual,
        iters,
        status: Status::Converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn config(max_iters: usize, tol: f64) -> Config {
        Config {
            max_iters,
            x_abs_tol: tol,
            x_rel_tol: 4.0 * f64::EPSILON,
        }
    }

    #[test]
    fn finds_cubic_root() {
        let solution = solve(|x| x.powi(3) - x - 2.0, [1.0, 2.0], &config(50, 1e-10)).unwrap();
        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 1.521_379_706_804_567_6, epsilon = 1e-9);
        assert!(solution.iters > 0 && solution.iters < 50);
    }

    #[test]
    fn transcendental_residual() {
        let solution = solve(|x| x.cos() - x, [0.0, 1.0], &config(50, 1e-12)).unwrap();
        assert_relative_eq!(solution.x, 0.739_085_133_215_160_6, epsilon = 1e-10);
    }

    #[test]
    fn reversed_bracket() {
        let solution = solve(|x| x - 0.25, [1.0, 0.0], &config(50, 1e-12)).unwrap();
        assert_relative_eq!(solution.x, 0.25, epsilon = 1e-10);
    }

    #[test]
    fn root_on_boundary_needs_no_iterations() {
        let solution = solve(|x| x * (x - 3.0), [0.0, 1.0], &config(50, 1e-6)).unwrap();
        assert_eq!(solution.x, 0.0);
        assert_eq!(solution.iters, 0);
        assert_eq!(solution.status, Status::Converged);
    }

    #[test]
    fn same_sign_is_rejected() {
        let err = solve(|x| x * x + 1.0, [-1.0, 2.0], &config(50, 1e-6)).unwrap_err();
        assert_eq!(
            err,
            Error::NotBracketed {
                low: -1.0,
                high: 2.0,
                f_low: 2.0,
                f_high: 5.0
            }
        );
    }

    #[test]
    fn iteration_budget_is_reported() {
        let solution = solve(|x| x.powi(3) - x - 2.0, [1.0, 2.0], &config(2, 1e-14)).unwrap();
        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 2);
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err = solve(|x| x, [-1.0, 1.0], &config(10, -1.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidTolerance { .. }));
    }
}
