//! Solving a single equality for one unknown.
//!
//! Resolution runs in three stages:
//!
//! 1. **Preparation.** The template is parsed as exactly one `lhs == rhs`
//!    equality. The target is removed from the known values (it is never
//!    substituted, even if the caller supplied it), derived values such as
//!    `r = diameter / 2` are filled in, and every remaining known value is
//!    substituted.
//! 2. **Exact resolution.** Unless the formula is numeric-only, a
//!    [`SymbolicSolver`] proposes candidates and [`select_root`] picks a real
//!    one, preferring positive values.
//! 3. **Numeric fallback.** If exact resolution is skipped, fails, or finds
//!    no real candidate, Brent's method searches `[0, 10·r]` (with `r = 0.01` when
//!    unknown). Undefined residuals are clamped to a large sentinel so that
//!    evaluation at the boundary never aborts the search.

mod config;
mod error;
mod numeric;
mod roots;
mod substitute;
mod symbolic;

use tracing::debug;

use crate::{KnownValues, catalog::Strategy};

pub use config::{BracketConfig, SolveConfig};
pub use error::ResolveError;
pub use numeric::Bracket;
pub use roots::select_root;
pub use symbolic::{Candidate, Disabled, Isolation, SymbolicError, SymbolicSolver};

/// How a value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Symbolic,
    Numeric { iterations: usize },
}

/// A solved value together with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionOutcome {
    pub value: f64,
    pub method: Method,
}

impl ResolutionOutcome {
    /// Iterations used by the numeric fallback, if it ran.
    #[must_use]
    pub fn iterations(&self) -> Option<usize> {
        match self.method {
            Method::Symbolic => None,
            Method::Numeric { iterations } => Some(iterations),
        }
    }
}

/// Solves the equality `text` for `variable`.
///
/// # Errors
///
/// Returns a [`ResolveError`] if the text is not a single equality, if values
/// are missing, or if the numeric fallback cannot find a root.
pub fn solve_equation<S: SymbolicSolver + ?Sized>(
    text: &str,
    known: &KnownValues,
    variable: &str,
    strategy: Strategy,
    config: &SolveConfig,
    symbolic: &S,
) -> Result<ResolutionOutcome, ResolveError> {
    let substitute::Prepared { equality, values } = substitute::prepare(text, known, variable)?;

    match strategy {
        Strategy::Auto => match symbolic.solve_for(&equality, variable) {
            Ok(candidates) => {
                if let Some(value) = select_root(&candidates) {
                    debug!(variable, value, candidates = candidates.len(), "solved exactly");
                    return Ok(ResolutionOutcome {
                        value,
                        method: Method::Symbolic,
                    });
                }
                debug!(variable, candidates = candidates.len(), "no real exact candidate");
            }
            Err(err) => debug!(variable, %err, "exact resolution unavailable"),
        },
        Strategy::NumericOnly => debug!(variable, "numeric-only formula"),
    }

    numeric::solve(&equality, variable, &values, config)
}
