use thiserror::Error;

use crate::{
    KnownValues,
    catalog::UnknownFormula,
    support::{brent, expr::ParseError},
};

/// Errors that can occur while resolving an equation for one symbol.
///
/// Unavailable or empty exact resolution is never reported here; the
/// resolver falls back to the numeric strategy instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The formula key is not in the catalog.
    #[error(transparent)]
    EquationNotFound(#[from] UnknownFormula),

    /// The text is not a single parseable equality.
    #[error("invalid equation `{equation}`: {source}")]
    InvalidEquation {
        equation: String,
        #[source]
        source: ParseError,
    },

    /// Substituting the known values removed every occurrence of the target.
    #[error("`{equation}` no longer depends on `{variable}` after substituting {known:?}")]
    VariableStillUnknown {
        equation: String,
        variable: String,
        known: KnownValues,
    },

    /// Symbols other than the target are still unbound after substitution.
    #[error("cannot solve `{equation}` for `{variable}`: missing values for {missing:?}")]
    MissingValues {
        equation: String,
        variable: String,
        missing: Vec<String>,
    },

    /// The residual does not change sign across the search bracket.
    #[error(
        "no root for `{variable}` in [{low}, {high}]: f({low})={f_low}, f({high})={f_high}; \
         check the input values"
    )]
    NoRootInBracket {
        variable: String,
        low: f64,
        high: f64,
        f_low: f64,
        f_high: f64,
    },

    /// The numeric search used its whole iteration budget.
    #[error("numeric solve for `{variable}` did not converge after {iterations} iterations in [{low}, {high}]")]
    NotConverged {
        variable: String,
        iterations: usize,
        low: f64,
        high: f64,
    },

    /// The root search rejected its configuration.
    #[error("root search failed")]
    Solver(#[from] brent::Error),
}
