use crate::support::brent;

/// Configuration for equation resolution.
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    /// Maximum iteration count for the numeric fallback.
    pub max_iters: usize,

    /// Absolute tolerance on the root location for the numeric fallback.
    pub x_tol: f64,

    /// Magnitude substituted for NaN, infinite or failed residual samples.
    pub sentinel: f64,

    pub bracket: BracketConfig,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            max_iters: 50,
            x_tol: 1e-6,
            sentinel: 1e6,
            bracket: BracketConfig::default(),
        }
    }
}

impl SolveConfig {
    /// Converts this configuration into a Brent solver configuration.
    pub(super) fn brent(&self) -> brent::Config {
        brent::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.x_tol,
            x_rel_tol: 4.0 * f64::EPSILON,
        }
    }
}

/// How the numeric search interval is derived from the known values.
///
/// The interval is `[0, span × radius]`, anchored at zero thickness.
#[derive(Debug, Clone, Copy)]
pub struct BracketConfig {
    /// Symbol whose known value scales the interval.
    pub radius_symbol: &'static str,

    /// Radius used when `radius_symbol` has no known value.
    pub default_radius: f64,

    pub span: f64,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            radius_symbol: "r",
            default_radius: 0.01,
            span: 10.0,
        }
    }
}
