//! The resolver facade.
//!
//! A [`Resolver`] ties a [`Catalog`] to an exact solver and a numeric
//! configuration, and exposes the four core operations: formula lookup,
//! equation resolution, convection coefficient selection, and restriction
//! evaluation. It holds no mutable state, so one resolver can serve any
//! number of independent requests.

use tracing::debug;

use crate::{
    KnownValues,
    catalog::{Catalog, FormulaSpec, UnknownFormula},
    convection::{self, ConvectionError, RegimeContext},
    equation::{self, Isolation, ResolutionOutcome, ResolveError, SolveConfig, SymbolicSolver},
    restriction,
};

/// Resolves catalog formulas for a chosen unknown.
///
/// # Example
///
/// ```
/// use insulation_solver::{Catalog, KnownValues, Resolver, equation::Method};
///
/// let resolver = Resolver::new(Catalog::standard());
/// let known = KnownValues::from([("k".to_string(), 0.04), ("h".to_string(), 10.0)]);
///
/// let outcome = resolver.resolve("critical_thickness_flat", &known, "e_c").unwrap();
/// assert!((outcome.value - 0.004).abs() < 1e-12);
/// assert_eq!(outcome.method, Method::Symbolic);
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<'c, S = Isolation> {
    catalog: &'c Catalog,
    symbolic: S,
    config: SolveConfig,
}

impl<'c> Resolver<'c> {
    /// A resolver using the built-in isolation solver and default settings.
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            symbolic: Isolation::default(),
            config: SolveConfig::default(),
        }
    }
}

impl<'c, S: SymbolicSolver> Resolver<'c, S> {
    /// Replaces the exact solver.
    #[must_use]
    pub fn with_symbolic<T: SymbolicSolver>(self, symbolic: T) -> Resolver<'c, T> {
        Resolver {
            catalog: self.catalog,
            symbolic,
            config: self.config,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SolveConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    /// Looks up a formula by key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFormula`] if the catalog has no such key.
    pub fn lookup_formula(&self, key: &str) -> Result<&'c FormulaSpec, UnknownFormula> {
        self.catalog.lookup(key)
    }

    /// Solves formula `key` for `target` using the known values.
    ///
    /// A value for `target` in `known` is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if the key is unknown, values are missing,
    /// or no root can be found.
    pub fn resolve(
        &self,
        key: &str,
        known: &KnownValues,
        target: &str,
    ) -> Result<ResolutionOutcome, ResolveError> {
        let spec = self.lookup_formula(key)?;
        debug!(key, target, strategy = ?spec.strategy, "resolving formula");

        equation::solve_equation(
            spec.template,
            known,
            target,
            spec.strategy,
            &self.config,
            &self.symbolic,
        )
    }

    /// Resolves the convection coefficient `h` for a flow regime.
    ///
    /// # Errors
    ///
    /// Returns [`ConvectionError::NoApplicableFormula`] if no candidate's
    /// restrictions hold, or [`ConvectionError::Resolve`] if the selected
    /// correlation cannot be solved.
    pub fn resolve_convection_coefficient(
        &self,
        known: &KnownValues,
        regime: RegimeContext,
    ) -> Result<f64, ConvectionError> {
        convection::resolve_coefficient(self, known, regime)
    }

    /// Returns `true` if no restriction evaluates to `false`.
    pub fn evaluate_restrictions(
        &self,
        restrictions: &[impl AsRef<str>],
        known: &KnownValues,
    ) -> bool {
        restriction::evaluate(restrictions, known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        convection::{FlowType, Orientation},
        equation::{Disabled, Method},
        test_support::{init_tracing, known},
    };

    #[test]
    fn unknown_key() {
        let resolver = Resolver::new(Catalog::standard());
        let err = resolver
            .resolve("unknown_key", &KnownValues::new(), "e")
            .unwrap_err();
        assert!(matches!(err, ResolveError::EquationNotFound(UnknownFormula { key }) if key == "unknown_key"));
    }

    #[test]
    fn economic_thickness_flat_takes_the_positive_branch() {
        init_tracing();
        let resolver = Resolver::new(Catalog::standard());
        let values = known(&[
            ("k", 0.04),
            ("h", 10.0),
            ("Ti", 150.0),
            ("Ta", 20.0),
            ("w", 0.1),
            ("beta", 8000.0),
            ("life", 10.0),
            ("eta", 0.9),
            ("C", 1000.0),
        ]);

        let outcome = resolver
            .resolve("economic_thickness_flat", &values, "e")
            .unwrap();

        let rhs: f64 = 130.0 * 0.04 * 0.1 * 8000.0 * 10.0 * 0.9 / 1000.0 * 1e-3;
        assert_eq!(outcome.method, Method::Symbolic);
        assert_relative_eq!(outcome.value, rhs.sqrt() - 0.004, epsilon = 1e-12);
        assert!(outcome.value > 0.0);
    }

    #[test]
    fn chilled_flat_wall_has_no_thickness() {
        let resolver = Resolver::new(Catalog::standard());
        let values = known(&[
            ("k", 0.04),
            ("h", 10.0),
            ("Ti", 5.0),
            ("Ta", 20.0),
            ("w", 0.1),
            ("beta", 8000.0),
            ("life", 10.0),
            ("eta", 0.9),
            ("C", 1000.0),
        ]);

        // Ti < Ta makes the right-hand side negative: both square roots are complex.
        let err = resolver
            .resolve("economic_thickness_flat", &values, "e")
            .unwrap_err();
        assert!(matches!(err, ResolveError::NoRootInBracket { variable, .. } if variable == "e"));
    }

    #[test]
    fn cylinder_is_numeric() {
        let resolver = Resolver::new(Catalog::standard());
        let values = known(&[
            ("k", 0.04),
            ("h", 10.0),
            ("Ti", 150.0),
            ("Ta", 20.0),
            ("w", 0.1),
            ("beta", 8000.0),
            ("life", 10.0),
            ("eta", 0.9),
            ("C", 1000.0),
            ("diameter", 0.1),
        ]);

        let outcome = resolver
            .resolve("economic_thickness_cylinder", &values, "e")
            .unwrap();
        assert!(outcome.iterations().is_some());
        assert!(outcome.value > 0.0 && outcome.value < 0.5);
    }

    #[test]
    fn direct_resolution_ignores_restrictions() {
        let resolver = Resolver::new(Catalog::standard());
        let values = known(&[("Te", 30.0), ("Ta", 20.0), ("H", 2.0)]);

        let outcome = resolver
            .resolve("conv_interior_vertical_laminar", &values, "h")
            .unwrap();
        assert_relative_eq!(outcome.value, 1.32 * 5f64.powf(0.25), epsilon = 1e-12);
        assert_relative_eq!(outcome.value, 1.974, epsilon = 1e-3);
        assert_eq!(outcome.method, Method::Symbolic);
    }

    #[test]
    fn critical_radius_sphere() {
        let resolver = Resolver::new(Catalog::standard());
        let outcome = resolver
            .resolve("critical_radius_sphere", &known(&[("k", 0.05), ("h", 5.0)]), "r_c")
            .unwrap();
        assert_relative_eq!(outcome.value, 0.02);
    }

    #[test]
    fn disabled_symbolic_solver() {
        let resolver = Resolver::new(Catalog::standard()).with_symbolic(Disabled);
        let outcome = resolver
            .resolve("critical_thickness_flat", &known(&[("k", 0.04), ("h", 10.0)]), "e_c")
            .unwrap();
        assert_relative_eq!(outcome.value, 0.004, epsilon = 1e-6);
        assert!(matches!(outcome.method, Method::Numeric { .. }));
    }

    #[test]
    fn convection_through_the_facade() {
        let resolver = Resolver::new(Catalog::standard());
        let values = known(&[("Te", 30.0), ("Ta", 25.0), ("H", 1.0)]);
        let regime = RegimeContext::new(FlowType::Interior, Orientation::Horizontal);

        let h = resolver.resolve_convection_coefficient(&values, regime).unwrap();
        assert_relative_eq!(h, 1.25 * 5f64.powf(0.25), epsilon = 1e-9);
    }

    #[test]
    fn restrictions_through_the_facade() {
        let resolver = Resolver::new(Catalog::standard());
        let spec = resolver.lookup_formula("conv_exterior_horizontal_turbulent").unwrap();

        assert!(resolver.evaluate_restrictions(spec.restrictions(), &known(&[("v", 5.0), ("H", 2.0)])));
        assert!(!resolver.evaluate_restrictions(spec.restrictions(), &known(&[("v", 1.0), ("H", 2.0)])));
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver<'static>>();
    }
}
