//! Static formula catalog.
//!
//! Every entry is a [`FormulaSpec`]: an equality template, an optional list
//! of restrictions gating its applicability, and the metadata the resolver
//! needs (designated output symbol, solve strategy, whether the formula
//! consumes an auto-computed convection coefficient).
//!
//! The [standard catalog](Catalog::standard) is built once on first use and
//! never mutated. Custom catalogs can be assembled with
//! [`Catalog::from_specs`] and are equally immutable after construction.

mod entries;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use thiserror::Error;

static STANDARD: Lazy<Catalog> = Lazy::new(|| Catalog::from_specs(entries::standard()));

/// How the resolver may solve a formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Exact resolution first, numeric fallback if it yields nothing.
    #[default]
    Auto,

    /// Skip exact resolution entirely.
    ///
    /// Used for multi-term implicit forms where exact resolution is either
    /// intractable or returns unreliable branches.
    NumericOnly,
}

/// Whether a formula is gated by applicability restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bare,
    Guarded {
        restrictions: &'static [&'static str],
    },
}

/// A named formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaSpec {
    pub key: &'static str,
    pub template: &'static str,
    pub shape: Shape,

    /// The symbol this formula is normally solved for.
    pub output: &'static str,

    pub strategy: Strategy,

    /// The formula takes the convection coefficient `h` as an input that can
    /// be computed by the regime selector when the caller does not give it.
    pub needs_convection: bool,
}

impl FormulaSpec {
    /// A formula without restrictions.
    #[must_use]
    pub const fn bare(key: &'static str, template: &'static str, output: &'static str) -> Self {
        Self {
            key,
            template,
            shape: Shape::Bare,
            output,
            strategy: Strategy::Auto,
            needs_convection: false,
        }
    }

    /// A formula gated by `restrictions`.
    #[must_use]
    pub const fn guarded(
        key: &'static str,
        template: &'static str,
        restrictions: &'static [&'static str],
        output: &'static str,
    ) -> Self {
        Self {
            key,
            template,
            shape: Shape::Guarded { restrictions },
            output,
            strategy: Strategy::Auto,
            needs_convection: false,
        }
    }

    #[must_use]
    pub const fn numeric_only(mut self) -> Self {
        self.strategy = Strategy::NumericOnly;
        self
    }

    #[must_use]
    pub const fn with_convection(mut self) -> Self {
        self.needs_convection = true;
        self
    }

    /// The restriction list; empty for bare formulas.
    #[must_use]
    pub fn restrictions(&self) -> &'static [&'static str] {
        match self.shape {
            Shape::Bare => &[],
            Shape::Guarded { restrictions } => restrictions,
        }
    }

    #[must_use]
    pub fn is_guarded(&self) -> bool {
        matches!(self.shape, Shape::Guarded { .. })
    }
}

/// Lookup of a key the catalog does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("equation not found: `{key}`")]
pub struct UnknownFormula {
    pub key: String,
}

/// A read-only collection of formulas keyed by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: BTreeMap<&'static str, FormulaSpec>,
}

impl Catalog {
    /// The built-in insulation and convection formulas.
    #[must_use]
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Builds a catalog from the given formulas.
    ///
    /// A later formula with the same key replaces an earlier one.
    pub fn from_specs(specs: impl IntoIterator<Item = FormulaSpec>) -> Self {
        Self {
            specs: specs.into_iter().map(|spec| (spec.key, spec)).collect(),
        }
    }

    /// Looks up a formula by key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFormula`] if no formula has this key.
    pub fn lookup(&self, key: &str) -> Result<&FormulaSpec, UnknownFormula> {
        self.specs.get(key).ok_or_else(|| UnknownFormula {
            key: key.to_string(),
        })
    }

    /// Iterates over all formulas in key order.
    pub fn iter(&self) -> impl Iterator<Item = &FormulaSpec> {
        self.specs.values()
    }

    /// Human-readable descriptions of the catalog's symbols.
    #[must_use]
    pub fn legend() -> &'static [(&'static str, &'static str)] {
        entries::LEGEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::support::expr::{extract_symbols, parse_condition, parse_equality};

    #[test]
    fn unknown_key() {
        let err = Catalog::standard().lookup("unknown_key").unwrap_err();
        assert_eq!(err.key, "unknown_key");
        assert_eq!(err.to_string(), "equation not found: `unknown_key`");
    }

    #[test]
    fn bare_and_guarded_coexist() {
        let catalog = Catalog::standard();

        let flat = catalog.lookup("economic_thickness_flat").unwrap();
        assert!(!flat.is_guarded());
        assert!(flat.restrictions().is_empty());
        assert!(flat.needs_convection);

        let laminar = catalog.lookup("conv_interior_vertical_laminar").unwrap();
        assert!(laminar.is_guarded());
        assert_eq!(laminar.restrictions().len(), 3);
        assert_eq!(laminar.output, "h");
    }

    #[test]
    fn multi_term_forms_are_numeric_only() {
        let catalog = Catalog::standard();
        for key in ["economic_thickness_cylinder", "economic_thickness_sphere"] {
            assert_eq!(catalog.lookup(key).unwrap().strategy, Strategy::NumericOnly);
        }
        assert_eq!(
            catalog.lookup("economic_thickness_flat").unwrap().strategy,
            Strategy::Auto
        );
    }

    #[test]
    fn every_entry_parses_and_references_its_output() {
        for spec in Catalog::standard().iter() {
            let eq = parse_equality(spec.template).unwrap();
            assert!(eq.contains(spec.output), "{}", spec.key);
            for restriction in spec.restrictions() {
                assert!(parse_condition(restriction).is_ok(), "{restriction}");
            }
        }
    }

    #[test]
    fn legend_covers_catalog_inputs() {
        let legend: Vec<_> = Catalog::legend().iter().map(|(symbol, _)| *symbol).collect();
        for spec in Catalog::standard().iter() {
            for symbol in extract_symbols(spec.template) {
                assert!(legend.contains(&symbol.as_str()), "{symbol} in {}", spec.key);
            }
        }
    }

    #[test]
    fn custom_catalogs() {
        let catalog = Catalog::from_specs([FormulaSpec::bare("double", "y == 2 * x", "y")]);
        assert_eq!(catalog.iter().count(), 1);
        assert_eq!(catalog.lookup("double").unwrap().template, "y == 2 * x");
    }
}
