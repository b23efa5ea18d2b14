//! # Insulation Solver
//!
//! Solves thermal insulation design equations for any one unknown.
//!
//! A static [`Catalog`] holds named formulas: economic insulation thickness
//! for flat, cylindrical and spherical geometries, critical thickness and
//! radius, and free- and forced-convection correlations for the surface
//! coefficient `h`. Given a formula key, a map of known values and the symbol
//! to solve for, a [`Resolver`] substitutes what is known and solves for the
//! rest, exactly when the equality can be inverted and numerically otherwise.
//!
//! ## Crate layout
//!
//! - [`catalog`]: Formula definitions and lookup.
//! - [`equation`]: Resolution of one equality for one symbol.
//! - [`restriction`]: Applicability checks for guarded formulas.
//! - [`convection`]: Flow regimes and convection coefficient selection.
//! - [`resolver`]: The facade tying the pieces together.
//! - [`calculation`] and [`sweep`]: Single-point and multi-point requests
//!   that compute `h` automatically when it is missing.
//! - [`support`]: Expression parsing, Brent's method and numeric constraints.
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable.
//!
//! ## Example
//!
//! ```
//! use insulation_solver::{Catalog, KnownValues, Resolver};
//! use insulation_solver::convection::{FlowType, Orientation, RegimeContext};
//!
//! let resolver = Resolver::new(Catalog::standard());
//! let known = KnownValues::from([
//!     ("Te".to_string(), 30.0),
//!     ("Ta".to_string(), 20.0),
//!     ("H".to_string(), 2.0),
//! ]);
//! let regime = RegimeContext::new(FlowType::Interior, Orientation::Vertical);
//!
//! // H³·ΔT = 80 is past the laminar limit, so the turbulent correlation applies.
//! let h = resolver.resolve_convection_coefficient(&known, regime).unwrap();
//! assert!((h - 1.74 * 10f64.cbrt()).abs() < 1e-9);
//! ```

use std::collections::BTreeMap;

pub mod calculation;
pub mod catalog;
pub mod convection;
pub mod equation;
pub mod resolver;
pub mod restriction;
pub mod support;
pub mod sweep;

#[cfg(test)]
mod test_support;

pub use catalog::{Catalog, FormulaSpec};
pub use equation::ResolutionOutcome;
pub use resolver::Resolver;

/// Values of known symbols, keyed by name.
pub type KnownValues = BTreeMap<String, f64>;
