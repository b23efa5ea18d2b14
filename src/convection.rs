//! Convection coefficient selection.
//!
//! The free-convection coefficient `h` depends on the flow regime, and each
//! regime has its own guarded correlation in the catalog. Candidates for a
//! [`RegimeContext`] are tried laminar first, then turbulent; the first one
//! whose restrictions hold is solved for `h`.

use std::{fmt, str::FromStr};

use thiserror::Error;
use tracing::debug;

use crate::{
    KnownValues,
    equation::{ResolveError, SymbolicSolver},
    resolver::Resolver,
};

/// The symbol every convection correlation is solved for.
pub const COEFFICIENT: &str = "h";

/// Where the surface meets the fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    Interior,
    Exterior,
}

/// Orientation of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Flow regime, in the order candidates are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Laminar,
    Turbulent,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Laminar, Regime::Turbulent];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Regime::Laminar => "laminar",
            Regime::Turbulent => "turbulent",
        }
    }
}

impl FlowType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FlowType::Interior => "interior",
            FlowType::Exterior => "exterior",
        }
    }
}

impl Orientation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flow type or orientation name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: `{value}`")]
pub struct RegimeParseError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for FlowType {
    type Err = RegimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interior" => Ok(FlowType::Interior),
            "exterior" => Ok(FlowType::Exterior),
            _ => Err(RegimeParseError {
                kind: "flow type",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Orientation {
    type Err = RegimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            _ => Err(RegimeParseError {
                kind: "orientation",
                value: s.to_string(),
            }),
        }
    }
}

/// Flow type and orientation; together they pick the candidate correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegimeContext {
    pub flow_type: FlowType,
    pub orientation: Orientation,
}

impl RegimeContext {
    #[must_use]
    pub fn new(flow_type: FlowType, orientation: Orientation) -> Self {
        Self {
            flow_type,
            orientation,
        }
    }

    /// Catalog keys to try, laminar first.
    #[must_use]
    pub fn candidate_keys(&self) -> Vec<String> {
        Regime::ALL
            .iter()
            .map(|regime| {
                format!(
                    "conv_{}_{}_{}",
                    self.flow_type.as_str(),
                    self.orientation.as_str(),
                    regime.as_str()
                )
            })
            .collect()
    }
}

/// Errors that can occur while selecting and solving a convection correlation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvectionError {
    #[error(
        "no applicable convection formula for {flow_type} {orientation} flow; \
         tried {candidates:?} with {values:?}"
    )]
    NoApplicableFormula {
        flow_type: FlowType,
        orientation: Orientation,
        candidates: Vec<String>,
        values: KnownValues,
    },

    #[error("convection formula failed")]
    Resolve(#[from] ResolveError),
}

/// Resolves `h` from the first applicable candidate for `regime`.
///
/// Any `h` among the known values is ignored.
pub(crate) fn resolve_coefficient<S: SymbolicSolver>(
    resolver: &Resolver<'_, S>,
    known: &KnownValues,
    regime: RegimeContext,
) -> Result<f64, ConvectionError> {
    let mut values = known.clone();
    values.remove(COEFFICIENT);

    let candidates = regime.candidate_keys();
    for key in &candidates {
        let Ok(spec) = resolver.lookup_formula(key) else {
            debug!(key, "convection candidate not in catalog");
            continue;
        };
        if !spec.is_guarded() {
            debug!(key, "convection candidate has no restrictions");
            continue;
        }
        if !resolver.evaluate_restrictions(spec.restrictions(), &values) {
            continue;
        }

        debug!(key, "convection formula selected");
        let outcome = resolver.resolve(key, &values, COEFFICIENT)?;
        return Ok(outcome.value);
    }

    Err(ConvectionError::NoApplicableFormula {
        flow_type: regime.flow_type,
        orientation: regime.orientation,
        candidates,
        values,
    })
}
