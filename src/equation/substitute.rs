use tracing::debug;

use crate::{
    KnownValues,
    support::expr::{Equality, extract_symbols, parse_equality},
};

use super::ResolveError;

/// A value computed from another known value when the template needs it.
struct DerivedRule {
    symbol: &'static str,
    source: &'static str,
    compute: fn(f64) -> f64,
}

const DERIVED: &[DerivedRule] = &[DerivedRule {
    symbol: "r",
    source: "diameter",
    compute: |diameter| diameter / 2.0,
}];

/// An equality ready to solve: parsed, with every known value substituted.
#[derive(Debug)]
pub(super) struct Prepared {
    pub(super) equality: Equality,

    /// Values actually used, derived ones included and the target excluded.
    pub(super) values: KnownValues,
}

/// Parses `text` and substitutes the known values, never the target.
///
/// # Errors
///
/// - [`ResolveError::InvalidEquation`] unless `text` is a single equality.
/// - [`ResolveError::VariableStillUnknown`] if the target disappears.
/// - [`ResolveError::MissingValues`] if other symbols stay unbound.
pub(super) fn prepare(
    text: &str,
    known: &KnownValues,
    variable: &str,
) -> Result<Prepared, ResolveError> {
    let equality = parse_equality(text).map_err(|source| ResolveError::InvalidEquation {
        equation: text.to_string(),
        source,
    })?;

    let mut values = known.clone();
    if values.remove(variable).is_some() {
        debug!(variable, "removed the unknown from the known values");
    }
    apply_derived(text, variable, &mut values);

    let equality = equality.substitute(&values);
    debug!(equation = text, variable, ?values, "substituted known values");

    if !equality.contains(variable) {
        return Err(ResolveError::VariableStillUnknown {
            equation: text.to_string(),
            variable: variable.to_string(),
            known: values,
        });
    }

    let missing: Vec<String> = equality
        .symbols()
        .into_iter()
        .filter(|symbol| symbol != variable)
        .collect();
    if !missing.is_empty() {
        return Err(ResolveError::MissingValues {
            equation: text.to_string(),
            variable: variable.to_string(),
            missing,
        });
    }

    Ok(Prepared { equality, values })
}

fn apply_derived(text: &str, variable: &str, values: &mut KnownValues) {
    let required = extract_symbols(text);
    for rule in DERIVED {
        if rule.symbol == variable
            || !required.contains(rule.symbol)
            || values.contains_key(rule.symbol)
        {
            continue;
        }
        if let Some(&source) = values.get(rule.source) {
            let value = (rule.compute)(source);
            debug!(symbol = rule.symbol, from = rule.source, value, "derived value");
            values.insert(rule.symbol.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_support::known;

    #[test]
    fn target_is_stripped_before_substitution() {
        let known = known(&[("h", 99.0), ("k", 0.04), ("e_c", 0.004)]);
        let prepared = prepare("e_c == k / h", &known, "h").unwrap();

        assert!(!prepared.values.contains_key("h"));
        assert!(prepared.equality.contains("h"));

        // Stripping twice changes nothing.
        let again = prepare("e_c == k / h", &prepared.values, "h").unwrap();
        assert_eq!(again.values, prepared.values);
        assert_eq!(again.equality, prepared.equality);
    }

    #[test]
    fn radius_from_diameter() {
        let known = known(&[("diameter", 0.1), ("k", 1.0)]);
        let prepared = prepare("e == r * k", &known, "e").unwrap();
        assert_eq!(prepared.values.get("r"), Some(&0.05));
    }

    #[test]
    fn known_radius_wins_over_diameter() {
        let known = known(&[("diameter", 0.1), ("r", 0.2)]);
        let prepared = prepare("e == r", &known, "e").unwrap();
        assert_eq!(prepared.values.get("r"), Some(&0.2));
    }

    #[test]
    fn radius_is_not_derived_when_solving_for_it() {
        let known = known(&[("diameter", 0.1), ("k", 1.0)]);
        let err = prepare("e == r * k", &known, "r").unwrap_err();
        assert!(matches!(err, ResolveError::MissingValues { missing, .. } if missing == ["e"]));
    }

    #[test]
    fn equality_count_is_checked() {
        for text in ["h + 1", "a == b == c"] {
            let err = prepare(text, &KnownValues::new(), "h").unwrap_err();
            assert!(matches!(err, ResolveError::InvalidEquation { .. }), "{text}");
        }
    }

    #[test]
    fn target_absent_from_equation() {
        let err = prepare("y == 2 * x", &known(&[("x", 1.0), ("y", 2.0)]), "z").unwrap_err();
        assert!(matches!(err, ResolveError::VariableStillUnknown { variable, .. } if variable == "z"));
    }
}
