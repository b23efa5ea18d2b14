//! Applicability checks for guarded formulas.
//!
//! A restriction is a boolean expression over the formula's inputs, such as
//! `v * H <= 8`. A list of restrictions passes when none of them evaluates to
//! `false`. Restrictions that mention a value the caller has not provided are
//! indeterminate and skipped, while anything that fails to parse or evaluate
//! makes the whole list fail.

use tracing::{debug, trace};

use crate::{
    KnownValues,
    support::expr::{Condition, parse_condition},
};

/// Returns `true` if no restriction evaluates to `false`.
///
/// An empty list always passes.
///
/// # Example
///
/// ```
/// use insulation_solver::{KnownValues, restriction};
///
/// let known = KnownValues::from([("v".to_string(), 2.0), ("H".to_string(), 1.5)]);
/// assert!(restriction::evaluate(&["v * H <= 8", "v > 0"], &known));
/// assert!(!restriction::evaluate(&["v * H > 8"], &known));
///
/// // `Te` and `Ta` are unknown, so the restriction is skipped.
/// assert!(restriction::evaluate(&["Te - Ta <= 100"], &known));
/// ```
pub fn evaluate(restrictions: &[impl AsRef<str>], known: &KnownValues) -> bool {
    for restriction in restrictions {
        let text = restriction.as_ref();
        match check(text, known) {
            Verdict::Pass => trace!(restriction = text, "restriction holds"),
            Verdict::Indeterminate(missing) => {
                debug!(restriction = text, ?missing, "restriction skipped");
            }
            Verdict::Fail => {
                debug!(restriction = text, "restriction violated");
                return false;
            }
            Verdict::Invalid(reason) => {
                debug!(restriction = text, %reason, "restriction could not be evaluated");
                return false;
            }
        }
    }
    true
}

enum Verdict {
    Pass,
    Indeterminate(Vec<String>),
    Fail,
    Invalid(String),
}

fn check(text: &str, known: &KnownValues) -> Verdict {
    let condition = match parse_condition(text) {
        Ok(condition) => condition,
        Err(err) => return Verdict::Invalid(err.to_string()),
    };

    let mut condition = condition.substitute(known);
    let free = condition.symbols();
    if !free.is_empty() {
        let missing: Vec<String> = free
            .iter()
            .filter(|symbol| !known.contains_key(symbol.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Verdict::Indeterminate(missing);
        }

        condition = condition.substitute(known);
        if !condition.symbols().is_empty() {
            return Verdict::Indeterminate(Vec::new());
        }
    }

    match evaluate_closed(&condition) {
        Ok(true) => Verdict::Pass,
        Ok(false) => Verdict::Fail,
        Err(reason) => Verdict::Invalid(reason),
    }
}

fn evaluate_closed(condition: &Condition) -> Result<bool, String> {
    condition
        .eval(&|_: &str| None)
        .map_err(|err| err.to_string())
}
