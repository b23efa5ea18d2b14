use std::collections::BTreeSet;

/// Function, constant and keyword names that never denote a formula symbol.
pub const RESERVED: &[&str] = &[
    "log", "ln", "sin", "cos", "tan", "exp", "sqrt", "pi", "E", "Abs", "abs", "min", "max", "and",
    "or", "not", "True", "False",
];

#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Returns the variable names referenced by a template or restriction text.
///
/// Works on the raw text, so it also answers for templates that fail to
/// parse. Numeric literals (including `1e-3`) and [`RESERVED`] names are
/// skipped.
///
/// ```
/// use insulation_solver::support::expr::extract_symbols;
///
/// let symbols = extract_symbols("(e + k/h)**2 == log(E * w) * 10**-3");
/// assert_eq!(symbols.into_iter().collect::<Vec<_>>(), ["e", "h", "k", "w"]);
/// ```
#[must_use]
pub fn extract_symbols(text: &str) -> BTreeSet<String> {
    let mut symbols = BTreeSet::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            // Swallow the rest of the literal, exponent included.
            let mut prev = c;
            while let Some(&(_, next)) = chars.peek() {
                let exponent_sign = matches!(prev, 'e' | 'E') && matches!(next, '+' | '-');
                if next.is_ascii_alphanumeric() || next == '.' || next == '_' || exponent_sign {
                    prev = next;
                    chars.next();
                } else {
                    break;
                }
            }
        } else if c == '_' || c.is_ascii_alphabetic() {
            let mut end = start + c.len_utf8();
            while let Some(&(idx, next)) = chars.peek() {
                if next == '_' || next.is_ascii_alphanumeric() {
                    end = idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let name = &text[start..end];
            if !is_reserved(name) {
                symbols.insert(name.to_string());
            }
        }
    }

    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        extract_symbols(text).into_iter().collect()
    }

    #[test]
    fn convection_template() {
        assert_eq!(
            names("h == 1.32 * ((Te - Ta) / H)**0.25"),
            ["H", "Ta", "Te", "h"]
        );
    }

    #[test]
    fn literals_are_not_symbols() {
        assert_eq!(names("x == 1e-3 + 2.5E+4 * y"), ["x", "y"]);
        assert_eq!(names("x == .5"), ["x"]);
    }

    #[test]
    fn reserved_names_are_skipped() {
        assert_eq!(
            names("sqrt(a) + log(b) + pi + E + Abs(c) + max(d, 1) and True"),
            ["a", "b", "c", "d"]
        );
    }

    #[test]
    fn underscored_names() {
        assert_eq!(names("r_c == 2 * k / h"), ["h", "k", "r_c"]);
        assert_eq!(names("life_2 >= 0"), ["life_2"]);
    }
}
