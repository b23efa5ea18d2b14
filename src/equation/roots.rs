use super::symbolic::Candidate;

/// Imaginary parts below this fraction of the real magnitude are noise.
const REAL_TOL: f64 = 1e-12;

pub(super) fn is_real(candidate: &Candidate) -> bool {
    candidate.im.abs() <= REAL_TOL * candidate.re.abs().max(1.0)
}

/// Picks one value from exact-resolution candidates.
///
/// Prefers the first real positive candidate, then the first real one.
/// Returns `None` when no candidate is real.
#[must_use]
pub fn select_root(candidates: &[Candidate]) -> Option<f64> {
    let mut reals = candidates.iter().filter(|c| is_real(c)).map(|c| c.re);
    let first_real = reals.next();

    first_real
        .filter(|x| *x > 0.0)
        .or_else(|| reals.find(|x| *x > 0.0))
        .or(first_real)
}
