use crate::KnownValues;

/// Builds known values from `(symbol, value)` pairs.
pub(crate) fn known(pairs: &[(&str, f64)]) -> KnownValues {
    pairs
        .iter()
        .map(|&(name, value)| (name.to_string(), value))
        .collect()
}

/// Routes `tracing` output through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
