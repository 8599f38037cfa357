//! Logging facade re-exports and initialization

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system.
///
/// Reads `RUST_LOG`; defaults to `info` when it is unset. Safe to call more
/// than once, later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Initialize logging for unit tests, capturing output per test
#[cfg(test)]
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
