//! Tracing subscriber setup for binaries and tests that embed the engine.
//!
//! Every reconciliation runs inside a `reconcile` span carrying a fresh
//! `reconciliation_id`, so one filter line is enough to follow a cart:
//!
//! ```text
//! RUST_LOG=info,cartwise=debug
//! ```

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_LOG_FILTER: &str = "info,cartwise=debug";

/// Installs a global fmt subscriber.
///
/// Returns `false` if a global subscriber was already installed, which
/// makes it safe to call from several tests.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
