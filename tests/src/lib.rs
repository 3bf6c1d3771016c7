//! # Provenance-Ledger Test Suite
//!
//! Unified test crate containing cross-crate integration flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Service + bus flows
//!     ├── lifecycle.rs     # Full product lifecycle end to end
//!     └── conservation.rs  # Quantity accounting and access control
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p supply-tests
//! ```


/// Initialize test logging. Safe to call from every test; only the first
/// caller installs the subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
