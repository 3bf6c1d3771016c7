//! # Driven Ports (Outbound)
//!
//! Dependencies the ledger core needs from its environment. Time is the
//! only one: injecting it keeps the domain deterministic and testable.

use shared_types::Timestamp;

/// Source of commit timestamps.
///
/// Implementations must be cheap to call; the service reads the clock
/// once per operation, before taking the state lock.
pub trait Clock: Send + Sync {
    /// The current time as unix seconds.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        self.as_ref().now()
    }
}
