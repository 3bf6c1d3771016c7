//! # Supply Ledger - Provenance Tracking Core
//!
//! Tracks manufactured goods through a supply chain: raw-material
//! registration, consumption into production batches, packaging with
//! certification metadata, and distribution. Authorized producers submit
//! state-changing operations against a single shared ledger; any observer
//! can reconstruct a product's full provenance.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `available_quantity <= initial_quantity` | `domain/ledger.rs` - debits only via validated consumption |
//! | INVARIANT-2 | Stages advance strictly forward, one step at a time | `domain/ledger.rs` - `advance_stage()` |
//! | INVARIANT-3 | Consumption is conserved: total debits per input never exceed its initial quantity | `domain/ledger.rs` - running-tally validation |
//! | INVARIANT-4 | Multi-step operations are all-or-nothing | `domain/ledger.rs` - validate-then-commit |
//! | INVARIANT-5 | `Production` or later implies a valid owning batch | `domain/ledger.rs` - batch allocated in the same commit |
//!
//! Runtime checks for all of these live in `domain/invariants.rs`.
//!
//! ## Architecture
//!
//! Hexagonal layout: pure domain logic (no I/O, no async) wrapped by a
//! service that owns the single exclusive lock and publishes change
//! notifications to the shared bus after each successful commit.
//!
//! | Layer | Location | Purpose |
//! |-------|----------|---------|
//! | Domain | `domain/` | Registry, state machine, trace assembly, invariants |
//! | Ports | `ports/` | `SupplyChainApi` (inbound), `Clock` (outbound) |
//! | Adapters | `adapters/` | System and manual clocks |
//! | Service | `service.rs` | Locking, commit discipline, event publishing |
//!
//! ## Usage Example
//!
//! ```ignore
//! use supply_ledger::prelude::*;
//!
//! let bus = Arc::new(InMemoryEventBus::new());
//! let service = SupplyChainService::new(admin, bus, SystemClock);
//!
//! let id = service.create_product(producer, registration).await?;
//! let batch = service
//!     .start_production(producer, main_id, vec![id], vec![30], "day 1".into())
//!     .await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        PackagingCertification, Product, ProductRegistration, ProductionBatch,
    };

    // Errors
    pub use crate::domain::errors::LedgerError;

    // State machine and registry
    pub use crate::domain::ledger::LedgerState;
    pub use crate::domain::registry::ProducerRegistry;

    // Trace assembly
    pub use crate::domain::trace::{BatchTrace, FullTrace, InputDetail, TraceInput};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::SupplyChainApi;
    pub use crate::ports::outbound::Clock;

    // Adapters
    pub use crate::adapters::clock::{ManualClock, SystemClock};

    // Service
    pub use crate::service::{SupplyChainService, ServiceStats};

    // Shared types
    pub use shared_types::{AccountId, BatchId, ProductId, Stage, Timestamp};
}
