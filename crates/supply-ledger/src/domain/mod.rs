//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the provenance ledger.
//! NO I/O, NO async, NO external dependencies.
//!
//! - All types here are pure domain concepts.
//! - Dependencies point INWARD only (service and adapters depend on this,
//!   not vice versa).
//! - Every mutating operation validates against the current state first and
//!   mutates only after every check has passed.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod ledger;
pub mod registry;
pub mod trace;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use ledger::*;
pub use registry::*;
pub use trace::*;
