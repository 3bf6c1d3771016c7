//! # Shared Types Crate
//!
//! This crate contains the identity, id, and lifecycle-stage types shared by
//! the ledger core (`supply-ledger`) and the event bus (`shared-bus`).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Reserved Zero**: `ProductId`/`BatchId` 0 means "does not exist";
//!   `AccountId::ZERO` is the null identity rejected by admin calls.

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod identity;
pub mod stage;

pub use identity::AccountId;
pub use stage::Stage;

/// Unique identifier for a product. Sequential from 1; 0 is reserved
/// as "does not exist".
pub type ProductId = u64;

/// Unique identifier for a production batch. Sequential from 1; 0 is
/// reserved as "no batch".
pub type BatchId = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;
