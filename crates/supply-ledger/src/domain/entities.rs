//! # Domain Entities
//!
//! Core ledger records: `Product` (one per lifecycle instance) and
//! `ProductionBatch` (one per production run), plus the argument bundles
//! for the operations that create them.
//!
//! ## Type Decisions
//!
//! - Quantities are `u64`: debits are validated against availability before
//!   any mutation, so arithmetic never wraps.
//! - Descriptive fields (`name`, `source`, `quality`, manual timestamps,
//!   certification hashes) are opaque `String`s with no semantic
//!   constraints.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, BatchId, ProductId, Stage, Timestamp};

/// A tracked product. Created once, mutated only through ledger
/// operations, never deleted. Ids are never reused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Sequential id, starting at 1. 0 is reserved as "does not exist".
    pub id: ProductId,
    /// Descriptive name.
    pub name: String,
    /// Origin description.
    pub source: String,
    /// Quality description.
    pub quality: String,
    /// Quantity fixed at creation; immutable thereafter. Always > 0.
    pub initial_quantity: u64,
    /// Remaining consumable quantity. Monotonically non-increasing;
    /// debited only while the product is in `RawMaterial` stage.
    pub available_quantity: u64,
    /// Position in the lifecycle state machine.
    pub stage: Stage,
    /// The producer who created the product; never transfers.
    pub owner: AccountId,
    /// 0 until the product enters `Production`, then fixed to the batch
    /// that consumed inputs on its behalf.
    pub current_batch_id: BatchId,
    /// Manual pickup time supplied by the producer (opaque).
    pub pickup_time_manual: String,
    /// Distribution details, set on the final transition.
    pub distribution_details: String,
    /// Updated on creation and every stage change; non-decreasing.
    pub timestamp: Timestamp,
}

impl Product {
    /// Create a fresh product in `RawMaterial` stage.
    #[must_use]
    pub fn new(
        id: ProductId,
        owner: AccountId,
        registration: ProductRegistration,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            name: registration.name,
            source: registration.source,
            quality: registration.quality,
            initial_quantity: registration.initial_quantity,
            available_quantity: registration.initial_quantity,
            stage: Stage::RawMaterial,
            owner,
            current_batch_id: 0,
            pickup_time_manual: registration.pickup_time_manual,
            distribution_details: String::new(),
            timestamp: now,
        }
    }

    /// Refresh the lifecycle timestamp, never moving it backward.
    pub fn touch(&mut self, now: Timestamp) {
        self.timestamp = self.timestamp.max(now);
    }
}

/// The record of one production run: the inputs it consumed and, once
/// packaged, its certification metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionBatch {
    /// Sequential id, starting at 1. 0 is reserved as "no batch".
    pub id: BatchId,
    /// Consumed input product ids, in submission order.
    /// Parallel to `quantities_used`; length >= 1.
    pub raw_material_ids: Vec<ProductId>,
    /// Positive quantity consumed per input, parallel to
    /// `raw_material_ids`. Fixed at consumption time.
    pub quantities_used: Vec<u64>,
    /// Production start time (commit timestamp).
    pub start_time: Timestamp,
    /// 0 until packaging occurs, then fixed once.
    pub packaging_time: Timestamp,
    /// Halal certification hash (opaque).
    pub halal_cert_hash: String,
    /// BPOM certification hash (opaque).
    pub bpom_cert_hash: String,
    /// Manual start time supplied by the producer (opaque).
    pub start_time_manual: String,
    /// Manual packaging time supplied by the producer (opaque).
    pub packaging_time_manual: String,
}

impl ProductionBatch {
    /// Create a new unpackaged batch recording a validated consumption list.
    #[must_use]
    pub fn new(
        id: BatchId,
        raw_material_ids: Vec<ProductId>,
        quantities_used: Vec<u64>,
        start_time_manual: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            raw_material_ids,
            quantities_used,
            start_time: now,
            packaging_time: 0,
            halal_cert_hash: String::new(),
            bpom_cert_hash: String::new(),
            start_time_manual,
            packaging_time_manual: String::new(),
        }
    }

    /// Returns true once packaging metadata has been recorded.
    #[must_use]
    pub fn is_packaged(&self) -> bool {
        self.packaging_time != 0
    }
}

/// Arguments for registering a new raw-material product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistration {
    /// Descriptive name.
    pub name: String,
    /// Origin description.
    pub source: String,
    /// Quality description.
    pub quality: String,
    /// Initial (and available) quantity; must be > 0.
    pub initial_quantity: u64,
    /// Manual pickup time (opaque).
    pub pickup_time_manual: String,
}

/// Arguments for packaging a product's batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingCertification {
    /// Halal certification hash (opaque).
    pub halal_cert_hash: String,
    /// BPOM certification hash (opaque).
    pub bpom_cert_hash: String,
    /// Manual packaging time (opaque).
    pub packaging_time_manual: String,
}
