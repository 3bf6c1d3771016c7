//! # Ledger Events
//!
//! Defines all change notifications that flow through the shared bus.
//! Each variant corresponds to exactly one side effect of a committed
//! ledger operation.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, BatchId, ProductId, Stage, Timestamp};

/// All events that can be published to the event bus.
///
/// Field values are snapshots taken at commit time; consumers must not
/// assume they reflect later state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyChainEvent {
    // =========================================================================
    // ACCESS CONTROL
    // =========================================================================
    /// An identity was granted producer authorization.
    ///
    /// Also emitted when re-adding an existing producer (the grant is
    /// idempotent for state but still signals).
    ProducerAdded {
        /// The authorized identity.
        account: AccountId,
    },

    /// An identity's producer authorization was revoked.
    ProducerRemoved {
        /// The revoked identity.
        account: AccountId,
    },

    // =========================================================================
    // PRODUCT LIFECYCLE
    // =========================================================================
    /// A product was registered as raw material.
    ProductCreated {
        /// The newly allocated product id.
        product_id: ProductId,
        /// Descriptive name supplied by the producer.
        name: String,
        /// The creating producer; ownership never transfers.
        owner: AccountId,
        /// Stage at creation (always `RawMaterial`).
        stage: Stage,
        /// Commit timestamp.
        timestamp: Timestamp,
    },

    /// A product advanced one stage in the lifecycle.
    ProductStageChanged {
        /// The product that advanced.
        product_id: ProductId,
        /// Stage before the transition.
        previous: Stage,
        /// Stage after the transition.
        current: Stage,
        /// Commit timestamp.
        timestamp: Timestamp,
    },

    /// A raw material's available quantity was debited by a production run.
    ///
    /// One event per consumed input, emitted in input order.
    ProductQuantityUpdated {
        /// The consumed input product.
        product_id: ProductId,
        /// The batch that consumed it.
        batch_id: BatchId,
        /// Quantity debited by this consumption.
        quantity_used: u64,
        /// Available quantity remaining after the debit.
        available_remaining: u64,
    },

    // =========================================================================
    // BATCH LIFECYCLE
    // =========================================================================
    /// A production batch was created on behalf of a processed product.
    BatchCreated {
        /// The newly allocated batch id.
        batch_id: BatchId,
        /// The processed product now linked to this batch.
        product_id: ProductId,
        /// Number of consumed inputs recorded on the batch.
        input_count: usize,
        /// Production start time (commit timestamp).
        start_time: Timestamp,
    },

    /// A batch received its certification metadata and packaging time.
    BatchPackaged {
        /// The packaged batch.
        batch_id: BatchId,
        /// The product that owns the batch.
        product_id: ProductId,
        /// Packaging time (commit timestamp, non-zero exactly once).
        packaging_time: Timestamp,
    },
}

impl SupplyChainEvent {
    /// The topic this event belongs to, used for subscription filtering.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ProducerAdded { .. } | Self::ProducerRemoved { .. } => EventTopic::AccessControl,
            Self::ProductCreated { .. }
            | Self::ProductStageChanged { .. }
            | Self::ProductQuantityUpdated { .. } => EventTopic::ProductLifecycle,
            Self::BatchCreated { .. } | Self::BatchPackaged { .. } => EventTopic::BatchLifecycle,
        }
    }
}

/// Topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTopic {
    /// Producer set changes.
    AccessControl,
    /// Product creation, stage transitions, quantity debits.
    ProductLifecycle,
    /// Batch creation and packaging.
    BatchLifecycle,
    /// All events (no filtering).
    All,
}

/// Filter applied to a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &SupplyChainEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
