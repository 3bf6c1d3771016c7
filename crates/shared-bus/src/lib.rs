//! # Shared Bus - Change-Notification Bus for the Provenance Ledger
//!
//! Every committed ledger operation publishes one event per side effect;
//! external collaborators (indexers, UIs) subscribe independently of the
//! ledger's internal state.
//!
//! ## Delivery Contract
//!
//! - Events are published only **after** an operation commits; a rejected
//!   operation publishes nothing.
//! - Delivery is at-least-once per committed operation and ordered per
//!   operation: the quantity-updated events for a production run arrive in
//!   input order, followed by batch-created, followed by stage-changed.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │    Ledger    │                    │   Indexer    │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, SupplyChainEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
