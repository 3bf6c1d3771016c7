//! # Supply Chain Service
//!
//! Wraps the pure domain ledger with the runtime concerns: one exclusive
//! lock serializing every state-changing operation, change-notification
//! publishing after each successful commit, and operation statistics.
//!
//! ## Commit Discipline
//!
//! Each operation reads the clock once, takes the write lock, runs the
//! domain operation (validate-then-commit, all-or-nothing), releases the
//! lock, and only then publishes the operation's events in order. A
//! rejected operation publishes nothing. Reads take the read lock and can
//! never observe a half-applied write.

use crate::domain::entities::{PackagingCertification, Product, ProductRegistration};
use crate::domain::errors::LedgerError;
use crate::domain::ledger::LedgerState;
use crate::domain::trace::{assemble_trace, FullTrace};
use crate::ports::inbound::SupplyChainApi;
use crate::ports::outbound::Clock;

use async_trait::async_trait;
use shared_bus::{EventPublisher, SupplyChainEvent};
use shared_types::{AccountId, BatchId, ProductId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// Statistics for the supply chain service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Operations that validated and committed.
    pub operations_committed: u64,
    /// Operations rejected during validation.
    pub operations_rejected: u64,
    /// Change notifications published.
    pub events_published: u64,
}

/// The main ledger service.
///
/// This service:
/// 1. Serializes every mutating operation through one exclusive lock
/// 2. Runs the pure domain state machine under that lock
/// 3. Publishes change notifications to the event bus post-commit
/// 4. Maintains operation statistics
pub struct SupplyChainService<C: Clock> {
    /// The ledger state behind the single-writer lock.
    state: RwLock<LedgerState>,
    /// Change-notification sink.
    bus: Arc<dyn EventPublisher>,
    /// Commit timestamp source.
    clock: C,
    /// Operation statistics.
    stats: RwLock<ServiceStats>,
}

impl<C: Clock> SupplyChainService<C> {
    /// Create a service over a fresh ledger administered by
    /// `administrator`.
    pub fn new(administrator: AccountId, bus: Arc<dyn EventPublisher>, clock: C) -> Self {
        info!(administrator = %administrator, "Supply chain service initialized");
        Self {
            state: RwLock::new(LedgerState::new(administrator)),
            bus,
            clock,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Current operation statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Publish a committed operation's events, in order.
    async fn commit(&self, events: Vec<SupplyChainEvent>) {
        let mut stats = self.stats.write().await;
        stats.operations_committed += 1;
        stats.events_published += events.len() as u64;
        drop(stats);

        for event in events {
            self.bus.publish(event).await;
        }
    }

    /// Record a rejected operation.
    async fn reject(&self, error: &LedgerError) {
        self.stats.write().await.operations_rejected += 1;
        warn!(error = %error, "Operation rejected");
    }
}

#[async_trait]
impl<C: Clock> SupplyChainApi for SupplyChainService<C> {
    #[instrument(skip(self), fields(caller = %caller, account = %account))]
    async fn add_producer(
        &self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), LedgerError> {
        let outcome = self.state.write().await.add_producer(caller, account);
        match outcome {
            Ok(events) => {
                info!("Producer added");
                self.commit(events).await;
                Ok(())
            }
            Err(e) => {
                self.reject(&e).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, account = %account))]
    async fn remove_producer(
        &self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), LedgerError> {
        let outcome = self.state.write().await.remove_producer(caller, account);
        match outcome {
            Ok(events) => {
                info!("Producer removed");
                self.commit(events).await;
                Ok(())
            }
            Err(e) => {
                self.reject(&e).await;
                Err(e)
            }
        }
    }

    async fn is_producer(&self, account: AccountId) -> bool {
        self.state.read().await.is_producer(account)
    }

    async fn administrator(&self) -> AccountId {
        self.state.read().await.administrator()
    }

    #[instrument(skip(self, registration), fields(caller = %caller))]
    async fn create_product(
        &self,
        caller: AccountId,
        registration: ProductRegistration,
    ) -> Result<ProductId, LedgerError> {
        let now = self.clock.now();
        let outcome = self
            .state
            .write()
            .await
            .create_product(caller, registration, now);
        match outcome {
            Ok((product_id, events)) => {
                info!(product_id, "Product created");
                self.commit(events).await;
                Ok(product_id)
            }
            Err(e) => {
                self.reject(&e).await;
                Err(e)
            }
        }
    }

    #[instrument(
        skip(self, consumed_ids, quantities, start_time_manual),
        fields(caller = %caller, product_id, inputs = consumed_ids.len())
    )]
    async fn start_production(
        &self,
        caller: AccountId,
        product_id: ProductId,
        consumed_ids: Vec<ProductId>,
        quantities: Vec<u64>,
        start_time_manual: String,
    ) -> Result<BatchId, LedgerError> {
        let now = self.clock.now();
        let outcome = self.state.write().await.start_production(
            caller,
            product_id,
            consumed_ids,
            quantities,
            start_time_manual,
            now,
        );
        match outcome {
            Ok((batch_id, events)) => {
                info!(batch_id, "Production started");
                self.commit(events).await;
                Ok(batch_id)
            }
            Err(e) => {
                self.reject(&e).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self, certification), fields(caller = %caller, product_id))]
    async fn package_product(
        &self,
        caller: AccountId,
        product_id: ProductId,
        certification: PackagingCertification,
    ) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let outcome =
            self.state
                .write()
                .await
                .package_product(caller, product_id, certification, now);
        match outcome {
            Ok(events) => {
                info!("Product packaged");
                self.commit(events).await;
                Ok(())
            }
            Err(e) => {
                self.reject(&e).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self, distribution_details), fields(caller = %caller, product_id))]
    async fn distribute_product(
        &self,
        caller: AccountId,
        product_id: ProductId,
        distribution_details: String,
    ) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let outcome = self.state.write().await.distribute_product(
            caller,
            product_id,
            distribution_details,
            now,
        );
        match outcome {
            Ok(events) => {
                info!("Product distributed");
                self.commit(events).await;
                Ok(())
            }
            Err(e) => {
                self.reject(&e).await;
                Err(e)
            }
        }
    }

    async fn get_full_trace(&self, product_id: ProductId) -> Result<FullTrace, LedgerError> {
        assemble_trace(&*self.state.read().await, product_id)
    }

    async fn get_all_products(&self) -> Vec<Product> {
        self.state.read().await.all_products()
    }
}
