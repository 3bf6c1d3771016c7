//! # Ledger State Machine
//!
//! The product/batch lifecycle state machine and quantity-conservation
//! ledger. Pure and synchronous: every mutating method validates the whole
//! operation against the current state first and mutates only after every
//! check has passed, so a failure never leaves partial effects.
//!
//! Mutating methods return the ordered list of change notifications for
//! the committed operation; the service publishes them after releasing
//! the state lock.

use crate::domain::entities::{
    PackagingCertification, Product, ProductRegistration, ProductionBatch,
};
use crate::domain::errors::LedgerError;
use crate::domain::registry::ProducerRegistry;
use serde::{Deserialize, Serialize};
use shared_bus::SupplyChainEvent;
use shared_types::{AccountId, BatchId, ProductId, Stage, Timestamp};
use std::collections::HashMap;

/// The complete in-process ledger: producer registry, product records,
/// batch records, and the id counters that index them.
///
/// Callers must serialize access (one exclusive lock); the methods
/// themselves assume they run one at a time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerState {
    registry: ProducerRegistry,
    products: HashMap<ProductId, Product>,
    batches: HashMap<BatchId, ProductionBatch>,
    next_product_id: ProductId,
    next_batch_id: BatchId,
}

impl LedgerState {
    /// Create an empty ledger administered by `administrator`.
    #[must_use]
    pub fn new(administrator: AccountId) -> Self {
        Self {
            registry: ProducerRegistry::new(administrator),
            products: HashMap::new(),
            batches: HashMap::new(),
            next_product_id: 1,
            next_batch_id: 1,
        }
    }

    // =========================================================================
    // ACCESS REGISTRY
    // =========================================================================

    /// The immutable administrator identity.
    #[must_use]
    pub fn administrator(&self) -> AccountId {
        self.registry.administrator()
    }

    /// Returns true if `account` currently holds producer authorization.
    #[must_use]
    pub fn is_producer(&self, account: AccountId) -> bool {
        self.registry.is_producer(account)
    }

    /// Grant producer authorization to `account`.
    pub fn add_producer(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<Vec<SupplyChainEvent>, LedgerError> {
        self.registry.add_producer(caller, account)?;
        Ok(vec![SupplyChainEvent::ProducerAdded { account }])
    }

    /// Revoke producer authorization from `account`.
    pub fn remove_producer(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<Vec<SupplyChainEvent>, LedgerError> {
        self.registry.remove_producer(caller, account)?;
        Ok(vec![SupplyChainEvent::ProducerRemoved { account }])
    }

    // =========================================================================
    // PRODUCT LIFECYCLE
    // =========================================================================

    /// Register a new raw-material product owned by `caller`.
    ///
    /// Returns the newly allocated id (sequential from 1).
    pub fn create_product(
        &mut self,
        caller: AccountId,
        registration: ProductRegistration,
        now: Timestamp,
    ) -> Result<(ProductId, Vec<SupplyChainEvent>), LedgerError> {
        self.registry.ensure_producer(caller)?;
        if registration.initial_quantity == 0 {
            return Err(LedgerError::ZeroQuantityNotAllowed);
        }

        let id = self.next_product_id;
        let product = Product::new(id, caller, registration, now);
        let event = SupplyChainEvent::ProductCreated {
            product_id: id,
            name: product.name.clone(),
            owner: product.owner,
            stage: product.stage,
            timestamp: product.timestamp,
        };
        self.products.insert(id, product);
        self.next_product_id += 1;

        Ok((id, vec![event]))
    }

    /// Consume raw materials into a new production batch on behalf of
    /// `product_id`, advancing it from `RawMaterial` to `Production`.
    ///
    /// All-or-nothing: every input is validated (in order, against a
    /// running tally of pending debits) before anything is mutated.
    /// Emits one quantity-updated event per input in input order, then
    /// batch-created, then stage-changed.
    #[allow(clippy::too_many_lines)]
    pub fn start_production(
        &mut self,
        caller: AccountId,
        product_id: ProductId,
        consumed_ids: Vec<ProductId>,
        quantities: Vec<u64>,
        start_time_manual: String,
        now: Timestamp,
    ) -> Result<(BatchId, Vec<SupplyChainEvent>), LedgerError> {
        self.registry.ensure_producer(caller)?;
        let product = self
            .products
            .get(&product_id)
            .ok_or(LedgerError::ProductNotFound { product_id })?;
        if product.owner != caller {
            return Err(LedgerError::NotProductOwner { product_id, caller });
        }
        if product.stage != Stage::RawMaterial {
            return Err(LedgerError::InvalidProductStage {
                product_id,
                actual: product.stage,
                required: Stage::RawMaterial,
            });
        }
        if consumed_ids.len() != quantities.len() {
            return Err(LedgerError::ArrayLengthMismatch {
                ids: consumed_ids.len(),
                quantities: quantities.len(),
            });
        }
        if consumed_ids.is_empty() {
            return Err(LedgerError::NoInputsForProduction);
        }

        // Validation pass over immutable state. A running tally of pending
        // debits keeps duplicate input ids honest: each quantity is checked
        // against what would remain at its time of consumption.
        let mut pending: HashMap<ProductId, u64> = HashMap::new();
        for (&consumed_id, &quantity) in consumed_ids.iter().zip(quantities.iter()) {
            let consumed = self
                .products
                .get(&consumed_id)
                .ok_or(LedgerError::ProductNotFound {
                    product_id: consumed_id,
                })?;
            if consumed.stage != Stage::RawMaterial {
                return Err(LedgerError::InvalidProductStage {
                    product_id: consumed_id,
                    actual: consumed.stage,
                    required: Stage::RawMaterial,
                });
            }
            if quantity == 0 {
                return Err(LedgerError::ZeroQuantityNotAllowed);
            }
            let already_pending = pending.get(&consumed_id).copied().unwrap_or(0);
            let available = consumed.available_quantity - already_pending;
            if quantity > available {
                return Err(LedgerError::InsufficientProductQuantity {
                    product_id: consumed_id,
                    requested: quantity,
                    available,
                });
            }
            *pending.entry(consumed_id).or_insert(0) += quantity;
        }

        // Commit pass. Nothing below can fail.
        let batch_id = self.next_batch_id;
        let mut events = Vec::with_capacity(consumed_ids.len() + 2);

        for (&consumed_id, &quantity) in consumed_ids.iter().zip(quantities.iter()) {
            let consumed = self
                .products
                .get_mut(&consumed_id)
                .unwrap_or_else(|| unreachable!("input {consumed_id} validated above"));
            consumed.available_quantity -= quantity;
            events.push(SupplyChainEvent::ProductQuantityUpdated {
                product_id: consumed_id,
                batch_id,
                quantity_used: quantity,
                available_remaining: consumed.available_quantity,
            });
        }

        let batch = ProductionBatch::new(
            batch_id,
            consumed_ids,
            quantities,
            start_time_manual,
            now,
        );
        events.push(SupplyChainEvent::BatchCreated {
            batch_id,
            product_id,
            input_count: batch.raw_material_ids.len(),
            start_time: batch.start_time,
        });
        self.batches.insert(batch_id, batch);
        self.next_batch_id += 1;

        let product = self
            .products
            .get_mut(&product_id)
            .unwrap_or_else(|| unreachable!("product {product_id} validated above"));
        product.current_batch_id = batch_id;
        events.push(Self::advance_stage(product, Stage::Production, now));

        Ok((batch_id, events))
    }

    /// Record certification metadata on the product's batch and advance the
    /// product from `Production` to `Packaging`.
    pub fn package_product(
        &mut self,
        caller: AccountId,
        product_id: ProductId,
        certification: PackagingCertification,
        now: Timestamp,
    ) -> Result<Vec<SupplyChainEvent>, LedgerError> {
        self.registry.ensure_producer(caller)?;
        let product = self
            .products
            .get(&product_id)
            .ok_or(LedgerError::ProductNotFound { product_id })?;
        if product.owner != caller {
            return Err(LedgerError::NotProductOwner { product_id, caller });
        }
        if product.stage != Stage::Production {
            return Err(LedgerError::InvalidProductStage {
                product_id,
                actual: product.stage,
                required: Stage::Production,
            });
        }

        let batch_id = product.current_batch_id;
        let batch = self
            .batches
            .get(&batch_id)
            .ok_or(LedgerError::BatchNotFound { batch_id })?;
        if batch.is_packaged() {
            return Err(LedgerError::BatchAlreadyPackaged { batch_id });
        }

        // All checks passed; commit.
        let batch = self
            .batches
            .get_mut(&batch_id)
            .unwrap_or_else(|| unreachable!("batch {batch_id} validated above"));
        batch.halal_cert_hash = certification.halal_cert_hash;
        batch.bpom_cert_hash = certification.bpom_cert_hash;
        batch.packaging_time_manual = certification.packaging_time_manual;
        batch.packaging_time = now;
        let packaging_time = batch.packaging_time;

        let product = self
            .products
            .get_mut(&product_id)
            .unwrap_or_else(|| unreachable!("product {product_id} validated above"));
        let stage_event = Self::advance_stage(product, Stage::Packaging, now);

        Ok(vec![
            SupplyChainEvent::BatchPackaged {
                batch_id,
                product_id,
                packaging_time,
            },
            stage_event,
        ])
    }

    /// Record distribution details and advance the product from `Packaging`
    /// to the terminal `Distribution` stage.
    pub fn distribute_product(
        &mut self,
        caller: AccountId,
        product_id: ProductId,
        distribution_details: String,
        now: Timestamp,
    ) -> Result<Vec<SupplyChainEvent>, LedgerError> {
        self.registry.ensure_producer(caller)?;
        let product = self
            .products
            .get(&product_id)
            .ok_or(LedgerError::ProductNotFound { product_id })?;
        if product.owner != caller {
            return Err(LedgerError::NotProductOwner { product_id, caller });
        }
        if product.stage != Stage::Packaging {
            return Err(LedgerError::InvalidProductStage {
                product_id,
                actual: product.stage,
                required: Stage::Packaging,
            });
        }

        let product = self
            .products
            .get_mut(&product_id)
            .unwrap_or_else(|| unreachable!("product {product_id} validated above"));
        product.distribution_details = distribution_details;
        let stage_event = Self::advance_stage(product, Stage::Distribution, now);

        Ok(vec![stage_event])
    }

    /// Advance a product exactly one stage forward.
    ///
    /// Callers have already verified the current stage, so the transition
    /// is a legal single step by construction.
    fn advance_stage(product: &mut Product, target: Stage, now: Timestamp) -> SupplyChainEvent {
        debug_assert!(product.stage.can_advance_to(target));
        let previous = product.stage;
        product.stage = target;
        product.touch(now);
        SupplyChainEvent::ProductStageChanged {
            product_id: product.id,
            previous,
            current: target,
            timestamp: product.timestamp,
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.get(&product_id)
    }

    /// Look up a batch by id.
    #[must_use]
    pub fn batch(&self, batch_id: BatchId) -> Option<&ProductionBatch> {
        self.batches.get(&batch_id)
    }

    /// Every product in creation-id order, 1..=count.
    #[must_use]
    pub fn all_products(&self) -> Vec<Product> {
        (1..self.next_product_id)
            .filter_map(|id| self.products.get(&id).cloned())
            .collect()
    }

    /// Number of products ever created.
    #[must_use]
    pub fn product_count(&self) -> u64 {
        self.next_product_id - 1
    }

    /// Number of batches ever created.
    #[must_use]
    pub fn batch_count(&self) -> u64 {
        self.next_batch_id - 1
    }

    /// Iterate all products (arbitrary order).
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Iterate all batches (arbitrary order).
    pub fn batches(&self) -> impl Iterator<Item = &ProductionBatch> {
        self.batches.values()
    }
}
