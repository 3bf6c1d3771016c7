//! # Driving Ports (API - Inbound)
//!
//! The request/response surface of the ledger core. Any RPC/HTTP/
//! function-call binding can sit in front of this trait; the core defines
//! no network framing of its own.
//!
//! Callers are identified explicitly by `AccountId`; the core performs
//! all authorization checks itself.

use crate::domain::entities::{PackagingCertification, Product, ProductRegistration};
use crate::domain::errors::LedgerError;
use crate::domain::trace::FullTrace;
use async_trait::async_trait;
use shared_types::{AccountId, BatchId, ProductId};

/// Primary API for ledger operations.
///
/// Every mutating call either commits in full (and its change
/// notifications are published, in order) or has no effect at all.
#[async_trait]
pub trait SupplyChainApi: Send + Sync {
    // === Access Registry ===

    /// Grant producer authorization to `account`. Admin-only.
    async fn add_producer(
        &self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), LedgerError>;

    /// Revoke producer authorization from `account`. Admin-only.
    async fn remove_producer(
        &self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), LedgerError>;

    /// Returns true if `account` currently holds producer authorization.
    async fn is_producer(&self, account: AccountId) -> bool;

    /// The immutable administrator identity.
    async fn administrator(&self) -> AccountId;

    // === Product Lifecycle ===

    /// Register a new raw-material product owned by `caller`.
    /// Returns the newly allocated product id.
    async fn create_product(
        &self,
        caller: AccountId,
        registration: ProductRegistration,
    ) -> Result<ProductId, LedgerError>;

    /// Consume raw materials into a new production batch on behalf of
    /// `product_id`. Returns the newly allocated batch id.
    async fn start_production(
        &self,
        caller: AccountId,
        product_id: ProductId,
        consumed_ids: Vec<ProductId>,
        quantities: Vec<u64>,
        start_time_manual: String,
    ) -> Result<BatchId, LedgerError>;

    /// Record certification metadata on the product's batch and advance
    /// the product to `Packaging`.
    async fn package_product(
        &self,
        caller: AccountId,
        product_id: ProductId,
        certification: PackagingCertification,
    ) -> Result<(), LedgerError>;

    /// Record distribution details and advance the product to the
    /// terminal `Distribution` stage.
    async fn distribute_product(
        &self,
        caller: AccountId,
        product_id: ProductId,
        distribution_details: String,
    ) -> Result<(), LedgerError>;

    // === Queries ===

    /// The full provenance view of one product.
    async fn get_full_trace(&self, product_id: ProductId) -> Result<FullTrace, LedgerError>;

    /// Every product in creation-id order.
    async fn get_all_products(&self) -> Vec<Product>;
}
