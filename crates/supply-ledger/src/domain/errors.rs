//! # Error Types
//!
//! The full failure taxonomy of the ledger. Every error is a local
//! validation failure surfaced synchronously to the caller; none are
//! retried internally.

use shared_types::{AccountId, BatchId, ProductId, Stage};
use thiserror::Error;

/// Errors returned by ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An admin-only call was made by a non-administrator.
    #[error("caller {caller} is not the administrator")]
    NotOwner {
        /// The rejected caller.
        caller: AccountId,
    },

    /// A producer-only call was made by a non-producer, or the target of a
    /// removal is not currently a producer.
    #[error("account {account} is not an authorized producer")]
    NotAuthorizedProducer {
        /// The unauthorized identity.
        account: AccountId,
    },

    /// The null identity was passed to an admin call.
    #[error("the zero address is not a valid identity")]
    ZeroAddressNotAllowed,

    /// Consumed-id and quantity lists have different lengths.
    #[error("array length mismatch: {ids} ids vs {quantities} quantities")]
    ArrayLengthMismatch {
        /// Length of the consumed-id list.
        ids: usize,
        /// Length of the quantity list.
        quantities: usize,
    },

    /// A quantity argument was zero.
    #[error("zero quantity not allowed")]
    ZeroQuantityNotAllowed,

    /// No product exists under the given id.
    #[error("product {product_id} not found")]
    ProductNotFound {
        /// The missing product id.
        product_id: ProductId,
    },

    /// The caller does not own the product it tried to mutate.
    #[error("caller {caller} does not own product {product_id}")]
    NotProductOwner {
        /// The targeted product.
        product_id: ProductId,
        /// The rejected caller.
        caller: AccountId,
    },

    /// The product is not in the stage the operation requires.
    #[error("product {product_id} is in stage {actual}, required {required}")]
    InvalidProductStage {
        /// The targeted product.
        product_id: ProductId,
        /// The product's current stage.
        actual: Stage,
        /// The stage the operation requires.
        required: Stage,
    },

    /// A consumption request exceeds the input's available quantity.
    #[error(
        "insufficient quantity on product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientProductQuantity {
        /// The input product.
        product_id: ProductId,
        /// Quantity requested for consumption.
        requested: u64,
        /// Quantity actually available.
        available: u64,
    },

    /// No batch exists under the given id.
    ///
    /// Unreachable through the public API: `Production` or later always
    /// implies a valid batch link.
    #[error("batch {batch_id} not found")]
    BatchNotFound {
        /// The missing batch id.
        batch_id: BatchId,
    },

    /// The batch was already packaged; packaging time is set exactly once.
    #[error("batch {batch_id} already packaged")]
    BatchAlreadyPackaged {
        /// The already-packaged batch.
        batch_id: BatchId,
    },

    /// A production run was requested with an empty input list.
    #[error("production requires at least one consumed input")]
    NoInputsForProduction,
}
