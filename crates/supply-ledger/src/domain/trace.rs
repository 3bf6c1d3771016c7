//! # Trace Assembly
//!
//! Read-only composition of a product, its linked production batch, and
//! the batch's consumed inputs into one reportable structure. Never
//! mutates the ledger; depends on both ledgers being internally
//! consistent.

use crate::domain::entities::Product;
use crate::domain::errors::LedgerError;
use crate::domain::ledger::LedgerState;
use serde::{Deserialize, Serialize};
use shared_types::{BatchId, ProductId, Stage, Timestamp};

/// The full provenance view of one product.
///
/// The batch section is present only once the product has entered
/// `Production` (and therefore carries a valid batch link).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTrace {
    /// The product record as of query time.
    pub product: Product,
    /// The production run that consumed inputs on the product's behalf,
    /// if one exists yet.
    pub batch: Option<BatchTrace>,
}

/// The batch portion of a trace: the batch's own fields plus a per-input
/// view of what was consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTrace {
    /// The batch id.
    pub batch_id: BatchId,
    /// Production start time.
    pub start_time: Timestamp,
    /// Packaging time; 0 while unpackaged.
    pub packaging_time: Timestamp,
    /// Halal certification hash (opaque).
    pub halal_cert_hash: String,
    /// BPOM certification hash (opaque).
    pub bpom_cert_hash: String,
    /// Manual start time (opaque).
    pub start_time_manual: String,
    /// Manual packaging time (opaque).
    pub packaging_time_manual: String,
    /// One entry per consumed input, in original consumption order.
    pub inputs: Vec<TraceInput>,
}

/// One consumed input as seen from a trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceInput {
    /// The consumed product's id.
    pub product_id: ProductId,
    /// Quantity consumed, from the batch snapshot (fixed at consumption
    /// time).
    pub quantity_used: u64,
    /// Descriptive detail, read at query time.
    pub detail: InputDetail,
}

/// Descriptive detail of a consumed input.
///
/// `NotFound` substitutes for an input id with no product record. That
/// state is unreachable given the ledger invariants; the marker exists so
/// one corrupt entry cannot fail the whole read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputDetail {
    /// The input exists; name and source are its current values.
    Known {
        /// Current name of the input product.
        name: String,
        /// Current source of the input product.
        source: String,
    },
    /// No product record exists under the input id.
    NotFound,
}

/// Assemble the full trace for `product_id`.
///
/// Fails only if the product itself does not exist. The batch section is
/// included when the stage is `Production` or later **and** the batch
/// link is set; input names and sources are current values, while the
/// consumed quantities are the snapshot stored on the batch.
pub fn assemble_trace(
    state: &LedgerState,
    product_id: ProductId,
) -> Result<FullTrace, LedgerError> {
    let product = state
        .product(product_id)
        .ok_or(LedgerError::ProductNotFound { product_id })?;

    let batch = if product.stage >= Stage::Production && product.current_batch_id != 0 {
        state.batch(product.current_batch_id).map(|batch| {
            let inputs = batch
                .raw_material_ids
                .iter()
                .zip(batch.quantities_used.iter())
                .map(|(&input_id, &quantity_used)| TraceInput {
                    product_id: input_id,
                    quantity_used,
                    detail: state.product(input_id).map_or(InputDetail::NotFound, |p| {
                        InputDetail::Known {
                            name: p.name.clone(),
                            source: p.source.clone(),
                        }
                    }),
                })
                .collect();

            BatchTrace {
                batch_id: batch.id,
                start_time: batch.start_time,
                packaging_time: batch.packaging_time,
                halal_cert_hash: batch.halal_cert_hash.clone(),
                bpom_cert_hash: batch.bpom_cert_hash.clone(),
                start_time_manual: batch.start_time_manual.clone(),
                packaging_time_manual: batch.packaging_time_manual.clone(),
                inputs,
            }
        })
    } else {
        None
    };

    Ok(FullTrace {
        product: product.clone(),
        batch,
    })
}
