//! # Domain Invariants
//!
//! Critical invariants that MUST hold after every committed ledger
//! operation. These are checked at runtime in tests and audits.
//!
//! - INVARIANT-1: Quantity Bound
//! - INVARIANT-2: Stage Validity
//! - INVARIANT-3: Quantity Conservation
//! - INVARIANT-4: Batch Linkage
//! - INVARIANT-5: Batch Well-Formedness

use crate::domain::ledger::LedgerState;
use shared_types::{ProductId, Stage};
use std::collections::HashMap;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Quantity Bound
///
/// For every product, `available_quantity <= initial_quantity`.
#[must_use]
pub fn check_quantity_bound(state: &LedgerState) -> bool {
    state
        .products()
        .all(|p| p.available_quantity <= p.initial_quantity)
}

/// INVARIANT-2: Stage Validity
///
/// Every existing product is `RawMaterial` or later; `NotStarted` is
/// reserved for ids that were never created.
#[must_use]
pub fn check_stage_validity(state: &LedgerState) -> bool {
    state.products().all(|p| p.stage != Stage::NotStarted)
}

/// INVARIANT-3: Quantity Conservation
///
/// For every input product, the sum of `quantities_used` debited across
/// all batches plus its remaining availability equals its initial
/// quantity exactly.
#[must_use]
pub fn check_quantity_conservation(state: &LedgerState) -> bool {
    let mut consumed: HashMap<ProductId, u64> = HashMap::new();
    for batch in state.batches() {
        for (&input_id, &quantity) in batch.raw_material_ids.iter().zip(&batch.quantities_used) {
            *consumed.entry(input_id).or_insert(0) += quantity;
        }
    }

    state.products().all(|p| {
        let total_consumed = consumed.get(&p.id).copied().unwrap_or(0);
        total_consumed <= p.initial_quantity
            && p.available_quantity + total_consumed == p.initial_quantity
    })
}

/// INVARIANT-4: Batch Linkage
///
/// A product in `Production` or later references a batch that exists;
/// a product before `Production` references no batch.
#[must_use]
pub fn check_batch_linkage(state: &LedgerState) -> bool {
    state.products().all(|p| {
        if p.stage >= Stage::Production {
            p.current_batch_id != 0 && state.batch(p.current_batch_id).is_some()
        } else {
            p.current_batch_id == 0
        }
    })
}

/// INVARIANT-5: Batch Well-Formedness
///
/// Every batch has parallel, non-empty input lists with positive
/// quantities, and its inputs reference existing products.
#[must_use]
pub fn check_batch_well_formedness(state: &LedgerState) -> bool {
    state.batches().all(|b| {
        !b.raw_material_ids.is_empty()
            && b.raw_material_ids.len() == b.quantities_used.len()
            && b.quantities_used.iter().all(|&q| q > 0)
            && b.raw_material_ids
                .iter()
                .all(|&id| state.product(id).is_some())
    })
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &LedgerState) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_quantity_bound(state) {
        violations.push(InvariantViolation::QuantityBoundExceeded);
    }
    if !check_stage_validity(state) {
        violations.push(InvariantViolation::InvalidStage);
    }
    if !check_quantity_conservation(state) {
        violations.push(InvariantViolation::QuantityNotConserved);
    }
    if !check_batch_linkage(state) {
        violations.push(InvariantViolation::BrokenBatchLink);
    }
    if !check_batch_well_formedness(state) {
        violations.push(InvariantViolation::MalformedBatch);
    }

    InvariantCheckResult { violations }
}

/// Result of checking all invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantCheckResult {
    /// Violations found, empty if all invariants hold.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A product's available quantity exceeds its initial quantity.
    QuantityBoundExceeded,
    /// An existing product sits in `NotStarted`.
    InvalidStage,
    /// Debits across batches do not reconcile with availability.
    QuantityNotConserved,
    /// A batch link is missing or dangling.
    BrokenBatchLink,
    /// A batch has empty, unparallel, or zero-quantity input lists.
    MalformedBatch,
}
