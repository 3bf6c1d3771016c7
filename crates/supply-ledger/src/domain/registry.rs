//! # Access Registry
//!
//! Owns the set of authorized producers and the immutable administrator
//! identity. Every mutating ledger operation is gated through this
//! registry's checks.

use crate::domain::errors::LedgerError;
use serde::{Deserialize, Serialize};
use shared_types::AccountId;
use std::collections::HashMap;

/// The producer set plus the administrator identity.
///
/// The administrator is a producer by construction: `ensure_producer`
/// passes for the administrator regardless of the mutable flag map, so
/// admin authority can never be removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerRegistry {
    /// The deployer identity. Immutable for the registry's lifetime.
    administrator: AccountId,
    /// Authorization flags keyed by identity.
    producers: HashMap<AccountId, bool>,
}

impl ProducerRegistry {
    /// Create a registry administered by `administrator`, who is flagged
    /// as a producer from the start.
    #[must_use]
    pub fn new(administrator: AccountId) -> Self {
        let mut producers = HashMap::new();
        producers.insert(administrator, true);
        Self {
            administrator,
            producers,
        }
    }

    /// The immutable administrator identity.
    #[must_use]
    pub fn administrator(&self) -> AccountId {
        self.administrator
    }

    /// Returns true if `account` currently holds producer authorization.
    #[must_use]
    pub fn is_producer(&self, account: AccountId) -> bool {
        account == self.administrator || self.producers.get(&account).copied().unwrap_or(false)
    }

    /// Fails with `NotOwner` unless `caller` is the administrator.
    pub fn ensure_administrator(&self, caller: AccountId) -> Result<(), LedgerError> {
        if caller == self.administrator {
            Ok(())
        } else {
            Err(LedgerError::NotOwner { caller })
        }
    }

    /// Fails with `NotAuthorizedProducer` unless `caller` is a producer.
    pub fn ensure_producer(&self, caller: AccountId) -> Result<(), LedgerError> {
        if self.is_producer(caller) {
            Ok(())
        } else {
            Err(LedgerError::NotAuthorizedProducer { account: caller })
        }
    }

    /// Grant producer authorization. Admin-gated; the null identity is
    /// rejected. Idempotent for state (re-adding is a no-op).
    pub fn add_producer(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_administrator(caller)?;
        if account.is_zero() {
            return Err(LedgerError::ZeroAddressNotAllowed);
        }
        self.producers.insert(account, true);
        Ok(())
    }

    /// Revoke producer authorization. Admin-gated; the null identity is
    /// rejected; fails if `account` is not currently flagged.
    ///
    /// Revoking the administrator's flag is permitted but has no effect on
    /// admin authority (`is_producer` short-circuits on the administrator).
    pub fn remove_producer(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_administrator(caller)?;
        if account.is_zero() {
            return Err(LedgerError::ZeroAddressNotAllowed);
        }
        if !self.producers.get(&account).copied().unwrap_or(false) {
            return Err(LedgerError::NotAuthorizedProducer { account });
        }
        self.producers.insert(account, false);
        Ok(())
    }
}
