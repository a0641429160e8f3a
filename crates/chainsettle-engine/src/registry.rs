//! Settlement registry — replay protection.
//!
//! An append-only set over `(order_id, leg)`. A pair enters the set at its
//! first successful settlement and is never removed: no eviction, no expiry.
//! A settlement registry must never forget — forgetting an entry would
//! reopen a settled leg to replay.

use std::collections::HashSet;

use chainsettle_types::{ChainRole, OrderId, Result, SettleError};

/// Append-only record of which `(order_id, leg)` pairs have settled.
pub struct SettlementRegistry {
    settled: HashSet<(OrderId, ChainRole)>,
}

impl SettlementRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settled: HashSet::new(),
        }
    }

    /// Mark a leg as settled.
    ///
    /// # Errors
    /// Returns [`SettleError::AlreadySettled`] if this `(order_id, role)`
    /// pair is already recorded.
    pub fn mark_settled(&mut self, order_id: OrderId, role: ChainRole) -> Result<()> {
        if !self.settled.insert((order_id, role)) {
            return Err(SettleError::AlreadySettled { order_id, role });
        }
        Ok(())
    }

    /// Whether a leg has already been settled.
    #[must_use]
    pub fn is_settled(&self, order_id: OrderId, role: ChainRole) -> bool {
        self.settled.contains(&(order_id, role))
    }

    /// Number of settled legs recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.len()
    }

    /// Whether nothing has settled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}

impl Default for SettlementRegistry {
    fn default() -> Self {
        Self::new()
    }
}
