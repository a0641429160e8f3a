//! Escrow account model.
//!
//! Each (owner, asset) pair has a `total` custodied balance, of which some
//! portion is `locked` against matched orders. `available` is derived, never
//! stored. Invariant: `0 ≤ locked ≤ total` after every operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Custodied balance for a single (owner, asset) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EscrowAccount {
    /// Total funds in custody for this owner and asset.
    pub total: Decimal,
    /// Portion of `total` locked against matched orders.
    pub locked: Decimal,
}

impl EscrowAccount {
    /// Create an empty account.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: Decimal::ZERO,
            locked: Decimal::ZERO,
        }
    }

    /// Funds usable for new locks or withdrawal: `total - locked`.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.total - self.locked
    }

    /// Whether this account holds nothing at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total.is_zero() && self.locked.is_zero()
    }

    /// The `0 ≤ locked ≤ total` invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.locked >= Decimal::ZERO && self.locked <= self.total
    }
}

impl Default for EscrowAccount {
    fn default() -> Self {
        Self::new()
    }
}
