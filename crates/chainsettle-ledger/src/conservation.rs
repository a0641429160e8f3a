//! Custody conservation invariant checker.
//!
//! Mathematical invariant enforced after every settlement:
//! ```text
//! ∀ asset: Σ account.total == Σ(deposits) - Σ(withdrawals) - Σ(settlement payouts)
//! ```
//!
//! Deposits flow into custody; withdrawals and settlement payouts flow out.
//! If this ever breaks, balances have been created or destroyed rather than
//! moved — the ultimate safety net.

use std::collections::HashMap;

use chainsettle_types::{Asset, Result, SettleError};
use rust_decimal::Decimal;

/// Tracks per-asset custody inflows and outflows and validates conservation.
pub struct CustodyConservation {
    /// Total deposits per asset since genesis.
    inflows: HashMap<Asset, Decimal>,
    /// Total withdrawals and settlement payouts per asset since genesis.
    outflows: HashMap<Asset, Decimal>,
}

impl CustodyConservation {
    /// Create a new conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflows: HashMap::new(),
            outflows: HashMap::new(),
        }
    }

    /// Record funds entering custody (deposit).
    pub fn record_inflow(&mut self, asset: Asset, amount: Decimal) {
        *self.inflows.entry(asset).or_insert(Decimal::ZERO) += amount;
    }

    /// Record funds leaving custody (withdrawal or settlement payout).
    pub fn record_outflow(&mut self, asset: Asset, amount: Decimal) {
        *self.outflows.entry(asset).or_insert(Decimal::ZERO) += amount;
    }

    /// Expected custodied supply for an asset: inflows - outflows.
    #[must_use]
    pub fn expected_supply(&self, asset: Asset) -> Decimal {
        let inflow = self.inflows.get(&asset).copied().unwrap_or(Decimal::ZERO);
        let outflow = self.outflows.get(&asset).copied().unwrap_or(Decimal::ZERO);
        inflow - outflow
    }

    /// Verify that the actual custodied supply (sum of all account totals)
    /// matches the expected supply for a given asset.
    ///
    /// # Errors
    /// Returns [`SettleError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, asset: Asset, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply(asset);
        if actual_supply != expected {
            return Err(SettleError::SupplyInvariantViolation {
                reason: format!(
                    "Asset {asset}: actual supply {actual_supply} != expected {expected} \
                     (inflows={}, outflows={})",
                    self.inflows.get(&asset).copied().unwrap_or(Decimal::ZERO),
                    self.outflows.get(&asset).copied().unwrap_or(Decimal::ZERO),
                ),
            });
        }
        Ok(())
    }

    /// Total recorded inflows for an asset.
    #[must_use]
    pub fn total_inflows(&self, asset: Asset) -> Decimal {
        self.inflows.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Total recorded outflows for an asset.
    #[must_use]
    pub fn total_outflows(&self, asset: Asset) -> Decimal {
        self.outflows.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }
}

impl Default for CustodyConservation {
    fn default() -> Self {
        Self::new()
    }
}
