//! Custody seam — the external asset-transfer side effect.
//!
//! The engine's ledger tracks who owns what *inside* custody; the custodian
//! moves the actual assets across the custody boundary: `pull` draws a
//! deposit in from the owner's wallet, `push` pays a withdrawal or
//! settlement out to an external wallet. In production this is a token
//! transfer adapter; tests and simulations use [`InMemoryCustodian`].

use std::collections::HashMap;

use chainsettle_types::{Address, Asset, Result, SettleError};
use rust_decimal::Decimal;

/// Moves assets across the custody boundary.
pub trait Custodian {
    /// Draw `amount` of `asset` from `from`'s external wallet into custody.
    ///
    /// # Errors
    /// Implementations fail if the wallet cannot cover the pull; the engine
    /// then aborts the deposit with no ledger change.
    fn pull(&mut self, from: Address, asset: Asset, amount: Decimal) -> Result<()>;

    /// Pay `amount` of `asset` out of custody to `to`'s external wallet.
    ///
    /// # Errors
    /// A failing push aborts the surrounding operation; the engine rolls
    /// back any ledger debit already made.
    fn push(&mut self, to: Address, asset: Asset, amount: Decimal) -> Result<()>;
}

/// In-memory custodian: per-(wallet, asset) external balances.
///
/// Faithful about failure: a `pull` against an underfunded wallet fails the
/// way an on-chain token transfer would.
pub struct InMemoryCustodian {
    wallets: HashMap<(Address, Asset), Decimal>,
}

impl InMemoryCustodian {
    /// Create an empty custodian.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wallets: HashMap::new(),
        }
    }

    /// Credit an external wallet out of thin air (test/simulation setup).
    pub fn mint(&mut self, wallet: Address, asset: Asset, amount: Decimal) {
        *self.wallets.entry((wallet, asset)).or_insert(Decimal::ZERO) += amount;
    }

    /// External balance of a wallet.
    #[must_use]
    pub fn balance_of(&self, wallet: Address, asset: Asset) -> Decimal {
        self.wallets
            .get(&(wallet, asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for InMemoryCustodian {
    fn default() -> Self {
        Self::new()
    }
}

impl Custodian for InMemoryCustodian {
    fn pull(&mut self, from: Address, asset: Asset, amount: Decimal) -> Result<()> {
        let balance = self.wallets.entry((from, asset)).or_insert(Decimal::ZERO);
        if *balance < amount {
            return Err(SettleError::InsufficientWalletBalance {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn push(&mut self, to: Address, asset: Asset, amount: Decimal) -> Result<()> {
        *self.wallets.entry((to, asset)).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }
}
