//! Escrow ledger — the source of truth for all custodied balance state.
//!
//! Tracks per-(owner, asset) accounts with total/locked accounting. All
//! mutations are check-then-commit atomic: either the full operation succeeds
//! or the account is unchanged. The ledger enforces balance arithmetic only;
//! caller authorization (the lock ACL, the three settlement signatures) is
//! the engine's job.

use std::collections::HashMap;

use chainsettle_types::{
    Address, Asset, DepositEvent, EscrowAccount, LockEvent, OrderId, Result, SettleError,
    WithdrawEvent,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

/// Per-(owner, asset) escrow balance store.
///
/// Accounts are created implicitly on first deposit and never deleted.
/// Invariant after every operation: `0 ≤ locked ≤ total` for every account.
pub struct EscrowLedger {
    /// Per-(owner, asset) accounts.
    accounts: HashMap<(Address, Asset), EscrowAccount>,
    /// Advisory per-(owner, asset) nonces for off-chain intent construction.
    /// Bumped on each lock; never checked at settlement.
    nonces: HashMap<(Address, Asset), u64>,
}

impl EscrowLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            nonces: HashMap::new(),
        }
    }

    /// Deposit funds into custody (`total += amount`).
    ///
    /// # Errors
    /// Returns [`SettleError::ZeroAmount`] if `amount` is not positive.
    pub fn deposit(&mut self, owner: Address, asset: Asset, amount: Decimal) -> Result<DepositEvent> {
        if amount <= Decimal::ZERO {
            return Err(SettleError::ZeroAmount);
        }
        let account = self.accounts.entry((owner, asset)).or_default();
        account.total += amount;
        info!(%owner, %asset, %amount, "escrow deposit");
        Ok(DepositEvent {
            owner,
            asset,
            amount,
            occurred_at: Utc::now(),
        })
    }

    /// Withdraw available funds from custody (`total -= amount`).
    ///
    /// # Errors
    /// - [`SettleError::ZeroAmount`] if `amount` is not positive
    /// - [`SettleError::InsufficientAvailableBalance`] if `amount > available`
    pub fn withdraw(
        &mut self,
        owner: Address,
        asset: Asset,
        amount: Decimal,
    ) -> Result<WithdrawEvent> {
        if amount <= Decimal::ZERO {
            return Err(SettleError::ZeroAmount);
        }
        let account = self.account_mut_checked(owner, asset, amount)?;
        account.total -= amount;
        info!(%owner, %asset, %amount, "escrow withdraw");
        Ok(WithdrawEvent {
            owner,
            asset,
            amount,
            occurred_at: Utc::now(),
        })
    }

    /// Lock available funds against a matched order (`locked += amount`).
    /// Bumps the owner's advisory nonce for this asset.
    ///
    /// # Errors
    /// - [`SettleError::ZeroAmount`] if `amount` is not positive
    /// - [`SettleError::InsufficientAvailableBalance`] if `amount > available`
    pub fn lock(
        &mut self,
        owner: Address,
        asset: Asset,
        amount: Decimal,
        order_id: OrderId,
    ) -> Result<LockEvent> {
        if amount <= Decimal::ZERO {
            return Err(SettleError::ZeroAmount);
        }
        let account = self.account_mut_checked(owner, asset, amount)?;
        account.locked += amount;
        *self.nonces.entry((owner, asset)).or_insert(0) += 1;
        info!(%owner, %asset, %amount, order = %order_id.short(), "escrow lock");
        Ok(LockEvent {
            owner,
            asset,
            amount,
            order_id,
            occurred_at: Utc::now(),
        })
    }

    /// Settlement debit: consume locked funds out of custody
    /// (`total -= amount`, `locked -= amount`).
    ///
    /// # Errors
    /// - [`SettleError::ZeroAmount`] if `amount` is not positive
    /// - [`SettleError::InsufficientLockedBalance`] if `amount > locked`
    pub fn consume_locked(&mut self, owner: Address, asset: Asset, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(SettleError::ZeroAmount);
        }
        let account = self
            .accounts
            .get_mut(&(owner, asset))
            .ok_or(SettleError::InsufficientLockedBalance)?;
        if account.locked < amount {
            return Err(SettleError::InsufficientLockedBalance);
        }
        account.total -= amount;
        account.locked -= amount;
        Ok(())
    }

    /// Restore previously consumed locked funds. Only for rolling back a
    /// settlement debit whose outbound transfer failed; never part of the
    /// public operation surface.
    pub fn restore_locked(&mut self, owner: Address, asset: Asset, amount: Decimal) {
        let account = self.accounts.entry((owner, asset)).or_default();
        account.total += amount;
        account.locked += amount;
    }

    /// Restore a withdrawal debit whose outbound payout failed. Only for
    /// rollback; unlike [`Self::deposit`] it emits no audit record, since no
    /// funds actually entered custody.
    pub fn restore_available(&mut self, owner: Address, asset: Asset, amount: Decimal) {
        let account = self.accounts.entry((owner, asset)).or_default();
        account.total += amount;
    }

    /// Pure read: `(total, available, locked)` for an account.
    #[must_use]
    pub fn balances(&self, owner: Address, asset: Asset) -> (Decimal, Decimal, Decimal) {
        let account = self.account(owner, asset);
        (account.total, account.available(), account.locked)
    }

    /// The full account record (zero if never deposited).
    #[must_use]
    pub fn account(&self, owner: Address, asset: Asset) -> EscrowAccount {
        self.accounts
            .get(&(owner, asset))
            .cloned()
            .unwrap_or_default()
    }

    /// Locked balance for an account.
    #[must_use]
    pub fn locked(&self, owner: Address, asset: Asset) -> Decimal {
        self.account(owner, asset).locked
    }

    /// Available (unlocked) balance for an account.
    #[must_use]
    pub fn available(&self, owner: Address, asset: Asset) -> Decimal {
        self.account(owner, asset).available()
    }

    /// Advisory nonce for off-chain intent construction. Not consumed or
    /// checked during settlement; replay safety lives in the settlement
    /// registry.
    #[must_use]
    pub fn nonce_of(&self, owner: Address, asset: Asset) -> u64 {
        self.nonces.get(&(owner, asset)).copied().unwrap_or(0)
    }

    /// Total custodied supply of an asset across all owners.
    #[must_use]
    pub fn total_supply(&self, asset: Asset) -> Decimal {
        self.accounts
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, account)| account.total)
            .sum()
    }

    /// Whether the `0 ≤ locked ≤ total` invariant holds for every account.
    #[must_use]
    pub fn all_consistent(&self) -> bool {
        self.accounts.values().all(EscrowAccount::is_consistent)
    }

    fn account_mut_checked(
        &mut self,
        owner: Address,
        asset: Asset,
        needed: Decimal,
    ) -> Result<&mut EscrowAccount> {
        let account = self.accounts.get_mut(&(owner, asset)).ok_or(
            SettleError::InsufficientAvailableBalance {
                needed,
                available: Decimal::ZERO,
            },
        )?;
        let available = account.available();
        if available < needed {
            return Err(SettleError::InsufficientAvailableBalance { needed, available });
        }
        Ok(account)
    }
}

impl Default for EscrowLedger {
    fn default() -> Self {
        Self::new()
    }
}
