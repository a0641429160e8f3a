//! The settlement engine.
//!
//! One engine instance runs per participating chain. It owns the escrow
//! ledger, the settlement registry, and the custody conservation audit, and
//! orchestrates the full settlement flow: three-signature verification,
//! invariant checks, ledger debit, outbound transfer, replay record.
//!
//! Authorization for `settle` lives entirely in the signatures — any relayer
//! may submit a fully-signed settlement, so `settle` takes no caller
//! identity. Only `lock` is caller-gated, per the configured [`LockPolicy`].
//!
//! Every public operation is a single atomic unit: either all ledger and
//! registry mutations plus the external transfer commit, or none do.

use chainsettle_crypto::{verify_matching, verify_party1, verify_party2, Signature};
use chainsettle_ledger::{CustodyConservation, EscrowLedger};
use chainsettle_types::{
    Address, Asset, ChainRole, DepositEvent, EngineConfig, EscrowAccount, LockEvent, OrderId,
    Party, Result, SettleError, SettlementEvent, TradeIntent, WithdrawEvent,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::custodian::Custodian;
use crate::registry::SettlementRegistry;

/// Settlement/escrow engine for one chain.
pub struct SettlementEngine<C: Custodian> {
    ledger: EscrowLedger,
    registry: SettlementRegistry,
    conservation: CustodyConservation,
    custodian: C,
    config: EngineConfig,
}

impl<C: Custodian> SettlementEngine<C> {
    /// Create an engine over the given custodian.
    #[must_use]
    pub fn new(config: EngineConfig, custodian: C) -> Self {
        Self {
            ledger: EscrowLedger::new(),
            registry: SettlementRegistry::new(),
            conservation: CustodyConservation::new(),
            custodian,
            config,
        }
    }

    /// Deposit: pull funds from the owner's external wallet into custody,
    /// then credit the ledger.
    ///
    /// # Errors
    /// - [`SettleError::ZeroAmount`] for non-positive amounts
    /// - whatever the custodian's `pull` returns if the wallet can't cover it
    pub fn deposit(&mut self, owner: Address, asset: Asset, amount: Decimal) -> Result<DepositEvent> {
        if amount <= Decimal::ZERO {
            return Err(SettleError::ZeroAmount);
        }
        self.custodian.pull(owner, asset, amount)?;
        // Cannot fail past this point: the amount check above is the
        // ledger's only deposit precondition.
        let event = self.ledger.deposit(owner, asset, amount)?;
        self.conservation.record_inflow(asset, amount);
        Ok(event)
    }

    /// Withdraw available funds: debit the ledger, then pay out to the
    /// owner's external wallet.
    ///
    /// # Errors
    /// - [`SettleError::ZeroAmount`] for non-positive amounts
    /// - [`SettleError::InsufficientAvailableBalance`] if locked funds would
    ///   be touched
    pub fn withdraw(
        &mut self,
        owner: Address,
        asset: Asset,
        amount: Decimal,
    ) -> Result<WithdrawEvent> {
        let event = self.ledger.withdraw(owner, asset, amount)?;
        if let Err(err) = self.custodian.push(owner, asset, amount) {
            // Internal debit committed but payout refused: restore the
            // ledger so the operation is all-or-nothing.
            self.ledger.restore_available(owner, asset, amount);
            return Err(err);
        }
        self.conservation.record_outflow(asset, amount);
        Ok(event)
    }

    /// Lock available escrow against a matched order. Caller-gated per the
    /// configured [`LockPolicy`].
    ///
    /// # Errors
    /// - [`SettleError::UnauthorizedCaller`] if the policy rejects `caller`
    /// - [`SettleError::InsufficientAvailableBalance`] if `amount > available`
    pub fn lock(
        &mut self,
        caller: Address,
        owner: Address,
        asset: Asset,
        amount: Decimal,
        order_id: OrderId,
    ) -> Result<LockEvent> {
        if !self.config.may_lock(caller, owner) {
            return Err(SettleError::UnauthorizedCaller);
        }
        self.ledger.lock(owner, asset, amount, order_id)
    }

    /// Settle one leg of a cross-chain trade.
    ///
    /// Ordered, short-circuiting preconditions — each failure is distinct,
    /// leaves all state untouched, and is retryable with corrected inputs:
    /// positive and non-overflowing amounts, receive wallets, opposite
    /// sides, replay check, the three signatures, then the locked-balance
    /// check for this leg. On success the obligor's
    /// locked escrow is debited, the recipient's external wallet credited,
    /// and the `(order_id, role)` pair permanently recorded.
    pub fn settle(
        &mut self,
        intent: &TradeIntent,
        sig1: &Signature,
        sig2: &Signature,
        matching_sig: &Signature,
        role: ChainRole,
    ) -> Result<SettlementEvent> {
        self.check_settle(intent, sig1, sig2, matching_sig, role)
            .inspect_err(|err| {
                warn!(order = %intent.order_id.short(), %role, %err, "settlement rejected");
            })?;

        let obligor = intent.obligor(role);
        let asset = intent.leg_asset(role);
        let amount = intent.leg_amount(role);
        let recipient = intent.recipient(role);

        // Internal debit strictly before the external side effect, so the
        // payout can never double-spend the same locked funds.
        self.ledger.consume_locked(obligor, asset, amount)?;
        if let Err(err) = self.custodian.push(recipient, asset, amount) {
            self.ledger.restore_locked(obligor, asset, amount);
            return Err(err);
        }
        // Terminal state transition: Unsettled -> Settled. The replay check
        // in check_settle guarantees this insert succeeds.
        self.registry.mark_settled(intent.order_id, role)?;
        self.conservation.record_outflow(asset, amount);

        let event = SettlementEvent {
            order_id: intent.order_id,
            sender: obligor,
            receiver: recipient,
            asset,
            amount,
            chain_id: self.config.local_chain_id,
            role,
            settled_at: Utc::now(),
        };
        info!(%event, "leg settled");
        Ok(event)
    }

    /// The settle precondition chain. Read-only.
    fn check_settle(
        &self,
        intent: &TradeIntent,
        sig1: &Signature,
        sig2: &Signature,
        matching_sig: &Signature,
        role: ChainRole,
    ) -> Result<()> {
        // Decimal amounts are signed; a non-positive or overflowing amount
        // would turn the leg debit into a mint, so reject before any other
        // check regardless of how well the intent is signed.
        if intent.quantity <= Decimal::ZERO || intent.price <= Decimal::ZERO {
            return Err(SettleError::ZeroAmount);
        }
        if intent.checked_quote_amount().is_none() {
            return Err(SettleError::AmountOverflow);
        }
        if intent.party1_receive_wallet.is_zero() {
            return Err(SettleError::InvalidReceiveWallet(Party::Party1));
        }
        if intent.party2_receive_wallet.is_zero() {
            return Err(SettleError::InvalidReceiveWallet(Party::Party2));
        }
        if intent.party1_side == intent.party2_side {
            return Err(SettleError::SameSide);
        }
        if self.registry.is_settled(intent.order_id, role) {
            return Err(SettleError::AlreadySettled {
                order_id: intent.order_id,
                role,
            });
        }
        verify_party1(intent, sig1)?;
        verify_party2(intent, sig2)?;
        verify_matching(
            intent,
            matching_sig,
            role,
            self.config.local_chain_id,
            self.config.matching_engine,
        )?;

        let locked = self.ledger.locked(intent.obligor(role), intent.leg_asset(role));
        if locked < intent.leg_amount(role) {
            return Err(match role {
                ChainRole::Source => SettleError::InsufficientLockedBaseBalance,
                ChainRole::Destination => SettleError::InsufficientLockedQuoteBalance,
            });
        }
        Ok(())
    }

    /// Pure read: `(total, available, locked)` for an account.
    #[must_use]
    pub fn balances(&self, owner: Address, asset: Asset) -> (Decimal, Decimal, Decimal) {
        self.ledger.balances(owner, asset)
    }

    /// The full escrow account record.
    #[must_use]
    pub fn account(&self, owner: Address, asset: Asset) -> EscrowAccount {
        self.ledger.account(owner, asset)
    }

    /// Advisory nonce for off-chain intent construction.
    #[must_use]
    pub fn nonce_of(&self, owner: Address, asset: Asset) -> u64 {
        self.ledger.nonce_of(owner, asset)
    }

    /// Whether a leg has already settled.
    #[must_use]
    pub fn is_settled(&self, order_id: OrderId, role: ChainRole) -> bool {
        self.registry.is_settled(order_id, role)
    }

    /// Verify custody conservation for an asset.
    pub fn verify_supply(&self, asset: Asset) -> Result<()> {
        self.conservation
            .verify(asset, self.ledger.total_supply(asset))
    }

    /// Access the underlying ledger (read-only).
    #[must_use]
    pub fn ledger(&self) -> &EscrowLedger {
        &self.ledger
    }

    /// Access the custodian (read-only).
    #[must_use]
    pub fn custodian(&self) -> &C {
        &self.custodian
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
