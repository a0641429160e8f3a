//! End-to-end integration tests across all three crates.
//!
//! These tests exercise the full escrow lifecycle:
//! deposit -> lock -> three-signature settlement -> withdraw
//!
//! They verify that the ledger, the signature layer, and the engine work
//! together correctly in realistic scenarios: both legs of a cross-chain
//! trade, replay rejection, forged and corrupted signatures, underfunded
//! escrow, and custody conservation.

use chainsettle_crypto::{LocalSigner, Signature};
use chainsettle_engine::{InMemoryCustodian, SettlementEngine};
use chainsettle_types::*;
use chrono::Utc;
use rust_decimal::Decimal;

const CHAIN: ChainId = ChainId(31337);
const BASE: Asset = Address([0xAAu8; 20]);
const QUOTE: Asset = Address([0xBBu8; 20]);
const P1_WALLET: Address = Address([0xA1u8; 20]);
const P2_WALLET: Address = Address([0xB2u8; 20]);

/// Helper: one engine plus the three signing identities of the protocol.
struct SettlementHarness {
    engine: SettlementEngine<InMemoryCustodian>,
    party1: LocalSigner,
    party2: LocalSigner,
    matcher: LocalSigner,
}

impl SettlementHarness {
    fn new() -> Self {
        let party1 = LocalSigner::from_bytes(&[1u8; 32]).unwrap();
        let party2 = LocalSigner::from_bytes(&[2u8; 32]).unwrap();
        let matcher = LocalSigner::from_bytes(&[9u8; 32]).unwrap();

        let mut custodian = InMemoryCustodian::new();
        custodian.mint(party1.address(), BASE, Decimal::new(1_000, 0));
        custodian.mint(party2.address(), QUOTE, Decimal::new(10_000, 0));

        let engine = SettlementEngine::new(EngineConfig::new(matcher.address(), CHAIN), custodian);
        Self {
            engine,
            party1,
            party2,
            matcher,
        }
    }

    /// A matched trade: party1 asks 100 base @ 5, party2 bids. Quote leg
    /// is therefore 500.
    fn intent(&self, label: &str) -> TradeIntent {
        TradeIntent {
            order_id: OrderId::from_label(label),
            party1: self.party1.address(),
            party2: self.party2.address(),
            party1_receive_wallet: P1_WALLET,
            party2_receive_wallet: P2_WALLET,
            base_asset: BASE,
            quote_asset: QUOTE,
            price: Decimal::new(5, 0),
            quantity: Decimal::new(100, 0),
            party1_side: Side::Ask,
            party2_side: Side::Bid,
            source_chain_id: CHAIN,
            destination_chain_id: CHAIN,
            timestamp: Utc::now(),
            nonce1: self.engine.nonce_of(self.party1.address(), BASE),
            nonce2: self.engine.nonce_of(self.party2.address(), QUOTE),
        }
    }

    /// Deposit and lock both legs' obligations against `order_id`.
    fn fund_and_lock(&mut self, order_id: OrderId) {
        let matcher = self.matcher.address();
        let p1 = self.party1.address();
        let p2 = self.party2.address();

        self.engine.deposit(p1, BASE, Decimal::new(100, 0)).unwrap();
        self.engine
            .lock(matcher, p1, BASE, Decimal::new(100, 0), order_id)
            .unwrap();

        self.engine
            .deposit(p2, QUOTE, Decimal::new(500, 0))
            .unwrap();
        self.engine
            .lock(matcher, p2, QUOTE, Decimal::new(500, 0), order_id)
            .unwrap();
    }

    /// All three signatures for one leg of the intent.
    fn sign_all(&self, intent: &TradeIntent, role: ChainRole) -> (Signature, Signature, Signature) {
        let sig1 = self
            .party1
            .sign_intent(intent, intent.party1_side, intent.party1_receive_wallet)
            .unwrap();
        let sig2 = self
            .party2
            .sign_intent(intent, intent.party2_side, intent.party2_receive_wallet)
            .unwrap();
        let matching = self.matcher.sign_matching(intent, role, CHAIN).unwrap();
        (sig1, sig2, matching)
    }

    fn settle(&mut self, intent: &TradeIntent, role: ChainRole) -> Result<SettlementEvent> {
        let (sig1, sig2, matching) = self.sign_all(intent, role);
        self.engine.settle(intent, &sig1, &sig2, &matching, role)
    }
}

// =============================================================================
// Test: Source leg — base asset moves from party1 to party2's receive wallet
// =============================================================================
#[test]
fn e2e_source_leg_settles_base_asset() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    let event = h.settle(&intent, ChainRole::Source).unwrap();

    assert_eq!(event.sender, h.party1.address());
    assert_eq!(event.receiver, P2_WALLET);
    assert_eq!(event.asset, BASE);
    assert_eq!(event.amount, Decimal::new(100, 0));
    assert_eq!(event.chain_id, CHAIN);
    assert_eq!(event.role, ChainRole::Source);

    // Party2's receive wallet got the base asset.
    assert_eq!(
        h.engine.custodian().balance_of(P2_WALLET, BASE),
        Decimal::new(100, 0)
    );
    // Party1's escrow in the base asset is fully consumed.
    assert_eq!(
        h.engine.balances(h.party1.address(), BASE),
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    );
    // Party2's quote escrow is untouched on this leg.
    assert_eq!(
        h.engine.balances(h.party2.address(), QUOTE).2,
        Decimal::new(500, 0)
    );
    assert!(h.engine.is_settled(intent.order_id, ChainRole::Source));
    assert!(!h.engine.is_settled(intent.order_id, ChainRole::Destination));
}

// =============================================================================
// Test: Destination leg — quote asset (price × quantity) moves from party2
// =============================================================================
#[test]
fn e2e_destination_leg_settles_quote_asset() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    let event = h.settle(&intent, ChainRole::Destination).unwrap();

    assert_eq!(event.sender, h.party2.address());
    assert_eq!(event.receiver, P1_WALLET);
    assert_eq!(event.asset, QUOTE);
    assert_eq!(event.amount, Decimal::new(500, 0));

    assert_eq!(
        h.engine.custodian().balance_of(P1_WALLET, QUOTE),
        Decimal::new(500, 0)
    );
    assert_eq!(
        h.engine.balances(h.party2.address(), QUOTE),
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    );
}

// =============================================================================
// Test: Both legs settle independently, then custody conserves
// =============================================================================
#[test]
fn e2e_both_legs_and_conservation() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    h.settle(&intent, ChainRole::Source).unwrap();
    h.settle(&intent, ChainRole::Destination).unwrap();

    assert!(h.engine.is_settled(intent.order_id, ChainRole::Source));
    assert!(h.engine.is_settled(intent.order_id, ChainRole::Destination));

    // Nothing left in custody for either asset.
    h.engine.verify_supply(BASE).unwrap();
    h.engine.verify_supply(QUOTE).unwrap();
    assert_eq!(h.engine.ledger().total_supply(BASE), Decimal::ZERO);
    assert_eq!(h.engine.ledger().total_supply(QUOTE), Decimal::ZERO);
}

// =============================================================================
// Test: Replay of a settled leg is rejected with no balance movement
// =============================================================================
#[test]
fn e2e_replay_is_rejected() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    h.settle(&intent, ChainRole::Source).unwrap();
    let wallet_after = h.engine.custodian().balance_of(P2_WALLET, BASE);

    let err = h.settle(&intent, ChainRole::Source).unwrap_err();
    assert!(matches!(
        err,
        SettleError::AlreadySettled {
            role: ChainRole::Source,
            ..
        }
    ));
    // Second attempt moved nothing.
    assert_eq!(h.engine.custodian().balance_of(P2_WALLET, BASE), wallet_after);
}

// =============================================================================
// Test: The opposite leg is still open after one leg settles
// =============================================================================
#[test]
fn e2e_legs_are_independent_replay_scopes() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    h.settle(&intent, ChainRole::Source).unwrap();
    // Destination leg of the same order is a distinct record.
    h.settle(&intent, ChainRole::Destination).unwrap();
}

// =============================================================================
// Test: A signature from the wrong key fails the matching party check
// =============================================================================
#[test]
fn e2e_forged_party1_signature_rejected() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    // Party2 signs party1's digest — recovers to the wrong address.
    let forged = h
        .party2
        .sign_intent(&intent, intent.party1_side, intent.party1_receive_wallet)
        .unwrap();
    let (_, sig2, matching) = h.sign_all(&intent, ChainRole::Source);

    let err = h
        .engine
        .settle(&intent, &forged, &sig2, &matching, ChainRole::Source)
        .unwrap_err();
    assert!(matches!(err, SettleError::InvalidParty1Signature));
    assert!(!h.engine.is_settled(intent.order_id, ChainRole::Source));
}

// =============================================================================
// Test: A party signature passed as the matching attestation is rejected
// =============================================================================
#[test]
fn e2e_party_signature_cannot_stand_in_for_matching() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    let (sig1, sig2, _) = h.sign_all(&intent, ChainRole::Source);

    let err = h
        .engine
        .settle(&intent, &sig1, &sig2, &sig1, ChainRole::Source)
        .unwrap_err();
    assert!(matches!(err, SettleError::InvalidMatchingEngineSignature));
}

// =============================================================================
// Test: A matching attestation for the other leg does not authorize this one
// =============================================================================
#[test]
fn e2e_matching_signature_is_leg_bound() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    let (sig1, sig2, _) = h.sign_all(&intent, ChainRole::Source);
    let wrong_leg = h
        .matcher
        .sign_matching(&intent, ChainRole::Destination, CHAIN)
        .unwrap();

    let err = h
        .engine
        .settle(&intent, &sig1, &sig2, &wrong_leg, ChainRole::Source)
        .unwrap_err();
    assert!(matches!(err, SettleError::InvalidMatchingEngineSignature));
}

// =============================================================================
// Test: A single flipped bit in any of the three signatures blocks settlement
// =============================================================================
#[test]
fn e2e_bit_flip_in_any_signature_rejected() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    let (sig1, sig2, matching) = h.sign_all(&intent, ChainRole::Source);

    let err = h
        .engine
        .settle(
            &intent,
            &sig1.with_flipped_bit(12, 4),
            &sig2,
            &matching,
            ChainRole::Source,
        )
        .unwrap_err();
    assert!(matches!(err, SettleError::InvalidParty1Signature));

    let err = h
        .engine
        .settle(
            &intent,
            &sig1,
            &sig2.with_flipped_bit(12, 4),
            &matching,
            ChainRole::Source,
        )
        .unwrap_err();
    assert!(matches!(err, SettleError::InvalidParty2Signature));

    let err = h
        .engine
        .settle(
            &intent,
            &sig1,
            &sig2,
            &matching.with_flipped_bit(12, 4),
            ChainRole::Source,
        )
        .unwrap_err();
    assert!(matches!(err, SettleError::InvalidMatchingEngineSignature));

    // The unmodified signatures still settle.
    h.engine
        .settle(&intent, &sig1, &sig2, &matching, ChainRole::Source)
        .unwrap();
}

// =============================================================================
// Test: Underfunded lock fails the leg-specific balance check
// =============================================================================
#[test]
fn e2e_insufficient_locked_base_rejected() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");

    // Party1 locks only half of the base obligation.
    let matcher = h.matcher.address();
    let p1 = h.party1.address();
    h.engine.deposit(p1, BASE, Decimal::new(50, 0)).unwrap();
    h.engine
        .lock(matcher, p1, BASE, Decimal::new(50, 0), intent.order_id)
        .unwrap();

    let err = h.settle(&intent, ChainRole::Source).unwrap_err();
    assert!(matches!(err, SettleError::InsufficientLockedBaseBalance));

    // Escrow untouched: the half-lock is still there.
    assert_eq!(h.engine.balances(p1, BASE).2, Decimal::new(50, 0));
    assert!(!h.engine.is_settled(intent.order_id, ChainRole::Source));
}

#[test]
fn e2e_insufficient_locked_quote_rejected() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");

    // Only the base leg got locked.
    let matcher = h.matcher.address();
    let p1 = h.party1.address();
    h.engine.deposit(p1, BASE, Decimal::new(100, 0)).unwrap();
    h.engine
        .lock(matcher, p1, BASE, Decimal::new(100, 0), intent.order_id)
        .unwrap();

    let err = h.settle(&intent, ChainRole::Destination).unwrap_err();
    assert!(matches!(err, SettleError::InsufficientLockedQuoteBalance));
}

// =============================================================================
// Test: Non-positive amounts are rejected even when fully signed
// =============================================================================
#[test]
fn e2e_negative_quantity_rejected_despite_valid_signatures() {
    let mut h = SettlementHarness::new();
    let mut intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    // All three signers attest to a negative quantity; settling it would
    // credit the obligor instead of debiting them.
    intent.quantity = Decimal::new(-100, 0);
    let err = h.settle(&intent, ChainRole::Source).unwrap_err();
    assert!(matches!(err, SettleError::ZeroAmount));

    intent.quantity = Decimal::new(100, 0);
    intent.price = Decimal::new(-5, 0);
    let err = h.settle(&intent, ChainRole::Destination).unwrap_err();
    assert!(matches!(err, SettleError::ZeroAmount));

    // Nothing moved and both legs remain open.
    assert_eq!(
        h.engine.balances(h.party1.address(), BASE),
        (Decimal::new(100, 0), Decimal::ZERO, Decimal::new(100, 0))
    );
    assert_eq!(h.engine.custodian().balance_of(P2_WALLET, BASE), Decimal::ZERO);
    assert!(!h.engine.is_settled(intent.order_id, ChainRole::Source));
    h.engine.verify_supply(BASE).unwrap();
}

#[test]
fn e2e_overflowing_quote_amount_rejected() {
    let mut h = SettlementHarness::new();
    let mut intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    intent.price = Decimal::MAX;
    intent.quantity = Decimal::new(2, 0);
    let err = h.settle(&intent, ChainRole::Destination).unwrap_err();
    assert!(matches!(err, SettleError::AmountOverflow));
    assert!(!h.engine.is_settled(intent.order_id, ChainRole::Destination));
}

// =============================================================================
// Test: Zero receive wallets are rejected before any signature work
// =============================================================================
#[test]
fn e2e_zero_receive_wallet_rejected() {
    let mut h = SettlementHarness::new();
    let mut intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    intent.party1_receive_wallet = Address::ZERO;
    let err = h.settle(&intent, ChainRole::Source).unwrap_err();
    assert!(matches!(
        err,
        SettleError::InvalidReceiveWallet(Party::Party1)
    ));

    intent.party1_receive_wallet = P1_WALLET;
    intent.party2_receive_wallet = Address::ZERO;
    let err = h.settle(&intent, ChainRole::Source).unwrap_err();
    assert!(matches!(
        err,
        SettleError::InvalidReceiveWallet(Party::Party2)
    ));
}

// =============================================================================
// Test: Both parties on the same side never settle
// =============================================================================
#[test]
fn e2e_same_side_rejected() {
    let mut h = SettlementHarness::new();
    let mut intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    intent.party2_side = Side::Ask;
    let err = h.settle(&intent, ChainRole::Source).unwrap_err();
    assert!(matches!(err, SettleError::SameSide));
}

// =============================================================================
// Test: Withdraw round trip for unlocked funds, locked funds stay put
// =============================================================================
#[test]
fn e2e_withdraw_respects_locks() {
    let mut h = SettlementHarness::new();
    let p1 = h.party1.address();
    let matcher = h.matcher.address();

    h.engine.deposit(p1, BASE, Decimal::new(300, 0)).unwrap();
    h.engine
        .lock(
            matcher,
            p1,
            BASE,
            Decimal::new(100, 0),
            OrderId::from_label("order-1"),
        )
        .unwrap();

    // The 200 available can leave, the 100 locked cannot.
    h.engine.withdraw(p1, BASE, Decimal::new(200, 0)).unwrap();
    let err = h.engine.withdraw(p1, BASE, Decimal::new(1, 0)).unwrap_err();
    assert!(matches!(
        err,
        SettleError::InsufficientAvailableBalance { .. }
    ));

    assert_eq!(
        h.engine.balances(p1, BASE),
        (Decimal::new(100, 0), Decimal::ZERO, Decimal::new(100, 0))
    );
    // External wallet got its 200 back (1000 - 300 + 200).
    assert_eq!(
        h.engine.custodian().balance_of(p1, BASE),
        Decimal::new(900, 0)
    );
    h.engine.verify_supply(BASE).unwrap();
}

// =============================================================================
// Test: Lock is gated to the matching engine under the default policy
// =============================================================================
#[test]
fn e2e_lock_caller_gating() {
    let mut h = SettlementHarness::new();
    let p1 = h.party1.address();

    h.engine.deposit(p1, BASE, Decimal::new(100, 0)).unwrap();
    let err = h
        .engine
        .lock(
            p1,
            p1,
            BASE,
            Decimal::new(100, 0),
            OrderId::from_label("order-1"),
        )
        .unwrap_err();
    assert!(matches!(err, SettleError::UnauthorizedCaller));
}

// =============================================================================
// Test: Advisory nonces advance with each lock and flow into new intents
// =============================================================================
#[test]
fn e2e_nonces_advance_per_lock() {
    let mut h = SettlementHarness::new();
    let p1 = h.party1.address();
    let matcher = h.matcher.address();

    assert_eq!(h.engine.nonce_of(p1, BASE), 0);
    h.engine.deposit(p1, BASE, Decimal::new(200, 0)).unwrap();
    h.engine
        .lock(
            matcher,
            p1,
            BASE,
            Decimal::new(100, 0),
            OrderId::from_label("order-1"),
        )
        .unwrap();
    h.engine
        .lock(
            matcher,
            p1,
            BASE,
            Decimal::new(100, 0),
            OrderId::from_label("order-2"),
        )
        .unwrap();
    assert_eq!(h.engine.nonce_of(p1, BASE), 2);

    // Fresh intents pick up the current nonce.
    let intent = h.intent("order-3");
    assert_eq!(intent.nonce1, 2);
}

// =============================================================================
// Test: Two distinct orders settle independently
// =============================================================================
#[test]
fn e2e_multiple_orders_settle_independently() {
    let mut h = SettlementHarness::new();

    let first = h.intent("order-1");
    h.fund_and_lock(first.order_id);
    let second = h.intent("order-2");
    h.fund_and_lock(second.order_id);

    h.settle(&first, ChainRole::Source).unwrap();
    // Order-1 being settled does not block order-2.
    h.settle(&second, ChainRole::Source).unwrap();

    assert_eq!(
        h.engine.custodian().balance_of(P2_WALLET, BASE),
        Decimal::new(200, 0)
    );
    h.engine.verify_supply(BASE).unwrap();
}

// =============================================================================
// Test: Settlement events serialize for downstream consumers
// =============================================================================
#[test]
fn e2e_settlement_event_serializes() {
    let mut h = SettlementHarness::new();
    let intent = h.intent("order-1");
    h.fund_and_lock(intent.order_id);

    let event = h.settle(&intent, ChainRole::Source).unwrap();
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"amount\":\"100\""));

    let back: SettlementEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back.order_id, event.order_id);
    assert_eq!(back.amount, event.amount);
    assert_eq!(back.role, ChainRole::Source);
}
