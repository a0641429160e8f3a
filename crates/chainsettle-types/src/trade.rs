//! Trade intent model.
//!
//! A [`TradeIntent`] is the ephemeral, never-persisted statement of a matched
//! cross-chain trade. Both parties sign an intent digest over their own view
//! of it; the matching engine signs a pairing attestation per chain. The
//! settlement engine verifies all three before touching escrow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset, ChainId, OrderId};

/// Which side of the book a party was on.
///
/// The lowercase strings `"ask"` / `"bid"` are the canonical representation
/// embedded in signed intent payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Ask,
    Bid,
}

impl Side {
    /// Canonical lowercase string used in signing payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::Bid => "bid",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role the local chain plays for a given trade.
///
/// The source leg releases the base asset; the destination leg releases the
/// quote asset. Each leg settles independently, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainRole {
    Source,
    Destination,
}

impl ChainRole {
    #[must_use]
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source)
    }

    /// Single-byte wire flag embedded in the matching-engine digest.
    #[must_use]
    pub fn flag(&self) -> u8 {
        match self {
            Self::Source => 1,
            Self::Destination => 0,
        }
    }
}

impl std::fmt::Display for ChainRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "SOURCE"),
            Self::Destination => write!(f, "DESTINATION"),
        }
    }
}

/// A matched cross-chain trade, as relayed to the settlement engine.
///
/// Ephemeral: validated, acted on, and discarded. Only the
/// `(order_id, role)` settlement record persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Order identifier, shared by both legs.
    pub order_id: OrderId,
    /// First trading party (base-asset obligor on the source leg).
    pub party1: Address,
    /// Second trading party (quote-asset obligor on the destination leg).
    pub party2: Address,
    /// Wallet party1 receives the quote asset into.
    pub party1_receive_wallet: Address,
    /// Wallet party2 receives the base asset into.
    pub party2_receive_wallet: Address,
    /// Asset sold by party1 / bought by party2.
    pub base_asset: Asset,
    /// Asset sold by party2 / bought by party1.
    pub quote_asset: Asset,
    /// Agreed price (quote per unit of base).
    pub price: Decimal,
    /// Traded quantity in base asset.
    pub quantity: Decimal,
    /// Side party1 took in the order book.
    pub party1_side: Side,
    /// Side party2 took in the order book.
    pub party2_side: Side,
    /// Chain the base-asset leg executes on.
    pub source_chain_id: ChainId,
    /// Chain the quote-asset leg executes on.
    pub destination_chain_id: ChainId,
    /// When the match was struck. Signed but not validated by this core.
    pub timestamp: DateTime<Utc>,
    /// Party1's advisory escrow nonce at signing time.
    pub nonce1: u64,
    /// Party2's advisory escrow nonce at signing time.
    pub nonce2: u64,
}

impl TradeIntent {
    /// Quote-leg amount: `price × quantity`.
    #[must_use]
    pub fn quote_amount(&self) -> Decimal {
        self.price * self.quantity
    }

    /// Quote-leg amount with overflow detection: `None` when
    /// `price × quantity` exceeds the decimal range.
    #[must_use]
    pub fn checked_quote_amount(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }

    /// The party whose locked escrow is debited on the given leg.
    #[must_use]
    pub fn obligor(&self, role: ChainRole) -> Address {
        match role {
            ChainRole::Source => self.party1,
            ChainRole::Destination => self.party2,
        }
    }

    /// The asset released on the given leg.
    #[must_use]
    pub fn leg_asset(&self, role: ChainRole) -> Asset {
        match role {
            ChainRole::Source => self.base_asset,
            ChainRole::Destination => self.quote_asset,
        }
    }

    /// The amount released on the given leg.
    #[must_use]
    pub fn leg_amount(&self, role: ChainRole) -> Decimal {
        match role {
            ChainRole::Source => self.quantity,
            ChainRole::Destination => self.quote_amount(),
        }
    }

    /// The external wallet credited on the given leg.
    #[must_use]
    pub fn recipient(&self, role: ChainRole) -> Address {
        match role {
            ChainRole::Source => self.party2_receive_wallet,
            ChainRole::Destination => self.party1_receive_wallet,
        }
    }
}

impl std::fmt::Display for TradeIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Intent[{}] {} {} @ {} ({} <-> {})",
            self.order_id.short(),
            self.quantity,
            self.base_asset.short(),
            self.price,
            self.party1.short(),
            self.party2.short(),
        )
    }
}
