//! Event records for off-chain indexing.
//!
//! Every mutating escrow operation returns a typed event carrying the
//! owner/asset/amount/order context the dashboard and indexer consume.
//! Events are plain records; authorization in this system is inbound
//! (signatures on the intent), so events are not themselves signed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset, ChainId, ChainRole, OrderId};

/// Funds entered custody.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositEvent {
    pub owner: Address,
    pub asset: Asset,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Funds left custody back to the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawEvent {
    pub owner: Address,
    pub asset: Asset,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Available funds were locked against a matched order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockEvent {
    pub owner: Address,
    pub asset: Asset,
    pub amount: Decimal,
    /// The order this lock backs.
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// One leg of a cross-chain trade settled on this chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub order_id: OrderId,
    /// The obligor whose locked escrow was debited.
    pub sender: Address,
    /// The external wallet credited.
    pub receiver: Address,
    pub asset: Asset,
    pub amount: Decimal,
    /// The local chain this leg settled on.
    pub chain_id: ChainId,
    /// Which leg this was.
    pub role: ChainRole,
    pub settled_at: DateTime<Utc>,
}

impl std::fmt::Display for SettlementEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Settled[{}] {} {} {} -> {} ({})",
            self.order_id.short(),
            self.amount,
            self.asset.short(),
            self.sender.short(),
            self.receiver.short(),
            self.role,
        )
    }
}
