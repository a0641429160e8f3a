//! Configuration for a ChainSettle engine instance.

use serde::{Deserialize, Serialize};

use crate::{Address, ChainId};

/// Who may lock escrow against an order.
///
/// The lock ACL is a deliberate deployment decision: fully operated
/// deployments let only the matching-engine account place locks; a
/// self-custodial deployment also lets owners lock their own funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockPolicy {
    /// Only the configured matching-engine account may lock.
    MatchingEngineOnly,
    /// The funds' owner or the matching-engine account may lock.
    OwnerOrMatchingEngine,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self::MatchingEngineOnly
    }
}

/// Configuration for one settlement-engine instance.
///
/// Every participating chain runs an identical engine with its own
/// `local_chain_id`; the matching engine coordinates by issuing one
/// attestation per chain with the role flag flipped accordingly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The matching engine's attestation address. Pairing signatures must
    /// recover to this address.
    pub matching_engine: Address,
    /// The chain this engine instance settles on.
    pub local_chain_id: ChainId,
    /// Who may lock escrow.
    #[serde(default)]
    pub lock_policy: LockPolicy,
}

impl EngineConfig {
    #[must_use]
    pub fn new(matching_engine: Address, local_chain_id: ChainId) -> Self {
        Self {
            matching_engine,
            local_chain_id,
            lock_policy: LockPolicy::default(),
        }
    }

    /// Whether `caller` may lock `owner`'s escrow under the active policy.
    #[must_use]
    pub fn may_lock(&self, caller: Address, owner: Address) -> bool {
        match self.lock_policy {
            LockPolicy::MatchingEngineOnly => caller == self.matching_engine,
            LockPolicy::OwnerOrMatchingEngine => {
                caller == self.matching_engine || caller == owner
            }
        }
    }
}
