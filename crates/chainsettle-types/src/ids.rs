//! Identifiers used throughout ChainSettle.
//!
//! Accounts and assets use Ethereum-style 20-byte addresses; orders use the
//! 32-byte keccak identifier the upstream order book derives from its order
//! labels. Nothing here is randomly generated — every ID is hash- or
//! key-derived so the same inputs yield the same ID on every chain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Ethereum-style account identifier (20 bytes).
///
/// Used for trading parties, receive wallets, the matching-engine identity,
/// and (via the [`Asset`] alias) fungible-asset accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Never a valid receive wallet.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive the address from an uncompressed secp256k1 public key
    /// (65 bytes, `0x04 || x || y`): `keccak256(pubkey[1..])[12..]`.
    ///
    /// Returns `None` if the key is not in uncompressed SEC1 form.
    #[must_use]
    pub fn from_uncompressed_pubkey(pubkey: &[u8]) -> Option<Self> {
        if pubkey.len() != 65 || pubkey[0] != 0x04 {
            return None;
        }
        let hash = Keccak256::digest(&pubkey[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..32]);
        Some(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero (null) address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Short hex form for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(bytes))
    }
}

/// Fungible-asset identifier. Assets are account-style identifiers in this
/// system (token contract accounts on the original chains).
pub type Asset = Address;

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Order identifier (32 bytes), shared by both legs of a cross-chain trade.
///
/// The off-chain order book derives it as the keccak hash of its order label,
/// so both chains see the same ID for the same matched order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub [u8; 32]);

impl OrderId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an order ID from a UTF-8 label, the way the upstream order
    /// book does (`keccak256(label)`).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let hash = Keccak256::digest(label.as_bytes());
        Self(hash.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short hex form for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// ChainId
// ---------------------------------------------------------------------------

/// Numeric chain identifier (EIP-155 style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// Which of the two trading parties an error or check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Party1,
    Party2,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Party1 => write!(f, "party1"),
            Self::Party2 => write!(f, "party2"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
