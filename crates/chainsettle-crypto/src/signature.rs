//! 65-byte recoverable signature wrapper (`r || s || v`).
//!
//! `v` follows the Ethereum convention: 27 or 28 (the raw recovery parity
//! plus 27). Raw parities 0 and 1 are also accepted on parse since some
//! signers emit them.

use std::fmt;

use k256::ecdsa::RecoveryId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A recoverable secp256k1 signature: 32-byte `r`, 32-byte `s`, 1-byte `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 65]);

impl Signature {
    /// Parse from raw bytes. Returns `None` unless exactly 65 bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 65] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The `r || s` component.
    #[must_use]
    pub fn rs(&self) -> &[u8] {
        &self.0[..64]
    }

    /// The recovery byte as transmitted.
    #[must_use]
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Recovery ID, accepting both Ethereum (27/28) and raw (0/1) forms.
    /// Returns `None` for any other `v`.
    #[must_use]
    pub fn recovery_id(&self) -> Option<RecoveryId> {
        let parity = match self.v() {
            27 | 28 => self.v() - 27,
            0 | 1 => self.v(),
            _ => return None,
        };
        RecoveryId::from_byte(parity)
    }

    /// Flip a single bit; useful for tamper tests.
    #[must_use]
    pub fn with_flipped_bit(mut self, byte: usize, bit: u8) -> Self {
        self.0[byte] ^= 1 << bit;
        self
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.0)))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(D::Error::custom)?;
        Self::from_bytes(&bytes)
            .ok_or_else(|| D::Error::custom("signature must be exactly 65 bytes"))
    }
}
