//! Local signing key for the party / matching-engine half of the protocol.
//!
//! The settlement engine itself never signs anything — it only verifies. This
//! signer exists for the off-chain components (parties constructing intents,
//! the matching engine attesting pairings) and for the test suite.

use chainsettle_types::{Address, ChainId, ChainRole, Side, TradeIntent};
use k256::ecdsa::SigningKey;

use crate::digest::{eth_signed_digest, intent_digest, matching_digest};
use crate::signature::Signature;

/// Signing failures. Distinct from [`chainsettle_types::SettleError`]: the
/// engine's error taxonomy covers verification, not key handling.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// The 32 bytes are not a valid secp256k1 scalar.
    #[error("invalid secp256k1 private key")]
    InvalidKey,
    /// The underlying ECDSA signing operation failed.
    #[error("ecdsa signing failed")]
    Signing,
}

/// A secp256k1 signing key producing 65-byte recoverable signatures over the
/// ChainSettle schemas.
pub struct LocalSigner {
    key: SigningKey,
}

impl LocalSigner {
    /// Build a signer from raw private-key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, SignerError> {
        let key = SigningKey::from_bytes(bytes.into()).map_err(|_| SignerError::InvalidKey)?;
        Ok(Self { key })
    }

    /// The Ethereum-style address of this signer's public key.
    #[must_use]
    pub fn address(&self) -> Address {
        let point = self.key.verifying_key().to_encoded_point(false);
        // A secp256k1 verifying key always encodes to 65 uncompressed bytes.
        Address::from_uncompressed_pubkey(point.as_bytes())
            .unwrap_or(Address::ZERO)
    }

    /// Sign a raw 32-byte digest (the EIP-191 prefix is applied here,
    /// mirroring what [`crate::recover::recover_signer`] expects).
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, SignerError> {
        let prehash = eth_signed_digest(digest);
        let (sig, recovery_id) = self
            .key
            .sign_prehash_recoverable(&prehash)
            .map_err(|_| SignerError::Signing)?;
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = recovery_id.to_byte() + 27;
        Ok(Signature(bytes))
    }

    /// Sign a trade intent as a party at `side` receiving into `wallet`.
    pub fn sign_intent(
        &self,
        intent: &TradeIntent,
        side: Side,
        wallet: Address,
    ) -> Result<Signature, SignerError> {
        self.sign_digest(&intent_digest(intent, side, wallet))
    }

    /// Sign the pairing attestation for one leg, as the matching engine.
    pub fn sign_matching(
        &self,
        intent: &TradeIntent,
        role: ChainRole,
        chain_id: ChainId,
    ) -> Result<Signature, SignerError> {
        self.sign_digest(&matching_digest(intent, role, chain_id))
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material must never be logged.
        f.debug_struct("LocalSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
