//! Signer recovery and the three verification schemas.
//!
//! Verification is a pure comparison: recover the signer address from the
//! prefixed digest and check it against the expected party. A signature that
//! is malformed, unrecoverable, or recovers to any other address fails with
//! the error for its slot — the engine never learns *why* a signature was
//! bad, only which one was.

use chainsettle_types::{Address, ChainId, ChainRole, Result, SettleError, TradeIntent};
use k256::ecdsa::{Signature as EcdsaSignature, VerifyingKey};

use crate::digest::{eth_signed_digest, intent_digest, matching_digest};
use crate::signature::Signature;

/// Recover the signer address from a raw (unprefixed) digest.
///
/// Applies the Ethereum signed-message prefix, recovers the public key, and
/// derives its address. Returns `None` for malformed or unrecoverable
/// signatures.
#[must_use]
pub fn recover_signer(digest: &[u8; 32], sig: &Signature) -> Option<Address> {
    let recovery_id = sig.recovery_id()?;
    let ecdsa_sig = EcdsaSignature::from_slice(sig.rs()).ok()?;
    let prehash = eth_signed_digest(digest);
    let key = VerifyingKey::recover_from_prehash(&prehash, &ecdsa_sig, recovery_id).ok()?;
    Address::from_uncompressed_pubkey(key.to_encoded_point(false).as_bytes())
}

/// Verify party1's intent signature (side = `party1_side`, wallet =
/// `party1_receive_wallet`).
pub fn verify_party1(intent: &TradeIntent, sig: &Signature) -> Result<()> {
    let digest = intent_digest(intent, intent.party1_side, intent.party1_receive_wallet);
    match recover_signer(&digest, sig) {
        Some(addr) if addr == intent.party1 => Ok(()),
        _ => Err(SettleError::InvalidParty1Signature),
    }
}

/// Verify party2's intent signature (side = `party2_side`, wallet =
/// `party2_receive_wallet`).
pub fn verify_party2(intent: &TradeIntent, sig: &Signature) -> Result<()> {
    let digest = intent_digest(intent, intent.party2_side, intent.party2_receive_wallet);
    match recover_signer(&digest, sig) {
        Some(addr) if addr == intent.party2 => Ok(()),
        _ => Err(SettleError::InvalidParty2Signature),
    }
}

/// Verify the matching engine's pairing attestation for the given leg and
/// local chain against the configured attestation address.
pub fn verify_matching(
    intent: &TradeIntent,
    sig: &Signature,
    role: ChainRole,
    chain_id: ChainId,
    matching_engine: Address,
) -> Result<()> {
    let digest = matching_digest(intent, role, chain_id);
    match recover_signer(&digest, sig) {
        Some(addr) if addr == matching_engine => Ok(()),
        _ => Err(SettleError::InvalidMatchingEngineSignature),
    }
}
