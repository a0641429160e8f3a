//! Canonical signing digests for the two ChainSettle message schemas.
//!
//! Pure function chain: pack fields → Keccak-256 → Ethereum signed-message
//! prefix → final 32-byte digest. No state, no side effects; the same inputs
//! produce the same digest on every chain and in every process.
//!
//! Variable-length fields (decimal strings, the side string) are written with
//! a one-byte length prefix so adjacent fields can never be confused.

use chainsettle_types::{Address, ChainId, ChainRole, Side, TradeIntent};
use sha3::{Digest, Keccak256};

/// Version tag for the party intent schema.
const INTENT_TAG: &[u8] = b"chainsettle:intent:v1:";
/// Version tag for the matching-engine attestation schema.
const MATCH_TAG: &[u8] = b"chainsettle:match:v1:";
/// EIP-191 prefix applied to every 32-byte digest before signing.
const ETH_SIGNED_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Append a variable-length field with a one-byte length prefix.
///
/// # Panics
/// Panics if the field exceeds 255 bytes. Decimal renderings and side
/// strings are always far below that.
fn push_var(payload: &mut Vec<u8>, field: &[u8]) {
    let len = u8::try_from(field.len()).expect("variable field exceeds 255 bytes");
    payload.push(len);
    payload.extend_from_slice(field);
}

/// The nonce a signer at `side` embeds in their intent: `nonce1` for the
/// ask side, `nonce2` for the bid side.
#[must_use]
pub fn select_nonce(intent: &TradeIntent, side: Side) -> u64 {
    match side {
        Side::Ask => intent.nonce1,
        Side::Bid => intent.nonce2,
    }
}

/// Digest of a party's trade intent.
///
/// Covers `{order_id, base_asset, quote_asset, price, quantity, side,
/// receive_wallet, source_chain_id, destination_chain_id, timestamp, nonce}`,
/// where the nonce is chosen by the signer's side (see [`select_nonce`]).
#[must_use]
pub fn intent_digest(intent: &TradeIntent, side: Side, receive_wallet: Address) -> [u8; 32] {
    let mut payload = Vec::with_capacity(192);
    payload.extend_from_slice(INTENT_TAG);
    payload.extend_from_slice(intent.order_id.as_bytes());
    payload.extend_from_slice(intent.base_asset.as_bytes());
    payload.extend_from_slice(intent.quote_asset.as_bytes());
    push_var(&mut payload, intent.price.to_string().as_bytes());
    push_var(&mut payload, intent.quantity.to_string().as_bytes());
    push_var(&mut payload, side.as_str().as_bytes());
    payload.extend_from_slice(receive_wallet.as_bytes());
    payload.extend_from_slice(&intent.source_chain_id.0.to_le_bytes());
    payload.extend_from_slice(&intent.destination_chain_id.0.to_le_bytes());
    payload.extend_from_slice(&intent.timestamp.timestamp().to_le_bytes());
    payload.extend_from_slice(&select_nonce(intent, side).to_le_bytes());
    keccak256(&payload)
}

/// Digest of the matching engine's pairing attestation for one leg.
///
/// Covers `{order_id, party1, party2, both receive wallets, base_asset,
/// quote_asset, price, quantity, role flag, chain_id}`. The role flag and
/// chain ID bind the attestation to exactly one leg on exactly one chain.
#[must_use]
pub fn matching_digest(intent: &TradeIntent, role: ChainRole, chain_id: ChainId) -> [u8; 32] {
    let mut payload = Vec::with_capacity(192);
    payload.extend_from_slice(MATCH_TAG);
    payload.extend_from_slice(intent.order_id.as_bytes());
    payload.extend_from_slice(intent.party1.as_bytes());
    payload.extend_from_slice(intent.party2.as_bytes());
    payload.extend_from_slice(intent.party1_receive_wallet.as_bytes());
    payload.extend_from_slice(intent.party2_receive_wallet.as_bytes());
    payload.extend_from_slice(intent.base_asset.as_bytes());
    payload.extend_from_slice(intent.quote_asset.as_bytes());
    push_var(&mut payload, intent.price.to_string().as_bytes());
    push_var(&mut payload, intent.quantity.to_string().as_bytes());
    payload.push(role.flag());
    payload.extend_from_slice(&chain_id.0.to_le_bytes());
    keccak256(&payload)
}

/// Apply the Ethereum signed-message prefix:
/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
///
/// Signers sign and verifiers recover over this prefixed digest.
#[must_use]
pub fn eth_signed_digest(digest: &[u8; 32]) -> [u8; 32] {
    let mut prefixed = Vec::with_capacity(ETH_SIGNED_PREFIX.len() + 32);
    prefixed.extend_from_slice(ETH_SIGNED_PREFIX);
    prefixed.extend_from_slice(digest);
    keccak256(&prefixed)
}
