//! # chainsettle-crypto
//!
//! Pure cryptographic layer for ChainSettle: canonical digests over the two
//! signed message schemas, secp256k1 signer recovery, and the three
//! verification checks the settlement engine runs before touching escrow.
//!
//! ## Schemas
//!
//! 1. **Party intent** — each party signs their own view of the trade (side,
//!    receive wallet, and their advisory nonce).
//! 2. **Matching-engine attestation** — the off-chain matcher signs the
//!    pairing, bound to one leg (`ChainRole`) on one chain. Two party
//!    signatures alone never authorize a settlement.
//!
//! Everything here is a pure function chain
//! (`pack → keccak → prefix → recover → compare`), testable against fixed
//! vectors with no runtime state.

pub mod digest;
pub mod recover;
pub mod signature;
pub mod signer;

pub use digest::{eth_signed_digest, intent_digest, matching_digest, select_nonce};
pub use recover::{recover_signer, verify_matching, verify_party1, verify_party2};
pub use signature::Signature;
pub use signer::{LocalSigner, SignerError};
