//! # chainsettle-ledger
//!
//! The escrow balance store: per-(owner, asset) total/locked accounting,
//! advisory nonces, and the custody conservation audit.
//!
//! The ledger exclusively owns balance state. The settlement engine never
//! mutates balances except through it.

pub mod conservation;
pub mod escrow;

pub use conservation::CustodyConservation;
pub use escrow::EscrowLedger;
