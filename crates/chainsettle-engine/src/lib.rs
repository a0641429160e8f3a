//! # chainsettle-engine
//!
//! The settlement plane of ChainSettle: replay registry, custody seam, and
//! the engine that turns a fully-signed [`chainsettle_types::TradeIntent`]
//! into an atomic escrow release.
//!
//! ## Settlement flow
//!
//! 1. Validate receive wallets and opposite sides
//! 2. Check the replay registry for `(order_id, leg)`
//! 3. Verify both party signatures and the matching-engine attestation
//! 4. Check the obligor's locked escrow covers this leg
//! 5. Debit the ledger, pay out through the custodian, record the leg
//!
//! Each chain leg settles independently and exactly once; the engine never
//! needs cross-chain state.

pub mod custodian;
pub mod engine;
pub mod registry;

pub use custodian::{Custodian, InMemoryCustodian};
pub use engine::SettlementEngine;
pub use registry::SettlementRegistry;
