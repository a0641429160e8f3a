//! # chainsettle-types
//!
//! Shared types, errors, and configuration for the **ChainSettle**
//! cross-chain settlement core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`Asset`], [`OrderId`], [`ChainId`], [`Party`]
//! - **Trade model**: [`TradeIntent`], [`Side`], [`ChainRole`]
//! - **Escrow model**: [`EscrowAccount`]
//! - **Events**: [`DepositEvent`], [`WithdrawEvent`], [`LockEvent`], [`SettlementEvent`]
//! - **Configuration**: [`EngineConfig`], [`LockPolicy`]
//! - **Errors**: [`SettleError`] with `CS_ERR_` prefix codes

pub mod balance;
pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use chainsettle_types::{TradeIntent, EscrowAccount, SettleError, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use trade::*;
