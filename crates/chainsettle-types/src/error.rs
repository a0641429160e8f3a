//! Error types for the ChainSettle settlement core.
//!
//! All errors use the `CS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors
//! - 2xx: Balance errors
//! - 3xx: Signature / authorization errors
//! - 4xx: Settlement errors
//! - 5xx: Supply / invariant errors
//!
//! Every failure is synchronous, aborts the whole operation with no partial
//! commit, and is recoverable by caller action — there is no fatal class and
//! nothing is retried automatically.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ChainRole, OrderId, Party};

/// Central error enum for all ChainSettle operations.
#[derive(Debug, Error)]
pub enum SettleError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Deposit or withdrawal of a zero amount.
    #[error("CS_ERR_100: Amount must be greater than zero")]
    ZeroAmount,

    /// A receive wallet in the trade intent is the zero address.
    #[error("CS_ERR_101: Invalid {0} receive wallet")]
    InvalidReceiveWallet(Party),

    /// `price × quantity` exceeds the decimal range.
    #[error("CS_ERR_102: Quote amount overflows")]
    AmountOverflow,

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough available (unlocked) escrow for the operation.
    #[error("CS_ERR_200: Insufficient available balance: need {needed}, have {available}")]
    InsufficientAvailableBalance { needed: Decimal, available: Decimal },

    /// Not enough locked escrow to consume during settlement.
    #[error("CS_ERR_201: Insufficient locked balance")]
    InsufficientLockedBalance,

    /// The external wallet cannot cover the deposit pull.
    #[error("CS_ERR_202: Insufficient wallet balance: need {needed}, have {available}")]
    InsufficientWalletBalance { needed: Decimal, available: Decimal },

    // =================================================================
    // Signature / Authorization Errors (3xx)
    // =================================================================
    /// Sig1 did not recover to party1 over the intent schema.
    #[error("CS_ERR_300: Invalid party1 signature")]
    InvalidParty1Signature,

    /// Sig2 did not recover to party2 over the intent schema.
    #[error("CS_ERR_301: Invalid party2 signature")]
    InvalidParty2Signature,

    /// The pairing attestation did not recover to the matching engine.
    #[error("CS_ERR_302: Invalid matching engine signature")]
    InvalidMatchingEngineSignature,

    /// The caller is not allowed to lock escrow under the active policy.
    #[error("CS_ERR_303: Caller not authorized to lock escrow")]
    UnauthorizedCaller,

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// Both parties are on the same side of the book.
    #[error("CS_ERR_400: Parties must be on opposite sides")]
    SameSide,

    /// This (order, leg) was already settled — replay protection.
    #[error("CS_ERR_401: Order {order_id} already settled on {role} leg")]
    AlreadySettled { order_id: OrderId, role: ChainRole },

    /// Party1's locked base-asset escrow cannot cover the quantity.
    #[error("CS_ERR_402: Insufficient locked base balance on source chain")]
    InsufficientLockedBaseBalance,

    /// Party2's locked quote-asset escrow cannot cover price × quantity.
    #[error("CS_ERR_403: Insufficient locked quote balance on destination chain")]
    InsufficientLockedQuoteBalance,

    // =================================================================
    // Supply / Invariant Errors (5xx)
    // =================================================================
    /// Custody conservation violated — critical safety alert.
    #[error("CS_ERR_500: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },
}

/// The taxonomy class a [`SettleError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    InsufficientFunds,
    Replay,
    Invariant,
}

impl SettleError {
    /// Which taxonomy class this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroAmount | Self::InvalidReceiveWallet(_) | Self::AmountOverflow => {
                ErrorKind::Validation
            }
            Self::InsufficientAvailableBalance { .. }
            | Self::InsufficientLockedBalance
            | Self::InsufficientWalletBalance { .. }
            | Self::InsufficientLockedBaseBalance
            | Self::InsufficientLockedQuoteBalance => ErrorKind::InsufficientFunds,
            Self::InvalidParty1Signature
            | Self::InvalidParty2Signature
            | Self::InvalidMatchingEngineSignature
            | Self::UnauthorizedCaller => ErrorKind::Authorization,
            Self::AlreadySettled { .. } => ErrorKind::Replay,
            Self::SameSide | Self::SupplyInvariantViolation { .. } => ErrorKind::Invariant,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SettleError>;
