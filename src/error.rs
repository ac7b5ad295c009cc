//! Typed failures returned by ledger and property operations.

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("insufficient funds: need ${needed}, have ${available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("insufficient holdings of {symbol}: requested {requested}, holding {held}")]
    InsufficientHoldings {
        symbol: String,
        requested: u64,
        held: u64,
    },

    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("invalid rent range {low}..{high}")]
    InvalidRentRange { low: Decimal, high: Decimal },

    #[error("cannot {operation} while {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: &'static str,
    },

    #[error("no offer with id {0} in the current pool")]
    OfferNotFound(String),

    #[error("{0} overflows the cash balance")]
    Overflow(&'static str),
}

pub type Result<T> = std::result::Result<T, SimError>;
