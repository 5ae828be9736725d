//! Parse and arithmetic errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid denomination: {0}")]
    InvalidDenom(String),

    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("arithmetic overflow")]
    Overflow,
}
