use dappbnb_common::money::AmountError;
use dappbnb_common::raw::ShapeError;
use dappbnb_common::TxHash;

/// Errors from marketplace operations.
///
/// Input problems (`InvalidId`, `MissingField`, ...) and `NoProvider` are
/// raised before anything is sent to the ledger. Everything else comes back
/// from the ledger and is passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
    #[error("no wallet provider found; install or connect a wallet")]
    NoProvider,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("image reference must not contain ',': {0}")]
    InvalidImage(String),
    #[error("a booking needs at least one date")]
    NoDates,
    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),
    #[error("malformed ledger record: {0}")]
    Shape(#[from] ShapeError),
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),
    #[error("transaction not confirmed: {0}")]
    Transaction(#[from] alloy::providers::PendingTransactionError),
    #[error("transaction reverted: {tx_hash}")]
    Reverted { tx_hash: TxHash },
    #[error("ledger rejected the call: {0}")]
    Remote(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the error happened locally, before the ledger was contacted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_)
                | Self::NoProvider
                | Self::MissingField(_)
                | Self::InvalidImage(_)
                | Self::NoDates
                | Self::Amount(_)
                | Self::Config(_)
        )
    }
}
