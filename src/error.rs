use thiserror::Error;

/// Rejections raised by ledger mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),

    /// The seal was found against a tip that is no longer the chain head.
    #[error("seal {seal} does not satisfy proof-of-work against tip seal {tip_seal}")]
    StaleSeal { tip_seal: u64, seal: u64 },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
