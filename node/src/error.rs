use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("restaking error: {0}")]
    Restake(#[from] restake_engine::RestakeError),

    #[error("ledger error: {0}")]
    Ledger(#[from] restake_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] restake_store::StoreError),

    #[error("invalid value: {0}")]
    Types(#[from] restake_types::TypesError),

    #[error("invalid block: {0}")]
    InvalidBlock(String),

    #[error("invalid message: {0}")]
    InvalidMsg(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
