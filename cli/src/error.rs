use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    #[error("RPC Error: {0}")]
    RpcError(#[from] solana_client::client_error::ClientError),

    #[error("Anchor Client Error: {0}")]
    AnchorError(#[from] anchor_client::ClientError),

    #[error("Invalid Pubkey format: {0}")]
    InvalidPubkey(String),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("Keypair error: {0}")]
    KeypairError(String),

    #[error("No asset mint configured, pass --mint or set asset_mint in the config")]
    MissingMint,

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account data could not be decoded: {0}")]
    InvalidAccountData(String),

    #[error("IO Error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::IoError(e.to_string())
    }
}
