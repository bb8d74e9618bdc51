use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    /// The storage API rejected the bearer token. The caller refreshes the
    /// credential bundle and retries once; this never reaches the end user.
    #[error("Authorization failed, token refresh required")]
    TokenRefreshRequired,

    #[error("Item not found")]
    NotFound,

    #[error("Storage provider returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Transport error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, GraphError>;
