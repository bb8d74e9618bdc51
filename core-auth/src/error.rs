use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The device-link poll came back "authorization pending". Expected
    /// steady state until the user completes the browser flow; the protocol
    /// layer keeps showing the link code and retries later.
    #[error("Device link pending user authorization")]
    LinkPending,

    #[error("Device link failed: {0}")]
    LinkFailed(String),

    #[error("Identity provider returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Transport error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
