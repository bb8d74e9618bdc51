use core_auth::AuthError;
use provider_onedrive::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The device presented no credentials, or an empty token.
    #[error("Missing or empty session credentials")]
    SessionInvalid,

    #[error("Item not found")]
    NotFound,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage provider error: {0}")]
    Graph(#[from] GraphError),
}

impl ServiceError {
    /// Protocol fault string the transport layer reports for this error.
    pub fn fault_code(&self) -> &'static str {
        match self {
            ServiceError::SessionInvalid => "Client.SessionIdInvalid",
            ServiceError::NotFound => "Client.ItemNotFound",
            ServiceError::Graph(GraphError::NotFound) => "Client.ItemNotFound",
            ServiceError::Graph(GraphError::TokenRefreshRequired) => "Client.TokenRefreshRequired",
            ServiceError::Auth(AuthError::LinkPending) => "Client.NOT_LINKED_RETRY",
            ServiceError::Auth(AuthError::LinkFailed(_)) => "Client.NOT_LINKED_FAILURE",
            _ => "Client.ServiceUnknownError",
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_codes_follow_protocol_vocabulary() {
        assert_eq!(
            ServiceError::SessionInvalid.fault_code(),
            "Client.SessionIdInvalid"
        );
        assert_eq!(ServiceError::NotFound.fault_code(), "Client.ItemNotFound");
        assert_eq!(
            ServiceError::Graph(GraphError::NotFound).fault_code(),
            "Client.ItemNotFound"
        );
        assert_eq!(
            ServiceError::Graph(GraphError::TokenRefreshRequired).fault_code(),
            "Client.TokenRefreshRequired"
        );
        assert_eq!(
            ServiceError::Auth(AuthError::LinkPending).fault_code(),
            "Client.NOT_LINKED_RETRY"
        );
        assert_eq!(
            ServiceError::Auth(AuthError::LinkFailed("denied".to_string())).fault_code(),
            "Client.NOT_LINKED_FAILURE"
        );
        assert_eq!(
            ServiceError::Graph(GraphError::Upstream {
                status: 503,
                body: "throttled".to_string()
            })
            .fault_code(),
            "Client.ServiceUnknownError"
        );
        assert_eq!(
            ServiceError::Config("missing client id".to_string()).fault_code(),
            "Client.ServiceUnknownError"
        );
    }
}
