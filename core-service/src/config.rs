//! Gateway configuration.
//!
//! Built with a fail-fast builder: the OAuth client id has no sane default
//! and missing it is a deployment error, so `build()` refuses to produce a
//! config without one. Provider endpoints default to the public Microsoft
//! URIs and are overridable for tests and sovereign-cloud deployments.

use crate::error::{Result, ServiceError};

/// Default Microsoft Graph API base URI.
pub const GRAPH_API_URI_DEFAULT: &str = "https://graph.microsoft.com/v1.0/";

/// Default Microsoft identity platform OAuth base URI.
pub const AUTH_API_URI_DEFAULT: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/";

/// Configuration for the gateway façade.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URI of the storage provider's REST API
    pub graph_api_uri: String,
    /// Base URI of the identity provider's OAuth endpoints
    pub auth_api_uri: String,
    /// OAuth client ID registered for this gateway
    pub client_id: String,
}

impl GatewayConfig {
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Build a configuration from environment variables.
    ///
    /// Reads `GRAPH_API_URI`, `AUTH_API_URI` (both optional) and
    /// `GRAPH_CLIENT_ID` (required).
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();

        if let Ok(uri) = std::env::var("GRAPH_API_URI") {
            builder = builder.graph_api_uri(uri);
        }
        if let Ok(uri) = std::env::var("AUTH_API_URI") {
            builder = builder.auth_api_uri(uri);
        }
        if let Ok(client_id) = std::env::var("GRAPH_CLIENT_ID") {
            builder = builder.client_id(client_id);
        }

        builder.build()
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Default)]
pub struct GatewayConfigBuilder {
    graph_api_uri: Option<String>,
    auth_api_uri: Option<String>,
    client_id: Option<String>,
}

impl GatewayConfigBuilder {
    pub fn graph_api_uri(mut self, uri: impl Into<String>) -> Self {
        self.graph_api_uri = Some(uri.into());
        self
    }

    pub fn auth_api_uri(mut self, uri: impl Into<String>) -> Self {
        self.auth_api_uri = Some(uri.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn build(self) -> Result<GatewayConfig> {
        let client_id = self.client_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            ServiceError::Config(
                "OAuth client ID is required. Use .client_id() or set GRAPH_CLIENT_ID.".to_string(),
            )
        })?;

        Ok(GatewayConfig {
            graph_api_uri: self
                .graph_api_uri
                .unwrap_or_else(|| GRAPH_API_URI_DEFAULT.to_string()),
            auth_api_uri: self
                .auth_api_uri
                .unwrap_or_else(|| AUTH_API_URI_DEFAULT.to_string()),
            client_id,
        })
    }
}
