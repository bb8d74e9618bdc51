//! OAuth 2.0 Device Authorization Grant
//!
//! Implements the RFC 8628 handshake used to link a household's storage
//! account: request a user code, poll the token endpoint while the user
//! completes the browser flow, and refresh an expired access token.
//!
//! The gateway keeps no session state between these calls; the identity
//! provider owns the device-code session and the opaque `device_code` is
//! simply forwarded back on each poll. The provider's
//! `authorization_pending` reply is surfaced as the distinct
//! [`AuthError::LinkPending`] condition so the protocol layer can keep
//! showing the link code instead of reporting an error.
//!
//! # Security
//!
//! Tokens are never logged. Household identifiers only appear in logs as
//! the short rolling hash computed by [`household_hash`].

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{AuthError, Result};
use crate::token_codec::{compress, TOKEN_LENGTH_LIMIT};
use crate::types::{CredentialBundle, DeviceLinkCode, LinkedTokens};

/// Scope set for full-drive read access.
const SCOPE_FULL_DRIVE: &str = "user.read files.read offline_access";

/// Scope set when the account is linked to the app-scoped root only.
const SCOPE_APP_FOLDER: &str = "user.read Files.ReadWrite.AppFolder offline_access";

/// Device-code grant type URN.
const GRANT_DEVICE_CODE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Identity provider configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URI of the identity provider's OAuth endpoints, with trailing
    /// slash (e.g. `https://login.microsoftonline.com/common/oauth2/v2.0/`)
    pub auth_base_uri: String,
    /// OAuth client ID registered for this gateway
    pub client_id: String,
}

/// Device authorization grant flow against the identity provider.
pub struct DeviceLinkFlow {
    config: AuthConfig,
    http_client: Arc<dyn HttpClient>,
}

impl DeviceLinkFlow {
    pub fn new(config: AuthConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn scope_for(use_app_root: bool) -> &'static str {
        if use_app_root {
            SCOPE_APP_FOLDER
        } else {
            SCOPE_FULL_DRIVE
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}{}", self.config.auth_base_uri, name)
    }

    async fn post_form(
        &self,
        url: String,
        params: &HashMap<&str, &str>,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, url).form(params)?;
        Ok(self.http_client.execute(request).await?)
    }

    /// Request a user code / device code pair from the identity provider.
    ///
    /// The returned [`DeviceLinkCode`] is shown to the user by the device;
    /// the opaque `link_device_id` comes back on every subsequent poll.
    #[instrument(
        skip(self, household_id),
        fields(household = household_hash(household_id))
    )]
    pub async fn request_device_code(
        &self,
        household_id: &str,
        use_app_root: bool,
    ) -> Result<DeviceLinkCode> {
        debug!("Requesting device link code");

        let scope = Self::scope_for(use_app_root);
        let mut params = HashMap::new();
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("scope", scope);

        let response = self.post_form(self.endpoint("devicecode"), &params).await?;

        if !response.is_success() {
            let status = response.status;
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!(status = status, error = %body, "Device code request failed");
            return Err(AuthError::Upstream { status, body });
        }

        let code: DeviceCodeResponse = response
            .json()
            .map_err(|e| AuthError::LinkFailed(format!("Malformed device code response: {e}")))?;

        info!("Got verification uri");

        Ok(DeviceLinkCode {
            link_code: code.user_code,
            reg_url: code.verification_uri,
            link_device_id: code.device_code,
            show_link_code: true,
        })
    }

    /// Poll the token endpoint with a previously issued device code.
    ///
    /// Returns [`AuthError::LinkPending`] while the user has not finished
    /// the browser flow; that is expected steady state, not an error. On
    /// success an access token over the protocol's storage limit is
    /// compressed before being returned.
    #[instrument(
        skip(self, household_id, device_code),
        fields(household = household_hash(household_id))
    )]
    pub async fn poll_for_token(
        &self,
        household_id: &str,
        device_code: &str,
    ) -> Result<LinkedTokens> {
        debug!("Polling for device auth token");

        let mut params = HashMap::new();
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("device_code", device_code);
        params.insert("grant_type", GRANT_DEVICE_CODE);

        let response = self.post_form(self.endpoint("token"), &params).await?;

        if !response.is_success() {
            let status = response.status;
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            if status == 400 {
                if let Ok(oauth_error) = serde_json::from_str::<OAuthErrorBody>(&body) {
                    if oauth_error.error == "authorization_pending" {
                        info!("Not linked yet, device should retry");
                        return Err(AuthError::LinkPending);
                    }
                }
            }

            warn!(status = status, error = %body, "Device token request failed");
            return Err(AuthError::Upstream { status, body });
        }

        let tokens: TokenResponse = response
            .json()
            .map_err(|e| AuthError::LinkFailed(format!("Malformed token response: {e}")))?;

        let access_token = fit_to_limit(tokens.access_token)?;

        info!("Got token");

        Ok(LinkedTokens {
            auth_token: access_token,
            private_key: tokens.refresh_token.unwrap_or_default(),
        })
    }

    /// Exchange a refresh token for a fresh credential bundle.
    ///
    /// The returned bundle carries no household identifier; the caller
    /// already knows which household it is refreshing for.
    #[instrument(skip(self, credentials))]
    pub async fn refresh_token(
        &self,
        credentials: &CredentialBundle,
        use_app_root: bool,
    ) -> Result<CredentialBundle> {
        debug!("Refreshing auth token");

        let scope = Self::scope_for(use_app_root);
        let mut params = HashMap::new();
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("refresh_token", credentials.refresh_token.as_str());
        params.insert("grant_type", "refresh_token");
        params.insert("scope", scope);

        let response = self.post_form(self.endpoint("token"), &params).await?;

        if !response.is_success() {
            let status = response.status;
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!(status = status, error = %body, "Token refresh failed");
            return Err(AuthError::Upstream { status, body });
        }

        let tokens: TokenResponse = response
            .json()
            .map_err(|e| AuthError::LinkFailed(format!("Malformed token response: {e}")))?;

        let access_token = fit_to_limit(tokens.access_token)?;

        info!("Got refreshed token");

        Ok(CredentialBundle::new(
            None,
            access_token,
            tokens
                .refresh_token
                .unwrap_or_else(|| credentials.refresh_token.clone()),
        ))
    }
}

/// Compress the access token when it would not fit the protocol's
/// token-storage field; shorter tokens pass through unchanged.
fn fit_to_limit(access_token: String) -> Result<String> {
    if access_token.len() > TOKEN_LENGTH_LIMIT {
        compress(&access_token)
    } else {
        Ok(access_token)
    }
}

/// Short rolling hash of a household identifier, for log correlation
/// without exposing the identifier itself.
pub fn household_hash(household_id: &str) -> i32 {
    let mut hash: i32 = 0;
    for ch in household_id.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(ch as i32);
    }
    hash
}

/// Device-code response from the identity provider.
#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    user_code: String,
    verification_uri: String,
    device_code: String,
}

/// Token response from the identity provider.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
}

/// Error body shape of a failed OAuth request.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
}
