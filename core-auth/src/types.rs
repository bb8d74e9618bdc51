use serde::{Deserialize, Serialize};
use std::fmt;

/// Credential bundle supplied by the playback device with each call.
///
/// Immutable for the duration of one request and never persisted by the
/// gateway. The household identifier is opaque; the access token may arrive
/// in the compact `###` form and must be run through
/// [`decompress`](crate::token_codec::decompress) before use.
///
/// # Security
///
/// Tokens are never logged. The `Debug` implementation redacts them.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialBundle {
    /// Account/session identifier supplied by the device, opaque to the core.
    /// Absent on refreshed bundles: the caller already knows the household.
    pub household_id: Option<String>,
    /// Bearer access token for the storage API
    pub access_token: String,
    /// Refresh token used to obtain new access tokens
    pub refresh_token: String,
}

impl CredentialBundle {
    pub fn new(
        household_id: Option<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            household_id,
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("household_id", &self.household_id)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Reply shape for a device-link code request.
///
/// Field names follow the protocol's wire vocabulary: the device shows
/// `linkCode` to the user, points them at `regUrl`, and presents
/// `linkDeviceId` back on every poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLinkCode {
    pub link_code: String,
    pub reg_url: String,
    pub link_device_id: String,
    pub show_link_code: bool,
}

/// Reply shape for a successful token poll.
///
/// The protocol stores `authToken` in its bounded token field (hence the
/// oversize compression) and `privateKey` alongside it for later refresh.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedTokens {
    pub auth_token: String,
    pub private_key: String,
}

impl fmt::Debug for LinkedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedTokens")
            .field("auth_token", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
