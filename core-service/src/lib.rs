//! # Gateway Operation Façade
//!
//! One async method per remote-control protocol operation, with plain data
//! in and out. The transport layer (outside this workspace) handles the
//! protocol envelope; this crate handles credential extraction, the
//! browse/search/play operations against the storage provider, the device
//! link flow and the mapping of every failure to a protocol fault code.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use error::{Result, ServiceError};
pub use logging::{init_logging, LogFormat, LoggingConfig};

use std::fmt;
use std::sync::Arc;

use bridge_traits::http::HttpClient;
use core_auth::{
    decompress, AuthConfig, CredentialBundle, DeviceLinkCode, DeviceLinkFlow, LinkedTokens,
};
use provider_onedrive::{
    translate::build_track_metadata, GraphConnector, MediaCollectionEntry, MediaMetadata, PageItem,
    AUDIO_PREFIX,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Credential block the device presents with each authenticated call.
///
/// Mirrors the protocol's header shape: an opaque household identifier, the
/// stored token (possibly in the compact `###` form) and the refresh key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialHeaders {
    #[serde(default)]
    pub household_id: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub key: String,
}

impl fmt::Debug for CredentialHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHeaders")
            .field("household_id", &self.household_id)
            .field("token", &"[REDACTED]")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// One page of a browse or search reply.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataPage {
    pub index: u32,
    pub count: u64,
    pub total: u64,
    pub items: Vec<PageItem>,
}

/// Gateway façade owning the provider connector and the link flow.
pub struct Gateway {
    connector: GraphConnector,
    link_flow: DeviceLinkFlow,
}

impl Gateway {
    pub fn new(config: GatewayConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let link_flow = DeviceLinkFlow::new(
            AuthConfig {
                auth_base_uri: config.auth_api_uri.clone(),
                client_id: config.client_id.clone(),
            },
            Arc::clone(&http_client),
        );
        let connector = GraphConnector::new(config.graph_api_uri, http_client);

        Self {
            connector,
            link_flow,
        }
    }

    /// Browse a container's children, one page at a time.
    ///
    /// The special container id `search` never reaches the provider: it is
    /// answered with the static one-entry search-category collection that
    /// the device expands via [`search`](Gateway::search).
    #[instrument(skip(self, headers), fields(id = id, count = count, index = index))]
    pub async fn get_metadata(
        &self,
        id: &str,
        count: u32,
        index: u32,
        headers: Option<&CredentialHeaders>,
        use_app_root: bool,
    ) -> Result<MetadataPage> {
        let credentials = extract_credentials(headers)?;

        if id == "search" {
            debug!("Answering static search category");
            return Ok(MetadataPage {
                index,
                count: 1,
                total: 1,
                items: vec![PageItem::Collection(MediaCollectionEntry {
                    id: "files".to_string(),
                    item_type: "search".to_string(),
                    title: "Files".to_string(),
                    can_play: false,
                    can_enumerate: false,
                    artist: None,
                    album_art_uri: None,
                })],
            });
        }

        let page = self
            .connector
            .list_children(&credentials, id, index, count, use_app_root)
            .await?;

        Ok(MetadataPage {
            index,
            count: page.count,
            total: page.total,
            items: page.items,
        })
    }

    /// Full-text search across the linked drive.
    #[instrument(skip(self, headers, term), fields(count = count, index = index))]
    pub async fn search(
        &self,
        term: &str,
        count: u32,
        index: u32,
        headers: Option<&CredentialHeaders>,
    ) -> Result<MetadataPage> {
        let credentials = extract_credentials(headers)?;

        let page = self
            .connector
            .search(&credentials, term, index, count)
            .await?;

        Ok(MetadataPage {
            index,
            count: page.count,
            total: page.total,
            items: page.items,
        })
    }

    /// Resolve a playable item id to its streamable download URI.
    #[instrument(skip(self, headers), fields(id = id))]
    pub async fn get_media_uri(
        &self,
        id: &str,
        headers: Option<&CredentialHeaders>,
    ) -> Result<String> {
        let credentials = extract_credentials(headers)?;
        let item_id = id.strip_prefix(AUDIO_PREFIX).unwrap_or(id);

        let item = self.connector.get_item(&credentials, item_id).await?;
        item.download_uri()
            .map(str::to_string)
            .ok_or(ServiceError::NotFound)
    }

    /// Full media metadata for a single item, by raw provider id.
    #[instrument(skip(self, headers), fields(id = id))]
    pub async fn get_media_metadata(
        &self,
        id: &str,
        headers: Option<&CredentialHeaders>,
    ) -> Result<MediaMetadata> {
        let credentials = extract_credentials(headers)?;

        let item = self.connector.get_item(&credentials, id).await?;
        Ok(build_track_metadata(&item, false))
    }

    /// Timestamp of the most recent catalog change, for the device's
    /// update poll. `None` when the provider reports no changes.
    #[instrument(skip(self, headers))]
    pub async fn get_last_update(
        &self,
        headers: Option<&CredentialHeaders>,
    ) -> Result<Option<String>> {
        let credentials = extract_credentials(headers)?;
        Ok(self.connector.last_update(&credentials).await?)
    }

    /// Start the account-link flow: fetch the code the user enters in a
    /// browser.
    pub async fn get_device_link_code(
        &self,
        household_id: &str,
        use_app_root: bool,
    ) -> Result<DeviceLinkCode> {
        Ok(self
            .link_flow
            .request_device_code(household_id, use_app_root)
            .await?)
    }

    /// Poll for the linked account's tokens. Returns the fault-mapped
    /// `LinkPending` condition while the user has not finished linking.
    pub async fn get_device_auth_token(
        &self,
        household_id: &str,
        link_device_id: &str,
    ) -> Result<LinkedTokens> {
        Ok(self
            .link_flow
            .poll_for_token(household_id, link_device_id)
            .await?)
    }

    /// Exchange the presented refresh key for a fresh credential bundle.
    pub async fn refresh_auth_token(
        &self,
        headers: Option<&CredentialHeaders>,
        use_app_root: bool,
    ) -> Result<CredentialBundle> {
        let credentials = extract_credentials(headers)?;
        Ok(self
            .link_flow
            .refresh_token(&credentials, use_app_root)
            .await?)
    }
}

/// Turn the device's optional credential block into a usable bundle.
///
/// Absent headers or an empty token mean the device has no session for
/// this account. Compact-form tokens are expanded back to the bearer form
/// here, once, so everything downstream sees a plain token.
fn extract_credentials(headers: Option<&CredentialHeaders>) -> Result<CredentialBundle> {
    let headers = headers.ok_or(ServiceError::SessionInvalid)?;
    if headers.token.is_empty() {
        return Err(ServiceError::SessionInvalid);
    }

    let access_token = decompress(&headers.token);

    Ok(CredentialBundle::new(
        headers.household_id.clone(),
        access_token,
        headers.key.clone(),
    ))
}
