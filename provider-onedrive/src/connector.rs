//! Microsoft Graph drive connector.
//!
//! Stateless: every call takes the caller's credential bundle and maps to
//! exactly one or two Graph requests. Device-driven paging arrives as a
//! numeric index; Graph pages with an opaque continuation token, so a
//! non-zero index is resolved through one priming request first.

use std::sync::Arc;

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_auth::CredentialBundle;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{GraphError, Result};
use crate::item::{CatalogItem, FOLDER_PREFIX};
use crate::translate::{build_page, PageResult};
use crate::types::{DriveItem, DriveItemList};

const DRIVE_ROOT: &str = "/me/drive/root";
const DRIVE_APP_ROOT: &str = "/drive/special/approot";

/// Sentinel count meaning "everything": suppresses the id-only projection
/// that large bounded pages request.
pub const PAGE_ALL: u32 = u32::MAX;

/// Read-only client for the Graph drive surface.
pub struct GraphConnector {
    http_client: Arc<dyn HttpClient>,
    graph_base_uri: String,
}

impl GraphConnector {
    pub fn new(graph_base_uri: impl Into<String>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            graph_base_uri: graph_base_uri.into(),
        }
    }

    /// List the children of a catalog container, one page at a time.
    ///
    /// `container` is either the literal `root` (resolving to the drive
    /// root, or the app folder when `use_app_root` is set) or a
    /// folder-prefixed id from an earlier listing. Anything else is not a
    /// browseable container and fails without touching the provider.
    #[instrument(skip(self, credentials), fields(container = container))]
    pub async fn list_children(
        &self,
        credentials: &CredentialBundle,
        container: &str,
        index: u32,
        count: u32,
        use_app_root: bool,
    ) -> Result<PageResult> {
        let path = if container == "root" {
            let root = if use_app_root { DRIVE_APP_ROOT } else { DRIVE_ROOT };
            format!("{root}/children")
        } else if let Some(item_id) = container.strip_prefix(FOLDER_PREFIX) {
            format!("/me/drive/items/{item_id}/children")
        } else {
            return Err(GraphError::NotFound);
        };

        let skip_token = self.resolve_skip_token(credentials, &path, index).await?;
        let list: DriveItemList = self
            .api_get(credentials, &path, count, skip_token.as_deref())
            .await?;

        Ok(build_page(list))
    }

    /// Full-text search across the drive, paged like a listing.
    #[instrument(skip(self, credentials, term))]
    pub async fn search(
        &self,
        credentials: &CredentialBundle,
        term: &str,
        index: u32,
        count: u32,
    ) -> Result<PageResult> {
        let path = format!("/me/drive/root/search(q='{term}')");

        let skip_token = self.resolve_skip_token(credentials, &path, index).await?;
        let list: DriveItemList = self
            .api_get(credentials, &path, count, skip_token.as_deref())
            .await?;

        Ok(build_page(list))
    }

    /// Fetch a single item by its raw provider id.
    #[instrument(skip(self, credentials), fields(id = id))]
    pub async fn get_item(&self, credentials: &CredentialBundle, id: &str) -> Result<CatalogItem> {
        let raw: DriveItem = self
            .api_get(credentials, &format!("/me/drive/items/{id}"), 1, None)
            .await?;

        CatalogItem::from_drive_item(raw).ok_or(GraphError::NotFound)
    }

    /// Timestamp of the most recent drive change, from a single-item delta
    /// probe. `None` when the delta feed comes back empty.
    #[instrument(skip(self, credentials))]
    pub async fn last_update(&self, credentials: &CredentialBundle) -> Result<Option<String>> {
        let path = format!("{DRIVE_ROOT}/delta");
        let list: DriveItemList = self.api_get(credentials, &path, 1, None).await?;

        Ok(list
            .value
            .into_iter()
            .next()
            .and_then(|item| item.last_modified_date_time))
    }

    /// Exchange a numeric page index for the provider's opaque token by
    /// fetching the first `index` entries and reading the continuation
    /// token off the next-page link. Index zero needs no token.
    async fn resolve_skip_token(
        &self,
        credentials: &CredentialBundle,
        path: &str,
        index: u32,
    ) -> Result<Option<String>> {
        if index == 0 {
            return Ok(None);
        }

        let list: DriveItemList = self.api_get(credentials, path, index, None).await?;
        let token = list.next_link.as_deref().and_then(extract_skip_token);
        debug!(index, resolved = token.is_some(), "resolved page cursor");
        Ok(token)
    }

    async fn api_get<T: DeserializeOwned>(
        &self,
        credentials: &CredentialBundle,
        path: &str,
        count: u32,
        skip_token: Option<&str>,
    ) -> Result<T> {
        let url = self.build_url(path, count, skip_token)?;
        let request =
            HttpRequest::new(HttpMethod::Get, url.as_str()).bearer_token(&credentials.access_token);

        let response = self.http_client.execute(request).await?;

        match response.status {
            401 => Err(GraphError::TokenRefreshRequired),
            404 => Err(GraphError::NotFound),
            status if !response.is_success() => Err(GraphError::Upstream {
                status,
                body: response.text().unwrap_or_default(),
            }),
            _ => serde_json::from_slice(&response.body)
                .map_err(|e| GraphError::Parse(e.to_string())),
        }
    }

    fn build_url(&self, path: &str, count: u32, skip_token: Option<&str>) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.graph_base_uri.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url =
            Url::parse(&joined).map_err(|e| GraphError::Parse(format!("Bad URL {joined}: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            // Delta probes reject the thumbnail expansion
            if !path.contains("delta") {
                query.append_pair("expand", "thumbnails");
            }
            if count > 1 {
                query.append_pair("top", &count.to_string());
            }
            if let Some(token) = skip_token {
                query.append_pair("$skipToken", token);
            }
            // Oversized priming fetches only need ids
            if count > 100 && count != PAGE_ALL {
                query.append_pair("select", "id");
            }
        }

        Ok(url)
    }
}

/// Pull the continuation token out of a next-page link, matching
/// case-insensitively and keeping everything after the marker.
fn extract_skip_token(next_link: &str) -> Option<String> {
    let marker = "skiptoken=";
    let position = next_link.to_ascii_lowercase().find(marker)?;
    let token = &next_link[position + marker.len()..];
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
