//! Catalog-to-protocol translation.
//!
//! Maps parsed [`CatalogItem`]s to the shapes the playback protocol
//! expects: browseable collection entries and playable media metadata.
//! The classification rules live here so listing and search share them.

use serde::Serialize;
use tracing::debug;

use crate::item::{CatalogItem, AUDIO_PREFIX, FILE_PREFIX, FOLDER_PREFIX};
use crate::types::DriveItemList;

/// Folders with at least this many children are browse-only; smaller ones
/// double as flat playlists the device may play directly.
const CAN_PLAY_MAX_CHILDREN: u64 = 100;

/// Entry of a browseable collection listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCollectionEntry {
    /// Item id carrying its type-tag prefix (`audio:`, `file:`, `folder:`)
    pub id: String,
    pub item_type: String,
    pub title: String,
    pub can_play: bool,
    pub can_enumerate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(rename = "albumArtURI", skip_serializing_if = "Option::is_none")]
    pub album_art_uri: Option<String>,
}

/// Metadata projection of a single playable audio item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub item_type: String,
    pub display_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    pub duration_seconds: u64,
    #[serde(rename = "albumArtURI", skip_serializing_if = "Option::is_none")]
    pub album_art_uri: Option<String>,
    pub track_number: u32,
}

/// One listed item: playable entries carry full media metadata, the rest
/// a collection entry.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Track(MediaMetadata),
    Collection(MediaCollectionEntry),
}

/// One page of a listing or search.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub items: Vec<PageItem>,
    pub count: u64,
    pub total: u64,
}

/// Whether the item is rendered as a playable track.
///
/// Audio-facet items always are; plain files qualify by `.flac` name or an
/// audio MIME type the provider did not recognize as audio itself.
pub fn is_playable_track(item: &CatalogItem) -> bool {
    match item {
        CatalogItem::AudioTrack { .. } => true,
        CatalogItem::File { .. } => {
            item.name().ends_with(".flac")
                || item
                    .mime_type()
                    .map(|mime| mime.contains("audio"))
                    .unwrap_or(false)
        }
        CatalogItem::Folder { .. } => false,
    }
}

/// Normalized MIME type reported to the device.
///
/// `.flac`-named plain files report `audio/flac`, anything ending in `wma`
/// reports `audio/wma`, the rest passes through verbatim.
pub fn normalized_mime_type(item: &CatalogItem) -> Option<String> {
    if matches!(item, CatalogItem::File { .. }) && item.name().ends_with(".flac") {
        return Some("audio/flac".to_string());
    }
    if let Some(mime) = item.mime_type() {
        if mime.ends_with("wma") {
            return Some("audio/wma".to_string());
        }
    }
    item.mime_type().map(str::to_string)
}

/// Render a playable item as full media metadata, id prefixed `audio:`
/// when listed (direct metadata lookups keep the raw id).
pub fn build_track_metadata(item: &CatalogItem, prefix_id: bool) -> MediaMetadata {
    let id = if prefix_id {
        format!("{AUDIO_PREFIX}{}", item.id())
    } else {
        item.id().to_string()
    };

    let (title, artist, album, duration_seconds, track_number) = match item {
        CatalogItem::AudioTrack {
            title,
            artist,
            album,
            duration_seconds,
            track_number,
            ..
        } => (
            title.clone().unwrap_or_else(|| item.name().to_string()),
            artist.clone(),
            album.clone(),
            *duration_seconds,
            *track_number,
        ),
        _ => (item.name().to_string(), None, None, 0, 1),
    };

    MediaMetadata {
        id,
        mime_type: normalized_mime_type(item),
        item_type: "track".to_string(),
        display_type: "audio".to_string(),
        title,
        artist,
        album,
        duration_seconds,
        album_art_uri: item.thumbnail_uri().map(str::to_string),
        track_number,
    }
}

/// Render a non-playable item as a collection entry.
pub fn build_collection_entry(item: &CatalogItem) -> MediaCollectionEntry {
    match item {
        CatalogItem::Folder {
            id,
            name,
            child_count,
        } => MediaCollectionEntry {
            id: format!("{FOLDER_PREFIX}{id}"),
            item_type: "collection".to_string(),
            title: name.clone(),
            can_play: *child_count < CAN_PLAY_MAX_CHILDREN,
            can_enumerate: true,
            artist: None,
            album_art_uri: None,
        },
        _ => MediaCollectionEntry {
            id: format!("{FILE_PREFIX}{}", item.id()),
            item_type: "other".to_string(),
            title: item.name().to_string(),
            can_play: false,
            can_enumerate: false,
            artist: None,
            album_art_uri: None,
        },
    }
}

/// Classify every record of a paged response into protocol entries.
///
/// Records without a derivable variant are dropped with a diagnostic note,
/// never surfaced to the protocol layer.
pub fn build_page(list: DriveItemList) -> PageResult {
    let provider_total = list.count;
    let mut items = Vec::with_capacity(list.value.len());

    for raw in list.value {
        let Some(item) = CatalogItem::from_drive_item(raw) else {
            debug!("Ignoring record with no catalog variant");
            continue;
        };

        if is_playable_track(&item) {
            items.push(PageItem::Track(build_track_metadata(&item, true)));
        } else {
            items.push(PageItem::Collection(build_collection_entry(&item)));
        }
    }

    let count = items.len() as u64;
    PageResult {
        items,
        count,
        total: provider_total.unwrap_or(count),
    }
}
