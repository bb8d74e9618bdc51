//! Typed catalog item model.
//!
//! A raw Graph record becomes exactly one of three variants, decided by
//! which facets are present, or no variant at all. Consumers drop records
//! without a variant instead of surfacing them to the protocol layer.

use crate::types::DriveItem;

/// Type tag prefixed to item ids handed to the protocol layer, so a later
/// direct lookup can recover the intended interpretation.
pub const AUDIO_PREFIX: &str = "audio:";
pub const FILE_PREFIX: &str = "file:";
pub const FOLDER_PREFIX: &str = "folder:";

/// A storage-provider record in one of the three catalog shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogItem {
    File {
        id: String,
        name: String,
        mime_type: Option<String>,
        download_uri: Option<String>,
        thumbnail_uri: Option<String>,
    },
    AudioTrack {
        id: String,
        name: String,
        mime_type: Option<String>,
        download_uri: Option<String>,
        thumbnail_uri: Option<String>,
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        duration_seconds: u64,
        track_number: u32,
    },
    Folder {
        id: String,
        name: String,
        child_count: u64,
    },
}

impl CatalogItem {
    /// Build a catalog item from a raw provider record.
    ///
    /// Returns `None` when the record carries neither a `file` nor a
    /// `folder` facet. Absent optional fields become defaults; nothing in
    /// here is a hard failure.
    pub fn from_drive_item(raw: DriveItem) -> Option<CatalogItem> {
        let id = raw.id.unwrap_or_default();
        let name = raw.name.unwrap_or_default();
        let thumbnail_uri = raw
            .thumbnails
            .first()
            .and_then(|set| set.small.as_ref())
            .and_then(|small| small.url.clone());

        if let Some(file) = raw.file {
            if let Some(audio) = raw.audio {
                return Some(CatalogItem::AudioTrack {
                    id,
                    name,
                    mime_type: file.mime_type,
                    download_uri: raw.download_url,
                    thumbnail_uri,
                    title: audio.title,
                    artist: audio.artist,
                    album: audio.album,
                    duration_seconds: audio.duration.map(|ms| ms / 1000).unwrap_or(0),
                    track_number: audio.track.unwrap_or(1),
                });
            }
            return Some(CatalogItem::File {
                id,
                name,
                mime_type: file.mime_type,
                download_uri: raw.download_url,
                thumbnail_uri,
            });
        }

        if let Some(folder) = raw.folder {
            return Some(CatalogItem::Folder {
                id,
                name,
                child_count: folder.child_count.unwrap_or(0),
            });
        }

        None
    }

    pub fn id(&self) -> &str {
        match self {
            CatalogItem::File { id, .. }
            | CatalogItem::AudioTrack { id, .. }
            | CatalogItem::Folder { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogItem::File { name, .. }
            | CatalogItem::AudioTrack { name, .. }
            | CatalogItem::Folder { name, .. } => name,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            CatalogItem::File { mime_type, .. } | CatalogItem::AudioTrack { mime_type, .. } => {
                mime_type.as_deref()
            }
            CatalogItem::Folder { .. } => None,
        }
    }

    pub fn download_uri(&self) -> Option<&str> {
        match self {
            CatalogItem::File { download_uri, .. }
            | CatalogItem::AudioTrack { download_uri, .. } => download_uri.as_deref(),
            CatalogItem::Folder { .. } => None,
        }
    }

    pub fn thumbnail_uri(&self) -> Option<&str> {
        match self {
            CatalogItem::File { thumbnail_uri, .. }
            | CatalogItem::AudioTrack { thumbnail_uri, .. } => thumbnail_uri.as_deref(),
            CatalogItem::Folder { .. } => None,
        }
    }
}
