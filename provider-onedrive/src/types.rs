//! Wire-format types for Microsoft Graph drive responses.
//!
//! Every field is optional with a lenient default: a malformed record is
//! never a parse failure here, it just produces a record the catalog model
//! will drop or fill with defaults.

use serde::Deserialize;

/// One drive item as returned by the Graph API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file: Option<FileFacet>,
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    #[serde(default)]
    pub audio: Option<AudioFacet>,
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailSet>,
    #[serde(rename = "@microsoft.graph.downloadUrl", default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub last_modified_date_time: Option<String>,
}

/// Present when the item is a file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Present when the item is a folder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: Option<u64>,
}

/// Present when the provider recognized the file as audio.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFacet {
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Duration in milliseconds
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub track: Option<u32>,
}

/// One set of thumbnail renditions for an item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailSet {
    #[serde(default)]
    pub small: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    #[serde(default)]
    pub url: Option<String>,
}

/// Paged collection response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveItemList {
    #[serde(default)]
    pub value: Vec<DriveItem>,
    /// Next page link carrying the opaque continuation token
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
    /// Exact total count, when the provider supplies one
    #[serde(rename = "@odata.count", default)]
    pub count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_item_deserializes_graph_shape() {
        let json = r#"{
            "id": "item1",
            "name": "song.mp3",
            "file": {"mimeType": "audio/mpeg"},
            "audio": {"title": "Song", "artist": "Artist", "duration": 215000, "track": 3},
            "thumbnails": [{"small": {"url": "https://thumb.example/s.jpg"}}],
            "@microsoft.graph.downloadUrl": "https://dl.example/song.mp3"
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.as_deref(), Some("item1"));
        assert_eq!(item.file.unwrap().mime_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(item.audio.as_ref().unwrap().duration, Some(215_000));
        assert_eq!(
            item.download_url.as_deref(),
            Some("https://dl.example/song.mp3")
        );
    }

    #[test]
    fn test_list_parses_odata_annotations() {
        let json = r#"{
            "value": [{"id": "a"}, {"id": "b"}],
            "@odata.nextLink": "https://graph.example/next?$skiptoken=abc",
            "@odata.count": 42
        }"#;

        let list: DriveItemList = serde_json::from_str(json).unwrap();
        assert_eq!(list.value.len(), 2);
        assert_eq!(list.count, Some(42));
        assert!(list.next_link.unwrap().contains("skiptoken"));
    }

    #[test]
    fn test_empty_object_is_valid_item() {
        let item: DriveItem = serde_json::from_str("{}").unwrap();
        assert!(item.id.is_none());
        assert!(item.file.is_none());
        assert!(item.folder.is_none());
        assert!(item.thumbnails.is_empty());
    }
}
