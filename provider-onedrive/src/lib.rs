//! # OneDrive Catalog Provider
//!
//! Translates between the playback protocol's catalog model and the
//! Microsoft Graph file/folder model.
//!
//! ## Overview
//!
//! This crate provides:
//! - Typed parsing of raw Graph drive-item records into [`CatalogItem`]
//!   variants (file, audio track, folder)
//! - Paged children listing and full-text search with index-to-skip-token
//!   cursor resolution
//! - Classification of items into the protocol's collection and media
//!   metadata shapes, including the playability rules
//! - Single-item lookup and the delta-based "last update" probe
//!
//! The connector consumes the [`HttpClient`](bridge_traits::http::HttpClient)
//! capability and a per-call [`CredentialBundle`](core_auth::CredentialBundle);
//! it holds no state between calls.

pub mod connector;
pub mod error;
pub mod item;
pub mod translate;
pub mod types;

pub use connector::{GraphConnector, PAGE_ALL};
pub use error::{GraphError, Result};
pub use item::{CatalogItem, AUDIO_PREFIX, FILE_PREFIX, FOLDER_PREFIX};
pub use translate::{MediaCollectionEntry, MediaMetadata, PageItem, PageResult};
