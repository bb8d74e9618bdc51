//! Compact encoding for oversized bearer tokens.
//!
//! The protocol's token-storage field holds at most 2048 characters; some
//! issued access tokens are longer. A token has the three-dot-separated
//! shape `header.payload.signature` where the first two segments are
//! base64-encoded JSON, so decoding them back to raw text shortens the
//! token considerably. The signature segment is left untouched.
//!
//! [`compress`] is strict (a token that does not split into three segments
//! is a hard failure), while [`decompress`] is a lenient passthrough: the
//! device may present a token from a session established before compression
//! was ever needed, and that token must flow through unchanged.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use tracing::{debug, warn};

use crate::error::{AuthError, Result};

/// Hard ceiling of the protocol's token-storage field, in characters.
pub const TOKEN_LENGTH_LIMIT: usize = 2048;

/// Separator between decoded segments of a compressed token.
const SEPARATOR: &str = "###";

/// Compress a three-segment bearer token below the protocol ceiling.
///
/// Decodes the header and payload segments from base64 to UTF-8 text and
/// joins `header ### payload ### signature`. A compressed form that is
/// still over the limit is logged and returned anyway; that is a known
/// best-effort degradation, not a failure.
///
/// # Errors
///
/// Returns [`AuthError::LinkFailed`] when the token does not split into
/// exactly three dot-separated segments, or when a segment is not base64
/// of valid UTF-8.
pub fn compress(token: &str) -> Result<String> {
    debug!("Access token too long, compressing");

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::LinkFailed(format!(
            "token has {} dot-separated segments, expected 3",
            segments.len()
        )));
    }

    let header = decode_segment(segments[0])?;
    let payload = decode_segment(segments[1])?;
    let compressed = format!("{header}{SEPARATOR}{payload}{SEPARATOR}{}", segments[2]);

    if compressed.len() > TOKEN_LENGTH_LIMIT {
        warn!(
            length = compressed.len(),
            "Compressed token still exceeds the protocol token limit"
        );
    }

    Ok(compressed)
}

/// Reverse [`compress`], or return the input unchanged.
///
/// The transform is only applied when the input looks like a compressed
/// token: starts with `{`, contains the `###` separator, and splits into
/// exactly three parts. Everything else passes through untouched, which
/// covers tokens that never needed compression.
pub fn decompress(token: &str) -> String {
    if token.starts_with('{') && token.contains(SEPARATOR) {
        let parts: Vec<&str> = token.split(SEPARATOR).collect();
        if parts.len() == 3 {
            let header = STANDARD_NO_PAD.encode(parts[0]);
            let payload = STANDARD_NO_PAD.encode(parts[1]);
            return format!("{header}.{payload}.{}", parts[2]);
        }
    }
    token.to_string()
}

/// Decode one base64 token segment to UTF-8 text.
///
/// Issued tokens use the URL-safe alphabet while re-encoded ones use the
/// standard alphabet, so both are accepted; padding is optional either way.
fn decode_segment(segment: &str) -> Result<String> {
    let trimmed = segment.trim_end_matches('=');
    let bytes = STANDARD_NO_PAD
        .decode(trimmed)
        .or_else(|_| URL_SAFE_NO_PAD.decode(trimmed))
        .map_err(|e| AuthError::LinkFailed(format!("token segment is not base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AuthError::LinkFailed(format!("token segment is not UTF-8: {e}")))
}
