//! Destination filename derivation for downloaded resources.
//!
//! A resource is named either after the last segment of its URL path or, with
//! content-hash naming, after the SHA-256 digest of its body.

use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use super::DownloadError;

/// Computes the destination filename for a fetched resource.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] when hashing is disabled and the URL
/// has no usable last path segment.
pub fn destination_filename(
    url: &str,
    body: &[u8],
    use_hashing: bool,
) -> Result<String, DownloadError> {
    if use_hashing {
        Ok(content_hash_filename(body))
    } else {
        filename_from_url(url)
    }
}

/// Returns the lowercase hex SHA-256 digest of `body`.
///
/// The same bytes always map to the same name.
#[must_use]
pub fn content_hash_filename(body: &[u8]) -> String {
    format!("{:x}", Sha256::digest(body))
}

/// Extracts the last segment of the URL path, percent-decoded.
///
/// Query string and fragment are never part of the result.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] if the URL cannot be parsed, has no
/// path segments, ends in `/`, or decodes to a name that would escape the
/// output directory.
pub fn filename_from_url(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url, "unparsable URL"))?;

    let last = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .ok_or_else(|| DownloadError::invalid_url(url, "URL has no path"))?;

    let decoded = urlencoding::decode(last).map_or_else(
        |e| {
            debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
            last.to_string()
        },
        std::borrow::Cow::into_owned,
    );

    if decoded.is_empty() {
        return Err(DownloadError::invalid_url(
            url,
            "URL path has no final segment to name the file after",
        ));
    }
    if !is_plain_filename(&decoded) {
        return Err(DownloadError::invalid_url(
            url,
            "final path segment is not a plain filename",
        ));
    }

    Ok(decoded)
}

fn is_plain_filename(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
