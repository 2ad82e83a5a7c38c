//! Frame input adapter for raw bytes and base64 data URIs

use crate::webp::{decode_webp, Vp8Keyframe};
use crate::{Error, Result};
use base64::{engine::general_purpose, Engine as _};

/// Prefix a captured WebP data URI must carry
pub const WEBP_DATA_URI_PREFIX: &str = "data:image/webp;base64,";

/// A frame as handed over by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameInput {
    /// A complete WebP file
    Bytes(Vec<u8>),
    /// A `data:image/webp;base64,` URI, as produced by canvas capture
    DataUri(String),
}

impl FrameInput {
    /// Resolves the input to WebP file bytes
    pub fn into_webp_bytes(self) -> Result<Vec<u8>> {
        match self {
            FrameInput::Bytes(bytes) => Ok(bytes),
            FrameInput::DataUri(uri) => decode_data_uri(&uri),
        }
    }

    /// Borrowing variant of [`FrameInput::into_webp_bytes`]
    pub fn webp_bytes(&self) -> Result<std::borrow::Cow<'_, [u8]>> {
        match self {
            FrameInput::Bytes(bytes) => Ok(std::borrow::Cow::Borrowed(bytes)),
            FrameInput::DataUri(uri) => Ok(std::borrow::Cow::Owned(decode_data_uri(uri)?)),
        }
    }

    /// Resolves and decodes the input into a VP8 keyframe
    pub fn decode(&self) -> Result<Vp8Keyframe> {
        decode_webp(&self.webp_bytes()?)
    }
}

impl From<Vec<u8>> for FrameInput {
    fn from(bytes: Vec<u8>) -> Self {
        FrameInput::Bytes(bytes)
    }
}

impl From<&[u8]> for FrameInput {
    fn from(bytes: &[u8]) -> Self {
        FrameInput::Bytes(bytes.to_vec())
    }
}

impl From<String> for FrameInput {
    fn from(uri: String) -> Self {
        FrameInput::DataUri(uri)
    }
}

impl From<&str> for FrameInput {
    fn from(uri: &str) -> Self {
        FrameInput::DataUri(uri.to_string())
    }
}

/// Strips the WebP data URI prefix (matched case-insensitively) and decodes
/// the base64 remainder
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let prefix_len = WEBP_DATA_URI_PREFIX.len();
    let matches = uri
        .get(..prefix_len)
        .is_some_and(|p| p.eq_ignore_ascii_case(WEBP_DATA_URI_PREFIX));
    if !matches {
        return Err(Error::InvalidFrameInput);
    }

    let payload = uri[prefix_len..].trim();
    Ok(general_purpose::STANDARD.decode(payload)?)
}
