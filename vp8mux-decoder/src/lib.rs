//! vp8mux Decoder Library
//!
//! This library turns caller-supplied frame inputs (raw WebP files or
//! `data:image/webp;base64,` URIs) into VP8 keyframes with their geometry,
//! without touching pixel data.

pub mod data_uri;
pub mod riff;
pub mod webp;

pub use data_uri::FrameInput;
pub use riff::{parse_chunks, ChunkMap, ChunkValue};
pub use webp::{decode_geometry, decode_webp, Vp8Keyframe};

/// Result type for vp8mux-decoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vp8mux-decoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid frame input: expected WebP bytes or a data:image/webp;base64 URI")]
    InvalidFrameInput,

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Not a valid VP8 keyframe: {0}")]
    NotVp8Keyframe(&'static str),

    #[error("Malformed container: chunk '{id}' at offset {offset} declares {declared} bytes but only {remaining} remain")]
    MalformedContainer {
        id: String,
        offset: usize,
        declared: u64,
        remaining: usize,
    },
}
