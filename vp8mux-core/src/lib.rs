//! vp8mux Core Library
//!
//! This library provides the EBML primitives and WebM data structures used to
//! assemble VP8 keyframes into a WebM (Matroska profile) document: variable
//! length integer encoding, a typed element tree with its binary writer and
//! reader, SimpleBlocks and duration-bounded clustering.

pub mod block;
pub mod cluster;
pub mod element;
pub mod frame;
pub mod ids;
pub mod reader;
pub mod varint;
pub mod writer;

pub use block::{BlockFlags, SimpleBlock};
pub use cluster::{cluster_frames, Cluster, CLUSTER_MAX_DURATION_MS};
pub use element::Element;
pub use frame::{DecodedFrame, VideoInfo};
pub use reader::{parse_elements, ElementReader};
pub use writer::{encode, encode_document, EbmlWriter};

/// Result type for vp8mux-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vp8mux-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TrackNumber {0} not supported (must be 1..=127)")]
    TrackNumberUnsupported(u64),

    #[error("Relative timecode {0}ms does not fit a SimpleBlock (must be -32768..=32767)")]
    TimecodeOverflow(i64),

    #[error("Unexpected end of data at offset {0}")]
    UnexpectedEof(usize),

    #[error("Invalid variable-length integer at offset {0}")]
    InvalidVarint(usize),

    #[error("Invalid element id at offset {0}")]
    InvalidElementId(usize),

    #[error("Invalid {kind} payload of {len} bytes for element 0x{id:X}")]
    InvalidPayload {
        id: u32,
        kind: &'static str,
        len: usize,
    },
}
