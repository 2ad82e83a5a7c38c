//! Frame collection and WebM compilation

use crate::document::build_document;
use crate::frame_store::{Frame, FrameStore};
use crate::{Error, MuxerConfig, Result, MAX_FRAME_DURATION_MS};
use std::io::Write;
use tracing::{debug, info};
use vp8mux_core::{cluster_frames, encode_document, DecodedFrame, VideoInfo};
use vp8mux_decoder::FrameInput;

/// A compiled WebM document
#[derive(Debug, Clone)]
pub struct WebmFile {
    bytes: Vec<u8>,
    info: VideoInfo,
    cluster_count: usize,
}

impl WebmFile {
    /// Media type of the produced buffer
    pub const MIME_TYPE: &'static str = "video/webm";

    pub fn mime_type(&self) -> &'static str {
        Self::MIME_TYPE
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Stream properties the document was built from
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Writes the document to a sink
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()
    }
}

/// Collects frames and compiles them into WebM.
///
/// Each muxer owns its frames; compiling leaves them in place so more can be
/// appended and the document rebuilt.
#[derive(Debug, Clone)]
pub struct Muxer {
    config: MuxerConfig,
    frames: FrameStore,
}

impl Muxer {
    /// Creates a muxer with an empty frame store
    pub fn new(config: MuxerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frames: FrameStore::new(),
        })
    }

    /// Appends a frame shown for the configured default duration
    pub fn add_frame(&mut self, input: impl Into<FrameInput>) {
        let duration_ms = self.config.default_frame_duration_ms();
        self.add_frame_with_duration(input, duration_ms);
    }

    /// Appends a frame with an explicit duration in milliseconds
    pub fn add_frame_with_duration(&mut self, input: impl Into<FrameInput>, duration_ms: u32) {
        self.frames.push(Frame::new(input, duration_ms));
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn config(&self) -> &MuxerConfig {
        &self.config
    }

    /// Compiles every frame added so far into a WebM document
    pub fn compile(&self) -> Result<WebmFile> {
        compile(&self.frames, &self.config.app_name)
    }
}

/// Decodes, validates and muxes a frame store into a WebM document.
///
/// Fails on the first frame that cannot be decoded, whose geometry differs
/// from the first frame, or whose duration is outside 1..=32767ms. Frame
/// numbers in errors are 1-based.
pub fn compile(frames: &FrameStore, app_name: &str) -> Result<WebmFile> {
    let decoded = decode_frames(frames)?;
    let info = VideoInfo::from_frames(&decoded);

    let clusters = cluster_frames(&decoded)?;
    let document = build_document(&info, &clusters, app_name);
    let bytes = encode_document(&document)?;

    info!(
        frames = decoded.len(),
        clusters = clusters.len(),
        width = info.width,
        height = info.height,
        duration_ms = info.total_duration_ms,
        bytes = bytes.len(),
        "compiled WebM"
    );

    Ok(WebmFile {
        bytes,
        info,
        cluster_count: clusters.len(),
    })
}

fn decode_frames(frames: &FrameStore) -> Result<Vec<DecodedFrame>> {
    let mut decoded: Vec<DecodedFrame> = Vec::with_capacity(frames.len());

    for (index, frame) in frames.iter().enumerate() {
        let number = index + 1;
        let keyframe = frame.input.decode().map_err(|source| Error::Frame {
            frame: number,
            source,
        })?;

        if let Some(first) = decoded.first() {
            if (keyframe.width, keyframe.height) != (first.width, first.height) {
                return Err(Error::DimensionMismatch {
                    frame: number,
                    expected_width: first.width,
                    expected_height: first.height,
                    found_width: keyframe.width,
                    found_height: keyframe.height,
                });
            }
        }

        if frame.duration_ms == 0 || frame.duration_ms > MAX_FRAME_DURATION_MS {
            return Err(Error::InvalidDuration {
                frame: number,
                duration_ms: frame.duration_ms,
            });
        }

        debug!(
            frame = number,
            width = keyframe.width,
            height = keyframe.height,
            duration_ms = frame.duration_ms,
            "accepted frame"
        );
        decoded.push(DecodedFrame::new(
            keyframe.width,
            keyframe.height,
            keyframe.payload,
            frame.duration_ms,
        ));
    }

    Ok(decoded)
}
