//! vp8mux Muxer Library
//!
//! This library collects WebP-wrapped VP8 keyframes and compiles them into a
//! single WebM document held in memory.

pub mod document;
pub mod frame_store;
pub mod muxer;

pub use frame_store::{Frame, FrameStore};
pub use muxer::{compile, Muxer, WebmFile};

/// Longest duration a single frame may be shown for, in milliseconds
pub const MAX_FRAME_DURATION_MS: u32 = 0x7FFF;

/// Result type for vp8mux-muxer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vp8mux-muxer operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vp8mux core error: {0}")]
    Core(#[from] vp8mux_core::Error),

    #[error("Frame {frame}: {source}")]
    Frame {
        frame: usize,
        #[source]
        source: vp8mux_decoder::Error,
    },

    #[error("Frame {frame} is {found_width}x{found_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        frame: usize,
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("Frame {frame} has an invalid duration of {duration_ms}ms (must be between 1 and 32767)")]
    InvalidDuration { frame: usize, duration_ms: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Muxer configuration
#[derive(Debug, Clone)]
pub struct MuxerConfig {
    /// Frame rate used to derive the default per-frame duration
    pub fps: f64,
    /// Capture quality (0-100), forwarded to frame capture adapters
    pub quality: u8,
    /// MuxingApp / WritingApp string written into the segment info
    pub app_name: String,
}

impl Default for MuxerConfig {
    fn default() -> Self {
        Self {
            fps: 15.0,
            quality: 100,
            app_name: "vp8mux".to_string(),
        }
    }
}

impl MuxerConfig {
    /// Checks that the frame rate and quality are usable
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "fps must be a positive number, got {}",
                self.fps
            )));
        }
        if self.quality > 100 {
            return Err(Error::InvalidConfig(format!(
                "quality must be between 0 and 100, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Duration of one frame at the configured rate, rounded to whole milliseconds
    pub fn default_frame_duration_ms(&self) -> u32 {
        let ms = (1000.0 / self.fps).round();
        ms.clamp(1.0, f64::from(MAX_FRAME_DURATION_MS)) as u32
    }

    /// Quality as a 0.0 - 1.0 factor, the form image encoders expect
    pub fn quality_factor(&self) -> f32 {
        f32::from(self.quality) / 100.0
    }
}
