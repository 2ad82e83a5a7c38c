//! Decoded frame data structures

/// A VP8 keyframe extracted from its WebP wrapper, ready to be muxed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Width of the frame in pixels
    pub width: u32,
    /// Height of the frame in pixels
    pub height: u32,
    /// Raw VP8 bitstream, starting at the frame tag
    pub vp8_payload: Vec<u8>,
    /// Display duration in milliseconds
    pub duration_ms: u32,
}

impl DecodedFrame {
    /// Creates a new decoded frame
    pub fn new(width: u32, height: u32, vp8_payload: Vec<u8>, duration_ms: u32) -> Self {
        Self {
            width,
            height,
            vp8_payload,
            duration_ms,
        }
    }

    /// Returns the size of the VP8 payload in bytes
    pub fn payload_size(&self) -> usize {
        self.vp8_payload.len()
    }
}

/// Stream-wide properties shared by every frame of a compile
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VideoInfo {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Sum of all frame durations in milliseconds
    pub total_duration_ms: f64,
}

impl VideoInfo {
    /// Summarizes a sequence of frames that already share one geometry.
    ///
    /// An empty sequence yields a zero-sized, zero-length video.
    pub fn from_frames(frames: &[DecodedFrame]) -> Self {
        let (width, height) = frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0));
        let total: u64 = frames.iter().map(|f| u64::from(f.duration_ms)).sum();
        Self {
            width,
            height,
            total_duration_ms: total as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_info_sums_durations() {
        let frames = vec![
            DecodedFrame::new(200, 100, vec![0; 4], 33),
            DecodedFrame::new(200, 100, vec![0; 4], 33),
            DecodedFrame::new(200, 100, vec![0; 4], 34),
        ];
        let info = VideoInfo::from_frames(&frames);
        assert_eq!(info.width, 200);
        assert_eq!(info.height, 100);
        assert_eq!(info.total_duration_ms, 100.0);
    }

    #[test]
    fn test_video_info_empty() {
        let info = VideoInfo::from_frames(&[]);
        assert_eq!((info.width, info.height), (0, 0));
        assert_eq!(info.total_duration_ms, 0.0);
    }
}
