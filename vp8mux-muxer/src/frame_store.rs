//! Append-only frame storage

use vp8mux_decoder::FrameInput;

/// A frame waiting to be muxed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// WebP file or data URI carrying a VP8 keyframe
    pub input: FrameInput,
    /// Display duration in milliseconds
    pub duration_ms: u32,
}

impl Frame {
    /// Creates a new frame
    pub fn new(input: impl Into<FrameInput>, duration_ms: u32) -> Self {
        Self {
            input: input.into(),
            duration_ms,
        }
    }
}

/// Ordered frames owned by a single muxer.
///
/// Frames can only be appended; compiling reads them without consuming.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
}

impl FrameStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Sum of the stored durations in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }
}

impl<'a> IntoIterator for &'a FrameStore {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Frame> for FrameStore {
    fn extend<T: IntoIterator<Item = Frame>>(&mut self, iter: T) {
        self.frames.extend(iter);
    }
}

impl FromIterator<Frame> for FrameStore {
    fn from_iter<T: IntoIterator<Item = Frame>>(iter: T) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}
