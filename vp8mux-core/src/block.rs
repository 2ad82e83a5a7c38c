//! SimpleBlock construction and parsing

use crate::element::Element;
use crate::{ids, Error, Result};

/// Highest track number expressible in the one-byte track field we emit
pub const MAX_TRACK_NUMBER: u64 = 127;

const FLAG_KEYFRAME: u8 = 0x80;
const FLAG_INVISIBLE: u8 = 0x08;
const FLAG_DISCARDABLE: u8 = 0x01;
const LACING_SHIFT: u8 = 1;
const LACING_MASK: u8 = 0b11;

/// SimpleBlock header flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockFlags {
    pub keyframe: bool,
    pub invisible: bool,
    /// Lacing mode (0 = none), two bits
    pub lacing: u8,
    pub discardable: bool,
}

impl BlockFlags {
    /// Flags for a standalone, unlaced keyframe
    pub fn keyframe() -> Self {
        Self {
            keyframe: true,
            ..Self::default()
        }
    }

    pub fn to_byte(self) -> u8 {
        let mut flags = 0;
        if self.keyframe {
            flags |= FLAG_KEYFRAME;
        }
        if self.invisible {
            flags |= FLAG_INVISIBLE;
        }
        flags |= (self.lacing & LACING_MASK) << LACING_SHIFT;
        if self.discardable {
            flags |= FLAG_DISCARDABLE;
        }
        flags
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            keyframe: byte & FLAG_KEYFRAME != 0,
            invisible: byte & FLAG_INVISIBLE != 0,
            lacing: (byte >> LACING_SHIFT) & LACING_MASK,
            discardable: byte & FLAG_DISCARDABLE != 0,
        }
    }
}

/// One encoded frame on a track, timed relative to its cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleBlock {
    track_number: u8,
    relative_timecode: i16,
    flags: BlockFlags,
    payload: Vec<u8>,
}

impl SimpleBlock {
    /// Creates a new SimpleBlock
    ///
    /// Fails if the track number does not fit the single-byte track field or
    /// the timecode does not fit the signed 16-bit relative timecode.
    pub fn new(
        track_number: u64,
        relative_timecode_ms: i64,
        flags: BlockFlags,
        payload: Vec<u8>,
    ) -> Result<Self> {
        if track_number == 0 || track_number > MAX_TRACK_NUMBER {
            return Err(Error::TrackNumberUnsupported(track_number));
        }
        let relative_timecode = i16::try_from(relative_timecode_ms)
            .map_err(|_| Error::TimecodeOverflow(relative_timecode_ms))?;

        Ok(Self {
            track_number: track_number as u8,
            relative_timecode,
            flags,
            payload,
        })
    }

    pub fn track_number(&self) -> u8 {
        self.track_number
    }

    pub fn relative_timecode(&self) -> i16 {
        self.relative_timecode
    }

    pub fn flags(&self) -> BlockFlags {
        self.flags
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serializes the block body: track, timecode (big-endian), flags, payload
    pub fn to_bytes(&self) -> Vec<u8> {
        let timecode = self.relative_timecode.to_be_bytes();
        let mut out = Vec::with_capacity(4 + self.payload.len());
        out.push(0x80 | self.track_number);
        out.extend_from_slice(&timecode);
        out.push(self.flags.to_byte());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parses a block body written with a one-byte track number
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::UnexpectedEof(data.len()));
        }
        if data[0] & 0x80 == 0 {
            return Err(Error::InvalidVarint(0));
        }
        Ok(Self {
            track_number: data[0] & 0x7F,
            relative_timecode: i16::from_be_bytes([data[1], data[2]]),
            flags: BlockFlags::from_byte(data[3]),
            payload: data[4..].to_vec(),
        })
    }

    /// Wraps the block body in a SimpleBlock element
    pub fn to_element(&self) -> Element {
        Element::bytes(ids::SIMPLE_BLOCK, self.to_bytes())
    }
}
