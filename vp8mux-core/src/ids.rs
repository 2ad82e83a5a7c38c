//! EBML / WebM element ids used by the muxer
//!
//! Ids already carry their own width marker, so they are written as their
//! natural big-endian bytes with no separate length prefix.

// EBML header
pub const EBML: u32 = 0x1A45_DFA3;
pub const EBML_VERSION: u32 = 0x4286;
pub const EBML_READ_VERSION: u32 = 0x42F7;
pub const EBML_MAX_ID_LENGTH: u32 = 0x42F2;
pub const EBML_MAX_SIZE_LENGTH: u32 = 0x42F3;
pub const DOC_TYPE: u32 = 0x4282;
pub const DOC_TYPE_VERSION: u32 = 0x4287;
pub const DOC_TYPE_READ_VERSION: u32 = 0x4285;

// Segment
pub const SEGMENT: u32 = 0x1853_8067;

// Segment information
pub const INFO: u32 = 0x1549_A966;
pub const TIMECODE_SCALE: u32 = 0x2A_D7B1;
pub const MUXING_APP: u32 = 0x4D80;
pub const WRITING_APP: u32 = 0x5741;
pub const DURATION: u32 = 0x4489;

// Tracks
pub const TRACKS: u32 = 0x1654_AE6B;
pub const TRACK_ENTRY: u32 = 0xAE;
pub const TRACK_NUMBER: u32 = 0xD7;
pub const TRACK_UID: u32 = 0x63C5;
pub const FLAG_LACING: u32 = 0x9C;
pub const LANGUAGE: u32 = 0x22_B59C;
pub const CODEC_ID: u32 = 0x86;
pub const CODEC_NAME: u32 = 0x25_8688;
pub const TRACK_TYPE: u32 = 0x83;
pub const VIDEO: u32 = 0xE0;
pub const PIXEL_WIDTH: u32 = 0xB0;
pub const PIXEL_HEIGHT: u32 = 0xBA;

// Clusters
pub const CLUSTER: u32 = 0x1F43_B675;
pub const TIMECODE: u32 = 0xE7;
pub const SIMPLE_BLOCK: u32 = 0xA3;

/// Payload type of an element, as declared by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Master,
    UInt,
    Float,
    Str,
    Bytes,
}

/// Looks up the payload type of a known element id.
///
/// Unknown ids are treated as opaque binary.
pub fn kind_of(id: u32) -> ElementKind {
    match id {
        EBML | SEGMENT | INFO | TRACKS | TRACK_ENTRY | VIDEO | CLUSTER => ElementKind::Master,
        EBML_VERSION | EBML_READ_VERSION | EBML_MAX_ID_LENGTH | EBML_MAX_SIZE_LENGTH
        | DOC_TYPE_VERSION | DOC_TYPE_READ_VERSION | TIMECODE_SCALE | TRACK_NUMBER
        | TRACK_UID | FLAG_LACING | TRACK_TYPE | PIXEL_WIDTH | PIXEL_HEIGHT | TIMECODE => {
            ElementKind::UInt
        }
        DURATION => ElementKind::Float,
        DOC_TYPE | MUXING_APP | WRITING_APP | LANGUAGE | CODEC_ID | CODEC_NAME => {
            ElementKind::Str
        }
        _ => ElementKind::Bytes,
    }
}

/// Human readable element name, for diagnostics
pub fn name_of(id: u32) -> Option<&'static str> {
    let name = match id {
        EBML => "EBML",
        EBML_VERSION => "EBMLVersion",
        EBML_READ_VERSION => "EBMLReadVersion",
        EBML_MAX_ID_LENGTH => "EBMLMaxIDLength",
        EBML_MAX_SIZE_LENGTH => "EBMLMaxSizeLength",
        DOC_TYPE => "DocType",
        DOC_TYPE_VERSION => "DocTypeVersion",
        DOC_TYPE_READ_VERSION => "DocTypeReadVersion",
        SEGMENT => "Segment",
        INFO => "Info",
        TIMECODE_SCALE => "TimecodeScale",
        MUXING_APP => "MuxingApp",
        WRITING_APP => "WritingApp",
        DURATION => "Duration",
        TRACKS => "Tracks",
        TRACK_ENTRY => "TrackEntry",
        TRACK_NUMBER => "TrackNumber",
        TRACK_UID => "TrackUID",
        FLAG_LACING => "FlagLacing",
        LANGUAGE => "Language",
        CODEC_ID => "CodecID",
        CODEC_NAME => "CodecName",
        TRACK_TYPE => "TrackType",
        VIDEO => "Video",
        PIXEL_WIDTH => "PixelWidth",
        PIXEL_HEIGHT => "PixelHeight",
        CLUSTER => "Cluster",
        TIMECODE => "Timecode",
        SIMPLE_BLOCK => "SimpleBlock",
        _ => return None,
    };
    Some(name)
}

/// Natural big-endian bytes of an element id
pub fn id_bytes(id: u32) -> Vec<u8> {
    let skip = (id.leading_zeros() as usize / 8).min(3);
    id.to_be_bytes()[skip..].to_vec()
}

/// Width in bytes of the id starting with `first`, from its leading zero bits
pub fn id_len(first: u8) -> Option<usize> {
    match first.leading_zeros() {
        n @ 0..=3 => Some(n as usize + 1),
        _ => None,
    }
}
