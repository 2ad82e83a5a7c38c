//! Fixed WebM document skeleton: EBML header, segment info and the video track

use vp8mux_core::{ids, Cluster, Element, VideoInfo};

/// Nanoseconds per timecode unit; timecodes are in milliseconds
pub const TIMECODE_SCALE_NS: u64 = 1_000_000;

pub const DOC_TYPE: &str = "webm";
pub const CODEC_ID: &str = "V_VP8";
pub const CODEC_NAME: &str = "VP8";

const TRACK_TYPE_VIDEO: u64 = 1;

/// EBML header declaring a `webm` document
pub fn ebml_header() -> Element {
    Element::master(
        ids::EBML,
        vec![
            Element::uint(ids::EBML_VERSION, 1),
            Element::uint(ids::EBML_READ_VERSION, 1),
            Element::uint(ids::EBML_MAX_ID_LENGTH, 4),
            Element::uint(ids::EBML_MAX_SIZE_LENGTH, 8),
            Element::string(ids::DOC_TYPE, DOC_TYPE),
            Element::uint(ids::DOC_TYPE_VERSION, 2),
            Element::uint(ids::DOC_TYPE_READ_VERSION, 2),
        ],
    )
}

/// Segment Info with the total duration
pub fn segment_info(info: &VideoInfo, app_name: &str) -> Element {
    Element::master(
        ids::INFO,
        vec![
            Element::uint(ids::TIMECODE_SCALE, TIMECODE_SCALE_NS),
            Element::string(ids::MUXING_APP, app_name),
            Element::string(ids::WRITING_APP, app_name),
            Element::float(ids::DURATION, info.total_duration_ms),
        ],
    )
}

/// Tracks with the single VP8 video track
pub fn tracks(info: &VideoInfo) -> Element {
    let video = Element::master(
        ids::VIDEO,
        vec![
            Element::uint(ids::PIXEL_WIDTH, u64::from(info.width)),
            Element::uint(ids::PIXEL_HEIGHT, u64::from(info.height)),
        ],
    );
    let entry = Element::master(
        ids::TRACK_ENTRY,
        vec![
            Element::uint(ids::TRACK_NUMBER, vp8mux_core::cluster::VIDEO_TRACK_NUMBER),
            Element::uint(ids::TRACK_UID, 1),
            Element::uint(ids::FLAG_LACING, 0),
            Element::string(ids::LANGUAGE, "und"),
            Element::string(ids::CODEC_ID, CODEC_ID),
            Element::string(ids::CODEC_NAME, CODEC_NAME),
            Element::uint(ids::TRACK_TYPE, TRACK_TYPE_VIDEO),
            video,
        ],
    );
    Element::master(ids::TRACKS, vec![entry])
}

/// Builds the two top-level elements: EBML header and Segment.
///
/// Clusters follow Info and Tracks inside the Segment, in order.
pub fn build_document(info: &VideoInfo, clusters: &[Cluster], app_name: &str) -> [Element; 2] {
    let mut segment = Vec::with_capacity(clusters.len() + 2);
    segment.push(segment_info(info, app_name));
    segment.push(tracks(info));
    segment.extend(clusters.iter().map(Cluster::to_element));

    [ebml_header(), Element::master(ids::SEGMENT, segment)]
}
