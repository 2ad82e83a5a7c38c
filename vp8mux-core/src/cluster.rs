//! Duration-bounded grouping of frames into clusters

use crate::block::{BlockFlags, SimpleBlock};
use crate::element::Element;
use crate::frame::DecodedFrame;
use crate::{ids, Result};
use std::ops::Range;
use tracing::debug;

/// A cluster closes once it has accumulated at least this much playback time
pub const CLUSTER_MAX_DURATION_MS: u64 = 30_000;

/// Track every block is written to
pub const VIDEO_TRACK_NUMBER: u64 = 1;

// Relative timecodes inside a cluster stay below the budget, so the budget
// must fit a SimpleBlock's signed 16-bit timecode.
const _: () = assert!(CLUSTER_MAX_DURATION_MS <= i16::MAX as u64);

/// A run of blocks sharing one base timecode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Absolute timecode of the cluster, in milliseconds
    pub timecode_ms: u64,
    /// Blocks in presentation order
    pub blocks: Vec<SimpleBlock>,
}

impl Cluster {
    /// Builds the Cluster element: Timecode followed by one SimpleBlock per frame
    pub fn to_element(&self) -> Element {
        let mut children = Vec::with_capacity(self.blocks.len() + 1);
        children.push(Element::uint(ids::TIMECODE, self.timecode_ms));
        children.extend(self.blocks.iter().map(SimpleBlock::to_element));
        Element::master(ids::CLUSTER, children)
    }
}

/// Splits frame indices into consecutive runs.
///
/// Each run takes at least one frame and closes as soon as its summed duration
/// reaches `max_duration_ms`; only the final run may fall short.
pub fn partition(frames: &[DecodedFrame], max_duration_ms: u64) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    while start < frames.len() {
        let mut end = start;
        let mut duration = 0u64;
        loop {
            duration += u64::from(frames[end].duration_ms);
            end += 1;
            if end >= frames.len() || duration >= max_duration_ms {
                break;
            }
        }
        runs.push(start..end);
        start = end;
    }
    runs
}

/// Groups frames into clusters of at most [`CLUSTER_MAX_DURATION_MS`]
pub fn cluster_frames(frames: &[DecodedFrame]) -> Result<Vec<Cluster>> {
    cluster_frames_with_limit(frames, CLUSTER_MAX_DURATION_MS)
}

/// Groups frames into clusters with a custom duration budget.
///
/// Every block is an unlaced keyframe on track 1, timed by the summed
/// durations of the frames before it in the same cluster.
pub fn cluster_frames_with_limit(
    frames: &[DecodedFrame],
    max_duration_ms: u64,
) -> Result<Vec<Cluster>> {
    let mut clusters = Vec::new();
    let mut cluster_timecode = 0u64;

    for run in partition(frames, max_duration_ms) {
        let mut relative = 0i64;
        let mut blocks = Vec::with_capacity(run.len());
        for frame in &frames[run.clone()] {
            blocks.push(SimpleBlock::new(
                VIDEO_TRACK_NUMBER,
                relative,
                BlockFlags::keyframe(),
                frame.vp8_payload.clone(),
            )?);
            relative += i64::from(frame.duration_ms);
        }

        debug!(
            timecode_ms = cluster_timecode,
            frames = run.len(),
            duration_ms = relative,
            "closed cluster"
        );
        clusters.push(Cluster {
            timecode_ms: cluster_timecode,
            blocks,
        });
        cluster_timecode += relative as u64;
    }

    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn frames(durations: &[u32]) -> Vec<DecodedFrame> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| DecodedFrame::new(16, 16, vec![i as u8], d))
            .collect()
    }

    #[test]
    fn test_single_short_cluster() {
        let clusters = cluster_frames(&frames(&[33, 33, 34])).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].timecode_ms, 0);
        let timecodes: Vec<i16> = clusters[0]
            .blocks
            .iter()
            .map(SimpleBlock::relative_timecode)
            .collect();
        assert_eq!(timecodes, vec![0, 33, 66]);
        assert!(clusters[0].blocks.iter().all(|b| b.flags() == BlockFlags::keyframe()));
        assert!(clusters[0].blocks.iter().all(|b| b.track_number() == 1));
    }

    #[test]
    fn test_clusters_close_at_budget() {
        // 100 frames of 1000ms: 30 + 30 + 30 + 10
        let input = frames(&[1000; 100]);
        let clusters = cluster_frames(&input).unwrap();
        let sizes: Vec<usize> = clusters.iter().map(|c| c.blocks.len()).collect();
        assert_eq!(sizes, vec![30, 30, 30, 10]);
        let starts: Vec<u64> = clusters.iter().map(|c| c.timecode_ms).collect();
        assert_eq!(starts, vec![0, 30_000, 60_000, 90_000]);

        // every frame appears exactly once, in input order
        let payloads: Vec<u8> = clusters
            .iter()
            .flat_map(|c| c.blocks.iter().map(|b| b.payload()[0]))
            .collect();
        assert_eq!(payloads, (0..100).collect::<Vec<u8>>());
    }

    #[test]
    fn test_cluster_count_bound() {
        for (n, d) in [(7usize, 4999u32), (45, 1000), (3, 32_767), (120, 333)] {
            let input = frames(&vec![d; n]);
            let runs = partition(&input, CLUSTER_MAX_DURATION_MS);
            let total = n as u64 * u64::from(d);
            assert!(runs.len() as u64 <= total.div_ceil(CLUSTER_MAX_DURATION_MS));
            for run in &runs[..runs.len() - 1] {
                let sum: u64 = input[run.clone()].iter().map(|f| u64::from(f.duration_ms)).sum();
                assert!(sum >= CLUSTER_MAX_DURATION_MS);
            }
            assert_eq!(runs.iter().map(|r| r.len()).sum::<usize>(), n);
        }
    }

    #[test]
    fn test_oversized_frame_still_progresses() {
        let runs = partition(&frames(&[32_767, 10, 32_767]), CLUSTER_MAX_DURATION_MS);
        assert_eq!(runs, vec![0..1, 1..3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_frames(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_budget_above_block_range_is_rejected() {
        assert!(cluster_frames_with_limit(&frames(&[20_000, 20_000]), 60_000).is_ok());
        let err = cluster_frames_with_limit(&frames(&[20_000, 20_000, 1]), 60_000).unwrap_err();
        assert!(matches!(err, Error::TimecodeOverflow(40_000)));
    }

    #[test]
    fn test_cluster_element() {
        let clusters = cluster_frames(&frames(&[40, 40])).unwrap();
        let element = clusters[0].to_element();
        assert_eq!(element.id(), ids::CLUSTER);
        assert_eq!(element.children()[0], Element::uint(ids::TIMECODE, 0));
        assert_eq!(element.find_all(ids::SIMPLE_BLOCK).count(), 2);
    }
}
