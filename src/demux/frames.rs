//! Frame demuxing: turns a Cluster's blocks into per-track `FrameRecord`s,
//! bundling every laced subframe of one Block/BlockGroup into a single
//! record instead of yielding one record per subframe.

use crate::base::VInt64;
use crate::functional::Decode;
use crate::frame::ClusterBlock;
use crate::lacer::Lacer;
use crate::master::BlockGroup;
use std::collections::VecDeque;

/// Additional binary data attached to a frame via BlockAdditions, e.g. alpha
/// channel or depth data for the corresponding primary frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAdditionalData {
    /// Identifies how to interpret `data`; 1 means "same codec as the primary frame".
    pub add_id: u64,
    /// The additional binary payload.
    pub data: Vec<u8>,
}

/// One demuxed frame (or laced group of subframes sharing a timestamp), ready
/// for a track's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    /// Track number this record belongs to.
    pub track_number: u64,
    /// Absolute timestamp, in nanoseconds.
    pub timestamp: u64,
    /// Duration, in nanoseconds, if known (BlockGroup only).
    pub duration: Option<u64>,
    /// Whether this is (or begins with) a keyframe.
    pub is_keyframe: bool,
    /// Whether the frame is invisible (e.g. for subtitle tracks).
    pub is_invisible: bool,
    /// Whether the frame is discardable without affecting later decode.
    pub is_discardable: bool,
    /// Subframe payloads, in lace order. A single-subframe block has exactly one entry.
    pub data: Vec<Vec<u8>>,
    /// BlockAdditions attached to this record, if any.
    pub additions: Vec<BlockAdditionalData>,
}

/// A bounded per-track queue of demuxed frames.
#[derive(Debug, Default)]
pub struct FrameQueue {
    records: VecDeque<FrameRecord>,
    max_depth: usize,
}

impl FrameQueue {
    /// Creates a queue with the given maximum depth (0 means unbounded).
    pub fn new(max_depth: usize) -> Self {
        FrameQueue {
            records: VecDeque::new(),
            max_depth,
        }
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the queue holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the queue is at (or past) its configured maximum depth.
    pub fn is_full(&self) -> bool {
        self.max_depth != 0 && self.records.len() >= self.max_depth
    }

    /// Appends a record, refusing if the queue is already full.
    pub fn push(&mut self, record: FrameRecord) -> crate::Result<()> {
        if self.is_full() {
            return Err(crate::Error::BackpressureStall);
        }
        self.records.push_back(record);
        Ok(())
    }

    /// Removes and returns the oldest queued record.
    pub fn pop(&mut self) -> Option<FrameRecord> {
        self.records.pop_front()
    }

    /// Returns the oldest queued record without removing it.
    pub fn front(&self) -> Option<&FrameRecord> {
        self.records.front()
    }

    /// Returns the most recently pushed record, mutably, for duration back-patching.
    pub fn back_mut(&mut self) -> Option<&mut FrameRecord> {
        self.records.back_mut()
    }

    /// Drops every queued record strictly before `timestamp_ns`, keeping frames whose
    /// timestamp equals it.
    pub fn drop_before(&mut self, timestamp_ns: u64) {
        while let Some(front) = self.records.front() {
            if front.timestamp < timestamp_ns {
                self.records.pop_front();
            } else {
                break;
            }
        }
    }

    /// Discards every queued record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Builds the `FrameRecord`s produced by a single Block/BlockGroup, using the same relative
/// timestamp + flag + lacing parsing as `frame.rs`'s `Frame` iterator, but keeping every
/// subframe of a laced block together in one record rather than splitting them apart.
///
/// `default_duration` is consulted only when the block carries no `BlockDuration` (every
/// SimpleBlock, and a BlockGroup that omits it): the record's duration then becomes the
/// owning track's default duration, multiplied by the subframe count for a laced block.
pub fn build_frame_records<F>(
    block: &ClusterBlock,
    cluster_ts_ns: u64,
    timescale: u64,
    default_duration: F,
) -> crate::Result<FrameRecord>
where
    F: FnOnce(u64) -> Option<u64>,
{
    match block {
        ClusterBlock::Simple(simple) => build_from_bytes(simple, cluster_ts_ns, timescale, None, default_duration),
        ClusterBlock::Group(group) => {
            build_from_bytes(&group.block, cluster_ts_ns, timescale, Some(group), default_duration)
        }
    }
}

fn build_from_bytes<F>(
    raw: &[u8],
    cluster_ts_ns: u64,
    timescale: u64,
    group: Option<&BlockGroup>,
    default_duration: F,
) -> crate::Result<FrameRecord>
where
    F: FnOnce(u64) -> Option<u64>,
{
    let body_buf = &mut &raw[..];
    let track_number = VInt64::decode(body_buf)?;
    let relative_timestamp = i16::decode(body_buf)?;
    let flag = u8::decode(body_buf)?;
    let data = *body_buf;

    let lacing = (flag >> 1) & 0x03;
    let subframes: Vec<Vec<u8>> = match lacing {
        0 => vec![data.to_vec()],
        0b01 => Lacer::Xiph.delace(data)?.into_iter().map(|d| d.to_vec()).collect(),
        0b11 => Lacer::Ebml.delace(data)?.into_iter().map(|d| d.to_vec()).collect(),
        _ => Lacer::FixedSize.delace(data)?.into_iter().map(|d| d.to_vec()).collect(),
    };

    let timestamp = (cluster_ts_ns as i64 + relative_timestamp as i64 * timescale as i64).max(0) as u64;

    let (is_keyframe, is_discardable, duration_from_block, additions) = match group {
        None => ((flag & 0x80) != 0, (flag & 0x01) != 0, None, Vec::new()),
        Some(g) => {
            let duration = g
                .block_duration
                .as_ref()
                .map(|d| d.0.saturating_mul(timescale));
            let additions = g
                .block_additions
                .as_ref()
                .map(|adds| {
                    adds.block_more
                        .iter()
                        .map(|more| BlockAdditionalData {
                            add_id: *more.block_add_id,
                            data: more.block_additional.0.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            (g.reference_block.is_empty(), false, duration, additions)
        }
    };

    let duration = duration_from_block.or_else(|| {
        default_duration(*track_number).map(|default| {
            if subframes.len() > 1 {
                default.saturating_mul(subframes.len() as u64)
            } else {
                default
            }
        })
    });

    Ok(FrameRecord {
        track_number: *track_number,
        timestamp,
        duration,
        is_keyframe,
        is_invisible: (flag & 0x08) != 0,
        is_discardable,
        data: subframes,
        additions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::VInt64;
    use crate::functional::Encode;
    use crate::leaf::{BlockAddId, BlockAdditional, BlockDuration, ReferencePriority, SimpleBlock};
    use crate::master::{BlockAdditions, BlockMore};

    fn simple_block_bytes(track: u64, rel_ts: i16, flag: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        VInt64::new(track).encode(&mut buf).unwrap();
        rel_ts.encode(&mut buf).unwrap();
        flag.encode(&mut buf).unwrap();
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn simple_block_becomes_one_record_without_duration() {
        let bytes = simple_block_bytes(5, 10, 0x80, b"hello");
        let block = ClusterBlock::Simple(SimpleBlock(bytes));
        let record = build_frame_records(&block, 1_000_000_000, 1_000_000, |_| None).unwrap();
        assert_eq!(record.track_number, 5);
        assert_eq!(record.data, vec![b"hello".to_vec()]);
        assert!(record.is_keyframe);
        assert!(record.duration.is_none());
        assert_eq!(record.timestamp, 1_000_000_000 + 10 * 1_000_000);
    }

    #[test]
    fn simple_block_falls_back_to_the_track_default_duration() {
        let bytes = simple_block_bytes(5, 0, 0x80, b"hello");
        let block = ClusterBlock::Simple(SimpleBlock(bytes));
        let record = build_frame_records(&block, 0, 1_000_000, |track| {
            assert_eq!(track, 5);
            Some(23_220_000)
        })
        .unwrap();
        assert_eq!(record.duration, Some(23_220_000));
    }

    #[test]
    fn block_group_captures_duration_and_additions() {
        let bytes = simple_block_bytes(2, 0, 0x00, b"frame");
        let group = BlockGroup {
            crc32: None,
            void: None,
            block: crate::leaf::Block(bytes),
            block_additions: Some(BlockAdditions {
                crc32: None,
                void: None,
                block_more: vec![BlockMore {
                    crc32: None,
                    void: None,
                    block_additional: BlockAdditional(vec![1, 2, 3]),
                    block_add_id: BlockAddId(1),
                }],
            }),
            block_duration: Some(BlockDuration(40)),
            reference_priority: ReferencePriority(0),
            reference_block: vec![],
            codec_state: None,
            discard_padding: None,
        };
        let block = ClusterBlock::Group(group);
        let record = build_frame_records(&block, 0, 1_000_000, |_| Some(99)).unwrap();
        // an explicit BlockDuration always wins over the track's default duration
        assert_eq!(record.duration, Some(40_000_000));
        assert!(record.is_keyframe);
        assert_eq!(record.additions.len(), 1);
        assert_eq!(record.additions[0].add_id, 1);
        assert_eq!(record.additions[0].data, vec![1, 2, 3]);
    }

    #[test]
    fn queue_enforces_backpressure() {
        let mut queue = FrameQueue::new(1);
        let record = FrameRecord {
            track_number: 1,
            timestamp: 0,
            duration: None,
            is_keyframe: true,
            is_invisible: false,
            is_discardable: false,
            data: vec![vec![0]],
            additions: vec![],
        };
        queue.push(record.clone()).unwrap();
        assert!(queue.push(record).is_err());
    }
}
