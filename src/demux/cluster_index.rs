//! Cluster index: records where each Cluster lives in the file and supports
//! finding the cluster containing a given timecode via an affine estimate
//! refined by local interpolation.

use crate::base::Header;
use crate::io::blocking_impl::{ReadElement, ReadFrom};
use crate::leaf::Timestamp;
use crate::master::Cluster;
use std::io::{Read, Seek, SeekFrom};

/// One known Cluster: its position in the index, its file offset, and (once
/// materialised) its absolute timecode in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterEntry {
    /// Position of this entry in the index, 0-based, in file order.
    pub ordinal: usize,
    /// Absolute byte offset of the Cluster element (its header, not its body).
    pub file_offset: u64,
    /// The Cluster's absolute timecode in nanoseconds, once known.
    pub timecode: Option<u64>,
}

/// An index of known cluster positions, built incrementally from metaseek
/// entries and/or sequential discovery during streaming.
#[derive(Debug, Default)]
pub struct ClusterIndex {
    entries: Vec<ClusterEntry>,
}

impl ClusterIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known clusters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no known clusters yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the known entries, in ordinal order.
    pub fn entries(&self) -> &[ClusterEntry] {
        &self.entries
    }

    pub(crate) fn get(&self, ordinal: usize) -> Option<ClusterEntry> {
        self.entries.get(ordinal).copied()
    }

    /// Registers a cluster at `file_offset`, appending it if it isn't already the last known
    /// entry. Entries must be pushed in increasing file-offset order.
    pub fn ensure_entry(&mut self, file_offset: u64) -> usize {
        if let Some(last) = self.entries.last() {
            if last.file_offset == file_offset {
                return last.ordinal;
            }
        }
        let ordinal = self.entries.len();
        self.entries.push(ClusterEntry {
            ordinal,
            file_offset,
            timecode: None,
        });
        ordinal
    }

    /// Overwrites the timecode of a known entry.
    pub fn set_timecode(&mut self, ordinal: usize, timecode_ns: u64) {
        if let Some(entry) = self.entries.get_mut(ordinal) {
            entry.timecode = Some(timecode_ns);
        }
    }

    /// Reads and caches the timecode of the cluster at `ordinal`, restoring the source's
    /// stream position afterwards.
    pub fn materialize<S: Read + Seek>(
        &mut self,
        ordinal: usize,
        source: &mut S,
        timescale: u64,
    ) -> crate::Result<u64> {
        if let Some(tc) = self.entries.get(ordinal).and_then(|e| e.timecode) {
            return Ok(tc);
        }
        let offset = self
            .entries
            .get(ordinal)
            .ok_or(crate::Error::NoClusterAtTimecode)?
            .file_offset;

        let saved = source.stream_position()?;
        source.seek(SeekFrom::Start(offset))?;
        let result = read_cluster_timecode(source, timescale);
        source.seek(SeekFrom::Start(saved))?;

        let tc = result?;
        self.entries[ordinal].timecode = Some(tc);
        Ok(tc)
    }

    /// Finds the cluster containing `target_ns`, refining an affine estimate (based on the
    /// ratio of `target_ns` to `duration_ns`) by materialising and comparing against the
    /// entry's immediate neighbours, moving monotonically towards the target.
    pub fn find_cluster<S: Read + Seek>(
        &mut self,
        target_ns: u64,
        timescale: u64,
        duration_ns: u64,
        source: &mut S,
    ) -> crate::Result<ClusterEntry> {
        let n = self.entries.len();
        if n == 0 {
            return Err(crate::Error::NoClusterAtTimecode);
        }
        if target_ns == 0 {
            self.materialize(0, source, timescale)?;
            return Ok(self.entries[0]);
        }

        let mut i: usize = if duration_ns == 0 {
            0
        } else {
            let guess = (n as f64 / duration_ns as f64) * target_ns as f64;
            (guess.floor() as i64).clamp(0, n as i64 - 1) as usize
        };

        let mut direction: Option<i8> = None;
        loop {
            let tc_i = self.materialize(i, source, timescale)?;
            let tc_im1 = if i > 0 {
                Some(self.materialize(i - 1, source, timescale)?)
            } else {
                None
            };
            let tc_ip1 = if i + 1 < n {
                Some(self.materialize(i + 1, source, timescale)?)
            } else {
                None
            };

            if tc_i == target_ns {
                return Ok(self.entries[i]);
            }
            if let Some(tm1) = tc_im1 {
                if tm1 == target_ns {
                    return Ok(self.entries[i - 1]);
                }
                if tm1 < target_ns && target_ns < tc_i {
                    return Ok(self.entries[i - 1]);
                }
            }
            if let Some(tp1) = tc_ip1 {
                if tc_i < target_ns && target_ns < tp1 {
                    return Ok(self.entries[i]);
                }
            }

            if let Some(tm1) = tc_im1 {
                if target_ns < tm1 && i > 0 && direction != Some(1) {
                    direction = Some(-1);
                    i -= 1;
                    continue;
                }
            }
            if let Some(tp1) = tc_ip1 {
                if target_ns > tp1 && i + 1 < n - 1 && direction != Some(-1) {
                    direction = Some(1);
                    i += 1;
                    continue;
                }
            }
            break;
        }

        if target_ns <= duration_ns {
            return Ok(self.entries[n - 1]);
        }
        Err(crate::Error::NoClusterAtTimecode)
    }
}

fn read_cluster_timecode<S: Read + Seek>(source: &mut S, timescale: u64) -> crate::Result<u64> {
    let header = Header::read_from(source)?;
    if header.id != Cluster::ID {
        return Err(crate::Error::ClusterTimecodeUnreadable);
    }
    read_cluster_timecode_body(source, &header, timescale)
}

/// Reads a cluster's Timestamp child given its already-consumed header, leaving the reader
/// positioned wherever it happens to land (callers that care about the position restore it
/// themselves).
pub(crate) fn read_cluster_timecode_body<S: Read + Seek>(
    source: &mut S,
    header: &Header,
    timescale: u64,
) -> crate::Result<u64> {
    if header.size.is_unknown {
        return Err(crate::Error::ClusterTimecodeUnreadable);
    }
    let body_end = source.stream_position()? + *header.size;
    loop {
        if source.stream_position()? >= body_end {
            return Err(crate::Error::ClusterTimecodeUnreadable);
        }
        let child = Header::read_from(source)?;
        if child.id == Timestamp::ID {
            let ts = Timestamp::read_element(&child, source)?;
            return Ok(ts.0.saturating_mul(timescale));
        }
        source.seek(SeekFrom::Current(*child.size as i64))?;
    }
}
