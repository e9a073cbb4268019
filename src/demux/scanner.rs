//! Segment scanning: the level-1 walk (extending `view::SegmentView`'s walk
//! with lazy attachment scanning), metaseek resolution, and a last-resort
//! Boyer–Moore scan for a Tags element that no SeekHead points to.

use crate::base::{Header, VInt64};
use crate::element::Element;
use crate::functional::Decode;
use crate::io::blocking_impl::{ReadElement, ReadFrom};
use crate::master::{Attachments, Chapters, Cluster, Cues, Info, SeekHead, Tags, Tracks};
use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom};

use super::attachments::{scan_attachments, Attachment};

/// The result of scanning a Segment's level-1 children, without loading any Cluster or
/// AttachedFile payload into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedSegment {
    pub seek_head: Vec<SeekHead>,
    pub info: Info,
    pub tracks: Option<Tracks>,
    pub cues: Option<Cues>,
    pub attachments: Vec<Attachment>,
    pub chapters: Option<Chapters>,
    pub tags: Vec<Tags>,
    pub first_cluster_position: u64,
    pub segment_data_position: u64,
    pub segment_size: Option<u64>,
}

/// Scans a Segment element (whose header has already been consumed) up to its first Cluster,
/// mirroring `SegmentView::new`'s walk but scanning attachments lazily.
pub fn scan_segment<R: Read + Seek>(reader: &mut R, segment_header: &Header) -> crate::Result<ScannedSegment> {
    let segment_data_position = reader.stream_position()?;
    let segment_size = if segment_header.size.is_unknown {
        None
    } else {
        Some(*segment_header.size)
    };

    let mut seek_head = Vec::new();
    let mut info = None;
    let mut tracks = None;
    let mut cues = None;
    let mut attachments = Vec::new();
    let mut chapters = None;
    let mut tags = Vec::new();
    let mut first_cluster_position = None;

    loop {
        let current_position = reader.stream_position()?;
        let header = match Header::read_from(reader) {
            Ok(h) => h,
            Err(_) => break,
        };

        match header.id {
            id if id == SeekHead::ID => seek_head.push(SeekHead::read_element(&header, reader)?),
            id if id == Info::ID => info = Some(Info::read_element(&header, reader)?),
            id if id == Tracks::ID => tracks = Some(Tracks::read_element(&header, reader)?),
            id if id == Cues::ID => cues = Some(Cues::read_element(&header, reader)?),
            id if id == Attachments::ID => {
                attachments = scan_attachments(reader, &header)?;
            }
            id if id == Chapters::ID => chapters = Some(Chapters::read_element(&header, reader)?),
            id if id == Tags::ID => tags.push(Tags::read_element(&header, reader)?),
            id if id == Cluster::ID => {
                if first_cluster_position.is_none() {
                    first_cluster_position = Some(current_position);
                }
                break;
            }
            _ => {
                log::warn!("Skipped unknown top-level element with ID: {}", header.id);
                reader.seek(SeekFrom::Current(*header.size as i64))?;
            }
        }
    }

    let info = info.ok_or(crate::Error::MissingElement(Info::ID))?;

    Ok(ScannedSegment {
        seek_head,
        info,
        tracks,
        cues,
        attachments,
        chapters,
        tags,
        first_cluster_position: first_cluster_position.unwrap_or(0),
        segment_data_position,
        segment_size,
    })
}

/// The outcome of resolving a Segment's metaseek information: known cluster offsets, plus
/// any additional Tags elements a `Seek` entry pointed to that the initial linear scan missed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaSeekResult {
    /// Absolute file offsets of every Cluster referenced by a Seek entry.
    pub cluster_offsets: Vec<u64>,
    /// Tags elements discovered only via a Seek entry (not present in the initial scan).
    pub extra_tags: Vec<Tags>,
    /// Chapters element discovered only via a Seek entry.
    pub extra_chapters: Option<Chapters>,
}

/// Resolves every `Seek` entry across one or more `SeekHead`s, recursively following
/// SeekHead-in-SeekHead references with a cycle guard.
pub struct MetaSeekResolver<'a, R> {
    reader: &'a mut R,
    segment_data_position: u64,
    visited: HashSet<u64>,
}

impl<'a, R: Read + Seek> MetaSeekResolver<'a, R> {
    pub fn new(reader: &'a mut R, segment_data_position: u64) -> Self {
        MetaSeekResolver {
            reader,
            segment_data_position,
            visited: HashSet::new(),
        }
    }

    pub fn resolve(&mut self, seek_heads: &[SeekHead]) -> crate::Result<MetaSeekResult> {
        let mut result = MetaSeekResult::default();
        let entries: Vec<_> = seek_heads.iter().flat_map(|sh| sh.seek.iter().cloned()).collect();
        self.resolve_entries(&entries, &mut result)?;
        Ok(result)
    }

    fn resolve_entries(
        &mut self,
        entries: &[crate::master::Seek],
        result: &mut MetaSeekResult,
    ) -> crate::Result<()> {
        for entry in entries {
            let offset = self.segment_data_position + *entry.seek_position;
            if !self.visited.insert(offset) {
                continue;
            }
            let id = VInt64::decode(&mut &entry.seek_id.0[..])?;

            if id == Cluster::ID {
                result.cluster_offsets.push(offset);
                continue;
            }

            let saved = self.reader.stream_position()?;
            self.reader.seek(SeekFrom::Start(offset))?;
            let header = match Header::read_from(self.reader) {
                Ok(h) => h,
                Err(_) => {
                    self.reader.seek(SeekFrom::Start(saved))?;
                    continue;
                }
            };

            if header.id == SeekHead::ID {
                let nested = SeekHead::read_element(&header, self.reader)?;
                self.reader.seek(SeekFrom::Start(saved))?;
                self.resolve_entries(&nested.seek, result)?;
                continue;
            }
            if header.id == Tags::ID {
                result.extra_tags.push(Tags::read_element(&header, self.reader)?);
            } else if header.id == Chapters::ID {
                result.extra_chapters = Some(Chapters::read_element(&header, self.reader)?);
            }
            self.reader.seek(SeekFrom::Start(saved))?;
        }
        Ok(())
    }
}

/// Default size of the trailing window searched by [`find_tags_rescue`], in bytes.
pub const DEFAULT_RESCUE_WINDOW: u64 = 64 * 1024;

/// Scans the last `window` bytes of the source for a byte sequence matching the encoded
/// Tags element ID, for files where no SeekHead entry locates it and it wasn't reached by
/// the initial linear scan (e.g. a Tags element appended after the last Cluster).
pub fn find_tags_rescue<R: Read + Seek>(reader: &mut R, window: u64) -> crate::Result<Option<u64>> {
    let saved = reader.stream_position()?;
    let len = reader.seek(SeekFrom::End(0))?;
    let start = len.saturating_sub(window);
    reader.seek(SeekFrom::Start(start))?;

    let mut buf = vec![0u8; (len - start) as usize];
    reader.read_exact(&mut buf)?;
    reader.seek(SeekFrom::Start(saved))?;

    let pattern = encoded_id_bytes(Tags::ID);
    Ok(boyer_moore_search(&buf, &pattern).map(|pos| start + pos as u64))
}

fn encoded_id_bytes(id: VInt64) -> Vec<u8> {
    let encoded = id.as_encoded();
    let size = VInt64::encode_size(*id);
    encoded.to_be_bytes()[8 - size..].to_vec()
}

/// A minimal Boyer–Moore–Horspool search, sufficient for the short (1-4 byte) patterns
/// this module searches for.
fn boyer_moore_search(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return None;
    }
    let m = pattern.len();
    let mut shift = [m; 256];
    for (i, &b) in pattern.iter().enumerate().take(m - 1) {
        shift[b as usize] = m - 1 - i;
    }

    let mut i = 0usize;
    while i + m <= haystack.len() {
        let mut j = m;
        while j > 0 && haystack[i + j - 1] == pattern[j - 1] {
            j -= 1;
        }
        if j == 0 {
            return Some(i);
        }
        let last = haystack[i + m - 1];
        i += shift[last as usize];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boyer_moore_finds_pattern_near_end() {
        let mut haystack = vec![0u8; 100];
        haystack.extend_from_slice(&[0x12, 0x54, 0xC3, 0x67]);
        haystack.extend_from_slice(&[0xAA; 10]);
        let found = boyer_moore_search(&haystack, &[0x12, 0x54, 0xC3, 0x67]);
        assert_eq!(found, Some(100));
    }

    #[test]
    fn boyer_moore_returns_none_when_absent() {
        let haystack = vec![0u8; 50];
        assert_eq!(boyer_moore_search(&haystack, &[0x12, 0x54, 0xC3, 0x67]), None);
    }

    #[test]
    fn encoded_id_bytes_matches_tags_id() {
        let bytes = encoded_id_bytes(Tags::ID);
        assert_eq!(bytes, vec![0x12, 0x54, 0xC3, 0x67]);
    }
}
