//! A streaming Matroska demuxing facade built over the element catalog in
//! `base`/`leaf`/`master`: resolves metaseek information, indexes clusters,
//! projects chapters/tags/attachments into lookup-friendly shapes, and
//! delivers per-track frames from a seekable byte source.

mod attachments;
mod chapters;
mod cluster_index;
mod frames;
mod scanner;

pub use attachments::{read_attachment, Attachment};
pub use chapters::{fix_chapter_end_times, ChapterDisplayInfo, ChapterInfo, EditionInfo};
pub use cluster_index::{ClusterEntry, ClusterIndex};
pub use frames::{BlockAdditionalData, FrameQueue, FrameRecord};
pub use scanner::{MetaSeekResolver, DEFAULT_RESCUE_WINDOW};
pub use tags::{SimpleTagInfo, TagRecord, TagStore};

mod tags;

use crate::base::Header;
use crate::element::Element;
use crate::io::blocking_impl::ReadFrom;
use crate::leaf::TrackType;
use crate::master::{Cluster, Ebml, Segment, Tracks};
use scanner::scan_segment;
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

/// A source a `MatroskaParser` reads from: any reader that can also seek, plus a cached
/// length so callers don't need to seek-probe it themselves.
pub trait ByteSource: Read + Seek {
    /// Total length, in bytes, of the source.
    fn len(&mut self) -> crate::Result<u64> {
        let saved = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(saved))?;
        Ok(len)
    }
}
impl<T: Read + Seek> ByteSource for T {}

/// The broad category of a track, derived from its raw `TrackType` code.
#[derive(Debug, Clone, Copy)]
pub enum TrackKind {
    Video,
    Audio,
    Complex,
    Logo,
    Subtitle,
    Buttons,
    Control,
    Other(u64),
}

impl From<&TrackType> for TrackKind {
    fn from(t: &TrackType) -> Self {
        match t.0 {
            1 => TrackKind::Video,
            2 => TrackKind::Audio,
            3 => TrackKind::Complex,
            0x10 => TrackKind::Logo,
            0x11 => TrackKind::Subtitle,
            0x12 => TrackKind::Buttons,
            0x20 => TrackKind::Control,
            other => TrackKind::Other(other),
        }
    }
}

/// Audio-specific parameters of a track. `average_bytes_per_second` is deliberately omitted:
/// no element in the catalog backs it (Matroska never standardized one), so there is nothing
/// honest to report here.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAudioInfo {
    pub channels: u64,
    pub sampling_frequency: f64,
    pub output_sampling_frequency: Option<f64>,
    pub bit_depth: Option<u64>,
}

/// A single track's facade-shaped metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub track_number: u64,
    pub track_uid: u64,
    pub kind: TrackKind,
    pub enabled: bool,
    pub default: bool,
    pub forced: bool,
    pub lacing: bool,
    pub default_duration_ns: Option<u64>,
    pub name: Option<String>,
    pub language: String,
    pub codec_id: String,
    pub codec_private: Option<Vec<u8>>,
    pub audio: Option<TrackAudioInfo>,
}

fn build_track_info(tracks: &Tracks) -> Vec<TrackInfo> {
    tracks
        .track_entry
        .iter()
        .map(|t| TrackInfo {
            track_number: *t.track_number,
            track_uid: *t.track_uid,
            kind: TrackKind::from(&t.track_type),
            enabled: *t.flag_enabled != 0,
            default: *t.flag_default != 0,
            forced: *t.flag_forced != 0,
            lacing: *t.flag_lacing != 0,
            default_duration_ns: t.default_duration.as_ref().map(|d| d.0),
            name: t.track_name.as_ref().map(|n| n.0.clone()),
            language: t.track_language.0.clone(),
            codec_id: t.track_codec_id.0.clone(),
            codec_private: t.track_codec_private.as_ref().map(|p| p.0.clone()),
            audio: t.track_audio.as_ref().map(|a| TrackAudioInfo {
                channels: *a.channels,
                sampling_frequency: *a.sampling_frequency,
                output_sampling_frequency: a.output_sampling_frequency.as_ref().map(|f| f.0),
                bit_depth: a.bit_depth.as_ref().map(|b| b.0),
            }),
        })
        .collect()
}

/// What phase of parsing a `MatroskaParser` is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserPhase {
    /// `open` has not yet been called.
    Unopened,
    /// The EBML header and Segment metadata have been parsed; streaming has not started.
    Opened,
    /// Clusters are being streamed via `fill_queue`/`read_single_frame`.
    Streaming,
    /// No more clusters remain.
    Eof,
}

/// A streaming Matroska parser/demuxer, reading from an owned `ByteSource`.
pub struct MatroskaParser<S> {
    source: S,
    phase: ParserPhase,
    ebml: Option<Ebml>,
    timestamp_scale: u64,
    duration_ns: u64,
    segment_data_position: u64,
    cluster_index: ClusterIndex,
    tracks: Vec<TrackInfo>,
    enabled_tracks: HashMap<u64, bool>,
    editions: Vec<EditionInfo>,
    tag_store: TagStore,
    attachments: Vec<Attachment>,
    queues: HashMap<u64, FrameQueue>,
    max_queue_depth: usize,
    file_size: u64,
    /// Index into `editions[0].chapters` selected by `set_sub_song`, rebasing `duration`
    /// and `seek` to that chapter's time window. `None` means the full file.
    current_chapter: Option<usize>,
}

impl<S: ByteSource> MatroskaParser<S> {
    /// Wraps a source, ready for `parse`.
    pub fn new(source: S) -> Self {
        MatroskaParser {
            source,
            phase: ParserPhase::Unopened,
            ebml: None,
            timestamp_scale: 1_000_000,
            duration_ns: 0,
            segment_data_position: 0,
            cluster_index: ClusterIndex::new(),
            tracks: Vec::new(),
            enabled_tracks: HashMap::new(),
            editions: Vec::new(),
            tag_store: TagStore::default(),
            attachments: Vec::new(),
            queues: HashMap::new(),
            max_queue_depth: 32,
            file_size: 0,
            current_chapter: None,
        }
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> ParserPhase {
        self.phase
    }

    /// Parses the EBML header and Segment metadata (tracks, chapters, tags, attachments,
    /// metaseek), without reading any cluster.
    pub fn parse(&mut self) -> crate::Result<()> {
        self.source.seek(SeekFrom::Start(0))?;
        let ebml = Ebml::read_from(&mut self.source)?;

        let segment_header = Header::read_from(&mut self.source)?;
        if segment_header.id != Segment::ID {
            return Err(crate::Error::UnsupportedFormat);
        }

        let scanned = scan_segment(&mut self.source, &segment_header)?;

        self.timestamp_scale = *scanned.info.timestamp_scale;
        self.duration_ns = scanned
            .info
            .duration
            .as_ref()
            .map(|d| (d.0 * self.timestamp_scale as f64) as u64)
            .unwrap_or(0);
        self.segment_data_position = scanned.segment_data_position;

        if let Some(tracks) = &scanned.tracks {
            self.tracks = build_track_info(tracks);
            for t in &self.tracks {
                self.enabled_tracks.insert(t.track_number, t.enabled);
                self.queues
                    .insert(t.track_number, FrameQueue::new(self.max_queue_depth));
            }
        }

        let mut editions = scanned
            .chapters
            .as_ref()
            .map(chapters::build_editions)
            .unwrap_or_default();
        for edition in &mut editions {
            chapters::fix_chapter_end_times(&mut edition.chapters, self.duration_ns);
        }

        let mut all_tags = scanned.tags;
        let attachments = scanned.attachments;
        let chapters_seen = scanned.chapters.is_some();

        if !scanned.seek_head.is_empty() {
            let mut resolver = MetaSeekResolver::new(&mut self.source, self.segment_data_position);
            let result = resolver.resolve(&scanned.seek_head)?;
            for offset in result.cluster_offsets {
                self.cluster_index.ensure_entry(offset);
            }
            all_tags.extend(result.extra_tags);
            if !chapters_seen {
                if let Some(extra) = result.extra_chapters {
                    let mut more = chapters::build_editions(&extra);
                    for edition in &mut more {
                        chapters::fix_chapter_end_times(&mut edition.chapters, self.duration_ns);
                    }
                    editions.extend(more);
                }
            }
        }

        if all_tags.is_empty() {
            if let Some(offset) = scanner::find_tags_rescue(&mut self.source, DEFAULT_RESCUE_WINDOW)? {
                let saved = self.source.stream_position()?;
                self.source.seek(SeekFrom::Start(offset))?;
                if let Ok(header) = Header::read_from(&mut self.source) {
                    if header.id == crate::master::Tags::ID {
                        use crate::io::blocking_impl::ReadElement;
                        if let Ok(tags) = crate::master::Tags::read_element(&header, &mut self.source) {
                            log::info!("Recovered Tags element via tail scan at offset {offset}");
                            all_tags.push(tags);
                        }
                    }
                }
                self.source.seek(SeekFrom::Start(saved))?;
            }
        }

        self.tag_store = TagStore::from_tags(&all_tags);
        self.editions = editions;
        self.attachments = attachments;

        if scanned.first_cluster_position > 0 {
            self.cluster_index.ensure_entry(scanned.first_cluster_position);
        }

        self.file_size = self.source.len()?;
        self.ebml = Some(ebml);
        self.phase = ParserPhase::Opened;
        Ok(())
    }

    /// Segment duration, in nanoseconds, or 0 if the file didn't declare one. When a
    /// subsong is selected (see `set_sub_song`), returns that chapter's length instead.
    pub fn duration(&self) -> u64 {
        match self.current_chapter_window() {
            Some((start, end)) => end.saturating_sub(start),
            None => self.duration_ns,
        }
    }

    /// The timestamp scale, i.e. nanoseconds per Segment Tick.
    pub fn timestamp_scale(&self) -> u64 {
        self.timestamp_scale
    }

    /// All tracks found in the Segment.
    pub fn tracks(&self) -> &[TrackInfo] {
        &self.tracks
    }

    /// The first track matching `kind`, if any.
    pub fn first_track(&self, kind: TrackKind) -> Option<&TrackInfo> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of tracks of the given kind.
    pub fn track_count_of_kind(&self, kind: TrackKind) -> usize {
        self.tracks.iter().filter(|t| t.kind == kind).count()
    }

    /// The absolute track index of the `ordinal`-th track of `kind` (0-based within that
    /// kind), or `None` if there aren't that many.
    pub fn track_index(&self, kind: TrackKind, ordinal: usize) -> Option<usize> {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == kind)
            .nth(ordinal)
            .map(|(idx, _)| idx)
    }

    /// A track's default duration, in nanoseconds, scaled by the Segment's timestamp scale
    /// to match the legacy formula this facade preserves (see DESIGN.md). Returns 0 when
    /// the track declared no default duration or `idx` is out of range.
    pub fn track_duration(&self, idx: usize) -> u64 {
        self.tracks
            .get(idx)
            .and_then(|t| t.default_duration_ns)
            .map(|d| d.saturating_mul(self.timestamp_scale))
            .unwrap_or(0)
    }

    /// Enables or disables delivery of frames for a track. Disabled tracks are skipped during
    /// `fill_queue` without being queued.
    pub fn enable_track(&mut self, track_number: u64, enabled: bool) {
        self.enabled_tracks.insert(track_number, enabled);
    }

    /// Selects a chapter (by index into the default edition's top-level chapters) to rebase
    /// `duration` and `seek` against, for subsong playback. `None` restores full-file
    /// behaviour.
    pub fn set_sub_song(&mut self, chapter_index: Option<usize>) {
        self.current_chapter = chapter_index.filter(|&idx| {
            self.editions
                .first()
                .is_some_and(|e| idx < e.chapters.len())
        });
    }

    fn current_chapter_window(&self) -> Option<(u64, u64)> {
        let idx = self.current_chapter?;
        let chapter = self.editions.first()?.chapters.get(idx)?;
        Some((chapter.time_start, chapter.time_end))
    }

    /// Sets the maximum number of frames buffered per track before `fill_queue` signals
    /// backpressure.
    pub fn set_max_queue_depth(&mut self, depth: usize) {
        self.max_queue_depth = depth;
        for queue in self.queues.values_mut() {
            *queue = FrameQueue::new(depth);
        }
    }

    /// All editions (alternative chapter trees) found in the Segment.
    pub fn editions(&self) -> &[EditionInfo] {
        &self.editions
    }

    /// The tag store built from every Tags element found (including ones recovered via
    /// metaseek or the tail rescue scan).
    pub fn tags(&self) -> &TagStore {
        &self.tag_store
    }

    /// All attachments found, with their payloads left unread.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Reads one attachment's payload on demand.
    pub fn read_attachment(&mut self, attachment: &Attachment) -> crate::Result<Vec<u8>> {
        read_attachment(&mut self.source, attachment)
    }

    /// Whether no more clusters remain to be parsed.
    pub fn is_eof(&self) -> bool {
        self.phase == ParserPhase::Eof
    }

    /// Seeks to the cluster containing `target_ns` (rebased by the current subsong's start,
    /// if one is selected via `set_sub_song`), then drains every track queue of frames
    /// strictly before the target, pulling in clusters as needed. `samplerate_hint` is
    /// accepted for source-compatibility with the original API but is not used. Returns
    /// `true` iff at least one frame is demuxable at or after the target.
    pub fn seek(&mut self, target_ns: u64, _samplerate_hint: Option<u32>) -> crate::Result<bool> {
        if self.phase == ParserPhase::Unopened {
            return Err(crate::Error::UnsupportedFormat);
        }
        let rebased_target = match self.current_chapter_window() {
            Some((start, _)) => target_ns.saturating_add(start),
            None => target_ns,
        };

        let entry = self.cluster_index.find_cluster(
            rebased_target,
            self.timestamp_scale,
            self.duration_ns,
            &mut self.source,
        )?;
        self.source.seek(SeekFrom::Start(entry.file_offset))?;
        for queue in self.queues.values_mut() {
            queue.clear();
        }
        self.phase = ParserPhase::Streaming;
        self.skip_frames_until(rebased_target)
    }

    /// Drops queued frames strictly before `target_ns` from every track's queue, pulling in
    /// more clusters via `fill_queue` until some queue holds data at or after the target, or
    /// the stream is exhausted.
    fn skip_frames_until(&mut self, target_ns: u64) -> crate::Result<bool> {
        loop {
            let mut have_data = false;
            for queue in self.queues.values_mut() {
                queue.drop_before(target_ns);
                if !queue.is_empty() {
                    have_data = true;
                }
            }
            if have_data {
                return Ok(true);
            }
            match self.fill_queue() {
                Ok(true) => continue,
                Ok(false) => return Ok(false),
                // A full queue here means one of the enabled tracks we aren't draining
                // ate the depth budget; looping on fill_queue would spin forever, so
                // report "no data yet" instead of retrying indefinitely.
                Err(crate::Error::BackpressureStall) => return Ok(false),
                Err(e) => return Err(e),
            }
        }
    }

    /// Restarts streaming from the first cluster, clearing EOF and any subsong selection.
    pub fn restart(&mut self) -> crate::Result<bool> {
        self.phase = ParserPhase::Opened;
        self.current_chapter = None;
        self.seek(0, None)
    }

    /// Reads and decodes the next Cluster, distributing its frames into per-track queues.
    /// Returns `Ok(false)` once the stream is exhausted, or `Err(BackpressureStall)` without
    /// reading anything if an enabled track's queue is already at `max_queue_depth` — the
    /// caller must drain that queue before calling again.
    pub fn fill_queue(&mut self) -> crate::Result<bool> {
        if self.phase == ParserPhase::Eof {
            return Ok(false);
        }
        if self.max_queue_depth > 0 && self.any_enabled_queue_full() {
            return Err(crate::Error::BackpressureStall);
        }
        if self.phase == ParserPhase::Opened {
            if let Some(entry) = self.cluster_index.get(0) {
                self.source.seek(SeekFrom::Start(entry.file_offset))?;
            }
            self.phase = ParserPhase::Streaming;
        }

        let position = self.source.stream_position()?;
        let header = match Header::read_from(&mut self.source) {
            Ok(h) => h,
            Err(_) => {
                self.phase = ParserPhase::Eof;
                return Ok(false);
            }
        };
        if header.id != Cluster::ID {
            self.phase = ParserPhase::Eof;
            return Ok(false);
        }

        let ordinal = self.cluster_index.ensure_entry(position);

        use crate::io::blocking_impl::ReadElement;
        let cluster = match Cluster::read_element(&header, &mut self.source) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Discarding malformed Cluster at offset {position}: {e}");
                return self.fill_queue();
            }
        };
        let cluster_ts_ns = *cluster.timestamp * self.timestamp_scale;
        self.cluster_index.set_timecode(ordinal, cluster_ts_ns);

        let tracks = &self.tracks;
        for block in &cluster.blocks {
            let record = frames::build_frame_records(block, cluster_ts_ns, self.timestamp_scale, |track_number| {
                tracks
                    .iter()
                    .find(|t| t.track_number == track_number)
                    .and_then(|t| t.default_duration_ns)
            });
            match record {
                Ok(record) => {
                    if !*self.enabled_tracks.get(&record.track_number).unwrap_or(&true) {
                        continue;
                    }
                    let queue = self
                        .queues
                        .entry(record.track_number)
                        .or_insert_with(|| FrameQueue::new(self.max_queue_depth));
                    // back-patch the previous frame's still-unknown duration now that the
                    // next frame on this queue reveals the gap between them
                    if let Some(prev) = queue.back_mut() {
                        if prev.duration.is_none() || prev.duration == Some(0) {
                            prev.duration = Some(record.timestamp.saturating_sub(prev.timestamp));
                        }
                    }
                    if let Err(e) = queue.push(record) {
                        log::warn!("Dropping frame, track queue full: {e}");
                    }
                }
                Err(e) => {
                    log::warn!("Discarding malformed block in Cluster at offset {position}: {e}");
                }
            }
        }

        self.peek_next_cluster()?;
        Ok(true)
    }

    fn any_enabled_queue_full(&self) -> bool {
        self.enabled_tracks.iter().any(|(track_number, &enabled)| {
            enabled
                && self
                    .queues
                    .get(track_number)
                    .is_some_and(FrameQueue::is_full)
        })
    }

    fn peek_next_cluster(&mut self) -> crate::Result<()> {
        let position = self.source.stream_position()?;
        match Header::read_from(&mut self.source) {
            Ok(header) if header.id == Cluster::ID => {
                self.cluster_index.ensure_entry(position);
            }
            _ => {}
        }
        self.source.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    /// Pops the oldest queued frame for `track_number`, pulling in more clusters via
    /// `fill_queue` as needed until a frame is available or the stream is exhausted. A
    /// `BackpressureStall` from `fill_queue` (the caller hasn't drained some other track)
    /// surfaces here as `Ok(None)` too, matching the original API's "no frame yet" signal
    /// rather than propagating it as a hard failure.
    pub fn read_single_frame(&mut self, track_number: u64) -> crate::Result<Option<FrameRecord>> {
        loop {
            if let Some(queue) = self.queues.get_mut(&track_number) {
                if let Some(record) = queue.pop() {
                    return Ok(Some(record));
                }
            }
            match self.fill_queue() {
                Ok(true) => continue,
                Ok(false) => return Ok(None),
                Err(crate::Error::BackpressureStall) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }

    /// Average bitrate of the whole file, in kilobits per second, derived from file size and
    /// Segment duration. Deliberately reproduces the original tool's 1024-vs-1000 asymmetry
    /// (file size divided in KiB, duration in seconds, scaled by 8) bit-for-bit rather than
    /// a cleaner unit-consistent formula: existing callers compare against this exact value.
    /// Returns `None` if the duration is unknown.
    pub fn avg_bitrate(&self) -> Option<i32> {
        if self.duration_ns == 0 {
            return None;
        }
        let kib = self.file_size as f64 / 1024.0;
        let duration_secs = self.duration_ns as f64 / 1_000_000_000.0;
        Some((kib / duration_secs * 8.0) as i32)
    }
}

impl PartialEq for TrackKind {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && match (self, other) {
                (TrackKind::Other(a), TrackKind::Other(b)) => a == b,
                _ => true,
            }
    }
}
impl Eq for TrackKind {}
