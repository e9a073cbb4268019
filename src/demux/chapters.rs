//! Edition/chapter post-processing: projects the `Chapters` element tree into a
//! facade-shaped `EditionInfo`/`ChapterInfo` tree and infers missing end times.

use crate::master::{ChapterAtom, Chapters, EditionEntry};

/// One display string for a chapter, in a given language/country.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterDisplayInfo {
    /// The string to display.
    pub string: String,
    /// Language of the display string.
    pub language: String,
    /// Country of the display string, if given.
    pub country: Option<String>,
}

/// A single chapter, possibly with nested sub-chapters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterInfo {
    /// Unique ID of the chapter.
    pub chapter_uid: u64,
    /// Start time of the chapter, in nanoseconds.
    pub time_start: u64,
    /// End time of the chapter, in nanoseconds. May be inferred by [`fix_chapter_end_times`].
    pub time_end: u64,
    /// Whether the chapter is hidden from a user interface.
    pub hidden: bool,
    /// Whether the chapter can be used for navigation.
    pub enabled: bool,
    /// Track numbers this chapter applies to; empty means all tracks.
    pub tracks: Vec<u64>,
    /// Display strings, one per language/country combination the file provides.
    pub display: Vec<ChapterDisplayInfo>,
    /// Nested sub-chapters, in file order.
    pub children: Vec<ChapterInfo>,
}

/// One edition: an alternative, self-contained chapter tree for the Segment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditionInfo {
    /// Unique ID of the edition, 0 if the file didn't assign one.
    pub edition_uid: u64,
    /// Whether this is the default edition to use.
    pub default: bool,
    /// Whether chapters in this edition are ordered and meant to be played in sequence.
    pub ordered: bool,
    /// Top-level chapters of this edition, in file order.
    pub chapters: Vec<ChapterInfo>,
}

fn build_chapter(atom: &ChapterAtom) -> ChapterInfo {
    ChapterInfo {
        chapter_uid: *atom.chapter_uid,
        time_start: *atom.chapter_time_start,
        time_end: *atom.chapter_time_end,
        hidden: *atom.chapter_flag_hidden != 0,
        enabled: *atom.chapter_flag_enabled != 0,
        tracks: atom
            .chapter_track
            .as_ref()
            .map(|t| t.chapter_track_number.iter().map(|n| n.0).collect())
            .unwrap_or_default(),
        display: atom
            .chapter_display
            .iter()
            .map(|d| ChapterDisplayInfo {
                string: d.chapter_string.0.clone(),
                language: d.chapter_language.0.clone(),
                country: d.chapter_country.as_ref().map(|c| c.0.clone()),
            })
            .collect(),
        children: atom.chapter_atom.iter().map(build_chapter).collect(),
    }
}

/// Projects a `Chapters` element tree into a list of editions.
pub fn build_editions(chapters: &Chapters) -> Vec<EditionInfo> {
    chapters
        .edition_entry
        .iter()
        .map(build_edition)
        .collect()
}

fn build_edition(entry: &EditionEntry) -> EditionInfo {
    EditionInfo {
        edition_uid: entry.edition_uid.map(|u| *u).unwrap_or(0),
        default: *entry.edition_flag_default != 0,
        ordered: *entry.edition_flag_ordered != 0,
        chapters: entry.chapter_atom.iter().map(build_chapter).collect(),
    }
}

/// Infers a 0-valued `time_end` on every top-level chapter of `edition` from its next
/// sibling's start time, or `file_duration_ns` for the last chapter. Does not recurse into
/// sub-chapters: a ChapterAtom's own children are independent of its siblings' timing.
///
/// If the last chapter's end time is still equal to its start time after inference (a
/// zero-length trailing chapter), it is stretched to `file_duration_ns` as well.
pub fn fix_chapter_end_times(chapters: &mut [ChapterInfo], file_duration_ns: u64) {
    let n = chapters.len();
    for i in 0..n {
        if chapters[i].time_end == 0 {
            chapters[i].time_end = if i + 1 < n {
                chapters[i + 1].time_start
            } else {
                file_duration_ns
            };
        }
    }
    if let Some(last) = chapters.last_mut() {
        if last.time_end == last.time_start {
            last.time_end = file_duration_ns;
        }
    }
}
