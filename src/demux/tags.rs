//! Tag store: projects `Tags`/`Tag`/`SimpleTagElement` into a lookup-friendly
//! set of `TagRecord`s, keyed by the UIDs in their `Targets`.

use crate::master::Tags;

/// A single name/value pair attached to a `TagRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTagInfo {
    /// Name of the tag, upper-cased on ingestion (per the Matroska tagging convention).
    pub name: String,
    /// Value of the tag.
    pub value: String,
    /// Language of the value.
    pub language: String,
    /// Whether this is the default/original-language value for the name.
    pub default: bool,
    pub(crate) removal_pending: bool,
}

/// One `Tag` element: a set of simple tags attached to one or more targets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagRecord {
    /// General type of target, e.g. 50 = Album, 30 = Track.
    pub target_type_value: u64,
    /// Informational name of the target type.
    pub target_type: Option<String>,
    /// Track UIDs this record targets.
    pub track_uids: Vec<u64>,
    /// Edition UIDs this record targets.
    pub edition_uids: Vec<u64>,
    /// Chapter UIDs this record targets.
    pub chapter_uids: Vec<u64>,
    /// Attachment UIDs this record targets.
    pub attachment_uids: Vec<u64>,
    /// The simple tags attached to this target set.
    pub simple_tags: Vec<SimpleTagInfo>,
}

impl TagRecord {
    /// Sets the value of the `index`-th simple tag matching `name` (case-insensitively),
    /// clearing its removal-pending flag. Appends a new simple tag if `index` is out of
    /// range or no existing tag matches.
    pub fn set_tag_value(&mut self, name: &str, value: &str, index: usize) {
        let matching: Vec<usize> = self
            .simple_tags
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name.eq_ignore_ascii_case(name))
            .map(|(i, _)| i)
            .collect();

        if let Some(&pos) = matching.get(index) {
            self.simple_tags[pos].value = value.to_string();
            self.simple_tags[pos].removal_pending = false;
        } else {
            self.simple_tags.push(SimpleTagInfo {
                name: name.to_ascii_uppercase(),
                value: value.to_string(),
                language: "und".to_string(),
                default: true,
                removal_pending: false,
            });
        }
    }

    /// Marks every simple tag in this record as pending removal.
    pub fn mark_all_as_removal_pending(&mut self) {
        for tag in &mut self.simple_tags {
            tag.removal_pending = true;
        }
    }

    /// Drops every simple tag still marked as pending removal.
    pub fn remove_marked_tags(&mut self) {
        self.simple_tags.retain(|t| !t.removal_pending);
    }
}

/// A queryable collection of `TagRecord`s, built from a Segment's `Tags` elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagStore {
    /// The underlying records, in file order.
    pub records: Vec<TagRecord>,
}

impl TagStore {
    /// Builds a `TagStore` from every `Tags` top-level element found in a Segment.
    pub fn from_tags(tags: &[Tags]) -> Self {
        let mut records = Vec::new();
        for group in tags {
            for tag in &group.tag {
                records.push(TagRecord {
                    target_type_value: *tag.targets.target_type_value,
                    target_type: tag.targets.target_type.as_ref().map(|t| t.0.clone()),
                    track_uids: tag.targets.tag_track_uid.iter().map(|u| u.0).collect(),
                    edition_uids: tag.targets.tag_edition_uid.iter().map(|u| u.0).collect(),
                    chapter_uids: tag.targets.tag_chapter_uid.iter().map(|u| u.0).collect(),
                    attachment_uids: tag.targets.tag_attachment_uid.iter().map(|u| u.0).collect(),
                    simple_tags: tag
                        .simple_tag_element
                        .iter()
                        .map(|s| SimpleTagInfo {
                            name: s.tag_name.0.to_ascii_uppercase(),
                            value: s
                                .tag_string
                                .as_ref()
                                .map(|v| v.0.clone())
                                .unwrap_or_default(),
                            language: s.tag_language.0.clone(),
                            default: *s.tag_default != 0,
                            removal_pending: false,
                        })
                        .collect(),
                });
            }
        }
        TagStore { records }
    }

    /// Finds the record whose only target is the given track UID.
    pub fn find_tag_with_track_uid(&self, track_uid: u64) -> Option<&TagRecord> {
        self.records.iter().find(|r| {
            r.track_uids.contains(&track_uid)
                && r.edition_uids.is_empty()
                && r.chapter_uids.is_empty()
                && r.attachment_uids.is_empty()
        })
    }

    /// Finds the record targeting the given edition UID (and, if given, track UID).
    pub fn find_tag_with_edition_uid(
        &self,
        edition_uid: u64,
        track_uid: Option<u64>,
    ) -> Option<&TagRecord> {
        self.records.iter().find(|r| {
            r.edition_uids.contains(&edition_uid)
                && track_uid.is_none_or(|t| r.track_uids.is_empty() || r.track_uids.contains(&t))
        })
    }

    /// Finds the record targeting the given chapter UID (and, if given, track UID).
    pub fn find_tag_with_chapter_uid(
        &self,
        chapter_uid: u64,
        track_uid: Option<u64>,
    ) -> Option<&TagRecord> {
        self.records.iter().find(|r| {
            r.chapter_uids.contains(&chapter_uid)
                && track_uid.is_none_or(|t| r.track_uids.is_empty() || r.track_uids.contains(&t))
        })
    }
}
