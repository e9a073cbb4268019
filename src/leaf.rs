//! Leaf elements in Matroska: the scalar element types that terminate the element tree.
//!
//! Rather than generating these from an external schema file at build time, they're declared
//! here with a small family of declarative macros, one per EBML primitive category.

use crate::base::*;
use crate::element::Element;
use crate::functional::*;

macro_rules! leaf_uint {
    ($(#[$meta:meta])* $name:ident = $id:expr) => {
        leaf_uint!($(#[$meta])* $name = $id, default = 0);
    };
    ($(#[$meta:meta])* $name:ident = $id:expr, default = $default:expr) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
        impl std::ops::Deref for $name {
            type Target = u64;
            fn deref(&self) -> &u64 {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let v = decode_uint(buf)?;
                buf.advance(buf.len());
                Ok(Self(v))
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                buf.append_slice(&encode_uint(self.0));
                Ok(())
            }
        }
    };
}

macro_rules! leaf_sint {
    ($(#[$meta:meta])* $name:ident = $id:expr) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub i64);
        impl std::ops::Deref for $name {
            type Target = i64;
            fn deref(&self) -> &i64 {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let v = decode_sint(buf)?;
                buf.advance(buf.len());
                Ok(Self(v))
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                buf.append_slice(&encode_sint(self.0));
                Ok(())
            }
        }
    };
}

macro_rules! leaf_float {
    ($(#[$meta:meta])* $name:ident = $id:expr) => {
        leaf_float!($(#[$meta])* $name = $id, default = 0.0);
    };
    ($(#[$meta:meta])* $name:ident = $id:expr, default = $default:expr) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
        pub struct $name(pub f64);
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
        impl std::ops::Deref for $name {
            type Target = f64;
            fn deref(&self) -> &f64 {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let v = decode_float(buf)?;
                buf.advance(buf.len());
                Ok(Self(v))
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                buf.append_slice(&self.0.to_be_bytes());
                Ok(())
            }
        }
    };
}

macro_rules! leaf_string {
    ($(#[$meta:meta])* $name:ident = $id:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub String);
        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let v = decode_string(buf)?;
                buf.advance(buf.len());
                Ok(Self(v))
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                buf.append_slice(self.0.as_bytes());
                Ok(())
            }
        }
    };
    ($(#[$meta:meta])* $name:ident = $id:expr, default = $default:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);
        impl Default for $name {
            fn default() -> Self {
                Self($default.to_string())
            }
        }
        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let v = decode_string(buf)?;
                buf.advance(buf.len());
                Ok(Self(v))
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                buf.append_slice(self.0.as_bytes());
                Ok(())
            }
        }
    };
}

macro_rules! leaf_binary {
    ($(#[$meta:meta])* $name:ident = $id:expr) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub Vec<u8>);
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}B)", stringify!($name), self.0.len())
            }
        }
        impl std::ops::Deref for $name {
            type Target = [u8];
            fn deref(&self) -> &[u8] {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let v = decode_binary(buf)?;
                buf.advance(buf.len());
                Ok(Self(v))
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                buf.append_slice(&self.0);
                Ok(())
            }
        }
    };
}

macro_rules! leaf_date {
    ($(#[$meta:meta])* $name:ident = $id:expr) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub i64);
        impl std::ops::Deref for $name {
            type Target = i64;
            fn deref(&self) -> &i64 {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let v = decode_date(buf)?;
                buf.advance(buf.len());
                Ok(Self(v))
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                buf.append_slice(&self.0.to_be_bytes());
                Ok(())
            }
        }
    };
}

// --- EBML header ---

leaf_uint!(
    /// Indicates the version of EBML used.
    EbmlVersion = 0x4286, default = 1
);
leaf_uint!(
    /// Indicates the minimum version of EBML required to read the file.
    EbmlReadVersion = 0x42F7, default = 1
);
leaf_uint!(
    /// Maximum length of an EBML ID, in bytes.
    EbmlMaxIdLength = 0x42F2, default = 4
);
leaf_uint!(
    /// Maximum length of an EBML element size, in bytes.
    EbmlMaxSizeLength = 0x42F3, default = 8
);
leaf_string!(
    /// Type of document, e.g. "matroska" or "webm".
    DocType = 0x4282, default = "matroska"
);
leaf_uint!(
    /// Version of the document type.
    DocTypeVersion = 0x4287, default = 1
);
leaf_uint!(
    /// Minimum version of the document type required to read the file.
    DocTypeReadVersion = 0x4285, default = 1
);

// --- SeekHead / Seek ---

leaf_binary!(
    /// The binary EBML ID of a Top-Level Element.
    SeekId = 0x53AB
);
leaf_uint!(
    /// The Segment Position of a Top-Level Element, relative to the Segment's payload start.
    SeekPosition = 0x53AC
);

// --- Info ---

leaf_binary!(
    /// A randomly generated unique ID identifying the Segment.
    SegmentUuid = 0x73A4
);
leaf_string!(
    /// A filename corresponding to this Segment.
    SegmentFilename = 0x7384
);
leaf_binary!(
    /// An ID identifying the previous Segment of a Linked Segment.
    PrevUuid = 0x3CB923
);
leaf_string!(
    /// A filename corresponding to the previous Linked Segment.
    PrevFilename = 0x3C83AB
);
leaf_binary!(
    /// An ID identifying the next Segment of a Linked Segment.
    NextUuid = 0x3EB923
);
leaf_string!(
    /// A filename corresponding to the next Linked Segment.
    NextFilename = 0x3E83BB
);
leaf_binary!(
    /// A unique ID shared by all Segments of a Linked Segment.
    SegmentFamily = 0x4444
);
leaf_uint!(
    /// Base unit for Segment Ticks and Track Ticks, in nanoseconds.
    TimestampScale = 0x2AD7B1, default = 1_000_000
);
leaf_float!(
    /// Duration of the Segment, expressed in Segment Ticks.
    Duration = 0x4489
);
leaf_date!(
    /// The date and time the Segment was created.
    DateUtc = 0x4461
);
leaf_string!(
    /// General name of the Segment.
    Title = 0x7BA9
);
leaf_string!(
    /// Muxing application or library.
    MuxingApp = 0x4D80
);
leaf_string!(
    /// Writing application.
    WritingApp = 0x5741
);

// --- ChapterTranslate ---

leaf_binary!(
    /// Value used to represent this Segment in the chapter codec data.
    ChapterTranslateId = 0x69A5
);
leaf_uint!(
    /// The chapter codec this `ChapterTranslate` applies to.
    ChapterTranslateCodec = 0x69BF
);
leaf_uint!(
    /// A chapter edition UID this `ChapterTranslate` applies to.
    ChapterTranslateEditionUid = 0x69FC
);

// --- Cluster ---

leaf_uint!(
    /// Absolute timestamp of the cluster, in Segment Ticks.
    Timestamp = 0xE7
);
leaf_uint!(
    /// The Segment Position of the Cluster.
    Position = 0xA7
);
leaf_uint!(
    /// Size of the previous Cluster, in octets.
    PrevSize = 0xAB
);

// --- Block / BlockGroup ---

leaf_binary!(
    /// Block containing the actual frame data and a relative timestamp.
    Block = 0xA1
);
leaf_binary!(
    /// A lightweight Block with no extra BlockGroup framing.
    SimpleBlock = 0xA3
);
leaf_uint!(
    /// The duration of the Block, in Track Ticks.
    BlockDuration = 0x9B
);
leaf_uint!(
    /// Cache priority of this frame; 0 means the frame is not referenced.
    ReferencePriority = 0xFA, default = 0
);
leaf_sint!(
    /// Relative timestamp of another frame this Block depends on.
    ReferenceBlock = 0xFB
);
leaf_binary!(
    /// New codec state; data interpretation is private to the codec.
    CodecState = 0xA4
);
leaf_sint!(
    /// Duration of silent data added to the Block, in nanoseconds.
    DiscardPadding = 0x75A2
);
leaf_uint!(
    /// Identifies how to interpret the sibling BlockAdditional data.
    BlockAddId = 0xEE, default = 1
);
leaf_binary!(
    /// Interpreted by the codec as it wishes.
    BlockAdditional = 0xA5
);

// --- Tracks / TrackEntry ---

leaf_uint!(
    /// Track number, unique per file, referenced by Blocks.
    TrackNumber = 0xD7
);
leaf_uint!(
    /// Unique ID of the track.
    TrackUid = 0x73C5
);
leaf_uint!(
    /// The track's type (audio, video, subtitle, ...).
    TrackType = 0x83
);
leaf_uint!(
    /// Whether the track is usable.
    FlagEnabled = 0xB9, default = 1
);
leaf_uint!(
    /// Whether the track is eligible for automatic selection.
    FlagDefault = 0x88, default = 1
);
leaf_uint!(
    /// Whether the track was specifically forced.
    FlagForced = 0x55AA, default = 0
);
leaf_uint!(
    /// Whether the track may contain blocks using lacing.
    FlagLacing = 0x9C, default = 1
);
leaf_uint!(
    /// Default duration of a frame on this track, in nanoseconds.
    DefaultDuration = 0x23E383
);
leaf_uint!(
    /// Maximum value of BlockAddID used by this track's Blocks.
    MaxBlockAdditionId = 0x55EE, default = 0
);
leaf_string!(
    /// Human-readable name of the track.
    TrackName = 0x536E
);
leaf_string!(
    /// Language of the track, in ISO 639-2 form.
    TrackLanguage = 0x22B59C, default = "eng"
);
leaf_string!(
    /// An ID corresponding to the codec used for this track.
    TrackCodecId = 0x86
);
leaf_binary!(
    /// Private data only known to the codec.
    TrackCodecPrivate = 0x63A2
);
leaf_uint!(
    /// Numbers of channels in the track.
    Channels = 0x9F, default = 1
);
leaf_float!(
    /// Sampling frequency, in Hz.
    SamplingFrequency = 0xB5, default = 8000.0
);
leaf_float!(
    /// Real output sampling frequency, in Hz, used for SBR techniques.
    OutputSamplingFrequency = 0x78B5
);
leaf_uint!(
    /// Bits per sample, mostly used for PCM.
    BitDepth = 0x6264
);

// --- Cues ---

leaf_uint!(
    /// Absolute timestamp of the seek point, in Segment Ticks.
    CueTime = 0xB3
);
leaf_uint!(
    /// The track for which a position is given.
    CueTrack = 0xF7
);
leaf_uint!(
    /// The Segment Position of the Cluster containing the associated Block.
    CueClusterPosition = 0xF1
);

// --- Chapters ---

leaf_uint!(
    /// Unique ID of the edition.
    EditionUid = 0x45BC
);
leaf_uint!(
    /// Whether this edition is the default one.
    EditionFlagDefault = 0x45DB, default = 0
);
leaf_uint!(
    /// Whether chapters in this edition are ordered and meant to be played as a side-story.
    EditionFlagOrdered = 0x45DD, default = 0
);
leaf_uint!(
    /// Unique ID of the chapter.
    ChapterUid = 0x73C4
);
leaf_uint!(
    /// Timestamp of the start of the chapter, in nanoseconds.
    ChapterTimeStart = 0x91
);
leaf_uint!(
    /// Timestamp of the end of the chapter, in nanoseconds; 0 means "infer".
    ChapterTimeEnd = 0x92, default = 0
);
leaf_uint!(
    /// Whether the chapter is hidden from the user interface.
    ChapterFlagHidden = 0x98, default = 0
);
leaf_uint!(
    /// Whether the chapter can be used for navigation.
    ChapterFlagEnabled = 0x4598, default = 1
);
leaf_uint!(
    /// A track number this chapter edition applies to.
    ChapterTrackNumber = 0x89
);
leaf_string!(
    /// The string to display as the chapter name.
    ChapterString = 0x85
);
leaf_string!(
    /// Language of the chapter display string.
    ChapterLanguage = 0x437C, default = "eng"
);
leaf_string!(
    /// Country of the chapter display string.
    ChapterCountry = 0x437E
);

// --- Tags ---

leaf_string!(
    /// The name of the tag, upper-cased on ingestion.
    TagName = 0x45A3
);
leaf_string!(
    /// Language of the tag value.
    TagLanguage = 0x447A, default = "und"
);
leaf_uint!(
    /// Whether this is the default/original language for the tag.
    TagDefault = 0x4484, default = 1
);
leaf_string!(
    /// The value of the tag.
    TagString = 0x4487
);
leaf_binary!(
    /// The value of the tag, if it isn't text.
    TagBinary = 0x4485
);
leaf_uint!(
    /// The general type of tag target, e.g. 50 = Album.
    TargetTypeValue = 0x68CA, default = 50
);
leaf_string!(
    /// Informational type name of the target, e.g. "SHOT".
    TargetType = 0x63CA
);
leaf_uint!(
    /// UID of the Track this tag targets.
    TagTrackUid = 0x63C5, default = 0
);
leaf_uint!(
    /// UID of the Edition this tag targets.
    TagEditionUid = 0x63C9, default = 0
);
leaf_uint!(
    /// UID of the Chapter this tag targets.
    TagChapterUid = 0x63C4, default = 0
);
leaf_uint!(
    /// UID of the Attachment this tag targets.
    TagAttachmentUid = 0x63C6, default = 0
);

// --- Attachments ---

leaf_string!(
    /// Description of the attached file.
    FileDescription = 0x467E
);
leaf_string!(
    /// Filename of the attached file.
    FileName = 0x466E
);
leaf_string!(
    /// MIME type of the attached file.
    FileMimeType = 0x4660
);
leaf_uint!(
    /// Unique ID of the attached file.
    FileUid = 0x46AE
);
leaf_binary!(
    /// The data of the attached file.
    FileData = 0x465C
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_roundtrip() {
        let v = TrackNumber(300);
        let mut buf = vec![];
        v.encode_body(&mut buf).unwrap();
        let back = TrackNumber::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn sint_roundtrip_negative() {
        let v = ReferenceBlock(-1000);
        let mut buf = vec![];
        v.encode_body(&mut buf).unwrap();
        let back = ReferenceBlock::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn string_default() {
        assert_eq!(DocType::default().0, "matroska");
        assert_eq!(TrackLanguage::default().0, "eng");
    }

    #[test]
    fn uint_empty_body_is_zero() {
        let v = TrackNumber::decode_body(&mut &[][..]).unwrap();
        assert_eq!(v.0, 0);
    }
}
