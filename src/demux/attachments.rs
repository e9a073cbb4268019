//! Lazy attachment scanning: walks an `Attachments` element's children without
//! ever decoding an `AttachedFile`'s `FileData` body into memory.
//!
//! This deliberately bypasses `AttachedFile`'s generic `Element::decode_body`
//! (via `nested!`), which would read every attached file's binary payload
//! into memory up front.

use crate::base::Header;
use crate::io::blocking_impl::{ReadElement, ReadFrom};
use crate::leaf::{FileData, FileDescription, FileMimeType, FileName, FileUid};
use crate::master::AttachedFile;
use std::io::{Read, Seek, SeekFrom};

/// One attached file, with its payload left unread on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Filename of the attached file.
    pub file_name: String,
    /// MIME type of the attached file.
    pub mime_type: String,
    /// Description of the attached file, if any.
    pub description: String,
    /// Unique ID of the attached file.
    pub file_uid: u64,
    /// Absolute byte offset of the attachment's payload in the source.
    pub source_offset: u64,
    /// Length, in bytes, of the attachment's payload.
    pub source_length: u64,
}

/// Scans the body of an `Attachments` element (whose header has already been read, with the
/// reader positioned at the start of its body) for `AttachedFile` children, recording each
/// one's payload location rather than reading it.
pub fn scan_attachments<R: Read + Seek>(
    reader: &mut R,
    attachments_header: &Header,
) -> crate::Result<Vec<Attachment>> {
    let start = reader.stream_position()?;
    let end = start + *attachments_header.size;
    let mut out = Vec::new();

    while reader.stream_position()? < end {
        let child = Header::read_from(reader)?;
        if child.id == AttachedFile::ID {
            out.push(scan_attached_file(reader, &child)?);
        } else {
            reader.seek(SeekFrom::Current(*child.size as i64))?;
        }
    }

    Ok(out)
}

fn scan_attached_file<R: Read + Seek>(
    reader: &mut R,
    header: &Header,
) -> crate::Result<Attachment> {
    let end = reader.stream_position()? + *header.size;

    let mut file_name = None;
    let mut mime_type = None;
    let mut description = None;
    let mut file_uid = None;
    let mut source_offset = 0u64;
    let mut source_length = 0u64;

    while reader.stream_position()? < end {
        let child = Header::read_from(reader)?;
        match child.id {
            FileName::ID => file_name = Some(FileName::read_element(&child, reader)?.0),
            FileMimeType::ID => mime_type = Some(FileMimeType::read_element(&child, reader)?.0),
            FileDescription::ID => {
                description = Some(FileDescription::read_element(&child, reader)?.0)
            }
            FileUid::ID => file_uid = Some(*FileUid::read_element(&child, reader)?),
            FileData::ID => {
                source_offset = reader.stream_position()?;
                source_length = *child.size;
                reader.seek(SeekFrom::Current(*child.size as i64))?;
            }
            _ => {
                reader.seek(SeekFrom::Current(*child.size as i64))?;
            }
        }
    }

    Ok(Attachment {
        file_name: file_name.unwrap_or_default(),
        mime_type: mime_type.unwrap_or_default(),
        description: description.unwrap_or_default(),
        file_uid: file_uid.unwrap_or(0),
        source_offset,
        source_length,
    })
}

/// Reads an attachment's payload on demand, restoring the reader's position afterwards.
pub fn read_attachment<R: Read + Seek>(
    reader: &mut R,
    attachment: &Attachment,
) -> crate::Result<Vec<u8>> {
    let saved = reader.stream_position()?;
    reader.seek(SeekFrom::Start(attachment.source_offset))?;

    let mut buf = vec![0u8; attachment.source_length as usize];
    let result = reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            crate::Error::ShortRead
        } else {
            crate::Error::Io(e)
        }
    });

    reader.seek(SeekFrom::Start(saved))?;
    result?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::blocking_impl::WriteTo;
    use crate::master::Attachments;
    use std::io::Cursor;

    fn sample_attachments() -> Attachments {
        Attachments {
            crc32: None,
            void: None,
            attached_file: vec![
                AttachedFile {
                    crc32: None,
                    void: None,
                    file_description: Some(FileDescription("cover art".to_string())),
                    file_name: FileName("cover.jpg".to_string()),
                    file_mime_type: FileMimeType("image/jpeg".to_string()),
                    file_data: FileData(vec![0xFFu8, 0xD8, 0xFF, 0xE0]),
                    file_uid: FileUid(1),
                },
                AttachedFile {
                    crc32: None,
                    void: None,
                    file_description: None,
                    file_name: FileName("font.ttf".to_string()),
                    file_mime_type: FileMimeType("application/x-font-ttf".to_string()),
                    file_data: FileData(vec![0u8; 64]),
                    file_uid: FileUid(2),
                },
            ],
        }
    }

    #[test]
    fn scan_does_not_read_file_data_but_locates_it() {
        let attachments = sample_attachments();
        let mut buf = Vec::new();
        attachments.write_to(&mut buf).unwrap();

        let mut cursor = Cursor::new(&buf);
        let header = Header::read_from(&mut cursor).unwrap();
        assert_eq!(header.id, Attachments::ID);

        let found = scan_attachments(&mut cursor, &header).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].file_name, "cover.jpg");
        assert_eq!(found[0].source_length, 4);
        assert_eq!(found[1].file_name, "font.ttf");
        assert_eq!(found[1].source_length, 64);

        let cover = read_attachment(&mut cursor, &found[0]).unwrap();
        assert_eq!(cover, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        // reading the attachment must not disturb the reader's position
        let pos_after = cursor.stream_position().unwrap();
        let font = read_attachment(&mut cursor, &found[1]).unwrap();
        assert_eq!(font.len(), 64);
        assert_eq!(cursor.stream_position().unwrap(), pos_after);
    }
}
