use crate::error::Error;
use crate::functional::*;
use crate::io::ReadExt;
use crate::io::ReadFrom;
use std::fmt::Debug;
use std::fmt::Display;
use std::io::Read;
use std::ops::Deref;

/// A variable-length integer RFC 8794
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VInt64 {
    /// The decoded integer value.
    pub value: u64,
    /// Whether this VInt64 represents an unknown size.
    pub is_unknown: bool,
}

impl Display for VInt64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // write!(f, "{}", self.as_encoded())
        let encoded = self.as_encoded();
        if encoded <= 0xFF {
            write!(f, "0x{:02X}", encoded)
        } else if encoded <= 0xFFFF {
            write!(f, "0x{:04X}", encoded)
        } else if encoded <= 0xFFFFFF {
            write!(f, "0x{:06X}", encoded)
        } else if encoded <= 0xFFFFFFFF {
            write!(f, "0x{:08X}", encoded)
        } else if encoded <= 0xFFFFFFFFFF {
            write!(f, "0x{:010X}", encoded)
        } else if encoded <= 0xFFFFFFFFFFFF {
            write!(f, "0x{:012X}", encoded)
        } else if encoded <= 0xFFFFFFFFFFFFFF {
            write!(f, "0x{:014X}", encoded)
        } else {
            write!(f, "0x{:016X}", encoded)
        }
    }
}
impl Debug for VInt64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut t = f.debug_struct("VInt64");
        if !self.is_unknown {
            t.field("value", &self.value);
        } else {
            t.field("value", &"Unknown");
        }
        t.field("memory", &format!("{}", self));
        t.finish()
    }
}

impl Deref for VInt64 {
    type Target = u64;
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
impl VInt64 {
    /// Create a VInt64 from an already encoded u64 value.
    pub const fn from_encoded(enc: u64) -> Self {
        if enc == 0xFF {
            Self {
                value: 127,
                is_unknown: true,
            }
        } else if enc == 0x407F {
            Self {
                value: 127,
                is_unknown: false,
            }
        } else {
            Self {
                value: enc & (u64::MAX >> (enc.leading_zeros() + 1)),
                is_unknown: false,
            }
        }
    }

    /// Create a VInt64 representing an unknown size.
    pub const fn new_unknown() -> Self {
        Self {
            value: 127,
            is_unknown: true,
        }
    }

    /// Create a VInt64 from a u64 value.
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            is_unknown: false,
        }
    }

    /// Create a VInt64 from an already encoded u64 value.
    pub fn as_encoded(&self) -> u64 {
        if self.is_unknown {
            return 0xFF;
        }
        if self.value == 127 {
            return 0x407F;
        }

        let size = VInt64::encode_size(self.value);
        let mut sbuf = [0u8; 8];
        let slice = &mut sbuf[8 - size..];
        slice.copy_from_slice(&self.value.to_be_bytes()[8 - size..]);
        slice[0] |= 1u8 << (8 - size);
        u64::from_be_bytes(sbuf)
    }

    /// Get the size in bytes of the encoded representation of a u64 value.
    pub const fn encode_size(value: u64) -> usize {
        let leading_zeros = value.leading_zeros() as usize;
        let total_bits = 64 - leading_zeros;
        if total_bits == 0 {
            1
        } else {
            (total_bits + 6).div_euclid(7)
        }
    }
}

impl ReadFrom for VInt64 {
    fn read_from<R: std::io::Read>(r: &mut R) -> crate::Result<Self> {
        let first_byte = r.read_u8()?;
        if first_byte == 0xFF {
            return Ok(VInt64 {
                value: 127,
                is_unknown: true,
            });
        }

        let leading_zeros = first_byte.leading_zeros() as usize;
        if leading_zeros >= 8 {
            return Err(crate::error::Error::InvalidVInt);
        }

        if leading_zeros == 0 {
            Ok(VInt64 {
                value: (first_byte & 0b0111_1111) as u64,
                is_unknown: false,
            })
        } else {
            let mut buf = [0u8; 8];
            let read_buf = &mut buf[8 - leading_zeros..];
            r.read_exact(read_buf)?;
            if leading_zeros != 7 {
                buf[8 - leading_zeros - 1] = first_byte & (0xFF >> (leading_zeros + 1));
            }
            Ok(VInt64 {
                value: u64::from_be_bytes(buf),
                is_unknown: false,
            })
        }
    }
}

impl Decode for VInt64 {
    fn decode(buf: &mut &[u8]) -> crate::Result<Self> {
        if !buf.has_remaining() {
            return Err(Error::OutOfBounds);
        }
        let first_byte = u8::decode(buf)?;
        if first_byte == 0 {
            return Err(Error::InvalidVInt);
        }
        if first_byte == 0xFF {
            return Ok(VInt64 {
                value: 127,
                is_unknown: true,
            });
        }
        let leading_zeros = first_byte.leading_zeros() as usize;

        if leading_zeros == 0 {
            Ok(VInt64 {
                value: (first_byte & 0b0111_1111) as u64,
                is_unknown: false,
            })
        } else {
            if buf.remaining() < leading_zeros {
                return Err(Error::OutOfBounds);
            }
            let mut bytes = [0u8; 8];
            let read_buf = &mut bytes[8 - leading_zeros..];
            read_buf.copy_from_slice(buf.slice(leading_zeros));

            if leading_zeros != 7 {
                bytes[8 - leading_zeros - 1] = first_byte & (0xFF >> (leading_zeros + 1));
            }
            buf.advance(leading_zeros);
            Ok(VInt64 {
                value: u64::from_be_bytes(bytes),
                is_unknown: false,
            })
        }
    }
}

impl Encode for VInt64 {
    fn encode<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        if self.is_unknown {
            buf.append_slice(&[0xFF]);
            return Ok(());
        }
        if self.value == 127 {
            buf.append_slice(&[0x40, 0x7F]);
            return Ok(());
        }

        let size = VInt64::encode_size(self.value);
        let mut sbuf = [0u8; 8];
        let slice = &mut sbuf[8 - size..];
        slice.copy_from_slice(&self.value.to_be_bytes()[8 - size..]);
        slice[0] |= 1u8 << (8 - size);
        buf.append_slice(slice);
        Ok(())
    }
}


/// EBML element header, consisting of an ID and a size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Header {
    /// EBML ID of the element.
    pub id: VInt64,
    /// Size of the element's data, excluding the header itself.
    pub size: VInt64,
}

impl Header {
    pub(crate) fn read_body<R: Read>(&self, r: &mut R) -> crate::Result<Vec<u8>> {
        // we allocate 4096 bytes upfront and grow as needed
        let size = if self.size.is_unknown {
            return Err(Error::ElementBodySizeUnknown(self.id));
        } else {
            *self.size
        };
        let cap = size.min(4096) as usize;
        let mut buf = Vec::with_capacity(cap);
        let n = std::io::copy(&mut r.take(size), &mut buf)?;
        if size != n {
            return Err(Error::OutOfBounds);
        }
        Ok(buf)
    }
}

impl ReadFrom for Header {
    fn read_from<R: std::io::Read>(reader: &mut R) -> crate::Result<Self> {
        let id = VInt64::read_from(reader)?;
        let size = VInt64::read_from(reader)?;
        Ok(Self { id, size })
    }
}

impl Decode for Header {
    fn decode(buf: &mut &[u8]) -> crate::Result<Self> {
        let id = VInt64::decode(buf)?;
        let size = VInt64::decode(buf)?;
        Ok(Self { id, size })
    }
}

impl Encode for Header {
    fn encode<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        self.id.encode(buf)?;
        self.size.encode(buf)?;
        Ok(())
    }
}

/// Decode an EBML unsigned integer body (big-endian, 0-8 bytes, empty = 0).
pub fn decode_uint(buf: &[u8]) -> crate::Result<u64> {
    if buf.is_empty() {
        return Ok(0);
    }
    if buf.len() > 8 {
        return Err(Error::MalformedEbml);
    }
    let mut value = [0u8; 8];
    value[8 - buf.len()..].copy_from_slice(buf);
    Ok(u64::from_be_bytes(value))
}

/// Decode an EBML signed integer body (big-endian, sign-extended, 0-8 bytes, empty = 0).
pub fn decode_sint(buf: &[u8]) -> crate::Result<i64> {
    if buf.is_empty() {
        return Ok(0);
    }
    if buf.len() > 8 {
        return Err(Error::MalformedEbml);
    }
    let fill = if buf[0] & 0x80 != 0 { 0xFFu8 } else { 0u8 };
    let mut value = [fill; 8];
    value[8 - buf.len()..].copy_from_slice(buf);
    Ok(i64::from_be_bytes(value))
}

/// Decode an EBML float body (4 or 8 bytes, empty = 0.0).
pub fn decode_float(buf: &[u8]) -> crate::Result<f64> {
    match buf.len() {
        0 => Ok(0.0),
        4 => {
            let mut b = [0u8; 4];
            b.copy_from_slice(buf);
            Ok(f32::from_be_bytes(b) as f64)
        }
        8 => {
            let mut b = [0u8; 8];
            b.copy_from_slice(buf);
            Ok(f64::from_be_bytes(b))
        }
        _ => Err(Error::MalformedEbml),
    }
}

/// Decode an EBML ASCII/UTF-8 string body, trimming trailing NUL padding.
pub fn decode_string(buf: &[u8]) -> crate::Result<String> {
    let trimmed = match buf.iter().position(|&b| b == 0) {
        Some(pos) => &buf[..pos],
        None => buf,
    };
    String::from_utf8(trimmed.to_vec()).map_err(|_| Error::MalformedEbml)
}

/// Decode an EBML binary body (opaque bytes).
pub fn decode_binary(buf: &[u8]) -> crate::Result<Vec<u8>> {
    Ok(buf.to_vec())
}

/// Encode a u64 as a minimal-width big-endian EBML unsigned integer body.
pub fn encode_uint(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let first_non_zero = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    bytes[first_non_zero..].to_vec()
}

/// Encode an i64 as a minimal-width big-endian EBML signed integer body.
pub fn encode_sint(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    if value >= 0 {
        let first_non_zero = bytes.iter().position(|&b| b != 0).unwrap_or(7);
        let first_non_zero = if bytes[first_non_zero] & 0x80 != 0 {
            first_non_zero - 1
        } else {
            first_non_zero
        };
        bytes[first_non_zero..].to_vec()
    } else {
        let first_non_ff = bytes.iter().position(|&b| b != 0xFF).unwrap_or(7);
        let first_non_ff = if bytes[first_non_ff] & 0x80 == 0 {
            first_non_ff - 1
        } else {
            first_non_ff
        };
        bytes[first_non_ff..].to_vec()
    }
}

/// Nanoseconds between the Unix epoch and 2001-01-01T00:00:00 UTC, the EBML date epoch.
pub const DATE_EPOCH_OFFSET_NS: i64 = 978_307_200_000_000_000;

/// Decode an EBML date body: signed nanoseconds since 2001-01-01T00:00:00 UTC.
pub fn decode_date(buf: &[u8]) -> crate::Result<i64> {
    if buf.len() != 8 {
        return Err(Error::MalformedEbml);
    }
    let mut b = [0u8; 8];
    b.copy_from_slice(buf);
    Ok(i64::from_be_bytes(b))
}
