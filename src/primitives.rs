//! Padded wire primitives for the OSC encoding.
//!
//! Every field in an OSC packet is aligned to 4 bytes. Fixed-width numerics
//! are written big-endian with no padding; strings and blobs are padded with
//! NUL bytes up to the next 4-byte boundary. A string always carries at least
//! one NUL (its terminator), so its padded length is the smallest multiple of
//! 4 *strictly greater* than its character count. Blobs follow the same rule
//! applied to their content length, excluding the 4-byte length prefix.

use crate::error::Error;
use bytes::{Buf, BufMut, Bytes};

/// Returns the padded length of a `len`-byte string or blob payload: the
/// smallest multiple of 4 strictly greater than `len`.
#[inline]
pub const fn padded_len(len: usize) -> usize {
    (len | 3) + 1
}

/// Checks that the buffer has at least `len` bytes remaining.
#[inline]
pub(crate) fn at_least(buf: &impl Buf, len: usize) -> Result<(), Error> {
    if buf.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}

// Fixed-width big-endian reads. The matching writes are the `put_*` methods
// on [BufMut], which are already big-endian and infallible.
macro_rules! impl_read {
    ($name:ident, $type:ty, $get_method:ident) => {
        #[inline]
        pub fn $name(buf: &mut impl Buf) -> Result<$type, Error> {
            at_least(buf, std::mem::size_of::<$type>())?;
            Ok(buf.$get_method())
        }
    };
}

impl_read!(read_i32, i32, get_i32);
impl_read!(read_i64, i64, get_i64);
impl_read!(read_u32, u32, get_u32);
impl_read!(read_f32, f32, get_f32);
impl_read!(read_f64, f64, get_f64);

/// Writes an OSC-string: ASCII bytes, a NUL terminator, and NUL padding to
/// the next 4-byte boundary.
///
/// Fails if the string contains an embedded NUL (NUL is the terminator and
/// cannot appear in the payload) or any non-ASCII character.
pub fn write_str(s: &str, buf: &mut impl BufMut) -> Result<(), Error> {
    if s.as_bytes().contains(&0) {
        return Err(Error::EmbeddedNul);
    }
    if !s.is_ascii() {
        return Err(Error::NotAscii);
    }
    buf.put_slice(s.as_bytes());
    buf.put_bytes(0, padded_len(s.len()) - s.len());
    Ok(())
}

/// Reads an OSC-string, consuming exactly its padded length.
///
/// The string is everything before the first NUL byte; a buffer with no NUL
/// terminator is malformed.
pub fn read_str(buf: &mut impl Buf) -> Result<String, Error> {
    let mut raw = Vec::new();
    loop {
        if !buf.has_remaining() {
            return Err(Error::MissingTerminator);
        }
        let byte = buf.get_u8();
        if byte == 0 {
            break;
        }
        raw.push(byte);
    }

    // `raw.len()` is the index of the terminator; skip the remaining padding.
    let padding = padded_len(raw.len()) - raw.len() - 1;
    at_least(buf, padding)?;
    buf.advance(padding);

    if !raw.is_ascii() {
        return Err(Error::NotAscii);
    }
    String::from_utf8(raw).map_err(|_| Error::NotAscii)
}

/// Writes an OSC-blob: a signed 32-bit big-endian length prefix, the raw
/// content, and NUL padding of the content length to the next 4-byte
/// boundary.
///
/// Panics if the content length exceeds `i32::MAX`.
pub fn write_blob(data: &[u8], buf: &mut impl BufMut) {
    let len = i32::try_from(data.len()).expect("blob length exceeds i32");
    buf.put_i32(len);
    buf.put_slice(data);
    buf.put_bytes(0, padded_len(data.len()) - data.len());
}

/// Reads an OSC-blob, consuming the length prefix plus exactly the padded
/// content length.
pub fn read_blob(buf: &mut impl Buf) -> Result<Bytes, Error> {
    let len = read_i32(buf)?;
    let len = usize::try_from(len).map_err(|_| Error::InvalidBlobLength(len))?;
    at_least(buf, padded_len(len))?;
    let data = buf.copy_to_bytes(len);
    buf.advance(padded_len(len) - len);
    Ok(data)
}
