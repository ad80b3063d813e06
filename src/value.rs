//! Typed argument values and their tag-dispatched codecs.
//!
//! Every OSC argument is identified on the wire by a one-character type tag.
//! [Value] is the closed set of supported kinds; its variant determines the
//! tag, [Value::write] is the encode dispatch, and [Value::read] is the
//! decode dispatch. The `T`, `F`, `N`, and `I` tags carry no payload bytes
//! at all: the tag character is the entire encoding.
//!
//! Untagged construction goes through the `From` conversions, which pick the
//! narrowest tag that represents the input losslessly (e.g. an `i64` within
//! signed 32-bit range becomes `Int32`). To force a wider tag, construct the
//! variant directly.

use crate::{
    error::Error,
    primitives::{self, padded_len, read_f32, read_f64, read_i32, read_i64},
    time::TimeTag,
};
use bytes::{Buf, BufMut, Bytes};
use std::time::SystemTime;

/// A 4-channel color argument (tag `r`).
///
/// Each channel occupies a full 32-bit big-endian word on the wire; nothing
/// is packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// A MIDI event argument (tag `m`): port id, status byte, and two data
/// bytes, each a full 32-bit big-endian word on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MidiMessage {
    pub port_id: u8,
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl MidiMessage {
    pub const fn new(port_id: u8, status: u8, data1: u8, data2: u8) -> Self {
        Self {
            port_id,
            status,
            data1,
            data2,
        }
    }
}

/// Reads one 32-bit word and narrows it to a byte-range field.
fn read_channel(buf: &mut impl Buf, field: &'static str) -> Result<u8, Error> {
    let word = read_i32(buf)?;
    u8::try_from(word).map_err(|_| Error::OutOfRange(field, word))
}

/// One typed OSC argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// 32-bit signed integer (tag `i`).
    Int32(i32),
    /// 32-bit float (tag `f`).
    Float32(f32),
    /// ASCII string (tag `s`).
    Str(String),
    /// Opaque bytes (tag `b`).
    Blob(Bytes),
    /// 64-bit signed integer (tag `h`).
    Int64(i64),
    /// Timetag (tag `t`).
    Time(TimeTag),
    /// 64-bit float (tag `d`).
    Float64(f64),
    /// Symbol: encoded exactly like a string but semantically distinct
    /// (tag `S`).
    Symbol(String),
    /// Single character, encoded as its code point in a 32-bit word
    /// (tag `c`).
    Char(char),
    /// RGBA color (tag `r`).
    Color(Rgba),
    /// MIDI event (tag `m`).
    Midi(MidiMessage),
    /// Boolean (tag `T` or `F`; no payload).
    Bool(bool),
    /// Nil (tag `N`; no payload).
    Nil,
    /// Positive infinity, the OSC "infinitum" (tag `I`; no payload).
    Infinity,
}

impl Value {
    /// The one-character type tag selecting this value's codec.
    pub fn tag(&self) -> char {
        match self {
            Self::Int32(_) => 'i',
            Self::Float32(_) => 'f',
            Self::Str(_) => 's',
            Self::Blob(_) => 'b',
            Self::Int64(_) => 'h',
            Self::Time(_) => 't',
            Self::Float64(_) => 'd',
            Self::Symbol(_) => 'S',
            Self::Char(_) => 'c',
            Self::Color(_) => 'r',
            Self::Midi(_) => 'm',
            Self::Bool(true) => 'T',
            Self::Bool(false) => 'F',
            Self::Nil => 'N',
            Self::Infinity => 'I',
        }
    }

    /// The number of bytes [Value::write] will produce.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Int32(_) | Self::Float32(_) | Self::Char(_) => 4,
            Self::Int64(_) | Self::Float64(_) => 8,
            Self::Time(_) => TimeTag::SIZE,
            Self::Str(s) | Self::Symbol(s) => padded_len(s.len()),
            Self::Blob(b) => 4 + padded_len(b.len()),
            Self::Color(_) | Self::Midi(_) => 16,
            Self::Bool(_) | Self::Nil | Self::Infinity => 0,
        }
    }

    /// Encodes this value's payload (the tag itself travels in the
    /// message's tag string, not here).
    pub fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        match self {
            Self::Int32(v) => buf.put_i32(*v),
            Self::Float32(v) => buf.put_f32(*v),
            Self::Str(s) | Self::Symbol(s) => primitives::write_str(s, buf)?,
            Self::Blob(b) => primitives::write_blob(b, buf),
            Self::Int64(v) => buf.put_i64(*v),
            Self::Time(t) => t.write(buf)?,
            Self::Float64(v) => buf.put_f64(*v),
            Self::Char(c) => buf.put_i32(*c as i32),
            Self::Color(c) => {
                for channel in [c.red, c.green, c.blue, c.alpha] {
                    buf.put_i32(channel as i32);
                }
            }
            Self::Midi(m) => {
                for field in [m.port_id, m.status, m.data1, m.data2] {
                    buf.put_i32(field as i32);
                }
            }
            Self::Bool(_) | Self::Nil | Self::Infinity => {}
        }
        Ok(())
    }

    /// Decodes one value of the kind selected by `tag`, consuming exactly
    /// its payload bytes.
    pub fn read(tag: char, buf: &mut impl Buf) -> Result<Self, Error> {
        match tag {
            'i' => Ok(Self::Int32(read_i32(buf)?)),
            'f' => Ok(Self::Float32(read_f32(buf)?)),
            's' => Ok(Self::Str(primitives::read_str(buf)?)),
            'b' => Ok(Self::Blob(primitives::read_blob(buf)?)),
            'h' => Ok(Self::Int64(read_i64(buf)?)),
            't' => Ok(Self::Time(TimeTag::read(buf)?)),
            'd' => Ok(Self::Float64(read_f64(buf)?)),
            'S' => Ok(Self::Symbol(primitives::read_str(buf)?)),
            'c' => {
                let word = read_i32(buf)?;
                u32::try_from(word)
                    .ok()
                    .and_then(char::from_u32)
                    .map(Self::Char)
                    .ok_or(Error::InvalidChar(word))
            }
            'r' => Ok(Self::Color(Rgba {
                red: read_channel(buf, "color channel")?,
                green: read_channel(buf, "color channel")?,
                blue: read_channel(buf, "color channel")?,
                alpha: read_channel(buf, "color channel")?,
            })),
            'm' => Ok(Self::Midi(MidiMessage {
                port_id: read_channel(buf, "midi field")?,
                status: read_channel(buf, "midi field")?,
                data1: read_channel(buf, "midi field")?,
                data2: read_channel(buf, "midi field")?,
            })),
            'T' => Ok(Self::Bool(true)),
            'F' => Ok(Self::Bool(false)),
            'N' => Ok(Self::Nil),
            'I' => Ok(Self::Infinity),
            other => Err(Error::UnknownTag(other)),
        }
    }
}

/// Whether an `f64` survives a round-trip through `f32` unchanged.
fn fits_f32(value: f64) -> bool {
    value.is_nan() || (value as f32) as f64 == value
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        match i32::try_from(value) {
            Ok(narrow) => Self::Int32(narrow),
            Err(_) => Self::Int64(value),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if fits_f32(value) {
            Self::Float32(value as f32)
        } else {
            Self::Float64(value)
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Self::Blob(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(Bytes::from(value))
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Blob(Bytes::copy_from_slice(value))
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<Rgba> for Value {
    fn from(value: Rgba) -> Self {
        Self::Color(value)
    }
}

impl From<MidiMessage> for Value {
    fn from(value: MidiMessage) -> Self {
        Self::Midi(value)
    }
}

impl From<TimeTag> for Value {
    fn from(value: TimeTag) -> Self {
        Self::Time(value)
    }
}

impl From<SystemTime> for Value {
    fn from(value: SystemTime) -> Self {
        Self::Time(TimeTag::Time(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Self::Nil,
        }
    }
}
