//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("string field has no NUL terminator")]
    MissingTerminator,
    #[error("string contains an embedded NUL byte")]
    EmbeddedNul,
    #[error("string contains non-ASCII data")]
    NotAscii,
    #[error("type tag string does not start with ','")]
    InvalidTagString,
    #[error("unknown type tag: {0:?}")]
    UnknownTag(char),
    #[error("negative blob length: {0}")]
    InvalidBlobLength(i32),
    #[error("invalid character code point: {0}")]
    InvalidChar(i32),
    #[error("{0} out of range: {1}")]
    OutOfRange(&'static str, i32),
    #[error("timetag outside the representable range")]
    TimeOutOfRange,
    #[error("bundle element timetag precedes its bundle's timetag")]
    TimetagOrder,
    #[error("bundle nesting exceeds the supported depth")]
    NestingTooDeep,
}
