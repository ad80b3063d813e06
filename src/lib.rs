//! Encode and decode Open Sound Control 1.0 packets.
//!
//! # Overview
//!
//! A codec for the OSC wire format as defined by
//! <http://opensoundcontrol.org/spec-1_0>: a tagged, self-describing binary
//! encoding used by real-time control protocols. The crate converts between
//! an in-memory packet tree and its big-endian byte form:
//!
//! - [Message]: an address pattern plus an ordered run of typed [Value]
//!   arguments.
//! - [Bundle]: a [TimeTag] plus an ordered run of sub-packets, each itself a
//!   message or a nested bundle.
//! - [parse]: reconstructs a [Packet] tree from raw bytes, recursing into
//!   nested bundles.
//!
//! Transport is out of scope: the crate neither sends nor receives buffers,
//! and decoded timetags are plain data — scheduling is the caller's concern.
//!
//! # Example (Message)
//!
//! ```
//! use oscwire::{parse, Addressed, Message, Packet, Value};
//!
//! let mut message = Message::new("/oscillator/4/frequency");
//! message.append(440.0f32);
//! let bytes = message.encode()?;
//!
//! // Encoded fields are NUL-padded to 4-byte boundaries.
//! assert_eq!(bytes.len() % 4, 0);
//!
//! let Packet::Message(decoded) = parse(&bytes)? else {
//!     unreachable!();
//! };
//! assert_eq!(decoded, message);
//! assert_eq!(decoded.args()[0], Value::Float32(440.0));
//! # Ok::<(), oscwire::Error>(())
//! ```
//!
//! # Example (Bundle)
//!
//! ```
//! use oscwire::{parse, Addressed, Bundle, Message, Packet, TimeTag};
//!
//! let mut note = Message::new("/note/on");
//! note.append(60);
//!
//! // An immediate bundle: apply contents as soon as possible.
//! let mut bundle = Bundle::new(TimeTag::Immediate);
//! bundle.push(note)?;
//!
//! let bytes = bundle.encode()?;
//! assert_eq!(parse(&bytes)?, Packet::Bundle(bundle));
//! # Ok::<(), oscwire::Error>(())
//! ```

pub mod error;
pub mod message;
pub mod parser;
pub mod primitives;
pub mod time;
pub mod value;

// Re-export main types and functions
pub use error::Error;
pub use message::{Addressed, Bundle, Message, Packet};
pub use parser::{parse, MAX_BUNDLE_DEPTH};
pub use time::TimeTag;
pub use value::{MidiMessage, Rgba, Value};
