//! Recursive packet parser.
//!
//! The entry point is [parse]: it reads the leading address string and
//! dispatches on it — the reserved `#bundle` address selects bundle
//! decoding, anything else is a message. Bundle contents are length-prefixed
//! blobs, so each element is parsed from its own exactly-sized sub-buffer
//! and must consume it completely.

use crate::{
    error::Error,
    message::{Bundle, Message, Packet, BUNDLE_ADDRESS},
    primitives::{read_blob, read_str},
    time::TimeTag,
    value::Value,
};
use bytes::Buf;

/// Maximum bundle nesting accepted by [parse].
///
/// The wire format itself imposes no limit, but a hostile buffer could
/// otherwise drive recursion until the stack is exhausted.
pub const MAX_BUNDLE_DEPTH: usize = 32;

/// Parses a complete OSC packet, consuming the entire input.
pub fn parse(data: &[u8]) -> Result<Packet, Error> {
    let mut buf = data;
    let packet = read_packet(&mut buf, 0)?;
    if buf.has_remaining() {
        return Err(Error::ExtraData(buf.remaining()));
    }
    Ok(packet)
}

fn read_packet(buf: &mut impl Buf, depth: usize) -> Result<Packet, Error> {
    let address = read_str(buf)?;
    if address == BUNDLE_ADDRESS {
        Ok(Packet::Bundle(read_bundle(buf, depth)?))
    } else {
        Ok(Packet::Message(read_message(address, buf)?))
    }
}

fn read_message(address: String, buf: &mut impl Buf) -> Result<Message, Error> {
    let tags = read_str(buf)?;
    let tags = tags.strip_prefix(',').ok_or(Error::InvalidTagString)?;

    let mut message = Message::new(address);
    for tag in tags.chars() {
        message.append(Value::read(tag, buf)?);
    }
    Ok(message)
}

fn read_bundle(buf: &mut impl Buf, depth: usize) -> Result<Bundle, Error> {
    if depth >= MAX_BUNDLE_DEPTH {
        return Err(Error::NestingTooDeep);
    }

    let mut bundle = Bundle::new(TimeTag::read(buf)?);
    while buf.has_remaining() {
        let blob = read_blob(buf)?;
        let mut element = &blob[..];
        let packet = read_packet(&mut element, depth + 1)?;
        if element.has_remaining() {
            return Err(Error::ExtraData(element.remaining()));
        }
        // Re-inserting through `push` re-checks the timetag ordering
        // invariant, so a malformed bundle is rejected here too.
        bundle.push(packet)?;
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Addressed;

    fn roundtrip(packet: Packet) {
        let encoded = packet.encode().unwrap();
        assert_eq!(parse(&encoded).unwrap(), packet);
    }

    #[test]
    fn test_parse_message() {
        let mut message = Message::new("/my/test");
        message.append(42);
        message.append("hi");
        roundtrip(Packet::Message(message));
    }

    #[test]
    fn test_parse_bundle() {
        let mut bundle = Bundle::new(TimeTag::Immediate);
        bundle.push(Message::new("/a")).unwrap();
        bundle.push(Message::new("/b")).unwrap();
        roundtrip(Packet::Bundle(bundle));
    }

    #[test]
    fn test_tag_string_missing_comma() {
        // "/a" followed by a tag string that does not start with ','.
        let mut data = Vec::new();
        data.extend_from_slice(b"/a\0\0");
        data.extend_from_slice(b"i\0\0\0");
        data.extend_from_slice(&[0, 0, 0, 1]);
        assert!(matches!(parse(&data), Err(Error::InvalidTagString)));
    }

    #[test]
    fn test_trailing_garbage() {
        let encoded = Message::new("/a").encode().unwrap();
        let mut data = encoded.to_vec();
        data.extend_from_slice(&[1, 2, 3, 4]);
        assert!(matches!(parse(&data), Err(Error::ExtraData(4))));
    }

    #[test]
    fn test_truncated_argument() {
        let mut message = Message::new("/a");
        message.append(7);
        let encoded = message.encode().unwrap();
        assert!(matches!(
            parse(&encoded[..encoded.len() - 2]),
            Err(Error::EndOfBuffer)
        ));
    }

    #[test]
    fn test_bundle_element_with_slack() {
        // A bundle element blob longer than the packet it contains.
        let inner = Message::new("/a").encode().unwrap();
        let mut padded = inner.to_vec();
        padded.extend_from_slice(&[0, 0, 0, 0]);

        let mut data = Vec::new();
        data.extend_from_slice(b"#bundle\0");
        data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        crate::primitives::write_blob(&padded, &mut data);
        assert!(matches!(parse(&data), Err(Error::ExtraData(4))));
    }

    #[test]
    fn test_nesting_limit() {
        let mut packet = Packet::Bundle(Bundle::new(TimeTag::Immediate));
        for _ in 0..MAX_BUNDLE_DEPTH {
            let mut outer = Bundle::new(TimeTag::Immediate);
            outer.push(packet).unwrap();
            packet = Packet::Bundle(outer);
        }
        let encoded = packet.encode().unwrap();
        assert!(matches!(parse(&encoded), Err(Error::NestingTooDeep)));
    }

    #[test]
    fn test_nesting_within_limit() {
        let mut packet = Packet::Bundle(Bundle::new(TimeTag::Immediate));
        for _ in 0..MAX_BUNDLE_DEPTH - 1 {
            let mut outer = Bundle::new(TimeTag::Immediate);
            outer.push(packet).unwrap();
            packet = Packet::Bundle(outer);
        }
        roundtrip(packet);
    }
}
