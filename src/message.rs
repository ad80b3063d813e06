//! In-memory model of OSC packets: messages, bundles, and the shared
//! container surface.
//!
//! A [Message] is an address plus an ordered run of [Value] arguments; a
//! [Bundle] is a timetag plus an ordered run of sub-packets, each itself a
//! message or a nested bundle. Argument order is semantically significant,
//! so both types are thin wrappers over a `Vec`.

use crate::{
    error::Error,
    primitives::{padded_len, write_blob, write_str},
    time::TimeTag,
    value::Value,
};
use bytes::{BufMut, Bytes, BytesMut};

/// The reserved address that marks a packet as a bundle.
pub const BUNDLE_ADDRESS: &str = "#bundle";

/// Behavior shared by [Message] and [Bundle]: an address-like discriminator,
/// ordered item access, and a wire encoding.
pub trait Addressed {
    /// The element type held by this container.
    type Item;

    /// The address string written at the head of the packet. For bundles
    /// this is the fixed literal `#bundle`.
    fn address(&self) -> &str;

    /// The ordered contents.
    fn items(&self) -> &[Self::Item];

    /// The number of bytes [Addressed::write] will produce.
    fn encoded_len(&self) -> usize;

    /// Encodes this packet into `buf`.
    fn write(&self, buf: &mut impl BufMut) -> Result<(), Error>;

    /// Encodes this packet into a fresh buffer.
    ///
    /// (Provided method).
    fn encode(&self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.write(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// A single OSC message: an address pattern and its typed arguments.
///
/// The address may not contain a NUL byte and must be ASCII; both are
/// enforced when the message is encoded. Equality is structural.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    address: String,
    args: Vec<Value>,
}

impl Message {
    /// Creates an empty message for `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
        }
    }

    /// Creates a message with initial arguments.
    pub fn with_args(
        address: impl Into<String>,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        Self {
            address: address.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Appends an argument, inferring its tag from the native type. To
    /// force a specific tag, pass the [Value] variant directly.
    pub fn append(&mut self, value: impl Into<Value>) {
        self.args.push(value.into());
    }

    /// Inserts an argument at `index`, shifting later arguments right.
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) {
        self.args.insert(index, value.into());
    }

    /// Replaces the argument at `index`, returning the previous value.
    ///
    /// Panics if `index >= len`.
    pub fn replace(&mut self, index: usize, value: impl Into<Value>) -> Value {
        std::mem::replace(&mut self.args[index], value.into())
    }

    /// Removes and returns the argument at `index`.
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Value {
        self.args.remove(index)
    }

    /// Removes all arguments.
    pub fn clear(&mut self) {
        self.args.clear();
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// The arguments in order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The tag characters of the arguments, in order.
    pub fn tags(&self) -> impl Iterator<Item = char> + '_ {
        self.args.iter().map(Value::tag)
    }
}

impl Addressed for Message {
    type Item = Value;

    fn address(&self) -> &str {
        &self.address
    }

    fn items(&self) -> &[Value] {
        &self.args
    }

    fn encoded_len(&self) -> usize {
        padded_len(self.address.len())
            + padded_len(1 + self.args.len())
            + self.args.iter().map(Value::encoded_len).sum::<usize>()
    }

    fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        write_str(&self.address, buf)?;
        let mut tags = String::with_capacity(1 + self.args.len());
        tags.push(',');
        tags.extend(self.tags());
        write_str(&tags, buf)?;
        for arg in &self.args {
            arg.write(buf)?;
        }
        Ok(())
    }
}

/// Either packet kind: the result of parsing and the element type of a
/// bundle.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Message(Message),
    Bundle(Bundle),
}

impl Packet {
    pub fn address(&self) -> &str {
        match self {
            Self::Message(message) => message.address(),
            Self::Bundle(bundle) => bundle.address(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Message(message) => message.encoded_len(),
            Self::Bundle(bundle) => bundle.encoded_len(),
        }
    }

    pub fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        match self {
            Self::Message(message) => message.write(buf),
            Self::Bundle(bundle) => bundle.write(buf),
        }
    }

    pub fn encode(&self) -> Result<Bytes, Error> {
        match self {
            Self::Message(message) => message.encode(),
            Self::Bundle(bundle) => bundle.encode(),
        }
    }
}

impl From<Message> for Packet {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<Bundle> for Packet {
    fn from(bundle: Bundle) -> Self {
        Self::Bundle(bundle)
    }
}

/// A time-tagged group of packets.
///
/// Invariant: a nested bundle's timetag is never earlier than its parent's.
/// Every mutation that introduces an item checks this and rejects the item
/// with [Error::TimetagOrder], leaving the bundle unmodified. Messages are
/// always insertable.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    timetag: TimeTag,
    items: Vec<Packet>,
}

impl Bundle {
    /// Creates an empty bundle for `timetag`.
    pub fn new(timetag: impl Into<TimeTag>) -> Self {
        Self {
            timetag: timetag.into(),
            items: Vec::new(),
        }
    }

    pub fn timetag(&self) -> TimeTag {
        self.timetag
    }

    fn check_insertable(&self, item: &Packet) -> Result<(), Error> {
        if let Packet::Bundle(nested) = item {
            if nested.timetag < self.timetag {
                return Err(Error::TimetagOrder);
            }
        }
        Ok(())
    }

    /// Appends a packet.
    pub fn push(&mut self, item: impl Into<Packet>) -> Result<(), Error> {
        let item = item.into();
        self.check_insertable(&item)?;
        self.items.push(item);
        Ok(())
    }

    /// Inserts a packet at `index`, shifting later packets right.
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, item: impl Into<Packet>) -> Result<(), Error> {
        let item = item.into();
        self.check_insertable(&item)?;
        self.items.insert(index, item);
        Ok(())
    }

    /// Replaces the packet at `index`, returning the previous one.
    ///
    /// Panics if `index >= len`.
    pub fn replace(&mut self, index: usize, item: impl Into<Packet>) -> Result<Packet, Error> {
        let item = item.into();
        self.check_insertable(&item)?;
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Removes and returns the packet at `index`.
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Packet {
        self.items.remove(index)
    }

    /// Removes all packets.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Packet> {
        self.items.get(index)
    }
}

impl Addressed for Bundle {
    type Item = Packet;

    fn address(&self) -> &str {
        BUNDLE_ADDRESS
    }

    fn items(&self) -> &[Packet] {
        &self.items
    }

    fn encoded_len(&self) -> usize {
        padded_len(BUNDLE_ADDRESS.len())
            + TimeTag::SIZE
            + self
                .items
                .iter()
                .map(|item| 4 + padded_len(item.encoded_len()))
                .sum::<usize>()
    }

    fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        write_str(BUNDLE_ADDRESS, buf)?;
        self.timetag.write(buf)?;
        for item in &self.items {
            // Each element travels as a length-prefixed blob so that
            // variable-length sub-packets are unambiguously delimited.
            write_blob(&item.encode()?, buf);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_empty_message_conformity() {
        let message = Message::new("/my/test");
        let encoded = message.encode().unwrap();
        assert_eq!(encoded.len(), message.encoded_len());
        assert_eq!(&encoded[..], b"/my/test\0\0\0\0,\0\0\0");
    }

    #[test]
    fn test_message_conformity() {
        let mut message = Message::new("/t");
        message.append(2);
        let encoded = message.encode().unwrap();
        assert_eq!(&encoded[..], b"/t\0\0,i\0\0\0\0\0\x02");
    }

    #[test]
    fn test_message_mutation() {
        let mut message = Message::new("/m");
        message.append(1);
        message.append("two");
        message.insert(0, true);
        assert_eq!(message.len(), 3);
        assert_eq!(message.tags().collect::<String>(), "Tis");

        let old = message.replace(1, 2.5f32);
        assert_eq!(old, Value::Int32(1));
        assert_eq!(message.get(1), Some(&Value::Float32(2.5)));

        assert_eq!(message.remove(0), Value::Bool(true));
        assert_eq!(message.len(), 2);

        message.clear();
        assert!(message.is_empty());
    }

    #[test]
    fn test_message_equality() {
        let mut a = Message::new("/x");
        a.append(1);
        let b = Message::with_args("/x", [Value::Int32(1)]);
        assert_eq!(a, b);

        // Same values, different tags: not equal.
        let c = Message::with_args("/x", [Value::Int64(1)]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_address_validated_at_encode() {
        assert!(matches!(
            Message::new("/bad\0addr").encode(),
            Err(Error::EmbeddedNul)
        ));
    }

    #[test]
    fn test_bundle_address() {
        let bundle = Bundle::new(TimeTag::Immediate);
        assert_eq!(bundle.address(), "#bundle");
    }

    #[test]
    fn test_bundle_ordering_invariant() {
        let early = TimeTag::Time(UNIX_EPOCH);
        let late = TimeTag::Time(UNIX_EPOCH + Duration::from_secs(60));

        let mut bundle = Bundle::new(late);

        // Messages are always insertable.
        bundle.push(Message::new("/ok")).unwrap();

        // A nested bundle with an earlier timetag is rejected; the bundle
        // is left unmodified.
        let result = bundle.push(Bundle::new(early));
        assert!(matches!(result, Err(Error::TimetagOrder)));
        assert_eq!(bundle.len(), 1);

        // Equal or later timetags are accepted.
        bundle.push(Bundle::new(late)).unwrap();
        bundle
            .push(Bundle::new(TimeTag::Time(
                UNIX_EPOCH + Duration::from_secs(120),
            )))
            .unwrap();
        assert_eq!(bundle.len(), 3);

        // Replace and insert run the same check.
        assert!(matches!(
            bundle.replace(0, Bundle::new(early)),
            Err(Error::TimetagOrder)
        ));
        assert!(matches!(
            bundle.insert(0, Bundle::new(early)),
            Err(Error::TimetagOrder)
        ));
        assert_eq!(bundle.len(), 3);
    }

    #[test]
    fn test_immediate_parent_accepts_all() {
        let mut bundle = Bundle::new(TimeTag::Immediate);
        bundle.push(Bundle::new(TimeTag::Immediate)).unwrap();
        bundle.push(Bundle::new(TimeTag::now())).unwrap();
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_bundle_wire_shape() {
        let mut bundle = Bundle::new(TimeTag::Immediate);
        bundle.push(Message::new("/a")).unwrap();

        let encoded = bundle.encode().unwrap();
        assert_eq!(encoded.len(), bundle.encoded_len());

        // "#bundle" + NUL, the (0, 1) sentinel, one length-prefixed blob.
        assert_eq!(&encoded[..8], b"#bundle\0");
        assert_eq!(&encoded[8..16], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&encoded[16..20], &[0, 0, 0, 8]);
        assert_eq!(&encoded[20..28], b"/a\0\0,\0\0\0");
        // Blob padding of the 8-byte element.
        assert_eq!(&encoded[28..], &[0, 0, 0, 0]);
    }
}
