#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use oscwire::{parse, Bundle, Message, MidiMessage, Packet, Rgba, TimeTag, Value};
use std::time::{Duration, UNIX_EPOCH};

/// Arbitrary-derivable stand-in for [Value].
#[derive(Arbitrary, Debug)]
enum FuzzValue {
    Int32(i32),
    Float32(f32),
    Str(String),
    Blob(Vec<u8>),
    Int64(i64),
    Float64(f64),
    Symbol(String),
    Char(char),
    Color(u8, u8, u8, u8),
    Midi(u8, u8, u8, u8),
    Bool(bool),
    Nil,
    Infinity,
    Immediate,
    Time(u32, u32),
}

fn build(value: FuzzValue) -> Value {
    match value {
        FuzzValue::Int32(v) => Value::Int32(v),
        // NaN never compares equal, which would fail the round-trip
        // assertion for reasons unrelated to the codec.
        FuzzValue::Float32(v) => Value::Float32(if v.is_nan() { 0.0 } else { v }),
        FuzzValue::Str(s) => Value::Str(s),
        FuzzValue::Blob(b) => Value::from(b),
        FuzzValue::Int64(v) => Value::Int64(v),
        FuzzValue::Float64(v) => Value::Float64(if v.is_nan() { 0.0 } else { v }),
        FuzzValue::Symbol(s) => Value::Symbol(s),
        FuzzValue::Char(c) => Value::Char(c),
        FuzzValue::Color(r, g, b, a) => Value::Color(Rgba::new(r, g, b, a)),
        FuzzValue::Midi(p, s, d1, d2) => Value::Midi(MidiMessage::new(p, s, d1, d2)),
        FuzzValue::Bool(v) => Value::Bool(v),
        FuzzValue::Nil => Value::Nil,
        FuzzValue::Infinity => Value::Infinity,
        FuzzValue::Immediate => Value::Time(TimeTag::Immediate),
        FuzzValue::Time(seconds, nanos) => {
            // Keep the instant inside the 32-bit seconds-since-1900 window.
            let instant = UNIX_EPOCH
                + Duration::new((seconds % 2_000_000_000) as u64, nanos % 1_000_000_000);
            Value::Time(TimeTag::Time(instant))
        }
    }
}

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    /// Hostile bytes: parsing may fail but must never panic.
    Parse(Vec<u8>),
    /// A constructed message: if it encodes, it must round-trip.
    Message(String, Vec<FuzzValue>),
    /// A constructed bundle of messages.
    Bundle(bool, Vec<(String, Vec<FuzzValue>)>),
}

fn roundtrip(packet: Packet) {
    // Encoding rejects addresses and strings with embedded NULs or
    // non-ASCII data; any encodable packet must parse back identically.
    if let Ok(encoded) = packet.encode() {
        let decoded = parse(&encoded).expect("failed to parse a successfully encoded packet!");
        assert_eq!(decoded, packet);
    }
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Parse(data) => {
            let _ = parse(&data);
        }
        FuzzInput::Message(address, values) => {
            if address == "#bundle" {
                return;
            }
            let message =
                Message::with_args(address, values.into_iter().map(build));
            roundtrip(Packet::Message(message));
        }
        FuzzInput::Bundle(immediate, messages) => {
            let timetag = if immediate {
                TimeTag::Immediate
            } else {
                TimeTag::Time(UNIX_EPOCH + Duration::from_secs(1_000_000_000))
            };
            let mut bundle = Bundle::new(timetag);
            for (address, values) in messages {
                if address == "#bundle" {
                    return;
                }
                let message = Message::with_args(address, values.into_iter().map(build));
                bundle.push(message).expect("messages are always insertable");
            }
            roundtrip(Packet::Bundle(bundle));
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
