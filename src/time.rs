//! Timetag codec.
//!
//! An OSC timetag is two unsigned 32-bit big-endian words: whole seconds
//! since 1900-01-01T00:00:00 and a binary fraction of one second with
//! denominator 2^32 (the NTP fixed-point scheme). The reserved word pair
//! `(0, 1)` is not an instant at all: it is the "immediate" sentinel,
//! meaning "apply without delay".

use crate::{error::Error, primitives::read_u32};
use bytes::{Buf, BufMut};
use std::{
    cmp::Ordering,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
const SECS_1900_TO_1970: u64 = 2_208_988_800;

/// Fixed-point denominator for the fractional word: one second is 2^32 units.
const FRAC_PER_SEC: u64 = 1 << 32;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// The NTP epoch as a [SystemTime].
fn ntp_epoch() -> SystemTime {
    UNIX_EPOCH - Duration::from_secs(SECS_1900_TO_1970)
}

/// When a bundle's contents should take effect.
///
/// `Immediate` is the ASAP sentinel: every `Immediate` compares equal to
/// every other, no matter when each was produced, so immediate packets
/// round-trip cleanly. For ordering purposes it sorts before every concrete
/// instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeTag {
    /// Apply as soon as possible.
    Immediate,
    /// Apply at the given instant.
    Time(SystemTime),
}

impl TimeTag {
    /// Encoded size in bytes: two 32-bit words.
    pub const SIZE: usize = 8;

    /// A timetag for the current instant.
    pub fn now() -> Self {
        Self::Time(SystemTime::now())
    }

    /// Writes the two-word wire form.
    ///
    /// Fails if the instant precedes the NTP epoch or its seconds do not fit
    /// in 32 bits (past 2036).
    pub fn write(&self, buf: &mut impl BufMut) -> Result<(), Error> {
        let (seconds, fraction) = match self {
            Self::Immediate => (0, 1),
            Self::Time(instant) => {
                let since = instant
                    .duration_since(ntp_epoch())
                    .map_err(|_| Error::TimeOutOfRange)?;
                let seconds =
                    u32::try_from(since.as_secs()).map_err(|_| Error::TimeOutOfRange)?;
                // Round nanoseconds to 2^-32 second units. The result is
                // always < 2^32 because nanos < 10^9.
                let fraction = (since.subsec_nanos() as u64 * FRAC_PER_SEC
                    + NANOS_PER_SEC / 2)
                    / NANOS_PER_SEC;
                (seconds, fraction as u32)
            }
        };
        buf.put_u32(seconds);
        buf.put_u32(fraction);
        Ok(())
    }

    /// Reads the two-word wire form, mapping the reserved `(0, 1)` pair to
    /// [TimeTag::Immediate].
    pub fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        let seconds = read_u32(buf)?;
        let fraction = read_u32(buf)?;
        if seconds == 0 && fraction == 1 {
            return Ok(Self::Immediate);
        }
        let nanos = (fraction as u64 * NANOS_PER_SEC + FRAC_PER_SEC / 2) / FRAC_PER_SEC;
        Ok(Self::Time(
            ntp_epoch() + Duration::new(seconds as u64, 0) + Duration::from_nanos(nanos),
        ))
    }
}

impl From<SystemTime> for TimeTag {
    fn from(instant: SystemTime) -> Self {
        Self::Time(instant)
    }
}

impl PartialOrd for TimeTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeTag {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Immediate, Self::Immediate) => Ordering::Equal,
            (Self::Immediate, Self::Time(_)) => Ordering::Less,
            (Self::Time(_), Self::Immediate) => Ordering::Greater,
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
        }
    }
}
