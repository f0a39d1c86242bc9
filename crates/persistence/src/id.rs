//! Resource identifiers.
//!
//! Every stored record is keyed by a [`ResourceId`]: a 12-byte, time-ordered
//! identifier rendered as 24 lowercase hexadecimal characters. The layout is
//! the same one document databases use for their native object ids:
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 0..4  | Unix timestamp in seconds (big-endian) |
//! | 4..9  | Random value, fixed for the lifetime of the process |
//! | 9..12 | Counter (big-endian), seeded randomly, incremented per id |
//!
//! # Example
//!
//! ```
//! use carebase_store::id::ResourceId;
//!
//! let id = ResourceId::generate();
//! let hex = id.to_string();
//!
//! assert_eq!(hex.len(), 24);
//! assert!(ResourceId::is_valid(&hex));
//! assert_eq!(hex.parse::<ResourceId>().unwrap(), id);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of raw bytes in an identifier.
pub const ID_BYTES: usize = 12;

/// Length of the canonical hex rendering.
pub const ID_HEX_LEN: usize = ID_BYTES * 2;

const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| rand::random());

static COUNTER: LazyLock<AtomicU32> =
    LazyLock::new(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));

/// Error returned when a string is not a canonical identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid id")]
pub struct InvalidIdError {
    /// The rejected input.
    pub input: String,
}

/// An opaque, globally unique, time-ordered resource identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId([u8; ID_BYTES]);

impl ResourceId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let secs = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Builds an identifier from raw bytes.
    pub fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn bytes(&self) -> [u8; ID_BYTES] {
        self.0
    }

    /// Returns true if `candidate` is a canonical identifier: exactly 24
    /// lowercase hexadecimal characters.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() == ID_HEX_LEN
            && candidate
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    /// Parses a canonical identifier.
    pub fn parse(candidate: &str) -> Result<Self, InvalidIdError> {
        if !Self::is_valid(candidate) {
            return Err(InvalidIdError {
                input: candidate.to_string(),
            });
        }

        let mut bytes = [0u8; ID_BYTES];
        hex::decode_to_slice(candidate, &mut bytes).map_err(|_| InvalidIdError {
            input: candidate.to_string(),
        })?;
        Ok(Self(bytes))
    }

    /// Returns the creation time encoded in the leading four bytes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(secs as i64, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Returns the canonical hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self)
    }
}

impl FromStr for ResourceId {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
