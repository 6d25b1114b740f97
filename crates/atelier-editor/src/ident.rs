// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record and snapshot identifiers.
//!
//! Ids are 32-byte BLAKE3 digests over a domain-separated input, rendered as
//! lowercase hex. Each owner has exactly one record, whose id is derived from
//! the owner label so a saved record reopens under the same id. A snapshot id
//! is derived from the owning record id plus a per-record sequence number that
//! is never reused.

use core::fmt;
use core::str::FromStr;

use blake3::Hasher;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Raw 256-bit digest.
pub type Hash = [u8; 32];

/// Text did not decode to a 32-byte id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id {0:?}: expected 64 hex characters")]
pub struct ParseIdError(pub String);

fn parse_hash(s: &str) -> Result<Hash, ParseIdError> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out).map_err(|_| ParseIdError(s.to_owned()))?;
    Ok(out)
}

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub Hash);

        impl $name {
            /// Returns the canonical byte representation of this id.
            pub fn as_bytes(&self) -> &Hash {
                &self.0
            }

            /// First 8 bytes as hex, for compact display.
            pub fn short(&self) -> String {
                hex::encode(&self.0[..8])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.short())
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hash(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_id! {
    /// Stable identity of an edited record. Immutable for the record's lifetime.
    RecordId
}

hex_id! {
    /// Identity of a saved snapshot.
    SnapshotId
}

/// Produces the id of `owner`'s record (prefix `b"record:"`).
///
/// Deterministic: one owner maps to one record across sessions.
pub fn make_record_id(owner: &str) -> RecordId {
    let mut hasher = Hasher::new();
    hasher.update(b"record:");
    hasher.update(owner.as_bytes());
    RecordId(hasher.finalize().into())
}

/// Produces the id of the `seq`-th snapshot taken of `record` (prefix `b"snapshot:"`).
pub fn make_snapshot_id(record: &RecordId, seq: u64) -> SnapshotId {
    let mut hasher = Hasher::new();
    hasher.update(b"snapshot:");
    hasher.update(record.as_bytes());
    hasher.update(&seq.to_le_bytes());
    SnapshotId(hasher.finalize().into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_are_stable_per_owner() {
        assert_eq!(make_record_id("user-7"), make_record_id("user-7"));
        assert_ne!(make_record_id("user-7"), make_record_id("user-8"));
        assert_ne!(make_record_id("user-7"), make_record_id("user-7 "));
    }

    #[test]
    fn snapshot_ids_differ_by_sequence_and_record() {
        let a = make_record_id("a");
        let b = make_record_id("b");
        assert_ne!(make_snapshot_id(&a, 1), make_snapshot_id(&a, 2));
        assert_ne!(make_snapshot_id(&a, 1), make_snapshot_id(&b, 1));
    }

    #[test]
    fn display_parses_back() {
        let id = make_snapshot_id(&make_record_id("x"), 3);
        let text = id.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.starts_with(&id.short()));
        assert_eq!(text.parse::<SnapshotId>().unwrap(), id);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!("missing-id".parse::<SnapshotId>().is_err());
        assert!("abcd".parse::<RecordId>().is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = make_record_id("owner");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
