//! # Key Material
//!
//! 32-byte Curve25519 public keys as they appear on a machine record.
//!
//! The store keeps each key as 64 lowercase hex characters. On the wire every
//! key type is rendered with its own text prefix (`mkey:`, `nodekey:`,
//! `discokey:`) so clients can tell them apart.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::MeshError;

/// Length of every public key in bytes.
pub const KEY_LEN: usize = 32;

macro_rules! public_key {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; KEY_LEN]);

        impl $name {
            /// Text prefix used in the wire encoding.
            pub const PREFIX: &'static str = $prefix;

            /// Parse the 64-character hex form kept by the store.
            pub fn from_hex(s: &str) -> Result<Self, MeshError> {
                parse_hex_key(s).map(Self)
            }

            /// The 64-character hex form kept by the store.
            #[must_use]
            pub fn hex_string(&self) -> String {
                hex::encode(self.0)
            }

            /// Whether this is the all-zero key.
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; KEY_LEN]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", Self::PREFIX, self.hex_string())
            }
        }

        impl FromStr for $name {
            type Err = MeshError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s.strip_prefix(Self::PREFIX).unwrap_or(s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
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

public_key!(
    /// Long-lived machine identity key. Immutable once registered.
    MachineKey,
    "mkey:"
);

public_key!(
    /// Rotating WireGuard session key.
    NodeKey,
    "nodekey:"
);

public_key!(
    /// Discovery key used for NAT traversal probes.
    DiscoKey,
    "discokey:"
);

fn parse_hex_key(s: &str) -> Result<[u8; KEY_LEN], MeshError> {
    let bytes =
        hex::decode(s).map_err(|e| MeshError::InvalidCredential(format!("{s:?}: {e}")))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        MeshError::InvalidCredential(format!(
            "expected {KEY_LEN} key bytes, got {}",
            b.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "0102030405060708091011121314151617181920212223242526272829303132";

    #[test]
    fn test_parse_hex_key() {
        let key = NodeKey::from_hex(HEX).unwrap();
        assert_eq!(key.0[0], 0x01);
        assert_eq!(key.0[31], 0x32);
        assert_eq!(key.hex_string(), HEX);
    }

    #[test]
    fn test_wire_text_has_prefix() {
        let key = MachineKey::from_hex(HEX).unwrap();
        assert_eq!(key.to_string(), format!("mkey:{HEX}"));
        let parsed: MachineKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_rejects_short_key() {
        let err = DiscoKey::from_hex("abcd").unwrap_err();
        assert!(matches!(err, MeshError::InvalidCredential(_)));
    }

    #[test]
    fn test_rejects_non_hex() {
        let err = NodeKey::from_hex(&"zz".repeat(32)).unwrap_err();
        assert!(matches!(err, MeshError::InvalidCredential(_)));
    }

    #[test]
    fn test_default_is_zero() {
        assert!(DiscoKey::default().is_zero());
        assert_eq!(
            serde_json::to_string(&DiscoKey::default()).unwrap(),
            format!("\"discokey:{}\"", "00".repeat(32))
        );
    }
}
