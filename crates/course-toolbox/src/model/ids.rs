//! Opaque identifiers for course items and sections.
//!
//! Identifiers are server-assigned tokens. The wire format is not consistent
//! about their type (the same id may arrive as `"12"` or `12`), so both forms
//! deserialize to the same normalized string and compare equal.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like token.
            pub fn new(token: impl Into<String>) -> Self {
                Self(token.into().trim().to_string())
            }

            /// The normalized token.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Read an identifier from a loosely typed JSON value.
            ///
            /// Strings and integers are accepted; anything else yields `None`.
            pub fn from_json(value: &serde_json::Value) -> Option<Self> {
                match value {
                    serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self::new(s.as_str())),
                    serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value.to_string())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Text(String),
                    Signed(i64),
                    Unsigned(u64),
                }

                Ok(match Raw::deserialize(deserializer)? {
                    Raw::Text(s) => Self::new(s),
                    Raw::Signed(n) => Self(n.to_string()),
                    Raw::Unsigned(n) => Self(n.to_string()),
                })
            }
        }
    };
}

opaque_id! {
    /// Identifier of one course activity or resource (a course module).
    ItemId
}

opaque_id! {
    /// Identifier of one course section.
    SectionId
}
