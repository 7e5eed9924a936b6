//! Strongly-typed identifiers for rating entities
//!
//! Using newtype wrappers around UUIDs provides type safety and prevents
//! accidental mixing of different identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Rate data identifiers
define_id!(RateTableId, "RTB");
define_id!(CarrierId, "CAR");

// Audit identifiers
define_id!(RatingRunId, "RUN");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_prefix() {
        let id = RateTableId::new();
        assert!(id.to_string().starts_with("RTB-"));
    }

    #[test]
    fn test_from_str_accepts_prefixed_and_bare() {
        let id = RatingRunId::new();
        let prefixed: RatingRunId = id.to_string().parse().unwrap();
        let bare: RatingRunId = id.as_uuid().to_string().parse().unwrap();
        assert_eq!(id, prefixed);
        assert_eq!(id, bare);
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CarrierId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: CarrierId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
