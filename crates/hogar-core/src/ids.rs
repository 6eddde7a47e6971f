//! Newtype IDs for type-safe identifiers.
//!
//! Identifiers are integers, the way the storefront's records and the
//! hosted product table key them. New local identities are derived from the
//! wall clock in milliseconds and bumped past any identity already in use,
//! so two records created within the same millisecond still differ.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate integer newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create an ID from its raw value.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(ProductId);
define_id!(ReviewId);

/// Next clock-derived identity strictly greater than `floor`.
pub(crate) fn next_timestamp_id(floor: i64) -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    now.max(floor.saturating_add(1))
}
