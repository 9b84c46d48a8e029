//! Strongly-typed identifiers used across the workspace.
//!
//! The engine never touches live database records; callers hand it opaque
//! identifiers and get them back in results. Each identifier is a thin uuid
//! newtype so ids of different entities cannot be mixed up.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when parsing an identifier from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id: {value:?}")]
pub struct ParseIdError {
    kind: &'static str,
    value: String,
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a fresh random identifier.
            ///
            /// Prefer passing ids in explicitly where determinism matters.
            #[must_use]
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing uuid.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying uuid.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self).map_err(|_| ParseIdError {
                    kind: $label,
                    value: s.to_string(),
                })
            }
        }
    };
}

id_type!(
    /// Identifier of the product whose layers are revalued.
    ProductId,
    "product"
);
id_type!(
    /// Identifier of the company owning the valuation.
    CompanyId,
    "company"
);
id_type!(
    /// Identifier of an account in the chart of accounts.
    AccountId,
    "account"
);
id_type!(
    /// Identifier of one cost layer record.
    LayerId,
    "layer"
);
id_type!(
    /// Identifier of a posted accounting entry.
    EntryId,
    "entry"
);
