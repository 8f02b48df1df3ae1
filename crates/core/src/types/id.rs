//! Newtype IDs for type-safe entity references.
//!
//! Identifiers are 24-character hexadecimal object ids (a 4-byte creation
//! timestamp followed by 8 random bytes). Use the `define_id!` macro to create
//! type-safe wrappers that prevent accidentally mixing IDs from different
//! entity types.

use core::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ObjectId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is not exactly 24 characters long.
    #[error("id must be exactly {expected} characters, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a non-hexadecimal character.
    #[error("id must contain only hexadecimal characters")]
    InvalidCharacter,
}

/// A 24-character hexadecimal object identifier.
///
/// This is the store's native reference format. Parsing validates the format
/// before any store access happens; generation embeds the creation time in the
/// first four bytes so ids sort roughly by age.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Length of the hexadecimal representation.
    pub const LENGTH: usize = 24;

    /// Parse an `ObjectId` from a string, normalizing to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidLength`] if the input is not 24 characters,
    /// or [`IdError::InvalidCharacter`] if any character is not hexadecimal.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.len() != Self::LENGTH {
            return Err(IdError::InvalidLength {
                expected: Self::LENGTH,
                actual: s.len(),
            });
        }

        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IdError::InvalidCharacter);
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Generate a fresh id: 4 timestamp bytes followed by 8 random bytes.
    #[must_use]
    pub fn generate() -> Self {
        let seconds = chrono::Utc::now().timestamp();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let timestamp = (seconds as u32).to_be_bytes();
        let tail: [u8; 8] = rand::random();

        let mut hex = String::with_capacity(Self::LENGTH);
        for byte in timestamp.iter().chain(tail.iter()) {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }

        Self(hex)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Macro to define a type-safe ID wrapper around [`ObjectId`].
///
/// Creates a newtype with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`, `FromStr`
/// - Conversion methods: `generate()`, `parse()`, `as_str()`
///
/// # Example
///
/// ```rust
/// # use copperleaf_core::define_id;
/// define_id!(WarehouseId);
///
/// let id = WarehouseId::generate();
/// assert_eq!(id.as_str().len(), 24);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($crate::ObjectId);

        impl $name {
            /// Generate a fresh id.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::ObjectId::generate())
            }

            /// Parse an id, validating the 24-hex-character format.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is malformed.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                $crate::ObjectId::parse(s).map(Self)
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$crate::ObjectId> for $name {
            fn from(id: $crate::ObjectId) -> Self {
                Self(id)
            }
        }
    };
}

// Standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(CartId);
