//! Newtype identifiers for elements and classification evidence.
//!
//! Every identifier that reaches the classifier or the URL builder is wrapped
//! in a distinct newtype. String-backed identifiers are trimmed on
//! construction and can never be empty, so an [`ElementId`] in hand is proof
//! that input validation already happened.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LinkError;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from trimmed input, returning `None`
            /// if nothing but whitespace remains.
            pub fn new(value: impl AsRef<str>) -> Option<Self> {
                let v = value.as_ref().trim();
                if v.is_empty() { None } else { Some(Self(v.to_owned())) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = LinkError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value).ok_or(LinkError::InvalidInput {
                    field: stringify!($name),
                })
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (assigned by the external platform)
// ---------------------------------------------------------------------------

string_id! {
    /// Opaque identifier of an element in the external platform (folder,
    /// financial document, crew list, ...).
    ElementId
}

impl ElementId {
    /// Validates a raw caller-supplied element id.
    ///
    /// This is the first step of every entry point: the builder, both
    /// resolvers and both navigators call it before doing anything else.
    pub fn parse(raw: &str) -> Result<Self, LinkError> {
        Self::new(raw).ok_or(LinkError::InvalidInput { field: "elementId" })
    }
}

string_id! {
    /// Per-template-type identifier the platform assigns to every element
    /// created from that template.
    DefinitionId
}

string_id! {
    /// Coarse category string, as returned by tree-listing calls.
    DomainId
}

string_id! {
    /// Free-form schema name. Normalised to lower-kebab-case before lookup.
    SchemaId
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single navigation attempt.
///
/// Generated fresh for every navigator call and recorded on its tracing span
/// so the placeholder-tab lifecycle of one click can be correlated in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationId(Uuid);

impl NavigationId {
    /// Generates a new random navigation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for NavigationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// External-platform auth token.
///
/// `Debug` and `Display` are redacted; use [`AuthToken::expose`] at the one
/// place the raw value is needed (the request header).
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a token, returning `None` for an empty or whitespace-only value.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let v = value.as_ref().trim();
        if v.is_empty() {
            None
        } else {
            Some(Self(v.to_owned()))
        }
    }

    /// Returns the raw token value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

impl std::fmt::Display for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}
