//! Deep-link domain for the external rental platform.
//!
//! This crate decides *which view* an element of the external platform opens
//! in and builds the deep-link URL for it. It contains the schema intents,
//! the identifier registries, the intent classifier, the URL builder, the
//! metadata decoder, and the port traits the orchestration layer drives.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; `crates/platform` and the UI layer define
//! *how* to supply it, and `crates/engine` sequences the calls.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ElementId`, `DefinitionId`, `AuthToken`, ...) |
//! | [`types`] | `SchemaIntent`, `ViewHint`, caller inputs, resolver output |
//! | [`errors`] | Error taxonomy |
//! | [`registries`] | Static definition-id, category and domain tables |
//! | [`classifier`] | `Hints` and the precedence-ordered `classify` |
//! | [`metadata`] | Defensive element-metadata decoder |
//! | [`url`] | `UrlBuilder` and its templates |
//! | [`ports`] | Network and browser port traits |

pub mod classifier;
pub mod errors;
pub mod identifiers;
pub mod metadata;
pub mod ports;
pub mod registries;
pub mod types;
pub mod url;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classifier::{classify, Classification, ClassifierDefault, Hints, MatchedRule};
pub use errors::{BrowserError, CredentialError, LinkError, NavigationError};
pub use identifiers::{AuthToken, DefinitionId, DomainId, ElementId, NavigationId, SchemaId};
pub use metadata::{decode_field, DecodedField, MetadataField, SchemaMetadata};
pub use ports::{BrowserHost, MetadataSource, NavigationListener, PlaceholderTab, SecretSource};
pub use registries::DomainSignal;
pub use types::{
    ElementReference, FolderType, HintSource, JobType, ResolutionContext, ResolvedLink,
    SchemaIntent, Timestamp, UnknownVariant, ViewHint,
};
pub use url::{UrlBuilder, UrlTemplates};
