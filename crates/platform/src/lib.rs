//! Rental-platform infrastructure adapters.
//!
//! Implements the [`linking::SecretSource`] and [`linking::MetadataSource`]
//! ports over HTTP:
//!
//! - [`SecretClient`] exchanges a configured secret name for the platform API
//!   token at the secret-resolution endpoint.
//! - [`ElementClient`] looks up an element's key information and decodes it
//!   into [`linking::SchemaMetadata`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, request formatting and response
//! parsing live here. The [`linking`] and `engine` crates see only the port
//! traits.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |---|---|
//! | [`config`] | [`PlatformConfig`] and HTTP client construction |
//! | [`error`] | [`PlatformError`] |
//! | [`secrets`] | [`SecretClient`] |
//! | [`elements`] | [`ElementClient`] |

pub mod config;
pub mod elements;
pub mod error;
pub mod secrets;

pub use config::PlatformConfig;
pub use elements::ElementClient;
pub use error::PlatformError;
pub use secrets::SecretClient;
