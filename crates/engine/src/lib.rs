//! Link-resolution orchestration.
//!
//! This crate sequences calls between the pure domain in [`linking`] and the
//! ports it defines: it owns the single-flight [`CredentialCache`], the
//! [`LinkResolver`] (synchronous and asynchronous entry points), and the two
//! browser navigators.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** No classification or URL rules live here; they
//! belong to [`linking`]. No HTTP or DOM code lives here either; that is
//! supplied through [`linking::SecretSource`], [`linking::MetadataSource`]
//! and [`linking::BrowserHost`].
//!
//! ## Concurrency
//!
//! The only suspension points are the credential fetch and the metadata
//! fetch. Concurrent resolutions that need a token before one is cached share
//! a single secret fetch.

pub mod credentials;
#[cfg(any(test, feature = "test-support"))]
pub mod fakes;
pub mod navigation;
pub mod resolver;

use std::sync::Arc;
use std::time::Duration;

use linking::{MetadataSource, SecretSource, UrlBuilder};
use serde::{Deserialize, Serialize};

pub use credentials::{CacheState, CredentialCache};
pub use navigation::{DeferredNavigator, ImmediateNavigator, NavigationOutcome, NavigationPort};
pub use resolver::LinkResolver;

/// Orchestration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on one secret fetch. `None` waits indefinitely.
    pub credential_timeout_secs: Option<u64>,
}

impl EngineConfig {
    pub fn credential_timeout(&self) -> Option<Duration> {
        self.credential_timeout_secs.map(Duration::from_secs)
    }
}

/// Wires a resolver and its credential cache from ports and settings.
pub fn build_resolver(
    config: &EngineConfig,
    builder: UrlBuilder,
    secrets: Arc<dyn SecretSource>,
    metadata: Arc<dyn MetadataSource>,
) -> LinkResolver {
    let mut cache = CredentialCache::new(secrets);
    if let Some(timeout) = config.credential_timeout() {
        cache = cache.with_timeout(timeout);
    }
    LinkResolver::new(builder, Arc::new(cache), metadata)
}
