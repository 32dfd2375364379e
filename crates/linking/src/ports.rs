//! Port traits implemented by infrastructure and UI layers.
//!
//! The engine depends only on these traits. `crates/platform` implements the
//! two network ports over HTTP; a UI layer implements the browser ports over
//! whatever windowing primitives it has.

use async_trait::async_trait;

use crate::{AuthToken, BrowserError, CredentialError, ElementId, NavigationError, SchemaMetadata};

// ---------------------------------------------------------------------------
// Network ports
// ---------------------------------------------------------------------------

/// Fetches the external-platform auth token from the secret-resolution
/// endpoint.
///
/// Called at most once per cache fill by the credential cache; implementors
/// need no caching or de-duplication of their own.
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AuthToken, CredentialError>;
}

/// Looks up the classification fields of one element.
///
/// Implementations must swallow every failure (transport, non-2xx status,
/// undecodable body), log it, and return `None`. The resolver then carries on
/// with whatever local hints it already had.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, element_id: &ElementId, token: &AuthToken)
        -> Option<SchemaMetadata>;
}

// ---------------------------------------------------------------------------
// Browser ports
// ---------------------------------------------------------------------------

/// A blank tab opened ahead of resolution.
///
/// Exclusively owned by the navigation call that opened it.
pub trait PlaceholderTab: Send {
    /// Points the tab at `url`.
    fn set_location(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Closes the tab. Consumes the handle: a closed tab cannot be redirected.
    fn close(self: Box<Self>);
}

/// Windowing primitives a navigator needs from the host browser.
pub trait BrowserHost: Send + Sync {
    /// Opens a blank tab. Must be called while the user gesture that
    /// authorises opening tabs is still active. `None` means the browser
    /// blocked it.
    fn open_blank_tab(&self) -> Option<Box<dyn PlaceholderTab>>;

    /// Opens `url` in a new tab by creating a `target=_blank` anchor,
    /// clicking it, and removing it again.
    fn click_anchor(&self, url: &str) -> Result<(), BrowserError>;
}

/// Receives user-facing reports from a navigator.
pub trait NavigationListener: Send + Sync {
    /// A fatal failure: nothing (or only a closed tab) came of the click.
    fn on_error(&self, error: &NavigationError);

    /// A degraded but successful navigation (e.g. fallback URL used).
    fn on_warning(&self, message: &str);
}
