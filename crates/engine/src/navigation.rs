//! Browser navigators.
//!
//! Browsers only let a page open a new tab while the user gesture that
//! triggered it is still being handled. Two strategies cope with that:
//!
//! - [`DeferredNavigator`] opens a blank placeholder tab *before* its first
//!   suspension point, then resolves asynchronously and redirects the tab.
//! - [`ImmediateNavigator`] resolves synchronously from local hints and opens
//!   the link through a transient `target=_blank` anchor, avoiding the
//!   heuristics that block delayed `window.open` calls.
//!
//! ```text
//! deferred:  Idle ─▶ Rejected
//!                 └▶ Blocked
//!                 └▶ PlaceholderOpened ─▶ Resolving ─▶ Redirected
//!                                                  └─▶ FallbackRedirected
//!                                                  └─▶ ClosedWithError
//! immediate: Idle ─▶ Rejected
//!                 └▶ BuildAttempted ─▶ Clicked | FallbackClicked | HardError
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use linking::{
    BrowserHost, ElementId, ElementReference, NavigationError, NavigationId, NavigationListener,
    PlaceholderTab, ResolutionContext,
};
use tracing::{error, info, info_span, warn, Instrument};

use crate::resolver::LinkResolver;

/// Terminal state of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The element id was invalid; nothing was opened.
    Rejected,
    /// The browser refused to open the placeholder tab.
    Blocked,
    /// The placeholder tab now shows the resolved link.
    Redirected { url: String },
    /// The placeholder tab shows the `simple-element` fallback link.
    FallbackRedirected { url: String },
    /// Every redirect failed; the placeholder tab was closed.
    ClosedWithError,
    /// The resolved link was opened through an anchor click.
    Clicked { url: String },
    /// The `simple-element` fallback link was opened through an anchor click.
    FallbackClicked { url: String },
    /// Even the fallback anchor click failed.
    HardError,
}

impl NavigationOutcome {
    /// The URL the user ended up on, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            NavigationOutcome::Redirected { url }
            | NavigationOutcome::FallbackRedirected { url }
            | NavigationOutcome::Clicked { url }
            | NavigationOutcome::FallbackClicked { url } => Some(url.as_str()),
            NavigationOutcome::Rejected
            | NavigationOutcome::Blocked
            | NavigationOutcome::ClosedWithError
            | NavigationOutcome::HardError => None,
        }
    }

    /// `true` for the fallback outcomes.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::FallbackRedirected { .. } | NavigationOutcome::FallbackClicked { .. }
        )
    }
}

/// A navigation strategy the UI layer can inject.
#[async_trait]
pub trait NavigationPort: Send + Sync {
    /// Opens the deep link for `reference` in a new tab, reporting problems
    /// to `listener`.
    async fn navigate(
        &self,
        reference: &ElementReference,
        context: &ResolutionContext,
        listener: &dyn NavigationListener,
    ) -> NavigationOutcome;
}

fn reject(error: linking::LinkError, listener: &dyn NavigationListener) -> NavigationOutcome {
    warn!(%error, "Navigation rejected");
    listener.on_error(&NavigationError::InvalidElement(error));
    NavigationOutcome::Rejected
}

// ---------------------------------------------------------------------------
// Deferred / placeholder strategy
// ---------------------------------------------------------------------------

/// Opens a placeholder tab first, then resolves (possibly over the network)
/// and redirects it.
pub struct DeferredNavigator {
    resolver: Arc<LinkResolver>,
    browser: Arc<dyn BrowserHost>,
}

impl DeferredNavigator {
    pub fn new(resolver: Arc<LinkResolver>, browser: Arc<dyn BrowserHost>) -> Self {
        Self { resolver, browser }
    }

    async fn run(
        &self,
        reference: &ElementReference,
        context: &ResolutionContext,
        listener: &dyn NavigationListener,
    ) -> NavigationOutcome {
        let element_id = match ElementId::parse(&reference.element_id) {
            Ok(id) => id,
            Err(error) => return reject(error, listener),
        };

        // Must happen before the first await.
        let Some(mut tab) = self.browser.open_blank_tab() else {
            error!("Browser blocked the placeholder tab");
            listener.on_error(&NavigationError::PopupBlocked);
            return NavigationOutcome::Blocked;
        };

        let reason = match self.resolver.resolve_async(reference, context).await {
            Ok(Some(link)) => match tab.set_location(&link.url) {
                Ok(()) => {
                    info!(intent = %link.intent, "Placeholder tab redirected");
                    return NavigationOutcome::Redirected { url: link.url };
                }
                Err(error) => {
                    warn!(%error, "Redirect to resolved link failed");
                    "Could not open the element's document view"
                }
            },
            Ok(None) => "Could not determine the element's view",
            Err(error) => {
                warn!(%error, "Resolution failed");
                "Could not resolve the element's view"
            }
        };

        self.redirect_to_fallback(tab, &element_id, reason, listener)
    }

    fn redirect_to_fallback(
        &self,
        mut tab: Box<dyn PlaceholderTab>,
        element_id: &ElementId,
        reason: &str,
        listener: &dyn NavigationListener,
    ) -> NavigationOutcome {
        let fallback = match self.resolver.builder().fallback_url(element_id.as_str()) {
            Ok(url) => url,
            Err(error) => {
                tab.close();
                listener.on_error(&NavigationError::InvalidElement(error));
                return NavigationOutcome::ClosedWithError;
            }
        };
        match tab.set_location(&fallback) {
            Ok(()) => {
                warn!(reason, "Placeholder tab redirected to fallback view");
                listener.on_warning(&format!("{reason}; opened the plain element view instead"));
                NavigationOutcome::FallbackRedirected { url: fallback }
            }
            Err(error) => {
                error!(%error, "Fallback redirect failed; closing placeholder tab");
                tab.close();
                listener.on_error(&NavigationError::RedirectFailed {
                    url: fallback,
                    message: error.to_string(),
                });
                NavigationOutcome::ClosedWithError
            }
        }
    }
}

#[async_trait]
impl NavigationPort for DeferredNavigator {
    async fn navigate(
        &self,
        reference: &ElementReference,
        context: &ResolutionContext,
        listener: &dyn NavigationListener,
    ) -> NavigationOutcome {
        let navigation_id = NavigationId::new_random();
        let span = info_span!(
            "navigate",
            strategy = "deferred",
            %navigation_id,
            element_id = %reference.element_id.trim()
        );
        self.run(reference, context, listener).instrument(span).await
    }
}

// ---------------------------------------------------------------------------
// Immediate / anchor strategy
// ---------------------------------------------------------------------------

/// Resolves from local hints and opens the link synchronously through an
/// anchor click. Only suitable when the caller already has enough context.
pub struct ImmediateNavigator {
    resolver: Arc<LinkResolver>,
    browser: Arc<dyn BrowserHost>,
}

impl ImmediateNavigator {
    pub fn new(resolver: Arc<LinkResolver>, browser: Arc<dyn BrowserHost>) -> Self {
        Self { resolver, browser }
    }

    /// Runs the whole navigation without suspending.
    pub fn navigate_now(
        &self,
        reference: &ElementReference,
        context: &ResolutionContext,
        listener: &dyn NavigationListener,
    ) -> NavigationOutcome {
        let navigation_id = NavigationId::new_random();
        let _span = info_span!(
            "navigate",
            strategy = "immediate",
            %navigation_id,
            element_id = %reference.element_id.trim()
        )
        .entered();

        let element_id = match ElementId::parse(&reference.element_id) {
            Ok(id) => id,
            Err(error) => return reject(error, listener),
        };

        let reason = match self.resolver.resolve(reference, context) {
            Ok(link) => match self.browser.click_anchor(&link.url) {
                Ok(()) => {
                    info!(intent = %link.intent, "Opened link via anchor");
                    return NavigationOutcome::Clicked { url: link.url };
                }
                Err(error) => {
                    warn!(%error, "Anchor click failed for resolved link");
                    "Could not open the element's document view"
                }
            },
            Err(error) => {
                warn!(%error, "Could not build link");
                "Could not build a link to the element's view"
            }
        };

        let fallback = match self.resolver.builder().fallback_url(element_id.as_str()) {
            Ok(url) => url,
            Err(error) => return reject(error, listener),
        };
        match self.browser.click_anchor(&fallback) {
            Ok(()) => {
                warn!(reason, "Opened fallback view via anchor");
                listener.on_warning(&format!("{reason}; opened the plain element view instead"));
                NavigationOutcome::FallbackClicked { url: fallback }
            }
            Err(error) => {
                error!(%error, "Fallback anchor click failed");
                listener.on_error(&NavigationError::AnchorFailed {
                    url: fallback,
                    message: error.to_string(),
                });
                NavigationOutcome::HardError
            }
        }
    }
}

#[async_trait]
impl NavigationPort for ImmediateNavigator {
    async fn navigate(
        &self,
        reference: &ElementReference,
        context: &ResolutionContext,
        listener: &dyn NavigationListener,
    ) -> NavigationOutcome {
        self.navigate_now(reference, context, listener)
    }
}
