//! In-memory port implementations for tests.
//!
//! Every fake counts its calls so tests can assert how much network traffic
//! a resolution would have caused.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use linking::{
    AuthToken, BrowserError, BrowserHost, CredentialError, ElementId, MetadataSource,
    NavigationError, NavigationListener, PlaceholderTab, SchemaMetadata, SecretSource,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Secret source
// ---------------------------------------------------------------------------

/// Scripted [`SecretSource`]. Responses are consumed in order; the last one
/// repeats forever.
pub struct FakeSecretSource {
    responses: Mutex<VecDeque<Result<AuthToken, CredentialError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeSecretSource {
    /// Always returns `token`.
    pub fn ok(token: &str) -> Self {
        let token = AuthToken::new(token).ok_or(CredentialError::MissingToken);
        Self::scripted(vec![token])
    }

    /// Always fails with `error`.
    pub fn failing(error: CredentialError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    /// Returns `responses` in order, repeating the last.
    pub fn scripted(responses: Vec<Result<AuthToken, CredentialError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Result<AuthToken, CredentialError> {
        let mut responses = lock(&self.responses);
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.unwrap_or(Err(CredentialError::MissingToken))
    }
}

#[async_trait]
impl SecretSource for FakeSecretSource {
    async fn fetch_token(&self) -> Result<AuthToken, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_response()
    }
}

// ---------------------------------------------------------------------------
// Metadata source
// ---------------------------------------------------------------------------

/// [`MetadataSource`] returning a fixed answer.
pub struct FakeMetadataSource {
    response: Option<SchemaMetadata>,
    calls: AtomicUsize,
    seen_tokens: Mutex<Vec<String>>,
}

impl FakeMetadataSource {
    /// Answers every lookup with `metadata`.
    pub fn returning(metadata: SchemaMetadata) -> Self {
        Self {
            response: Some(metadata),
            calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like an endpoint that always fails (the port reports `None`).
    pub fn unavailable() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Number of lookups made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Raw token values the lookups were authorised with.
    pub fn seen_tokens(&self) -> Vec<String> {
        lock(&self.seen_tokens).clone()
    }
}

#[async_trait]
impl MetadataSource for FakeMetadataSource {
    async fn fetch_metadata(
        &self,
        _element_id: &ElementId,
        token: &AuthToken,
    ) -> Option<SchemaMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.seen_tokens).push(token.expose().to_owned());
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

/// Something a [`RecordingBrowser`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    TabOpened,
    TabBlocked,
    LocationSet(String),
    LocationRejected(String),
    TabClosed,
    AnchorClicked(String),
    AnchorRejected(String),
}

/// [`BrowserHost`] that records every primitive call.
///
/// Failures are injected by count: the first `n` location changes (or anchor
/// clicks) fail, later ones succeed.
#[derive(Clone, Default)]
pub struct RecordingBrowser {
    events: Arc<Mutex<Vec<BrowserEvent>>>,
    block_popups: bool,
    failing_redirects: Arc<AtomicUsize>,
    failing_clicks: Arc<AtomicUsize>,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `open_blank_tab` returns `None`.
    pub fn blocking_popups(mut self) -> Self {
        self.block_popups = true;
        self
    }

    /// The first `n` `set_location` calls fail.
    pub fn failing_redirects(self, n: usize) -> Self {
        self.failing_redirects.store(n, Ordering::SeqCst);
        self
    }

    /// The first `n` `click_anchor` calls fail.
    pub fn failing_clicks(self, n: usize) -> Self {
        self.failing_clicks.store(n, Ordering::SeqCst);
        self
    }

    /// Everything observed so far, in order.
    pub fn events(&self) -> Vec<BrowserEvent> {
        lock(&self.events).clone()
    }

    fn record(&self, event: BrowserEvent) {
        lock(&self.events).push(event);
    }
}

/// Decrements `counter` if positive; `true` means "fail this call".
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl BrowserHost for RecordingBrowser {
    fn open_blank_tab(&self) -> Option<Box<dyn PlaceholderTab>> {
        if self.block_popups {
            self.record(BrowserEvent::TabBlocked);
            return None;
        }
        self.record(BrowserEvent::TabOpened);
        Some(Box::new(RecordingTab {
            browser: self.clone(),
        }))
    }

    fn click_anchor(&self, url: &str) -> Result<(), BrowserError> {
        if take_failure(&self.failing_clicks) {
            self.record(BrowserEvent::AnchorRejected(url.to_owned()));
            return Err(BrowserError::new("anchor click blocked"));
        }
        self.record(BrowserEvent::AnchorClicked(url.to_owned()));
        Ok(())
    }
}

struct RecordingTab {
    browser: RecordingBrowser,
}

impl PlaceholderTab for RecordingTab {
    fn set_location(&mut self, url: &str) -> Result<(), BrowserError> {
        if take_failure(&self.browser.failing_redirects) {
            self.browser
                .record(BrowserEvent::LocationRejected(url.to_owned()));
            return Err(BrowserError::new("location change refused"));
        }
        self.browser.record(BrowserEvent::LocationSet(url.to_owned()));
        Ok(())
    }

    fn close(self: Box<Self>) {
        self.browser.record(BrowserEvent::TabClosed);
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// [`NavigationListener`] that keeps every report.
#[derive(Default)]
pub struct RecordingListener {
    errors: Mutex<Vec<NavigationError>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<NavigationError> {
        lock(&self.errors).clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        lock(&self.warnings).clone()
    }
}

impl NavigationListener for RecordingListener {
    fn on_error(&self, error: &NavigationError) {
        lock(&self.errors).push(error.clone());
    }

    fn on_warning(&self, message: &str) {
        lock(&self.warnings).push(message.to_owned());
    }
}
