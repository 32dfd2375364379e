//! Single-flight credential cache.
//!
//! Holds at most one external-platform auth token. The slot moves through
//! three states:
//!
//! ```text
//! Empty ──get_token──▶ Pending ──ok──▶ Ready
//!   ▲                     │
//!   └───────error─────────┘
//! ```
//!
//! Every caller that arrives while the slot is `Pending` awaits the same
//! shared fetch, so N concurrent callers cause exactly one call to the
//! [`SecretSource`]. A failed fetch is delivered to all of its waiters and
//! then forgotten; the next caller starts a fresh fetch.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use linking::{AuthToken, CredentialError, SecretSource, Timestamp};
use tracing::{debug, info, warn};

type SharedFetch = Shared<BoxFuture<'static, Result<AuthToken, CredentialError>>>;

enum Slot {
    Empty,
    Pending {
        generation: u64,
        fetch: SharedFetch,
    },
    Ready {
        token: AuthToken,
        acquired_at: Timestamp,
    },
}

struct SlotState {
    slot: Slot,
    // Bumped for every fetch started; a finished fetch only updates the slot
    // if it is still the one the slot is waiting on.
    generation: u64,
}

/// Observable state of a [`CredentialCache`]. Never exposes the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Pending,
    Ready { acquired_at: Timestamp },
}

/// In-memory, de-duplicating cache for the external-platform auth token.
///
/// Owned by whoever builds the resolver and shared behind an `Arc`.
pub struct CredentialCache {
    source: Arc<dyn SecretSource>,
    timeout: Option<Duration>,
    state: Mutex<SlotState>,
}

impl CredentialCache {
    /// Creates an empty cache that fetches from `source`.
    pub fn new(source: Arc<dyn SecretSource>) -> Self {
        Self {
            source,
            timeout: None,
            state: Mutex::new(SlotState {
                slot: Slot::Empty,
                generation: 0,
            }),
        }
    }

    /// Bounds every fetch by `timeout`. A timed-out fetch is a failure and
    /// leaves the cache `Empty`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the cached token, fetching it if necessary.
    pub async fn get_token(&self) -> Result<AuthToken, CredentialError> {
        let (generation, fetch) = {
            let mut state = self.lock();
            match &state.slot {
                Slot::Ready { token, .. } => return Ok(token.clone()),
                Slot::Pending { generation, fetch } => {
                    debug!(generation, "Joining in-flight secret fetch");
                    (*generation, fetch.clone())
                }
                Slot::Empty => {
                    state.generation += 1;
                    let generation = state.generation;
                    info!(generation, "Fetching platform auth token");
                    let fetch = self.start_fetch();
                    state.slot = Slot::Pending {
                        generation,
                        fetch: fetch.clone(),
                    };
                    (generation, fetch)
                }
            }
        };

        let result = fetch.await;

        let mut state = self.lock();
        let still_current = matches!(
            &state.slot,
            Slot::Pending { generation: g, .. } if *g == generation
        );
        if still_current {
            state.slot = match &result {
                Ok(token) => {
                    info!(generation, "Platform auth token cached");
                    Slot::Ready {
                        token: token.clone(),
                        acquired_at: Timestamp::now(),
                    }
                }
                Err(error) => {
                    warn!(generation, %error, "Secret fetch failed; cache cleared");
                    Slot::Empty
                }
            };
        }
        result
    }

    /// Returns a snapshot of the slot state.
    pub fn state(&self) -> CacheState {
        match &self.lock().slot {
            Slot::Empty => CacheState::Empty,
            Slot::Pending { .. } => CacheState::Pending,
            Slot::Ready { acquired_at, .. } => CacheState::Ready {
                acquired_at: *acquired_at,
            },
        }
    }

    /// Forgets any cached or in-flight token.
    ///
    /// Callers already awaiting an in-flight fetch still receive its result,
    /// but that result is not stored.
    pub fn reset(&self) {
        self.lock().slot = Slot::Empty;
    }

    fn start_fetch(&self) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let timeout = self.timeout;
        async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, source.fetch_token())
                    .await
                    .unwrap_or_else(|_| Err(CredentialError::TimedOut(limit))),
                None => source.fetch_token().await,
            }
        }
        .boxed()
        .shared()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("state", &self.state())
            .field("timeout", &self.timeout)
            .finish()
    }
}
