use std::future::Future;

use crate::config::MAX_RETRY;
use crate::error::FetchError;

/// Lifecycle of one remote resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchState<T> {
    /// Disabled: the request has no key yet (e.g. no collection selected).
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(FetchError),
}

impl<T> FetchState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Proof that a fetch was started for `key`. Hand it back to
/// [`QueryCell::complete`] with the result.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket<K> {
    pub key: K,
}

/// A keyed, single-entry query cache.
///
/// The cell remembers the key of the latest request. Completions carrying any
/// other key are stale and dropped, so a slow response for a superseded
/// collection or filter never replaces newer data.
#[derive(Clone, Debug)]
pub struct QueryCell<K, T> {
    key: Option<K>,
    state: FetchState<T>,
}

impl<K, T> Default for QueryCell<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            state: FetchState::Idle,
        }
    }
}

impl<K: Clone + PartialEq, T> QueryCell<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Data for exactly `key`, if it is the current, settled result.
    pub fn data_for(&self, key: &K) -> Option<&T> {
        match &self.key {
            Some(current) if current == key => self.state.data(),
            _ => None,
        }
    }

    /// Point the cell at `key`.
    ///
    /// Returns a ticket when a fetch must start. `None` means the query is
    /// disabled (`key` is `None`) or `key` is already current. A failed key
    /// stays failed until [`QueryCell::refetch`].
    pub fn request(&mut self, key: Option<K>) -> Option<Ticket<K>> {
        let Some(key) = key else {
            self.key = None;
            self.state = FetchState::Idle;
            return None;
        };
        let same_key = self.key.as_ref() == Some(&key);
        if same_key && !matches!(self.state, FetchState::Idle) {
            return None;
        }
        self.key = Some(key.clone());
        self.state = FetchState::Loading;
        Some(Ticket { key })
    }

    /// Force a new fetch for the current key. The only way out of `Failed`.
    pub fn refetch(&mut self) -> Option<Ticket<K>> {
        let key = self.key.clone()?;
        self.state = FetchState::Loading;
        Some(Ticket { key })
    }

    /// Settle a fetch. Returns `false`, leaving the cell untouched, when the
    /// ticket no longer matches the current key.
    pub fn complete(&mut self, ticket: Ticket<K>, result: Result<T, FetchError>) -> bool {
        if self.key.as_ref() != Some(&ticket.key) {
            tracing::debug!("Dropping stale fetch completion");
            return false;
        }
        self.state = match result {
            Ok(data) => FetchState::Ready(data),
            Err(e) => FetchState::Failed(e),
        };
        true
    }
}

/// Run `attempt`, retrying up to `retries` more times (capped at
/// [`MAX_RETRY`]) while the failure is transient.
pub async fn with_retry<T, F, Fut>(retries: u8, mut attempt: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut remaining = retries.min(MAX_RETRY);
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if remaining > 0 && e.is_transient() => {
                tracing::warn!("Transient fetch failure, retrying: {}", e);
                remaining -= 1;
            }
            Err(e) => return Err(e),
        }
    }
}
