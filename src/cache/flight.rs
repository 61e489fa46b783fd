//! Single-flight coordination for concurrent cache misses.
//!
//! The first caller for a key spawns the work as a tokio task and publishes a
//! shared handle; later callers for the same key await that handle instead of
//! starting their own. The task outlives any individual caller, so dropping a
//! waiter never cancels the work.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio::task::JoinError;

type SharedResult<T> = Shared<BoxFuture<'static, Result<T, Arc<JoinError>>>>;

/// Whether the caller started the work or attached to an existing flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightRole {
    Leader,
    Follower,
}

pub struct InFlight<T: Clone + Send + Sync + 'static> {
    flights: Arc<Mutex<HashMap<String, SharedResult<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> Default for InFlight<T> {
    fn default() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> InFlight<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the flight for `key`, starting it with `start` if none is running.
    ///
    /// `ready` is evaluated under the flight lock before a new flight starts; a
    /// `Some` short-circuits (used to re-check the cache after another flight
    /// for the same key has just finished). The spawned task removes its own
    /// entry before resolving, after `start`'s future completes.
    ///
    /// # Errors
    /// Returns the [`JoinError`] if the spawned task panicked.
    pub async fn run<F, Fut>(
        &self,
        key: &str,
        ready: impl FnOnce() -> Option<T>,
        start: F,
    ) -> (FlightRole, Result<T, Arc<JoinError>>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (role, handle) = {
            let mut flights = self.flights.lock();
            if let Some(existing) = flights.get(key) {
                (FlightRole::Follower, existing.clone())
            } else if let Some(value) = ready() {
                return (FlightRole::Follower, Ok(value));
            } else {
                let work = start();
                let registry = Arc::clone(&self.flights);
                let owned_key = key.to_string();
                let task = tokio::spawn(async move {
                    let value = work.await;
                    registry.lock().remove(&owned_key);
                    value
                });
                let handle = task.map(|joined| joined.map_err(Arc::new)).boxed().shared();
                flights.insert(key.to_string(), handle.clone());
                (FlightRole::Leader, handle)
            }
        };
        (role, handle.await)
    }

    /// Number of flights currently running.
    pub fn len(&self) -> usize {
        self.flights.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
