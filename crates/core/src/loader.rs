//! Single-shot loader that ignores responses arriving after its view is gone.
//!
//! Dashboards fire one request on mount and may be closed before it answers. A
//! [`GuardedLoader`] applies the result only while mounted; after
//! [`unmount`](GuardedLoader::unmount) late responses are dropped.

use crate::error::TransportError;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Debug)]
pub struct LoadState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub loading: bool,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

#[derive(Debug)]
pub struct GuardedLoader<T> {
    mounted: Arc<AtomicBool>,
    state: Arc<Mutex<LoadState<T>>>,
}

impl<T> Clone for GuardedLoader<T> {
    fn clone(&self) -> Self {
        Self {
            mounted: self.mounted.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T> Default for GuardedLoader<T> {
    fn default() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
            state: Arc::new(Mutex::new(LoadState::default())),
        }
    }
}

impl<T: Clone> GuardedLoader<T> {
    /// A mounted loader with no data.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> LoadState<T> {
        self.lock().clone()
    }

    /// Await `fetch` and store its result if still mounted.
    ///
    /// Returns whether the result was applied.
    pub async fn load<F>(&self, fetch: F) -> bool
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        if !self.is_mounted() {
            return false;
        }
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }

        let result = fetch.await;

        if !self.is_mounted() {
            tracing::debug!("discarding response that arrived after unmount");
            return false;
        }

        let mut state = self.lock();
        match result {
            Ok(data) => state.data = Some(data),
            Err(e) => state.error = Some(e.to_string()),
        }
        state.loading = false;
        true
    }

    fn lock(&self) -> MutexGuard<'_, LoadState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
