//! Operation outcomes and the loading flag.

use crate::error::{TransportError, ValidationError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tri-state result of a mutation request.
#[derive(Clone, Debug, PartialEq)]
pub enum OperationOutcome<T> {
    /// The backend accepted the mutation; it may or may not have returned the record.
    Success(Option<T>),
    ValidationFailed(ValidationError),
    TransportFailed(TransportError),
}

impl<T> OperationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success(_))
    }
}

/// Result of a delete, which can also be declined at the confirmation prompt.
#[derive(Clone, Debug, PartialEq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed(TransportError),
}

/// Advisory "request in flight" flag for the control that triggered it.
///
/// Clones share the flag, so a view can observe it while the owning controller is awaiting.
#[derive(Clone, Debug, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag until the returned guard is dropped.
    ///
    /// The guard clears the flag on every exit path, including early returns, errors and a
    /// dropped future.
    pub fn begin(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(self.0.clone())
    }
}

#[must_use = "the loading flag is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
