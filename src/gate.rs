//! Cancellation gate shared between a background task and its handle.
//!
//! The task reaches its handler only through [`Gate::with`]; the handle calls
//! [`Gate::close`], which drops the handler under the same lock. Once `close`
//! returns, no delivery is running and none can start.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub(crate) struct Gate<H> {
    inner: Arc<Mutex<Option<H>>>,
}

impl<H> Gate<H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(handler))),
        }
    }

    /// Runs `f` against the handler, or returns `None` once closed.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut H) -> R) -> Option<R> {
        self.lock().as_mut().map(f)
    }

    /// Drops the handler. Returns `true` on the first call only.
    pub(crate) fn close(&self) -> bool {
        self.lock().take().is_some()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<H>> {
        // A panicking handler must not wedge shutdown.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H> Clone for Gate<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
