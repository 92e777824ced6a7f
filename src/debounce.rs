//! Generic trailing-edge debouncer for async actions.
//!
//! Collapses a burst of triggers into one execution of the wrapped action,
//! using the arguments of the last trigger, after a quiet interval with no
//! further triggers. There is no leading-edge execution. Superseding a
//! pending execution aborts its task outright, so a lookup that is already
//! on the wire when the user keeps typing is cancelled rather than left to
//! race the newer one.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiet interval for airport type-ahead lookups.
pub const LOOKUP_QUIET_MS: u64 = 300;

type BoxedTask = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Rate-limits calls to an async action: only the last call of a burst runs,
/// once `quiet` has elapsed without another call.
///
/// Instances are independent: two debouncers never affect each other's
/// timers.
pub struct Debouncer<T> {
    quiet: Duration,
    action: Arc<dyn Fn(T) -> BoxedTask + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(quiet: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            quiet,
            action: Arc::new(move |input| Box::pin(action(input)) as BoxedTask),
            pending: None,
        }
    }

    /// Schedule the action with `input`, cancelling any pending execution,
    /// whether it is still waiting out the quiet interval or already running.
    pub fn call(&mut self, input: T) {
        self.cancel();

        let quiet = self.quiet;
        let action = Arc::clone(&self.action);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            action(input).await;
        }));
    }

    /// Drop the pending execution, if any, without scheduling a new one.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("quiet", &self.quiet)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
