use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Delays a callback until calls stop arriving for `delay`.
///
/// Each call supersedes the previous one: the earlier timer is aborted and its [`Pending`]
/// resolves to `None`. Dropping the debouncer aborts whatever is still pending.
///
/// Calls spawn onto the ambient tokio runtime.
pub struct Debouncer<A, R = ()> {
    delay: Duration,
    callback: Arc<dyn Fn(A) -> R + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A, R> Debouncer<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    pub fn new(delay: Duration, callback: impl Fn(A) -> R + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `callback(args)` after the delay, discarding any earlier scheduled call.
    pub fn call(&self, args: A) {
        drop(self.call_with_result(args));
    }

    /// Like [`call`](Self::call), but the returned future yields the callback's result.
    ///
    /// Resolves to `None` if a later call or [`cancel`](Self::cancel) supersedes this one.
    pub fn call_with_result(&self, args: A) -> Pending<R> {
        let (tx, rx) = oneshot::channel();
        let delay = self.delay;
        let callback = Arc::clone(&self.callback);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let out = callback(args);
            let _ = tx.send(out);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
            wtrace!(delay_ms = delay.as_millis() as u64, "Debouncer: superseded");
        }
        Pending { rx }
    }

    /// Aborts the scheduled call, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }

    /// `true` while a scheduled call has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl<A, R> Drop for Debouncer<A, R> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl<A, R> fmt::Debug for Debouncer<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// The eventual result of one debounced call.
#[must_use = "futures do nothing unless awaited"]
#[derive(Debug)]
pub struct Pending<R> {
    rx: oneshot::Receiver<R>,
}

impl<R> Future for Pending<R> {
    type Output = Option<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}
