use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use windowkit::ViewportState;

/// What changed on the host viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportEventKind {
    Scroll,
    Resize,
}

/// A notification from the host: the full viewport state after the change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportEvent {
    pub kind: ViewportEventKind,
    pub state: ViewportState,
    pub now_ms: u64,
}

pub type ViewportListener = Arc<dyn Fn(ViewportEvent) + Send + Sync>;

/// The scroll container a windowed list is mounted into.
///
/// Implementations own the real scroll offset and viewport height (a DOM element, a terminal
/// pane, ...). They only need to report changes; the list never polls.
pub trait ScrollHost {
    fn viewport_state(&self) -> ViewportState;

    fn scroll_offset(&self) -> u64 {
        self.viewport_state().scroll_offset
    }

    fn viewport_height(&self) -> u32 {
        self.viewport_state().viewport_height
    }

    /// Moves the host to `offset`. Returns the offset the host actually applied.
    fn scroll_to(&self, offset: u64, now_ms: u64) -> u64;

    /// Sets the height of the scrollable content (the list's total size).
    fn set_content_height(&self, height: u64);

    /// Registers `listener` until the returned [`Subscription`] is dropped.
    fn subscribe(&self, listener: ViewportListener) -> Subscription;
}

/// A scoped listener registration.
///
/// Dropping the guard unregisters the listener, so a binding torn down on any path (explicit
/// unmount, early return, unwinding) leaves no handler behind.
#[must_use = "dropping a Subscription immediately unregisters the listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// Unregisters now instead of at drop.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

struct HostInner {
    state: ViewportState,
    content_height: Option<u64>,
    /// Timestamp of the latest scroll or resize, reused for events the host raises itself.
    last_event_ms: u64,
    next_id: u64,
    listeners: Vec<(u64, ViewportListener)>,
}

/// An in-process scroll host.
///
/// It behaves like a native scroll container: offsets are clamped to the content height once
/// one is known, and listeners are notified only on real changes. Cloning yields another
/// handle to the same viewport.
#[derive(Clone)]
pub struct ViewportHost {
    inner: Arc<Mutex<HostInner>>,
}

impl ViewportHost {
    pub fn new(viewport_height: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HostInner {
                state: ViewportState::new(0, viewport_height),
                content_height: None,
                last_event_ms: 0,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HostInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn content_height(&self) -> Option<u64> {
        self.lock().content_height
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn max_scroll_offset(&self) -> Option<u64> {
        let inner = self.lock();
        inner
            .content_height
            .map(|h| h.saturating_sub(inner.state.viewport_height as u64))
    }

    pub fn scroll_by(&self, delta: i64, now_ms: u64) -> u64 {
        let current = self.scroll_offset();
        let target = if delta >= 0 {
            current.saturating_add(delta as u64)
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };
        self.scroll_to(target, now_ms)
    }

    /// Changes the viewport height, notifying listeners if it changed.
    pub fn resize(&self, viewport_height: u32, now_ms: u64) {
        let event = {
            let mut inner = self.lock();
            if inner.state.viewport_height == viewport_height {
                return;
            }
            inner.state.viewport_height = viewport_height;
            inner.last_event_ms = now_ms;
            if let Some(max) = inner
                .content_height
                .map(|h| h.saturating_sub(viewport_height as u64))
            {
                inner.state.scroll_offset = inner.state.scroll_offset.min(max);
            }
            ViewportEvent {
                kind: ViewportEventKind::Resize,
                state: inner.state,
                now_ms,
            }
        };
        self.emit(event);
    }

    fn emit(&self, event: ViewportEvent) {
        // Listeners run outside the lock so they may read the host back.
        let listeners: Vec<ViewportListener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        wtrace!(
            listeners = listeners.len(),
            scroll_offset = event.state.scroll_offset,
            viewport_height = event.state.viewport_height,
            "ViewportHost::emit"
        );
        for listener in listeners {
            listener(event);
        }
    }
}

impl ScrollHost for ViewportHost {
    fn viewport_state(&self) -> ViewportState {
        self.lock().state
    }

    /// Scrolls to `offset` (clamped), notifying listeners if the offset changed.
    fn scroll_to(&self, offset: u64, now_ms: u64) -> u64 {
        let event = {
            let mut inner = self.lock();
            let max = inner
                .content_height
                .map(|h| h.saturating_sub(inner.state.viewport_height as u64));
            let offset = max.map_or(offset, |max| offset.min(max));
            if inner.state.scroll_offset == offset {
                return offset;
            }
            inner.state.scroll_offset = offset;
            inner.last_event_ms = now_ms;
            ViewportEvent {
                kind: ViewportEventKind::Scroll,
                state: inner.state,
                now_ms,
            }
        };
        self.emit(event);
        event.state.scroll_offset
    }

    /// Shrinking the content below the current offset pulls the offset back and reports it
    /// as a scroll, stamped with the time of the last host event.
    fn set_content_height(&self, height: u64) {
        let event = {
            let mut inner = self.lock();
            inner.content_height = Some(height);
            let max = height.saturating_sub(inner.state.viewport_height as u64);
            if inner.state.scroll_offset <= max {
                return;
            }
            inner.state.scroll_offset = max;
            ViewportEvent {
                kind: ViewportEventKind::Scroll,
                state: inner.state,
                now_ms: inner.last_event_ms,
            }
        };
        self.emit(event);
    }

    fn subscribe(&self, listener: ViewportListener) -> Subscription {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id = inner.next_id.wrapping_add(1);
            inner.listeners.push((id, listener));
            id
        };
        wdebug!(id, "ViewportHost::subscribe");

        let weak: Weak<Mutex<HostInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.retain(|(lid, _)| *lid != id);
            wdebug!(id, "ViewportHost::unsubscribe");
        })
    }
}

impl fmt::Debug for ViewportHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("ViewportHost")
            .field("state", &inner.state)
            .field("content_height", &inner.content_height)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
