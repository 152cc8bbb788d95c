use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use windowkit::{Align, Surface, ViewportState, Window, WindowRange, WindowedList};

use crate::{ScrollHost, Subscription, ViewportEvent, ViewportEventKind};

/// How a mounted binding applies host events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Apply every event to the list as soon as the host reports it.
    #[default]
    Immediate,
    /// Keep only the latest event and apply it on the next [`ListBinding::on_frame`].
    ///
    /// Scroll bursts between two frames then cost one recomputation.
    PerFrame,
}

struct Shared {
    list: Option<WindowedList>,
    mode: UpdateMode,
    pending: Option<ViewportEvent>,
}

/// Connects a [`WindowedList`] to a [`ScrollHost`].
///
/// While mounted, host scroll and resize events flow into the list. Unmounting (or dropping the
/// binding) releases the host subscription, so no listener outlives the list it feeds.
pub struct ListBinding<H: ScrollHost> {
    host: H,
    shared: Arc<Mutex<Shared>>,
    subscription: Option<Subscription>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<H: ScrollHost> ListBinding<H> {
    /// Creates an unmounted binding.
    pub fn new(host: H, list: WindowedList) -> Self {
        Self {
            host,
            shared: Arc::new(Mutex::new(Shared {
                list: Some(list),
                mode: UpdateMode::Immediate,
                pending: None,
            })),
            subscription: None,
        }
    }

    pub fn with_mode(self, mode: UpdateMode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Switches modes. Leaving per-frame mode applies the pending event right away.
    pub fn set_mode(&self, mode: UpdateMode) {
        let mut shared = lock(&self.shared);
        shared.mode = mode;
        if mode == UpdateMode::Immediate {
            if let Some(event) = shared.pending.take() {
                if let Some(list) = shared.list.as_mut() {
                    apply_event(list, event);
                }
            }
        }
    }

    /// Shorthand for `with_mode(UpdateMode::PerFrame)`.
    pub fn with_coalescing(self) -> Self {
        self.with_mode(UpdateMode::PerFrame)
    }

    /// Creates a binding and mounts it.
    pub fn mount(host: H, list: WindowedList) -> Self {
        let mut binding = Self::new(host, list);
        binding.attach();
        binding
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn mode(&self) -> UpdateMode {
        lock(&self.shared).mode
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribes to the host and syncs the list with the host's current viewport.
    ///
    /// Mounting an already mounted binding is a no-op.
    pub fn attach(&mut self) {
        if self.is_mounted() {
            return;
        }

        let initial = self.host.viewport_state();
        let total = {
            let mut shared = lock(&self.shared);
            let Some(list) = shared.list.as_mut() else {
                return;
            };
            list.restore_viewport_state(initial);
            list.total_size()
        };
        self.host.set_content_height(total);

        let shared = Arc::clone(&self.shared);
        self.subscription = Some(self.host.subscribe(Arc::new(move |event: ViewportEvent| {
            let mut shared = lock(&shared);
            let mode = shared.mode;
            match mode {
                UpdateMode::PerFrame => {
                    shared.pending = Some(coalesce(shared.pending, event));
                }
                UpdateMode::Immediate => {
                    if let Some(list) = shared.list.as_mut() {
                        apply_event(list, event);
                    }
                }
            }
        })));
        wdebug!(
            scroll_offset = initial.scroll_offset,
            viewport_height = initial.viewport_height,
            "ListBinding::attach"
        );
    }

    /// Releases the host subscription. Pending per-frame events are dropped.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            lock(&self.shared).pending = None;
            wdebug!("ListBinding::unmount");
        }
    }

    /// Frame tick: flushes the coalesced event (if any) and settles `is_scrolling`.
    ///
    /// Returns `true` when an event was applied.
    pub fn on_frame(&self, now_ms: u64) -> bool {
        let mut shared = lock(&self.shared);
        let pending = shared.pending.take();
        let Some(list) = shared.list.as_mut() else {
            return false;
        };
        let applied = match pending {
            Some(event) => {
                apply_event(list, event);
                true
            }
            None => false,
        };
        list.update_scrolling(now_ms);
        applied
    }

    pub fn has_pending_event(&self) -> bool {
        lock(&self.shared).pending.is_some()
    }

    /// Runs `f` with the bound list.
    pub fn with_list<R>(&self, f: impl FnOnce(&WindowedList) -> R) -> Option<R> {
        lock(&self.shared).list.as_ref().map(f)
    }

    /// Runs `f` with the bound list mutably, then pushes the new total size to the host.
    pub fn with_list_mut<R>(&self, f: impl FnOnce(&mut WindowedList) -> R) -> Option<R> {
        let (out, total) = {
            let mut shared = lock(&self.shared);
            let list = shared.list.as_mut()?;
            let out = f(list);
            (out, list.total_size())
        };
        self.host.set_content_height(total);
        Some(out)
    }

    pub fn set_count(&self, count: usize) {
        self.with_list_mut(|l| l.set_count(count));
    }

    pub fn viewport_state(&self) -> Option<ViewportState> {
        self.with_list(WindowedList::viewport_state)
    }

    pub fn window_range(&self) -> WindowRange {
        self.with_list(WindowedList::window_range)
            .unwrap_or(WindowRange::EMPTY)
    }

    pub fn window<'a, T>(&self, items: &'a [T]) -> Option<Window<'a, T>> {
        self.with_list(|l| l.window(items))
    }

    pub fn surface<'a, T>(&self, items: &'a [T]) -> Option<Surface<'a, T>> {
        self.with_list(|l| l.surface(items))
    }

    /// Scrolls the host so `index` is placed per `align`; the host's echo updates the list.
    pub fn scroll_to_index(&self, index: usize, align: Align, now_ms: u64) -> Option<u64> {
        let target = self.with_list(|l| l.scroll_to_index_offset(index, align))?;
        Some(self.host.scroll_to(target, now_ms))
    }

    /// Unmounts and returns the list.
    pub fn into_list(mut self) -> Option<WindowedList> {
        self.unmount();
        lock(&self.shared).list.take()
    }
}

/// Folds `next` into the event already waiting for the frame. The latest state wins, but a
/// frame that saw any scroll is still applied as a scroll.
fn coalesce(pending: Option<ViewportEvent>, next: ViewportEvent) -> ViewportEvent {
    match pending {
        Some(prev) if prev.kind == ViewportEventKind::Scroll => ViewportEvent {
            kind: ViewportEventKind::Scroll,
            now_ms: prev.now_ms.max(next.now_ms),
            ..next
        },
        _ => next,
    }
}

fn apply_event(list: &mut WindowedList, event: ViewportEvent) {
    match event.kind {
        ViewportEventKind::Scroll => list.apply_viewport_event(event.state, event.now_ms),
        ViewportEventKind::Resize => list.restore_viewport_state(event.state),
    }
}

impl<H: ScrollHost> Drop for ListBinding<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
