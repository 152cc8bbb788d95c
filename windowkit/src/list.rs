use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp;
use core::num::NonZeroU32;

use crate::window::{compute_range, total_height, window_from_range};
use crate::{
    Align, RowSlot, ScrollDirection, ScrollState, Surface, ViewportState, Window, WindowError,
    WindowOptions, WindowRange,
};

/// A headless windowed list.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects or items, only the item count.
/// - Your adapter drives it by forwarding viewport height and scroll offset from the host.
/// - Every query is a thin wrapper over [`crate::compute_range`], so results are always
///   identical to calling the pure function with the current inputs.
///
/// For binding to a scroll host with scoped listener registration, see the `windowkit-widgets`
/// crate.
#[derive(Clone, Debug)]
pub struct WindowedList {
    options: WindowOptions,
    count: usize,
    viewport: ViewportState,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl WindowedList {
    /// Creates a list of `count` rows.
    ///
    /// `options.initial_viewport_height` and `options.initial_offset` are applied immediately.
    pub fn new(options: WindowOptions, count: usize) -> Self {
        wdebug!(
            count,
            item_height = options.item_height.get(),
            buffer_rows = options.buffer_rows,
            "WindowedList::new"
        );
        Self {
            viewport: ViewportState::new(options.initial_offset, options.initial_viewport_height),
            count,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: WindowOptions) {
        self.options = options;
        wtrace!(
            item_height = self.options.item_height.get(),
            buffer_rows = self.options.buffer_rows,
            "WindowedList::set_options"
        );
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut WindowOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&WindowedList, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// A host scroll event usually carries both a new offset and a (possibly) new viewport
    /// height. Without batching each setter would trigger its own recompute.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn set_count(&mut self, count: usize) {
        if self.count == count {
            return;
        }
        self.count = count;
        self.notify();
    }

    pub fn item_height(&self) -> u32 {
        self.options.item_height.get()
    }

    pub fn set_item_height(&mut self, item_height: u32) -> Result<(), WindowError> {
        let Some(item_height) = NonZeroU32::new(item_height) else {
            wwarn!("set_item_height: rejected zero height");
            return Err(WindowError::ZeroItemHeight);
        };
        if self.options.item_height == item_height {
            return Ok(());
        }
        self.options.item_height = item_height;
        self.notify();
        Ok(())
    }

    pub fn buffer_rows(&self) -> usize {
        self.options.buffer_rows
    }

    pub fn set_buffer_rows(&mut self, buffer_rows: usize) {
        if self.options.buffer_rows == buffer_rows {
            return;
        }
        self.options.buffer_rows = buffer_rows;
        self.notify();
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Clears `is_scrolling` once no scroll event arrived for `is_scrolling_reset_delay_ms`.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.is_scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if self.viewport.viewport_height == height {
            return;
        }
        self.viewport.viewport_height = height;
        self.notify();
    }

    pub fn scroll_offset(&self) -> u64 {
        self.viewport.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.viewport.scroll_offset == offset {
            return;
        }
        let prev = self.viewport.scroll_offset;
        self.viewport.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    pub fn set_viewport_and_scroll(&mut self, viewport_height: u32, scroll_offset: u64) {
        self.batch_update(|l| {
            l.set_viewport_height(viewport_height);
            l.set_scroll_offset(scroll_offset);
        });
    }

    /// Applies a viewport report from the host (scroll and/or resize) as one coalesced update,
    /// and marks the list as scrolling.
    pub fn apply_viewport_event(&mut self, state: ViewportState, now_ms: u64) {
        wtrace!(
            scroll_offset = state.scroll_offset,
            viewport_height = state.viewport_height,
            now_ms,
            "apply_viewport_event"
        );
        self.batch_update(|l| {
            l.set_viewport_height(state.viewport_height);
            l.set_scroll_offset(state.scroll_offset);
            l.notify_scroll_event(now_ms);
        });
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.viewport.scroll_offset,
            is_scrolling: self.is_scrolling,
        }
    }

    /// Restores viewport geometry and offset from a previously captured snapshot without
    /// marking the list as scrolling.
    pub fn restore_viewport_state(&mut self, viewport: ViewportState) {
        self.batch_update(|l| {
            l.set_viewport_height(viewport.viewport_height);
            l.set_scroll_offset(viewport.scroll_offset);
        });
    }

    /// Height of the scrollable surface: `count * item_height`.
    pub fn total_size(&self) -> u64 {
        total_height(self.count, self.options.item_height)
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_size()
            .saturating_sub(self.viewport.viewport_height as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// The rows to render, including buffer rows.
    pub fn window_range(&self) -> WindowRange {
        self.window_range_for(self.viewport)
    }

    pub fn window_range_for(&self, viewport: ViewportState) -> WindowRange {
        compute_range(
            self.count,
            self.options.item_height,
            viewport.viewport_height,
            viewport.scroll_offset,
            self.options.buffer_rows,
        )
    }

    /// The rows that actually intersect the viewport (no buffer rows).
    pub fn visible_range(&self) -> WindowRange {
        compute_range(
            self.count,
            self.options.item_height,
            self.viewport.viewport_height,
            self.viewport.scroll_offset,
            0,
        )
    }

    /// Slices `items` for the current viewport.
    ///
    /// The window is computed against `items.len()`, so a stale `count` can never cause an
    /// out-of-range slice. Keep `count` in sync with `set_count` so `total_size` matches.
    pub fn window<'a, T>(&self, items: &'a [T]) -> Window<'a, T> {
        if items.len() != self.count {
            wwarn!(
                items = items.len(),
                count = self.count,
                "window: item slice length differs from count"
            );
        }
        let range = compute_range(
            items.len(),
            self.options.item_height,
            self.viewport.viewport_height,
            self.viewport.scroll_offset,
            self.options.buffer_rows,
        );
        window_from_range(items, range, self.options.item_height)
    }

    /// Builds the full paint description for the current frame.
    pub fn surface<'a, T>(&self, items: &'a [T]) -> Surface<'a, T> {
        Surface {
            total_height: total_height(items.len(), self.options.item_height),
            blocks: self.window(items).blocks().collect(),
        }
    }

    pub fn for_each_row(&self, mut f: impl FnMut(RowSlot)) {
        let range = self.window_range();
        let height = self.options.item_height.get();
        let mut top = range.leading_padding;
        for index in range.start_index..range.end_index {
            f(RowSlot { index, top, height });
            top = top.saturating_add(height as u64);
        }
    }

    /// Collects positioned rows into `out` (clears `out` first).
    ///
    /// For maximum performance, prefer `for_each_row` and reuse a scratch buffer in your adapter.
    pub fn collect_rows(&self, out: &mut Vec<RowSlot>) {
        out.clear();
        self.for_each_row(|row| out.push(row));
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let row = offset / self.options.item_height.get() as u64;
        let row = usize::try_from(row).unwrap_or(usize::MAX);
        Some(row.min(self.count - 1))
    }

    pub fn item_top(&self, index: usize) -> Option<u64> {
        (index < self.count)
            .then(|| (index as u64).saturating_mul(self.options.item_height.get() as u64))
    }

    /// Programmatically scrolls to an index (no animation). Returns the applied (clamped)
    /// offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        offset
    }

    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        if self.count == 0 {
            return 0;
        }
        let index = index.min(self.count - 1);
        let height = self.options.item_height.get() as u64;
        let top = (index as u64).saturating_mul(height);
        let bottom = top.saturating_add(height);
        let view = self.viewport.viewport_height as u64;

        let target = match align {
            Align::Start => top,
            Align::End => bottom.saturating_sub(view),
            Align::Center => top.saturating_add(height / 2).saturating_sub(view / 2),
            Align::Auto => {
                let cur = self.viewport.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if top >= cur && bottom <= cur_end {
                    cur
                } else if top < cur {
                    top
                } else {
                    bottom.saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target)
    }
}
