use alloc::sync::Arc;
use core::num::NonZeroU32;

use crate::list::WindowedList;
use crate::{DEFAULT_BUFFER_ROWS, WindowError};

/// A callback fired whenever the window inputs change.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback = Arc<dyn Fn(&WindowedList, bool) + Send + Sync>;

/// Configuration for [`crate::WindowedList`].
///
/// Cheap to clone: the callback is stored in an `Arc`, so adapters can tweak a field and call
/// `WindowedList::set_options` without reallocating closures.
pub struct WindowOptions {
    /// Uniform row height in the scroll axis.
    pub item_height: NonZeroU32,

    /// Rows rendered beyond each edge of the viewport to mask scroll latency.
    pub buffer_rows: usize,

    /// Viewport height to assume until the host reports one.
    pub initial_viewport_height: u32,

    /// Scroll offset to start from (e.g. restored from a previous session).
    pub initial_offset: u64,

    /// Fired when scroll offset, viewport height, item count, item height or buffer rows change.
    pub on_change: Option<OnChangeCallback>,

    /// How long after the last scroll event `update_scrolling` keeps `is_scrolling` set.
    pub is_scrolling_reset_delay_ms: u64,
}

impl Clone for WindowOptions {
    fn clone(&self) -> Self {
        Self {
            item_height: self.item_height,
            buffer_rows: self.buffer_rows,
            initial_viewport_height: self.initial_viewport_height,
            initial_offset: self.initial_offset,
            on_change: self.on_change.clone(),
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
        }
    }
}

impl WindowOptions {
    /// Creates options for rows of `item_height`.
    ///
    /// A zero height would make every offset map to an undefined row, so it is rejected here
    /// instead of at render time.
    pub fn new(item_height: u32) -> Result<Self, WindowError> {
        let item_height = NonZeroU32::new(item_height).ok_or(WindowError::ZeroItemHeight)?;
        Ok(Self::with_item_height(item_height))
    }

    /// Infallible constructor for callers that already hold a validated height.
    pub fn with_item_height(item_height: NonZeroU32) -> Self {
        Self {
            item_height,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            initial_viewport_height: 0,
            initial_offset: 0,
            on_change: None,
            is_scrolling_reset_delay_ms: 150,
        }
    }

    pub fn with_buffer_rows(mut self, buffer_rows: usize) -> Self {
        self.buffer_rows = buffer_rows;
        self
    }

    pub fn with_initial_viewport_height(mut self, viewport_height: u32) -> Self {
        self.initial_viewport_height = viewport_height;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&WindowedList, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }
}

impl core::fmt::Debug for WindowOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("item_height", &self.item_height)
            .field("buffer_rows", &self.buffer_rows)
            .field("initial_viewport_height", &self.initial_viewport_height)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
