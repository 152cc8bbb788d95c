/// A lightweight, serializable snapshot of what the host viewport reports.
///
/// The host owns this state; a [`crate::WindowedList`] only mirrors it. With
/// `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub scroll_offset: u64,
    pub viewport_height: u32,
}

impl ViewportState {
    pub fn new(scroll_offset: u64, viewport_height: u32) -> Self {
        Self {
            scroll_offset,
            viewport_height,
        }
    }

    /// Offset of the first pixel below the viewport.
    pub fn bottom(&self) -> u64 {
        self.scroll_offset
            .saturating_add(self.viewport_height as u64)
    }
}

/// Scroll activity as tracked by the list (offset plus the debounced "is scrolling" flag).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub is_scrolling: bool,
}
