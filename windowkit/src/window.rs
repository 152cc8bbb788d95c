use core::num::NonZeroU32;

use crate::{Window, WindowRange};

/// Number of extra rows rendered above and below the viewport unless configured otherwise.
pub const DEFAULT_BUFFER_ROWS: usize = 5;

/// Computes which rows of a uniformly sized list must be rendered to cover a viewport.
///
/// The result covers every row that intersects `[scroll_offset, scroll_offset + container_height)`
/// plus `buffer_rows` rows on each side, clamped to `[0, count]`:
///
/// - `start = max(0, floor(scroll_offset / item_height) - buffer_rows)`
/// - `end = min(count, ceil((scroll_offset + container_height) / item_height) + buffer_rows)`
/// - `leading_padding = start * item_height`
///
/// When the offset lies beyond the end of the list, `start` is clamped to `end` so the range is
/// empty rather than inverted.
pub fn compute_range(
    count: usize,
    item_height: NonZeroU32,
    container_height: u32,
    scroll_offset: u64,
    buffer_rows: usize,
) -> WindowRange {
    if count == 0 {
        return WindowRange::EMPTY;
    }

    let height = item_height.get() as u64;

    let first_row = row_index(scroll_offset / height);
    let raw_start = first_row.saturating_sub(buffer_rows);

    let bottom = scroll_offset.saturating_add(container_height as u64);
    let last_row = row_index(bottom.div_ceil(height));
    let raw_end = last_row.saturating_add(buffer_rows);

    let end_index = raw_end.min(count);
    let start_index = raw_start.min(end_index);

    WindowRange {
        start_index,
        end_index,
        leading_padding: (start_index as u64).saturating_mul(height),
    }
}

/// Slices `items` down to the rows a viewport needs. See [`compute_range`] for the math.
pub fn compute_window<T>(
    items: &[T],
    item_height: NonZeroU32,
    container_height: u32,
    scroll_offset: u64,
    buffer_rows: usize,
) -> Window<'_, T> {
    let range = compute_range(
        items.len(),
        item_height,
        container_height,
        scroll_offset,
        buffer_rows,
    );
    window_from_range(items, range, item_height)
}

pub(crate) fn window_from_range<T>(
    items: &[T],
    range: WindowRange,
    item_height: NonZeroU32,
) -> Window<'_, T> {
    let end_index = range.end_index.min(items.len());
    let start_index = range.start_index.min(end_index);
    Window {
        start_index,
        end_index,
        visible_items: &items[start_index..end_index],
        leading_padding: (start_index as u64).saturating_mul(item_height.get() as u64),
        item_height: item_height.get(),
    }
}

/// Height of the full scrollable surface, independent of how many rows are materialized.
pub fn total_height(count: usize, item_height: NonZeroU32) -> u64 {
    (count as u64).saturating_mul(item_height.get() as u64)
}

fn row_index(row: u64) -> usize {
    usize::try_from(row).unwrap_or(usize::MAX)
}
