use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::num::NonZeroU32;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

fn h(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap()
}

/// Row-by-row reference: every row intersecting the viewport, widened by the buffer.
///
/// Rows past the end of the list still count toward the raw bounds; clamping happens last.
fn expected_range(
    count: usize,
    item_height: u32,
    container_height: u32,
    scroll_offset: u64,
    buffer_rows: usize,
) -> (usize, usize) {
    assert!(container_height > 0);
    let height = item_height as u64;
    let view_end = scroll_offset + container_height as u64;

    let mut first: Option<usize> = None;
    let mut last_exclusive = 0usize;
    let mut i = (scroll_offset / height).saturating_sub(1) as usize;
    loop {
        let top = i as u64 * height;
        if top >= view_end {
            break;
        }
        if top + height > scroll_offset {
            first.get_or_insert(i);
            last_exclusive = i + 1;
        }
        i += 1;
    }

    let first = first.unwrap();
    let end = (last_exclusive + buffer_rows).min(count);
    let start = first.saturating_sub(buffer_rows).min(end);
    (start, end)
}

fn items(n: usize) -> Vec<u32> {
    (0..n as u32).collect()
}

#[test]
fn first_screen_with_default_buffer() {
    let data = items(1000);
    let w = compute_window(&data, h(50), 400, 0, DEFAULT_BUFFER_ROWS);
    assert_eq!(w.start_index, 0);
    // ceil(400 / 50) + 5
    assert_eq!(w.end_index, 13);
    assert_eq!(w.leading_padding, 0);
    assert_eq!(w.visible_items, &data[0..13]);
}

#[test]
fn scrolled_window_keeps_buffer_on_both_sides() {
    let data = items(1000);
    let w = compute_window(&data, h(50), 400, 1000, 5);
    // floor(1000 / 50) - 5
    assert_eq!(w.start_index, 15);
    // ceil(1400 / 50) + 5
    assert_eq!(w.end_index, 33);
    assert_eq!(w.leading_padding, 750);
    assert_eq!(w.len(), 18);
    assert_eq!(w.visible_items.first(), Some(&15));
    assert_eq!(w.visible_items.last(), Some(&32));
}

#[test]
fn end_clamps_to_len_near_the_bottom() {
    let data = items(1000);
    // max scroll offset is 1000 * 50 - 400
    let w = compute_window(&data, h(50), 400, 49_600, 5);
    assert_eq!(w.end_index, 1000);
    assert_eq!(w.start_index, 987);
    assert_eq!(w.leading_padding, 987 * 50);
}

#[test]
fn overscroll_never_inverts_the_range() {
    let data = items(10);
    let w = compute_window(&data, h(20), 100, 1_000_000, 5);
    assert_eq!(w.end_index, 10);
    assert_eq!(w.start_index, 10);
    assert!(w.is_empty());
    assert_eq!(w.leading_padding, 200);

    let r = compute_range(10, h(20), 100, u64::MAX, usize::MAX);
    assert!(r.start_index <= r.end_index);
    assert!(r.end_index <= 10);
}

#[test]
fn empty_list_yields_empty_window() {
    let data: Vec<u32> = Vec::new();
    for offset in [0u64, 10, 1_000] {
        let w = compute_window(&data, h(50), 400, offset, 5);
        assert_eq!(w.start_index, 0);
        assert_eq!(w.end_index, 0);
        assert!(w.visible_items.is_empty());
        assert_eq!(w.leading_padding, 0);
    }
}

#[test]
fn zero_buffer_matches_strictly_visible_rows() {
    let r = compute_range(100, h(10), 25, 5, 0);
    // rows 0 (0..10), 1 (10..20), 2 (20..30) intersect 5..30
    assert_eq!(r.start_index, 0);
    assert_eq!(r.end_index, 3);
}

#[test]
fn zero_item_height_is_rejected_at_construction() {
    assert_eq!(WindowOptions::new(0).unwrap_err(), WindowError::ZeroItemHeight);
    assert!(WindowOptions::new(1).is_ok());

    let mut list = WindowedList::new(WindowOptions::new(10).unwrap(), 5);
    assert_eq!(list.set_item_height(0), Err(WindowError::ZeroItemHeight));
    assert_eq!(list.item_height(), 10);
}

#[test]
fn blocks_are_positioned_from_leading_padding() {
    let data = items(1000);
    let w = compute_window(&data, h(50), 400, 1000, 5);
    let blocks: Vec<_> = w.blocks().collect();
    assert_eq!(blocks.len(), w.len());
    for (i, b) in blocks.iter().enumerate() {
        assert_eq!(b.index, w.start_index + i);
        assert_eq!(*b.item, data[w.start_index + i]);
        assert_eq!(b.top, w.leading_padding + i as u64 * 50);
        assert_eq!(b.height, 50);
    }
    assert_eq!(blocks[0].top, 750);
    assert_eq!(blocks[0].bottom(), 800);
}

#[test]
fn surface_height_is_independent_of_window() {
    let data = items(1000);
    let mut list = WindowedList::new(
        WindowOptions::new(50).unwrap().with_initial_viewport_height(400),
        data.len(),
    );
    let top = list.surface(&data);
    list.set_scroll_offset(20_000);
    let middle = list.surface(&data);
    assert_eq!(top.total_height, 50_000);
    assert_eq!(middle.total_height, 50_000);
    assert_eq!(list.total_size(), 50_000);
    assert!(top.blocks.len() < data.len());
    assert_eq!(middle.blocks[0].index, 395);
}

#[test]
fn list_queries_agree_with_pure_function() {
    let data = items(1000);
    let mut list = WindowedList::new(WindowOptions::new(50).unwrap(), data.len());
    list.set_viewport_and_scroll(400, 1000);

    let w = list.window(&data);
    assert_eq!(w, compute_window(&data, h(50), 400, 1000, 5));
    assert_eq!(list.window_range(), w.range());

    let visible = list.visible_range();
    assert_eq!(visible.start_index, 20);
    assert_eq!(visible.end_index, 28);

    let mut rows = Vec::new();
    list.collect_rows(&mut rows);
    assert_eq!(rows.len(), w.len());
    assert_eq!(rows[0].top, 750);
    assert_eq!(rows.last().map(|r| r.index), Some(32));
}

#[test]
fn buffer_rows_are_configurable() {
    let data = items(1000);
    let mut list = WindowedList::new(
        WindowOptions::new(50)
            .unwrap()
            .with_buffer_rows(0)
            .with_initial_viewport_height(400),
        data.len(),
    );
    list.set_scroll_offset(1000);
    assert_eq!(list.window_range().start_index, 20);
    assert_eq!(list.window_range().end_index, 28);

    list.set_buffer_rows(2);
    assert_eq!(list.window_range().start_index, 18);
    assert_eq!(list.window_range().end_index, 30);
}

#[test]
fn window_tolerates_stale_count() {
    let data = items(20);
    let mut list = WindowedList::new(WindowOptions::new(10).unwrap(), 1000);
    list.set_viewport_and_scroll(50, 500);
    let w = list.window(&data);
    assert!(w.end_index <= data.len());
    assert!(w.start_index <= w.end_index);
}

#[test]
fn on_change_fires_for_every_recompute_trigger() {
    let calls = Arc::new(AtomicUsize::new(0));
    let opts = WindowOptions::new(10).unwrap().with_on_change(Some({
        let calls = Arc::clone(&calls);
        move |_: &WindowedList, _| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }));
    let mut list = WindowedList::new(opts, 100);

    list.set_scroll_offset(10);
    list.set_viewport_height(30);
    list.set_count(200);
    list.set_item_height(20).unwrap();
    list.set_buffer_rows(1);
    assert_eq!(calls.load(Ordering::SeqCst), 5);

    // No-op updates do not notify.
    list.set_scroll_offset(10);
    list.set_count(200);
    list.set_item_height(20).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn batch_update_coalesces_notifications() {
    let calls = Arc::new(AtomicUsize::new(0));
    let opts = WindowOptions::new(10).unwrap().with_on_change(Some({
        let calls = Arc::clone(&calls);
        move |_: &WindowedList, _| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }));
    let mut list = WindowedList::new(opts, 100);

    list.apply_viewport_event(ViewportState::new(40, 30), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(list.is_scrolling());
    assert_eq!(list.scroll_direction(), Some(ScrollDirection::Forward));

    list.batch_update(|l| {
        l.set_scroll_offset(0);
        l.set_viewport_height(50);
        l.batch_update(|l| l.set_count(10));
    });
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(list.scroll_direction(), Some(ScrollDirection::Backward));
}

#[test]
fn is_scrolling_resets_after_delay() {
    let mut list = WindowedList::new(
        WindowOptions::new(10)
            .unwrap()
            .with_is_scrolling_reset_delay_ms(100),
        100,
    );
    list.apply_viewport_event(ViewportState::new(20, 50), 1_000);
    assert!(list.is_scrolling());

    list.update_scrolling(1_050);
    assert!(list.is_scrolling());

    list.update_scrolling(1_100);
    assert!(!list.is_scrolling());
    assert_eq!(list.scroll_direction(), None);
    assert_eq!(
        list.scroll_state(),
        ScrollState {
            offset: 20,
            is_scrolling: false
        }
    );
}

#[test]
fn restore_viewport_state_does_not_mark_scrolling() {
    let mut list = WindowedList::new(WindowOptions::new(10).unwrap(), 100);
    let snapshot = ViewportState::new(120, 40);
    list.restore_viewport_state(snapshot);
    assert_eq!(list.viewport_state(), snapshot);
    assert!(!list.is_scrolling());
    assert_eq!(snapshot.bottom(), 160);
}

#[test]
fn scroll_to_index_aligns_and_clamps() {
    let mut list = WindowedList::new(
        WindowOptions::new(10).unwrap().with_initial_viewport_height(50),
        100,
    );
    assert_eq!(list.scroll_to_index_offset(20, Align::Start), 200);
    assert_eq!(list.scroll_to_index_offset(20, Align::End), 160);
    assert_eq!(list.scroll_to_index_offset(20, Align::Center), 180);
    assert_eq!(list.scroll_to_index_offset(99, Align::Start), 950);
    assert_eq!(list.scroll_to_index_offset(10_000, Align::Start), 950);

    // Auto: already visible rows do not move the viewport.
    list.set_scroll_offset(100);
    assert_eq!(list.scroll_to_index_offset(12, Align::Auto), 100);
    assert_eq!(list.scroll_to_index_offset(5, Align::Auto), 50);
    assert_eq!(list.scroll_to_index_offset(30, Align::Auto), 260);

    assert_eq!(list.scroll_to_index(30, Align::Auto), 260);
    assert_eq!(list.scroll_offset(), 260);

    let empty = WindowedList::new(WindowOptions::new(10).unwrap(), 0);
    assert_eq!(empty.scroll_to_index_offset(3, Align::End), 0);
}

#[test]
fn offset_lookup_and_clamping() {
    let mut list = WindowedList::new(WindowOptions::new(25).unwrap(), 40);
    list.set_viewport_height(100);
    assert_eq!(list.index_at_offset(0), Some(0));
    assert_eq!(list.index_at_offset(24), Some(0));
    assert_eq!(list.index_at_offset(25), Some(1));
    assert_eq!(list.index_at_offset(u64::MAX), Some(39));
    assert_eq!(list.item_top(3), Some(75));
    assert_eq!(list.item_top(40), None);

    assert_eq!(list.max_scroll_offset(), 900);
    list.set_scroll_offset_clamped(5_000);
    assert_eq!(list.scroll_offset(), 900);

    let empty = WindowedList::new(WindowOptions::new(25).unwrap(), 0);
    assert_eq!(empty.index_at_offset(0), None);
}

#[test]
fn randomized_ranges_match_row_scan() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..2_000 {
        let count = rng.gen_range_usize(0, 300);
        let item_height = rng.gen_range_u32(1, 64);
        let container = rng.gen_range_u32(1, 800);
        let offset = rng.gen_range_u64(0, 20_000);
        let buffer = rng.gen_range_usize(0, 8);

        let r = compute_range(count, h(item_height), container, offset, buffer);
        let (start, end) = expected_range(count, item_height, container, offset, buffer);
        assert_eq!(
            (r.start_index, r.end_index),
            (start, end),
            "count={count} item_height={item_height} container={container} offset={offset} buffer={buffer}"
        );
        assert_eq!(r.leading_padding, start as u64 * item_height as u64);
    }
}
