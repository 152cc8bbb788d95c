use std::num::NonZeroU32;

use proptest::prelude::*;
use windowkit::{WindowOptions, WindowedList, compute_range, compute_window};

fn arb_height() -> impl Strategy<Value = NonZeroU32> {
    (1u32..=200).prop_map(|h| NonZeroU32::new(h).unwrap())
}

proptest! {
    /// Property: indexes stay ordered and inside the list for every offset
    #[test]
    fn prop_range_is_clamped(
        count in 0usize..5_000,
        item_height in arb_height(),
        container in 1u32..2_000,
        offset in any::<u64>(),
        buffer in 0usize..64,
    ) {
        let r = compute_range(count, item_height, container, offset, buffer);
        prop_assert!(r.start_index <= r.end_index);
        prop_assert!(r.end_index <= count);
    }

    /// Property: the slice is exactly items[start..end] and the padding follows start
    #[test]
    fn prop_window_is_the_matching_slice(
        count in 0usize..2_000,
        item_height in arb_height(),
        container in 1u32..2_000,
        offset in 0u64..500_000,
        buffer in 0usize..16,
    ) {
        let items: Vec<usize> = (0..count).collect();
        let w = compute_window(&items, item_height, container, offset, buffer);
        prop_assert_eq!(w.visible_items.len(), w.end_index - w.start_index);
        prop_assert_eq!(w.visible_items, &items[w.start_index..w.end_index]);
        prop_assert_eq!(w.leading_padding, w.start_index as u64 * item_height.get() as u64);
    }

    /// Property: identical inputs give identical output
    #[test]
    fn prop_compute_is_idempotent(
        count in 0usize..2_000,
        item_height in arb_height(),
        container in 1u32..2_000,
        offset in any::<u64>(),
        buffer in 0usize..16,
    ) {
        let a = compute_range(count, item_height, container, offset, buffer);
        let b = compute_range(count, item_height, container, offset, buffer);
        prop_assert_eq!(a, b);
    }

    /// Property: scrolling further down never moves the start of the window up
    #[test]
    fn prop_start_is_monotonic_in_offset(
        count in 0usize..2_000,
        item_height in arb_height(),
        container in 1u32..2_000,
        offset in 0u64..500_000,
        delta in 0u64..50_000,
        buffer in 0usize..16,
    ) {
        let before = compute_range(count, item_height, container, offset, buffer);
        let after = compute_range(count, item_height, container, offset + delta, buffer);
        prop_assert!(after.start_index >= before.start_index);
    }

    /// Property: every row that intersects the viewport is inside the window
    #[test]
    fn prop_visible_rows_are_covered(
        count in 1usize..2_000,
        item_height in arb_height(),
        container in 1u32..2_000,
        offset in 0u64..500_000,
        buffer in 0usize..16,
    ) {
        let h = item_height.get() as u64;
        let r = compute_range(count, item_height, container, offset, buffer);
        let view_end = offset + container as u64;
        for index in 0..count {
            let top = index as u64 * h;
            if top < view_end && top + h > offset {
                prop_assert!(r.start_index <= index && index < r.end_index);
            }
        }
    }

    /// Property: the stateful list always agrees with the pure function
    #[test]
    fn prop_list_matches_pure_function(
        count in 0usize..2_000,
        item_height in 1u32..200,
        offsets in prop::collection::vec((0u64..200_000, 1u32..1_000), 1..20),
    ) {
        let items: Vec<usize> = (0..count).collect();
        let mut list = WindowedList::new(WindowOptions::new(item_height).unwrap(), count);
        for (now_ms, (offset, viewport)) in offsets.into_iter().enumerate() {
            list.apply_viewport_event(windowkit::ViewportState::new(offset, viewport), now_ms as u64);
            let expected = compute_window(
                &items,
                NonZeroU32::new(item_height).unwrap(),
                viewport,
                offset,
                list.buffer_rows(),
            );
            prop_assert_eq!(list.window(&items), expected);
        }
    }
}

#[test]
fn empty_list_is_empty_for_any_offset() {
    let items: Vec<u8> = Vec::new();
    for offset in [0u64, 1, 49, 50, u64::MAX] {
        let w = compute_window(&items, NonZeroU32::new(50).unwrap(), 400, offset, 5);
        assert_eq!((w.start_index, w.end_index, w.leading_padding), (0, 0, 0));
        assert!(w.visible_items.is_empty());
    }
}

#[test]
fn rendered_blocks_cover_viewport_for_each_scroll_step() {
    let items: Vec<u32> = (0..1_000).collect();
    let mut list = WindowedList::new(
        WindowOptions::new(50).unwrap().with_initial_viewport_height(400),
        items.len(),
    );
    let mut offset = 0u64;
    while offset <= list.max_scroll_offset() {
        list.set_scroll_offset(offset);
        let surface = list.surface(&items);
        let first = surface.blocks.first().expect("non-empty window");
        let last = surface.blocks.last().expect("non-empty window");
        assert!(first.top <= offset);
        assert!(last.bottom() >= offset + 400);
        assert_eq!(surface.total_height, 50_000);
        offset += 37;
    }
}
