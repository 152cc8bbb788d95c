// Example: the pure window function and the stateful list side by side.
use std::num::NonZeroU32;

use windowkit::{Align, WindowOptions, WindowedList, compute_window};

fn main() {
    let items: Vec<String> = (1..=1_000).map(|n| format!("Item {n}")).collect();

    let w = compute_window(&items, NonZeroU32::new(50).unwrap(), 400, 1_000, 5);
    println!(
        "pure: start={}, end={}, leading_padding={}",
        w.start_index, w.end_index, w.leading_padding
    );

    let mut list = WindowedList::new(
        WindowOptions::new(50)
            .expect("non-zero item height")
            .with_initial_viewport_height(400),
        items.len(),
    );
    list.set_scroll_offset(1_000);
    println!("total_size={}", list.total_size());
    for block in list.window(&items).blocks().take(3) {
        println!("  top={} {}", block.top, block.item);
    }

    list.scroll_to_index(999, Align::End);
    println!("after scroll_to_index: offset={}", list.scroll_offset());
}
