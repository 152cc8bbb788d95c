use windowkit::{Align, WindowOptions, WindowedList};
use windowkit_widgets::{ListBinding, ScrollHost, ViewportHost, generate_items};

fn main() {
    // Example: a host that reports scroll events, with a list bound to it.
    //
    // The binding recomputes once per frame no matter how many scroll events arrived in
    // between, and the listener goes away when the binding is dropped.
    let items = generate_items(10_000);
    let host = ViewportHost::new(400);
    let list = WindowedList::new(
        WindowOptions::new(50).expect("non-zero item height"),
        items.len(),
    );
    let binding = ListBinding::mount(host.clone(), list).with_coalescing();

    let mut now_ms = 0u64;
    for frame in 0..8 {
        for _ in 0..4 {
            host.scroll_by(90, now_ms);
        }
        now_ms += 16;
        binding.on_frame(now_ms);

        let window = binding.window(&items).expect("list is bound");
        let first = window.blocks().next().map(|b| b.item.content.as_str());
        println!(
            "frame={frame} off={} range={}..{} first={first:?}",
            host.scroll_offset(),
            window.start_index,
            window.end_index,
        );
    }

    binding.scroll_to_index(9_999, Align::End, now_ms);
    binding.on_frame(now_ms + 16);
    println!("jumped to end: range={:?}", binding.window_range());

    drop(binding);
    println!("listeners after drop: {}", host.listener_count());
}
