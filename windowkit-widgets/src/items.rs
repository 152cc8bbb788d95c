use serde::{Deserialize, Serialize};

/// A demo row for the windowed list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: usize,
    pub content: String,
}

/// `count` rows with ids `0..count` and content `Item 1`, `Item 2`, ...
pub fn generate_items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|id| Item {
            id,
            content: format!("Item {}", id + 1),
        })
        .collect()
}
