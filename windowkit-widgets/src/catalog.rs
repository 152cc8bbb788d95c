use serde::{Deserialize, Serialize};

/// The public demo catalog both product widgets read from.
pub const PRODUCTS_URL: &str = "https://fakestoreapi.com/products";

/// One catalog entry. Unknown fields in the JSON payload are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Price with two decimals, as shown on a product card: `Price: $109.95`.
    pub fn price_label(&self) -> String {
        format!("Price: ${:.2}", self.price)
    }

    /// Price as shown in a compact search result: `$22.3`.
    pub fn short_price(&self) -> String {
        format!("${}", self.price)
    }

    /// Case-insensitive substring match on the title.
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// The products that `page` (1-based) shows at `per_page` items per page.
///
/// Out-of-range pages give an empty slice.
pub fn paginate(all: &[Product], page: u32, per_page: usize) -> &[Product] {
    let Some(page_index) = (page as usize).checked_sub(1) else {
        return &[];
    };
    let start = page_index.saturating_mul(per_page).min(all.len());
    let end = start.saturating_add(per_page).min(all.len());
    &all[start..end]
}
