use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use windowkit::{Align, Window, WindowOptions, WindowedList};

use crate::cache::{BoundedCache, DEFAULT_CACHE_CAPACITY};
use crate::catalog::{PRODUCTS_URL, Product};
use crate::debounce::{Debouncer, Pending};
use crate::fetch::{FetchState, Fetcher, HttpTransport, Transport};

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

const DEFAULT_ROW_HEIGHT: NonZeroU32 = NonZeroU32::new(64).unwrap();

/// Keys the search box reacts to while its dropdown is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// What a key press did.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    /// The dropdown was closed or the key had no effect.
    Ignored,
    /// Focus moved; `scroll_offset` is where the dropdown scrolled to keep it in view.
    Focused {
        index: Option<usize>,
        scroll_offset: u64,
    },
    Selected(Product),
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub debounce_ms: u64,
    pub cache_capacity: usize,
    pub endpoint: String,
    /// Height of one dropdown row.
    pub row_height: NonZeroU32,
    pub dropdown_height: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            endpoint: PRODUCTS_URL.to_owned(),
            row_height: DEFAULT_ROW_HEIGHT,
            dropdown_height: 300,
        }
    }
}

impl SearchOptions {
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_row_height(mut self, row_height: NonZeroU32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_dropdown_height(mut self, dropdown_height: u32) -> Self {
        self.dropdown_height = dropdown_height;
        self
    }
}

/// Headless typeahead state: query, filtered results, dropdown focus.
///
/// Results are memoized per query string in a bounded cache. The dropdown is a
/// [`WindowedList`], so moving focus keeps the focused row scrolled into view.
#[derive(Debug)]
pub struct Autocomplete {
    query: String,
    results: Vec<Product>,
    is_open: bool,
    is_loading: bool,
    error: Option<String>,
    focused_index: Option<usize>,
    cache: BoundedCache<String, Vec<Product>>,
    dropdown: WindowedList,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new(&SearchOptions::default())
    }
}

impl Autocomplete {
    pub fn new(options: &SearchOptions) -> Self {
        let dropdown = WindowedList::new(
            WindowOptions::with_item_height(options.row_height)
                .with_initial_viewport_height(options.dropdown_height),
            0,
        );
        Self {
            query: String::new(),
            results: Vec::new(),
            is_open: false,
            is_loading: false,
            error: None,
            focused_index: None,
            cache: BoundedCache::new(options.cache_capacity),
            dropdown,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Product] {
        &self.results
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused_index
    }

    pub fn cache(&self) -> &BoundedCache<String, Vec<Product>> {
        &self.cache
    }

    pub fn dropdown(&self) -> &WindowedList {
        &self.dropdown
    }

    /// The dropdown rows to render at the current dropdown scroll position.
    pub fn visible_results(&self) -> Window<'_, Product> {
        self.dropdown.window(&self.results)
    }

    /// Records a keystroke. Filtering is applied separately (usually debounced).
    pub fn input(&mut self, value: &str) {
        self.query.clear();
        self.query.push_str(value);
        self.focused_index = None;
    }

    /// Filters `products` by `search` and opens the dropdown.
    ///
    /// A blank search closes the dropdown. Each distinct search string is filtered once.
    pub fn apply_filter(&mut self, search: &str, products: &[Product]) {
        if search.trim().is_empty() {
            self.set_results(Vec::new());
            self.is_open = false;
            return;
        }

        if let Some(cached) = self.cache.get(search) {
            let cached = cached.clone();
            wtrace!(search, hits = cached.len(), "Autocomplete: cache hit");
            self.set_results(cached);
            self.is_open = true;
            self.is_loading = false;
            return;
        }

        self.is_loading = true;
        self.error = None;

        let filtered: Vec<Product> = products
            .iter()
            .filter(|p| p.matches(search))
            .cloned()
            .collect();
        wdebug!(search, hits = filtered.len(), "Autocomplete: filtered");

        self.cache.insert(search.to_owned(), filtered.clone());
        self.set_results(filtered);
        self.is_open = true;
        self.is_loading = false;
    }

    /// Opens the dropdown in its loading state for a search made before the catalog arrived.
    ///
    /// Nothing is filtered or cached; [`Autocomplete::catalog_loaded`] runs the search later.
    pub fn await_catalog(&mut self, search: &str) {
        self.set_results(Vec::new());
        if search.trim().is_empty() {
            self.is_open = false;
            self.is_loading = false;
            return;
        }
        self.is_open = true;
        self.is_loading = true;
    }

    /// Runs the current query against `products` if a search was waiting on the catalog.
    pub fn catalog_loaded(&mut self, products: &[Product]) {
        if !self.is_loading {
            return;
        }
        let query = self.query.clone();
        self.apply_filter(&query, products);
    }

    fn set_results(&mut self, results: Vec<Product>) {
        let count = results.len();
        self.results = results;
        self.dropdown.batch_update(|d| {
            d.set_count(count);
            d.set_scroll_offset(0);
        });
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn handle_key(&mut self, key: SearchKey) -> SearchOutcome {
        if !self.is_open {
            return SearchOutcome::Ignored;
        }
        match key {
            SearchKey::Down => {
                let next = match self.focused_index {
                    None => 0,
                    Some(i) => i.saturating_add(1),
                };
                let last = self.results.len().checked_sub(1);
                self.move_focus(last.map(|last| next.min(last)))
            }
            SearchKey::Up => {
                let prev = self.focused_index.and_then(|i| i.checked_sub(1));
                self.move_focus(prev)
            }
            SearchKey::Enter => match self.focused_index {
                Some(i) if i < self.results.len() => {
                    let product = self.results[i].clone();
                    self.select(&product);
                    SearchOutcome::Selected(product)
                }
                _ => SearchOutcome::Ignored,
            },
            SearchKey::Escape => {
                self.is_open = false;
                SearchOutcome::Closed
            }
        }
    }

    fn move_focus(&mut self, index: Option<usize>) -> SearchOutcome {
        self.focused_index = index;
        let scroll_offset = match index {
            Some(i) => self.dropdown.scroll_to_index(i, Align::Auto),
            None => self.dropdown.scroll_offset(),
        };
        SearchOutcome::Focused {
            index,
            scroll_offset,
        }
    }

    pub fn select(&mut self, product: &Product) {
        self.query.clear();
        self.query.push_str(&product.title);
        self.is_open = false;
        self.focused_index = None;
        wdebug!(id = product.id, "Autocomplete: selected");
    }

    /// Status lines shown above the results. Empty while the dropdown is closed.
    pub fn messages(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if !self.is_open {
            return out;
        }
        if self.is_loading {
            out.push("Loading...");
        }
        if let Some(error) = self.error.as_deref() {
            out.push(error);
        }
        if !self.is_loading && self.error.is_none() && self.results.is_empty() {
            out.push("No products found");
        }
        out
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Async typeahead over the product catalog.
///
/// Keystrokes update the query immediately; filtering runs once input has been idle for
/// `debounce_ms`.
pub struct SearchBox<X = HttpTransport> {
    state: Arc<Mutex<Autocomplete>>,
    products: Arc<Mutex<FetchState<Vec<Product>>>>,
    fetcher: Fetcher<Vec<Product>, X>,
    filter: Debouncer<String>,
    endpoint: String,
}

impl SearchBox<HttpTransport> {
    pub fn http(options: SearchOptions) -> Self {
        Self::new(HttpTransport::new(), options)
    }
}

impl<X: Transport> SearchBox<X> {
    pub fn new(transport: X, options: SearchOptions) -> Self {
        let state = Arc::new(Mutex::new(Autocomplete::new(&options)));
        let products: Arc<Mutex<FetchState<Vec<Product>>>> = Arc::default();

        let filter = {
            let state = Arc::clone(&state);
            let products = Arc::clone(&products);
            Debouncer::new(
                Duration::from_millis(options.debounce_ms),
                move |search: String| {
                    let products = lock(&products);
                    let mut state = lock(&state);
                    match products.data.as_deref() {
                        Some(all) => state.apply_filter(&search, all),
                        None => state.await_catalog(&search),
                    }
                },
            )
        };

        Self {
            state,
            products,
            fetcher: Fetcher::new(transport),
            filter,
            endpoint: options.endpoint,
        }
    }

    /// Loads the catalog. A failure is surfaced as the search error message; a search typed
    /// while loading is filtered once the catalog arrives.
    pub async fn load(&self) {
        lock(&self.products).begin();
        let result = self.fetcher.fetch(&self.endpoint).await;
        let mut products = lock(&self.products);
        products.finish(result);
        let mut state = lock(&self.state);
        if let Some(error) = products.error.clone() {
            wwarn!(error = %error, "SearchBox: catalog load failed");
            state.set_loading(false);
            state.set_error(Some(error));
        } else if let Some(all) = products.data.as_deref() {
            state.catalog_loaded(all);
        }
    }

    pub fn products_loaded(&self) -> bool {
        lock(&self.products).data.is_some()
    }

    /// Records a keystroke and schedules filtering. The returned future resolves once this
    /// keystroke's filter ran (`Some`) or was superseded (`None`).
    pub fn input(&self, value: impl Into<String>) -> Pending<()> {
        let value = value.into();
        lock(&self.state).input(&value);
        self.filter.call_with_result(value)
    }

    pub fn handle_key(&self, key: SearchKey) -> SearchOutcome {
        lock(&self.state).handle_key(key)
    }

    pub fn select(&self, product: &Product) {
        lock(&self.state).select(product);
    }

    /// Runs `f` with the current search state.
    pub fn with_state<R>(&self, f: impl FnOnce(&Autocomplete) -> R) -> R {
        f(&lock(&self.state))
    }
}
