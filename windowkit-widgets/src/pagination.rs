use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{BoundedCache, DEFAULT_CACHE_CAPACITY};
use crate::catalog::{PRODUCTS_URL, Product, paginate};
use crate::debounce::Debouncer;
use crate::fetch::{Fetcher, HttpTransport, Transport};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;
pub const DEFAULT_PAGE_DEBOUNCE_MS: u64 = 300;

pub type OnPageChange = Arc<dyn Fn(u32) + Send + Sync>;

/// `ceil(total_items / per_page)`. Zero items, or a zero page size, give zero pages.
pub fn total_pages(total_items: usize, per_page: usize) -> u32 {
    if per_page == 0 {
        return 0;
    }
    u32::try_from(total_items.div_ceil(per_page)).unwrap_or(u32::MAX)
}

/// One control of the page bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageButton {
    Previous { disabled: bool },
    Page { number: u32, active: bool },
    Next { disabled: bool },
}

/// 1-indexed page selection.
///
/// Requests for pages outside `1..=total_pages`, or for the current page, are ignored and do
/// not reach the page-change callback.
#[derive(Clone)]
pub struct Pagination {
    current_page: u32,
    total_pages: u32,
    on_page_change: Option<OnPageChange>,
}

impl Pagination {
    pub fn new(total_pages: u32) -> Self {
        Self {
            current_page: 1,
            total_pages,
            on_page_change: None,
        }
    }

    pub fn with_on_page_change(mut self, f: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_page_change = Some(Arc::new(f));
        self
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Updates the page count. The current page is left as is.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages;
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// `Previous`, one button per page, `Next`.
    pub fn buttons(&self) -> Vec<PageButton> {
        let mut out = Vec::with_capacity(self.total_pages as usize + 2);
        out.push(PageButton::Previous {
            disabled: !self.has_previous(),
        });
        out.extend((1..=self.total_pages).map(|number| PageButton::Page {
            number,
            active: number == self.current_page,
        }));
        out.push(PageButton::Next {
            disabled: !self.has_next(),
        });
        out
    }

    /// Returns `true` if the page changed.
    pub fn select(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages || page == self.current_page {
            wtrace!(page, total_pages = self.total_pages, "Pagination: ignored");
            return false;
        }
        self.current_page = page;
        if let Some(f) = &self.on_page_change {
            f(page);
        }
        true
    }

    pub fn next(&mut self) -> bool {
        self.select(self.current_page.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.select(self.current_page.saturating_sub(1))
    }
}

impl fmt::Debug for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pagination")
            .field("current_page", &self.current_page)
            .field("total_pages", &self.total_pages)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    pub per_page: usize,
    pub debounce_ms: u64,
    pub cache_capacity: usize,
    pub endpoint: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_ITEMS_PER_PAGE,
            debounce_ms: DEFAULT_PAGE_DEBOUNCE_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            endpoint: PRODUCTS_URL.to_owned(),
        }
    }
}

impl CatalogOptions {
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

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
}

/// What the product page should display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageStatus {
    Error(String),
    Loading,
    Empty,
    Ready,
}

struct CatalogState {
    pagination: Pagination,
    products: Vec<Product>,
    total_items: usize,
    /// The page the latest `load_page` call asked for.
    requested: u32,
    loading: bool,
    error: Option<String>,
    cache: BoundedCache<u32, Vec<Product>>,
}

impl CatalogState {
    fn status(&self) -> PageStatus {
        if let Some(error) = &self.error {
            PageStatus::Error(error.clone())
        } else if self.loading {
            PageStatus::Loading
        } else if self.products.is_empty() {
            PageStatus::Empty
        } else {
            PageStatus::Ready
        }
    }
}

/// A paginated view over the product catalog.
///
/// Page loads are debounced so rapid clicking only loads the page the user settles on, and
/// each loaded page is cached.
pub struct PagedCatalog<X = HttpTransport> {
    per_page: usize,
    endpoint: String,
    state: Mutex<CatalogState>,
    fetcher: Fetcher<Vec<Product>, X>,
    gate: Debouncer<u32, u32>,
}

impl PagedCatalog<HttpTransport> {
    pub fn http(options: CatalogOptions) -> Self {
        Self::new(HttpTransport::new(), options)
    }
}

impl<X: Transport> PagedCatalog<X> {
    pub fn new(transport: X, options: CatalogOptions) -> Self {
        Self {
            per_page: options.per_page,
            state: Mutex::new(CatalogState {
                pagination: Pagination::new(0),
                products: Vec::new(),
                total_items: 0,
                requested: 0,
                loading: false,
                error: None,
                cache: BoundedCache::new(options.cache_capacity),
            }),
            fetcher: Fetcher::new(transport),
            gate: Debouncer::new(Duration::from_millis(options.debounce_ms), |page: u32| page),
            endpoint: options.endpoint,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_page(&self) -> u32 {
        self.lock().pagination.current_page()
    }

    pub fn total_pages(&self) -> u32 {
        self.lock().pagination.total_pages()
    }

    pub fn total_items(&self) -> usize {
        self.lock().total_items
    }

    pub fn buttons(&self) -> Vec<PageButton> {
        self.lock().pagination.buttons()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn status(&self) -> PageStatus {
        self.lock().status()
    }

    pub fn is_cached(&self, page: u32) -> bool {
        self.lock().cache.contains(&page)
    }

    /// Loads the current page (page 1 on a fresh catalog).
    pub async fn load_initial(&self) -> Option<PageStatus> {
        let page = self.current_page();
        self.load_debounced(page).await
    }

    /// Selects `page` and loads it once the debounce settles.
    ///
    /// Returns `None` when the request is ignored (invalid or current page) or superseded by
    /// a later one.
    pub async fn change_page(&self, page: u32) -> Option<PageStatus> {
        if !self.lock().pagination.select(page) {
            return None;
        }
        self.load_debounced(page).await
    }

    async fn load_debounced(&self, page: u32) -> Option<PageStatus> {
        let page = self.gate.call_with_result(page).await?;
        self.load_page(page).await
    }

    /// Loads `page` immediately, from the cache when possible.
    ///
    /// Either way the call supersedes any load still in flight: that load's response is
    /// dropped and it returns `None`.
    pub async fn load_page(&self, page: u32) -> Option<PageStatus> {
        {
            let mut state = self.lock();
            state.requested = page;
            state.error = None;
            if let Some(cached) = state.cache.get(&page).cloned() {
                self.fetcher.cancel();
                state.products = cached;
                state.loading = false;
                wtrace!(page, "PagedCatalog: cache hit");
                return Some(state.status());
            }
            state.loading = true;
        }

        let result = self.fetcher.fetch(&self.endpoint).await;

        let mut guard = self.lock();
        let state = &mut *guard;
        if state.requested != page {
            wtrace!(page, requested = state.requested, "PagedCatalog: stale response");
            return None;
        }
        match result {
            Ok(all) => {
                state.total_items = all.len();
                state
                    .pagination
                    .set_total_pages(total_pages(all.len(), self.per_page));
                let slice = paginate(&all, page, self.per_page).to_vec();
                wdebug!(page, count = slice.len(), total = all.len(), "PagedCatalog: loaded");
                state.cache.insert(page, slice.clone());
                state.products = slice;
            }
            Err(err) if err.is_cancelled() => return None,
            Err(err) => {
                wwarn!(page, error = %err, "PagedCatalog: load failed");
                state.error = Some(err.to_string());
            }
        }
        state.loading = false;
        Some(state.status())
    }
}
