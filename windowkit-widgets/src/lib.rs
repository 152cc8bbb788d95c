//! Host binding and headless widgets for the `windowkit` crate.
//!
//! `windowkit` owns the windowing math and list state and never sees a host. This crate
//! provides the pieces around it:
//!
//! - [`ListBinding`]: mounts a [`windowkit::WindowedList`] on a [`ScrollHost`], with scoped
//!   listener registration and optional per-frame coalescing.
//! - [`Debouncer`] and [`Fetcher`]: async collaborators on `tokio`, with supersede/cancel
//!   semantics.
//! - Headless widgets: [`Autocomplete`]/[`SearchBox`], [`Dialog`], [`Pagination`]/
//!   [`PagedCatalog`], [`PasswordGenerator`].
//!
//! No widget draws anything; hosts read state and forward input events.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod binding;
mod cache;
mod catalog;
mod debounce;
mod dialog;
mod error;
mod fetch;
mod host;
mod items;
mod pagination;
mod password;
mod search;


pub use binding::{ListBinding, UpdateMode};
pub use cache::{BoundedCache, DEFAULT_CACHE_CAPACITY};
pub use catalog::{PRODUCTS_URL, Product, paginate};
pub use debounce::{Debouncer, Pending};
pub use dialog::{
    CLOSE_BUTTON, Dialog, DialogKey, DialogOptions, DialogOutcome, FocusId, OnCloseCallback,
};
pub use error::FetchError;
pub use fetch::{FetchState, Fetcher, HttpTransport, Transport};
pub use host::{
    ScrollHost, Subscription, ViewportEvent, ViewportEventKind, ViewportHost, ViewportListener,
};
pub use items::{Item, generate_items};
pub use pagination::{
    CatalogOptions, DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE_DEBOUNCE_MS, OnPageChange, PageButton,
    PageStatus, PagedCatalog, Pagination, total_pages,
};
pub use password::{
    COPIED_RESET_MS, CharClass, DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH, PasswordGenerator,
    PasswordOptions, generate, generate_with,
};
pub use search::{
    Autocomplete, DEFAULT_SEARCH_DEBOUNCE_MS, SearchBox, SearchKey, SearchOptions, SearchOutcome,
};
