//! A headless windowed-list engine.
//!
//! Given a long list of uniformly sized rows, a viewport height and a scroll offset, this crate
//! computes the contiguous slice of rows that has to be materialized (plus a few buffer rows on
//! each side) and the leading padding that keeps those rows at their true scroll position.
//!
//! The core is a pure function, [`compute_window`]. [`WindowedList`] wraps it with the state an
//! adapter usually tracks between frames (offset, viewport height, scroll activity) and a change
//! callback, but every query still goes through the same function.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - viewport height
//! - scroll offset
//! - the items themselves, when it wants a [`Window`] instead of a bare [`WindowRange`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod list;
mod options;
mod state;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use error::WindowError;
pub use list::WindowedList;
pub use options::{OnChangeCallback, WindowOptions};
pub use state::{ScrollState, ViewportState};
pub use types::{Align, Block, RowSlot, ScrollDirection, Surface, Window, WindowRange};
pub use window::{DEFAULT_BUFFER_ROWS, compute_range, compute_window, total_height};
