use alloc::vec::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Scrolls the least distance that brings the item fully into view ("nearest").
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// The item-free part of a window: which rows to materialize and where they start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    /// Vertical space reserved above the first rendered row (`start_index * item_height`).
    pub leading_padding: u64,
}

impl WindowRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
        leading_padding: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// A window over a borrowed item slice.
///
/// `visible_items` is always `items[start_index..end_index]` of the slice the window was computed
/// from.
#[derive(Debug, PartialEq, Eq)]
pub struct Window<'a, T> {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    pub visible_items: &'a [T],
    pub leading_padding: u64,
    pub item_height: u32,
}

impl<T> Clone for Window<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Window<'_, T> {}

impl<'a, T> Window<'a, T> {
    pub fn range(&self) -> WindowRange {
        WindowRange {
            start_index: self.start_index,
            end_index: self.end_index,
            leading_padding: self.leading_padding,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.visible_items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.visible_items.len()
    }

    /// Yields one positioned block per visible item, in list order.
    ///
    /// Block `i` sits at `leading_padding + i * item_height`.
    pub fn blocks(self) -> impl ExactSizeIterator<Item = Block<'a, T>> {
        let start_index = self.start_index;
        let leading_padding = self.leading_padding;
        let height = self.item_height;
        self.visible_items
            .iter()
            .enumerate()
            .map(move |(i, item)| Block {
                index: start_index + i,
                item,
                top: leading_padding.saturating_add(i as u64 * height as u64),
                height,
            })
    }
}

/// A single materialized row.
#[derive(Debug, PartialEq, Eq)]
pub struct Block<'a, T> {
    /// Index in the full item list.
    pub index: usize,
    pub item: &'a T,
    /// Offset from the top of the scrollable surface.
    pub top: u64,
    pub height: u32,
}

impl<T> Clone for Block<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Block<'_, T> {}

impl<T> Block<'_, T> {
    pub fn bottom(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }
}

/// Positioned row without an item reference, for adapters that look items up themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowSlot {
    pub index: usize,
    pub top: u64,
    pub height: u32,
}

impl RowSlot {
    pub fn bottom(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }
}

/// Everything a host needs to paint one frame: the fixed surface height plus the rows to draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface<'a, T> {
    /// Always `count * item_height`, regardless of how many rows are materialized.
    pub total_height: u64,
    pub blocks: Vec<Block<'a, T>>,
}
