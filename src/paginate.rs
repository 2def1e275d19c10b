//! Page windows over a filtered list.
//!
//! Pages are 1-based. A requested index outside `[1, total_pages]` is
//! clamped rather than rejected, so any index a stale link carries still
//! lands on a real page.
//!
//! An empty list is reported as page 1 of 1 with no items. The naive
//! `min(max(p, 1), total_pages)` clamp would produce page 0 there.

use std::num::NonZeroUsize;

/// One page of a list, plus the totals needed to describe it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    /// Items on this page, at most `page_size` of them.
    pub items: &'a [T],
    /// Clamped 1-based page index.
    pub page_index: usize,
    /// Always at least 1.
    pub total_pages: usize,
    /// Length of the whole list.
    pub total_count: usize,
    pub page_size: usize,
}

impl<T> Page<'_, T> {
    /// 0-based offset of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_sub(1) * self.page_size
    }

    pub fn is_first(&self) -> bool {
        self.page_index == 1
    }

    pub fn is_last(&self) -> bool {
        self.page_index == self.total_pages
    }

    /// 1-based inclusive item range shown, or `None` for an empty list.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.total_count == 0 {
            return None;
        }
        let start = self.offset() + 1;
        let end = (self.offset() + self.page_size).min(self.total_count);
        Some((start, end))
    }
}

/// Number of pages needed for `total_count` items; 0 for an empty list.
pub fn page_count(total_count: usize, page_size: NonZeroUsize) -> usize {
    total_count.div_ceil(page_size.get())
}

/// Slice out page `page_index` of `items`.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: NonZeroUsize) -> Page<'_, T> {
    let total_count = items.len();
    let total_pages = page_count(total_count, page_size).max(1);
    let page_index = page_index.clamp(1, total_pages);

    let size = page_size.get();
    let start = ((page_index - 1) * size).min(total_count);
    let end = (start + size).min(total_count);

    Page {
        items: &items[start..end],
        page_index,
        total_pages,
        total_count,
        page_size: size,
    }
}
