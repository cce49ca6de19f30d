//! Offset/limit pagination arithmetic.
//!
//! Everything here is a pure function of `(offset, limit, total_count)`. Bounds
//! are not enforced: an offset past the last page, or one that is not a
//! multiple of the limit, is reported as-is. Only the key handler refuses to
//! move past the first or last page.

/// Page sizes offered by the selector, in display order.
pub const PAGE_SIZES: [usize; 4] = [4, 6, 8, 11];

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// 1-based page containing `offset`.
///
/// A zero `limit` is treated as 1 so the function stays total.
pub fn current_page(offset: usize, limit: usize) -> usize {
    offset / limit.max(1) + 1
}

/// Number of pages needed for `total_count` items, never less than 1.
pub fn total_pages(total_count: u64, limit: usize) -> usize {
    let limit = u64::try_from(limit.max(1)).unwrap_or(u64::MAX);
    let pages = total_count.div_ceil(limit).max(1);
    usize::try_from(pages).unwrap_or(usize::MAX)
}

/// Offset of the first item on `page` (1-based; page 0 is read as page 1).
pub fn offset_for_page(page: usize, limit: usize) -> usize {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Everything the pager needs to draw itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub current: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageInfo {
    pub fn compute(offset: usize, limit: usize, total_count: u64) -> Self {
        let current = current_page(offset, limit);
        let total = total_pages(total_count, limit);
        Self {
            current,
            total,
            has_prev: current > 1,
            has_next: current < total,
        }
    }
}
