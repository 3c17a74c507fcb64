/// Listings per page on the marketplace grid.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// `ceil(len / page_size)`; zero items means zero pages.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Page controls are only worth rendering when there is somewhere to go.
pub fn shows_controls(total_pages: usize) -> bool {
    total_pages > 1
}

/// The 1-indexed `page` of `items`, clipped to what exists.
///
/// Out-of-range pages (including page 0) yield an empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Current page plus the fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
    page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Jumps to `page` if it is one of the `total` pages. Returns whether it moved.
    pub fn go_to(&mut self, page: usize, total: usize) -> bool {
        if page == 0 || page > total.max(1) || page == self.current {
            return false;
        }
        self.current = page;
        true
    }

    /// Pulls the page back into `1..=max(total, 1)` after the item count shrank.
    pub fn clamp(&mut self, total: usize) {
        self.current = self.current.clamp(1, total.max(1));
    }
}
