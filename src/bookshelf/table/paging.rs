use std::ops::Range;

/// Page state over a sequence of `length` items.
///
/// The page index always points at a page that exists: when the length
/// shrinks the index clamps to the last page instead of leaving an empty page
/// on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_index: usize,
    page_size: usize,
    length: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            length: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of pages; zero when there are no items.
    pub fn page_count(&self) -> usize {
        self.length.div_ceil(self.page_size)
    }

    fn last_index(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    pub fn set_length(&mut self, length: usize) {
        self.length = length;
        self.page_index = self.page_index.min(self.last_index());
    }

    /// Changes the page size, keeping the first item of the current page visible.
    pub fn set_page_size(&mut self, page_size: usize) {
        let first_item = self.page_index * self.page_size;
        self.page_size = page_size.max(1);
        self.page_index = (first_item / self.page_size).min(self.last_index());
    }

    /// Moves to `index`. Returns false, leaving the page unchanged, if no such page exists.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index > self.last_index() {
            return false;
        }
        self.page_index = index;
        true
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.last_index()
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn next(&mut self) -> bool {
        self.has_next() && self.go_to(self.page_index + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.has_previous() && self.go_to(self.page_index - 1)
    }

    pub fn first(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.last_index())
    }

    /// Item positions on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.length);
        let end = (start + self.page_size).min(self.length);
        start..end
    }
}
