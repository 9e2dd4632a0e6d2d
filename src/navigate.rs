//! Navigation state over an already-built page sequence.
//!
//! Events are plain data dispatched through one function, so interactive
//! triggers (buttons, jump modals) never carry executable callbacks around;
//! they only name the event kind.

use crate::page::Page;

/// A navigation request against one pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Step back one page, clamped at the first page.
    Previous,
    /// Step forward one page, clamped at the last page.
    Next,
    /// Jump to a zero-based page index, clamped into range.
    ///
    /// The requested index may come from a stale view of the page count
    /// (data changed after the control was rendered), so it is always
    /// bounded against the current sequence.
    Jump(usize),
}

/// An ordered page sequence plus the current position within it.
///
/// The sequence is never empty and the index is always in range. Navigation
/// consumes the state and returns the successor; the pages themselves are
/// never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pages: Vec<Page>,
    current: usize,
}

impl PaginationState {
    /// Wrap freshly built pages, clamping the requested start index.
    ///
    /// An empty sequence is replaced by a single content-free page so the
    /// current page always exists.
    pub fn from_pages(pages: Vec<Page>, start_index: usize) -> Self {
        let mut pages = pages;
        if pages.is_empty() {
            pages.push(Page {
                total_pages: 1,
                ..Page::default()
            });
        }
        let current = start_index.min(pages.len() - 1);
        Self { pages, current }
    }

    /// Apply one navigation event, returning the successor state.
    pub fn navigate(self, event: NavEvent) -> Self {
        let last = self.pages.len() - 1;
        let current = match event {
            NavEvent::Previous => self.current.saturating_sub(1),
            NavEvent::Next => (self.current + 1).min(last),
            NavEvent::Jump(target) => target.min(last),
        };
        Self { current, ..self }
    }

    /// Zero-based index of the displayed page.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The page to display.
    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages in the sequence.
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Whether a previous page exists (drives button enablement).
    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Whether a next page exists (drives button enablement).
    pub fn has_next(&self) -> bool {
        self.current + 1 < self.pages.len()
    }
}
