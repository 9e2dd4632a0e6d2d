//! Page data model and size accounting.
//!
//! All lengths are character counts of the serialized text actually sent,
//! never byte counts.

use crate::section::Block;

/// Default page color used across the dashboard UI.
pub const DEFAULT_PAGE_COLOR: u32 = 0x58_65_F2;

/// How far a section had been consumed when a page was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProgress {
    /// Section name.
    pub name: String,
    /// Records consumed across this and all earlier pages.
    pub consumed: usize,
    /// Total records the layout will consume (item cap applied).
    pub total: usize,
}

/// One bounded-size rendered unit in the output sequence.
///
/// Immutable once built; regenerated from live data on every render request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub blocks: Vec<Block>,
    /// Footer text without the page-number suffix.
    pub footer_base: String,
    /// Zero-based position in the generated sequence.
    pub page_index: usize,
    /// Total pages in the sequence this page belongs to.
    pub total_pages: usize,
    /// Per-section fill progress at the moment this page was closed.
    pub progress: Vec<SectionProgress>,
}

impl Page {
    /// Final footer text: the base footer, suffixed with `Page i/n` only when
    /// the sequence has more than one page.
    pub fn footer_text(&self) -> String {
        if self.total_pages <= 1 {
            return self.footer_base.clone();
        }

        let suffix = format!("Page {}/{}", self.page_index + 1, self.total_pages);
        if self.footer_base.is_empty() {
            suffix
        } else {
            format!("{} | {}", self.footer_base, suffix)
        }
    }
}

/// Serialized character cost of a page under the platform size model.
///
/// Uses the base footer: the numbered suffix is only known once the total
/// page count is, so the builder reserves no room for it here and re-checks
/// the final footer after numbering (see [`final_size`]).
pub fn estimated_size(page: &Page) -> usize {
    let mut size = chars(&page.title) + chars(&page.description) + chars(&page.footer_base);
    for block in &page.blocks {
        size += chars(&block.name) + chars(&block.body);
    }
    size
}

/// Size of the page with the numbered footer actually sent.
pub(crate) fn final_size(page: &Page) -> usize {
    estimated_size(page) - chars(&page.footer_base) + chars(&page.footer_text())
}

pub(crate) fn text_chars(text: &str) -> usize {
    chars(text)
}

fn chars(text: &str) -> usize {
    text.chars().count()
}
