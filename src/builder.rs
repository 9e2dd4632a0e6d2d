//! Greedy page-packing: sections are visited in declaration order on every
//! page, each contributing at most one block per page, with batch sizes
//! halved until the block fits the character budget.

use tracing::{debug, warn};

use crate::budget::{ConfigError, LayoutBudget};
use crate::page::{Page, SectionProgress, estimated_size, final_size, text_chars};
use crate::section::{Block, ContentSection, TRUNCATION_MARKER};

/// Builder assembling one logical view (title, description, footer, sections)
/// into a bounded-size page sequence.
///
/// The build never fails once configuration is accepted: records that cannot
/// fit are truncated, never dropped silently and never raised as errors.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    title: String,
    description: String,
    color: u32,
    footer_base: String,
    budget: LayoutBudget,
    sections: Vec<ContentSection>,
}

impl PageBuilder {
    /// Start a builder for a view with the given title and budget.
    pub fn new(title: impl Into<String>, budget: LayoutBudget) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            color: crate::page::DEFAULT_PAGE_COLOR,
            footer_base: String::new(),
            budget,
            sections: Vec::new(),
        }
    }

    /// Description repeated on every page.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Page color.
    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Base footer text; page numbering is appended after the build.
    pub fn footer(mut self, footer_base: impl Into<String>) -> Self {
        self.footer_base = footer_base.into();
        self
    }

    /// Append a section. Sections are laid out in the order they are added.
    pub fn section(mut self, section: ContentSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Lay the sections out into an ordered page sequence.
    ///
    /// Always produces at least one page. The only error is configuration:
    /// page chrome or a section name so large that not even a truncated
    /// block fits under the budget, which no amount of degradation could
    /// recover from.
    pub fn build(self) -> Result<Vec<Page>, ConfigError> {
        let max_chars = self.budget.max_chars_per_page();
        // Packing works against the budget minus a worst-case allowance for
        // the numbered footer suffix, which is only known once the page
        // count is. Pages therefore never exceed the budget as sent.
        let ceiling = max_chars.saturating_sub(self.footer_suffix_allowance());
        let chrome = text_chars(&self.title)
            + text_chars(&self.description)
            + text_chars(&self.footer_base);
        let marker_len = TRUNCATION_MARKER.chars().count();
        if chrome + self.budget.truncate_len() + marker_len > ceiling {
            return Err(ConfigError::ChromeTooLarge { chrome, max_chars });
        }
        for section in &self.sections {
            let name_chars = text_chars(section.name());
            if chrome + name_chars + marker_len + 1 > ceiling {
                return Err(ConfigError::SectionNameTooLarge {
                    name_chars,
                    max_chars,
                });
            }
        }

        if self.sections.is_empty() {
            return Ok(self.finalize(vec![self.fresh_page()]));
        }

        let mut cursors = vec![0_usize; self.sections.len()];
        let mut done: Vec<bool> = self
            .sections
            .iter()
            .map(|section| section.effective_len() == 0)
            .collect();

        // Nothing to lay out: one page carrying every section's empty message.
        if done.iter().all(|flag| *flag) {
            let mut page = self.fresh_page();
            for section in &self.sections {
                page.blocks.push(Block {
                    name: section.name().to_owned(),
                    body: section.empty_message().to_owned(),
                    inline: section.is_inline(),
                });
            }
            page.progress = self.progress_snapshot(&cursors);
            return Ok(self.finalize(vec![page]));
        }

        let mut pages: Vec<Page> = Vec::new();
        let mut current = self.fresh_page();

        while !done.iter().all(|flag| *flag) {
            let mut committed_this_round = false;

            for (idx, section) in self.sections.iter().enumerate() {
                if done[idx] {
                    continue;
                }

                let cursor = cursors[idx];
                let remaining = section.effective_len() - cursor;
                let mut try_count = self.budget.items_per_page().min(remaining);

                loop {
                    let body = section.render_run(cursor, try_count);
                    let candidate = estimated_size(&current)
                        + text_chars(section.name())
                        + text_chars(&body);

                    if candidate <= ceiling {
                        current.blocks.push(Block {
                            name: section.name().to_owned(),
                            body,
                            inline: section.is_inline(),
                        });
                        cursors[idx] += try_count;
                        if cursors[idx] >= section.effective_len() {
                            done[idx] = true;
                        }
                        committed_this_round = true;
                        break;
                    }

                    if try_count > 1 {
                        try_count = (try_count / 2).max(1);
                        continue;
                    }

                    // A single record does not fit. On an otherwise empty page
                    // the record alone is oversized: hard-cut it so the build
                    // keeps making progress. On a partly filled page, leave the
                    // cursor for the next page instead.
                    if current.blocks.is_empty() {
                        // Cut to the room the page actually has left, so a
                        // wide section name cannot push the block over the
                        // ceiling. The name check above guarantees at least
                        // one char of room here.
                        let room = ceiling
                            .saturating_sub(estimated_size(&current))
                            .saturating_sub(text_chars(section.name()))
                            .saturating_sub(marker_len);
                        warn!(
                            section = section.name(),
                            record_index = cursor,
                            budget = max_chars,
                            "record exceeds the page budget on its own; truncating"
                        );
                        current.blocks.push(Block {
                            name: section.name().to_owned(),
                            body: truncate_record(
                                section.record_text(cursor),
                                self.budget.truncate_len().min(room),
                            ),
                            inline: section.is_inline(),
                        });
                        cursors[idx] += 1;
                        if cursors[idx] >= section.effective_len() {
                            done[idx] = true;
                        }
                        committed_this_round = true;
                    }
                    break;
                }
            }

            if !current.blocks.is_empty() {
                current.progress = self.progress_snapshot(&cursors);
                let closed = std::mem::replace(&mut current, self.fresh_page());
                debug!(
                    page = pages.len(),
                    blocks = closed.blocks.len(),
                    "page closed"
                );
                pages.push(closed);
            } else if !committed_this_round {
                // No section placed anything on an empty page; stop rather
                // than loop forever.
                debug!("no section produced content this round; stopping");
                break;
            }
        }

        if pages.is_empty() {
            pages.push(current);
        }

        Ok(self.finalize(pages))
    }

    /// Worst-case character cost of the `Page i/n` footer suffix.
    ///
    /// Every page consumes at least one record, so the page count (and the
    /// width of its digits) is bounded by the record count. A single record
    /// can only ever produce one page, which carries no suffix.
    fn footer_suffix_allowance(&self) -> usize {
        let total_records: usize = self
            .sections
            .iter()
            .map(ContentSection::effective_len)
            .sum();
        if total_records <= 1 {
            return 0;
        }

        let digits = total_records.checked_ilog10().map_or(1, |d| d as usize + 1);
        let separator = if self.footer_base.is_empty() {
            0
        } else {
            " | ".chars().count()
        };
        separator + "Page ".chars().count() + digits + 1 + digits
    }

    fn fresh_page(&self) -> Page {
        Page {
            title: self.title.clone(),
            description: self.description.clone(),
            color: self.color,
            footer_base: self.footer_base.clone(),
            ..Page::default()
        }
    }

    fn progress_snapshot(&self, cursors: &[usize]) -> Vec<SectionProgress> {
        self.sections
            .iter()
            .zip(cursors)
            .map(|(section, consumed)| SectionProgress {
                name: section.name().to_owned(),
                consumed: *consumed,
                total: section.effective_len(),
            })
            .collect()
    }

    fn finalize(&self, mut pages: Vec<Page>) -> Vec<Page> {
        let total = pages.len();
        for (index, page) in pages.iter_mut().enumerate() {
            page.page_index = index;
            page.total_pages = total;
            // The estimate during layout used the base footer. The numbered
            // suffix must still fit; a breach means the default budget margin
            // is wrong, not that input data can fail a build.
            debug_assert!(
                final_size(page) <= self.budget.max_chars_per_page(),
                "numbered footer pushed page {index} over budget"
            );
        }
        pages
    }
}

/// Build pages for a plain single-list view, the common dashboard case.
pub fn build_list_pages<T>(
    title: impl Into<String>,
    records: &[T],
    formatter: impl Fn(&T) -> String,
    empty_message: impl Into<String>,
    budget: LayoutBudget,
) -> Result<Vec<Page>, ConfigError> {
    PageBuilder::new(title, budget)
        .section(ContentSection::new("", records, formatter, empty_message))
        .build()
}

fn truncate_record(text: &str, limit: usize) -> String {
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(count: usize) -> Vec<String> {
        (1..=count).map(|n| format!("record {n}")).collect()
    }

    fn plain(section_records: &[String]) -> ContentSection {
        ContentSection::new("Items", section_records, String::clone, "nothing here")
    }

    #[test]
    fn no_sections_still_yields_one_page() {
        let pages = PageBuilder::new("Empty", LayoutBudget::default())
            .build()
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].blocks.is_empty());
        assert_eq!(pages[0].total_pages, 1);
    }

    #[test]
    fn all_empty_sections_emit_their_empty_messages_once() {
        let pages = PageBuilder::new("Todo", LayoutBudget::default())
            .section(plain(&[]))
            .section(ContentSection::new(
                "Other",
                &records(0),
                String::clone,
                "also nothing",
            ))
            .build()
            .unwrap();
        assert_eq!(pages.len(), 1);
        let bodies: Vec<&str> = pages[0].blocks.iter().map(|b| b.body.as_str()).collect();
        assert_eq!(bodies, vec!["nothing here", "also nothing"]);
    }

    #[test]
    fn batch_halves_until_the_block_fits() {
        // Budget sized so five 8-char records cannot share one page.
        let budget = LayoutBudget::new(5, 48, 20).unwrap();
        let pages = PageBuilder::new("T", budget)
            .section(plain(&records(5)))
            .build()
            .unwrap();

        assert!(pages.len() > 1);
        for page in &pages {
            assert!(estimated_size(page) <= 48);
        }
        let consumed: usize = pages
            .iter()
            .map(|page| page.blocks[0].body.matches("record").count())
            .sum();
        // Continuation markers do not mention "record", so this counts records.
        assert_eq!(consumed, 5);
    }

    #[test]
    fn oversized_record_is_truncated_not_dropped() {
        let big = "x".repeat(500);
        let budget = LayoutBudget::new(5, 200, 100).unwrap();
        let pages = PageBuilder::new("T", budget)
            .section(plain(&[big]))
            .build()
            .unwrap();

        assert_eq!(pages.len(), 1);
        let body = &pages[0].blocks[0].body;
        assert!(body.starts_with(&"x".repeat(100)));
        assert!(body.ends_with("… (truncated)"));
        assert!(estimated_size(&pages[0]) <= 200);
    }

    #[test]
    fn progress_is_tagged_per_page() {
        let budget = LayoutBudget::new(5, 2000, 1500).unwrap();
        let pages = PageBuilder::new("T", budget)
            .section(plain(&records(12)))
            .build()
            .unwrap();

        let consumed: Vec<usize> = pages
            .iter()
            .map(|page| page.progress[0].consumed)
            .collect();
        assert_eq!(consumed, vec![5, 10, 12]);
        assert!(pages.iter().all(|page| page.progress[0].total == 12));
    }

    #[test]
    fn numbered_footer_never_breaks_the_budget() {
        // Packing runs right up to the ceiling; the reserved suffix
        // allowance must keep every page under budget as sent.
        let budget = LayoutBudget::new(5, 40, 10).unwrap();
        let pages = PageBuilder::new("T", budget)
            .section(plain(&records(5)))
            .build()
            .unwrap();

        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert!(final_size(page) <= 40, "page sent at {}", final_size(page));
        }
    }

    #[test]
    fn budget_without_room_for_the_suffix_is_rejected() {
        // 40 chars cannot hold a 20-char truncated cut, its marker, and the
        // page-number suffix at once.
        let budget = LayoutBudget::new(5, 40, 20).unwrap();
        let err = PageBuilder::new("T", budget)
            .section(plain(&records(5)))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ChromeTooLarge { .. }));
    }

    #[test]
    fn wide_section_name_shrinks_the_truncation_cut() {
        let wide = "n".repeat(500);
        let oversized = vec!["x".repeat(5000)];
        let pages = PageBuilder::new("Dashboard", LayoutBudget::default())
            .section(ContentSection::new(&wide, &oversized, String::clone, "none"))
            .build()
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].blocks[0].body.ends_with("… (truncated)"));
        assert!(final_size(&pages[0]) <= 1900);
    }

    #[test]
    fn unfittable_section_name_is_rejected() {
        let wide = "n".repeat(1900);
        let err = PageBuilder::new("T", LayoutBudget::default())
            .section(ContentSection::new(&wide, &records(1), String::clone, "none"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::SectionNameTooLarge { .. }));
    }

    #[test]
    fn oversized_chrome_is_rejected_up_front() {
        let budget = LayoutBudget::new(5, 1900, 1500).unwrap();
        let err = PageBuilder::new("T", budget)
            .description("d".repeat(1000))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ChromeTooLarge { .. }));
    }

    #[test]
    fn build_list_pages_uses_a_nameless_section() {
        let pages = build_list_pages(
            "List",
            &records(3),
            String::clone,
            "empty",
            LayoutBudget::default(),
        )
        .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].blocks[0].name, "");
    }
}
