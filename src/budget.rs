//! Layout budget configuration: how many items to attempt per section per
//! page, and the hard character ceiling a page must never exceed.

use thiserror::Error;

use crate::section::TRUNCATION_MARKER;

/// Default batch size attempted per section on each page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

/// Default character ceiling, kept under the platform's 2000-character cap.
pub const DEFAULT_MAX_CHARS_PER_PAGE: usize = 1900;

/// Default length a single record is cut to when it cannot fit on its own.
pub const DEFAULT_TRUNCATE_LEN: usize = 1500;

/// Rejected budget or page-chrome configuration.
///
/// Surfaced immediately at construction or at the start of a build; the
/// layout algorithm itself never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("items_per_page must be at least 1")]
    ZeroItemsPerPage,
    #[error("truncate_len must be at least 1")]
    ZeroTruncateLen,
    #[error(
        "max_chars_per_page ({max_chars}) cannot hold even one truncated block ({required} chars)"
    )]
    BudgetTooSmall { max_chars: usize, required: usize },
    #[error(
        "title, description and footer occupy {chrome} chars, leaving no room for a truncated \
         block within max_chars_per_page ({max_chars})"
    )]
    ChromeTooLarge { chrome: usize, max_chars: usize },
    #[error(
        "section name of {name_chars} chars leaves no room for any record text within \
         max_chars_per_page ({max_chars})"
    )]
    SectionNameTooLarge { name_chars: usize, max_chars: usize },
}

/// Character budget driving the page-packing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBudget {
    items_per_page: usize,
    max_chars_per_page: usize,
    truncate_len: usize,
}

impl LayoutBudget {
    /// Build a validated budget.
    ///
    /// Rejects configurations under which the forced-truncation fallback
    /// could not produce an in-budget block, so the build phase never has to
    /// fail at runtime.
    pub fn new(
        items_per_page: usize,
        max_chars_per_page: usize,
        truncate_len: usize,
    ) -> Result<Self, ConfigError> {
        if items_per_page == 0 {
            return Err(ConfigError::ZeroItemsPerPage);
        }
        if truncate_len == 0 {
            return Err(ConfigError::ZeroTruncateLen);
        }

        let required = truncate_len + TRUNCATION_MARKER.chars().count();
        if max_chars_per_page < required {
            return Err(ConfigError::BudgetTooSmall {
                max_chars: max_chars_per_page,
                required,
            });
        }

        Ok(Self {
            items_per_page,
            max_chars_per_page,
            truncate_len,
        })
    }

    /// Batch size attempted per section on each page.
    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Hard character ceiling per page.
    pub fn max_chars_per_page(&self) -> usize {
        self.max_chars_per_page
    }

    /// Cut length applied by the forced-truncation fallback.
    pub fn truncate_len(&self) -> usize {
        self.truncate_len
    }
}

impl Default for LayoutBudget {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            max_chars_per_page: DEFAULT_MAX_CHARS_PER_PAGE,
            truncate_len: DEFAULT_TRUNCATE_LEN,
        }
    }
}
