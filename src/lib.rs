//! Budget-aware pagination core for dashboard-style bot embeds.
//!
//! Callers describe their content as ordered, named sections; the builder
//! packs them into fixed-budget pages, and the navigation state wraps the
//! result for prev/next/jump interactions. Pages are always regenerated from
//! live data; only the current page index outlives a render.

/// Layout budget configuration and its validation errors.
pub mod budget;
/// The greedy page-packing algorithm.
pub mod builder;
/// Navigation events and pagination state.
pub mod navigate;
/// Page data model and size accounting.
pub mod page;
/// Boundary-state registries (per-instance slots, cancellable timers).
pub mod registry;
/// Content sections and rendered blocks.
pub mod section;

pub use budget::{
    ConfigError, DEFAULT_ITEMS_PER_PAGE, DEFAULT_MAX_CHARS_PER_PAGE, DEFAULT_TRUNCATE_LEN,
    LayoutBudget,
};
pub use builder::{PageBuilder, build_list_pages};
pub use navigate::{NavEvent, PaginationState};
pub use page::{DEFAULT_PAGE_COLOR, Page, SectionProgress, estimated_size};
pub use registry::{InstanceKey, InstanceRegistry, InstanceState, TimerKey, TimerRegistry};
pub use section::{Block, ContentSection};
