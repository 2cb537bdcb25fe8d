//! Usage: Pagination controller (page / page size / total count + derived total pages).
//!
//! Every mutating method applies its invariants first and only then notifies
//! listeners, so observers never see a stale `total_pages` or an out-of-range
//! `current_page`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const DEFAULT_PER_PAGE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationOptions {
    pub default_page: u32,
    pub default_per_page: u32,
    pub per_page_options: Vec<u32>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            default_page: DEFAULT_PAGE,
            default_per_page: DEFAULT_PER_PAGE,
            per_page_options: DEFAULT_PER_PAGE_OPTIONS.to_vec(),
        }
    }
}

impl PaginationOptions {
    /// Drops zero sizes, sorts and dedups the options, and makes sure the
    /// default page size is one of them.
    pub fn normalized(mut self) -> Self {
        self.default_page = self.default_page.max(1);
        if self.default_per_page == 0 {
            self.default_per_page = DEFAULT_PER_PAGE;
        }
        self.per_page_options.retain(|v| *v > 0);
        if !self.per_page_options.contains(&self.default_per_page) {
            self.per_page_options.push(self.default_per_page);
        }
        self.per_page_options.sort_unstable();
        self.per_page_options.dedup();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

/// Server-side page metadata returned by paginated commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Page,
    PerPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub page: u32,
    pub per_page: u32,
    pub cause: ChangeCause,
}

/// 1-based inclusive display range of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataRange {
    pub start: u64,
    pub end: u64,
}

impl DataRange {
    /// `true` when there is nothing to display (`start` can be 1 while `end` is 0).
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

pub type PageChangeListener = Arc<dyn Fn(&PageChange) + Send + Sync>;

#[derive(Clone)]
pub struct PaginationController {
    options: PaginationOptions,
    current_page: u32,
    per_page: u32,
    total_count: u64,
    total_pages: u32,
    listeners: Vec<PageChangeListener>,
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("state", &self.state())
            .field("per_page_options", &self.options.per_page_options)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(PaginationOptions::default())
    }
}

pub(crate) fn ceil_pages(total_count: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

impl PaginationController {
    pub fn new(options: PaginationOptions) -> Self {
        let options = options.normalized();
        let mut controller = Self {
            current_page: options.default_page,
            per_page: options.default_per_page,
            total_count: 0,
            total_pages: 0,
            listeners: Vec::new(),
            options,
        };
        controller.recompute_total_pages();
        controller
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn per_page_options(&self) -> &[u32] {
        &self.options.per_page_options
    }

    pub fn state(&self) -> PaginationState {
        PaginationState {
            current_page: self.current_page,
            per_page: self.per_page,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }

    /// Registers a listener fired after `current_page` or `per_page` settles on
    /// a new value. Listeners must not call back into the owner of this
    /// controller.
    pub fn on_change(&mut self, listener: impl Fn(&PageChange) + Send + Sync + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<PageChange> {
        if page < 1 || page > self.total_pages || page == self.current_page {
            return None;
        }
        self.current_page = page;
        Some(self.notify(ChangeCause::Page))
    }

    pub fn go_to_first_page(&mut self) -> Option<PageChange> {
        self.go_to_page(1)
    }

    pub fn go_to_last_page(&mut self) -> Option<PageChange> {
        self.go_to_page(self.total_pages)
    }

    pub fn go_to_next_page(&mut self) -> Option<PageChange> {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn go_to_prev_page(&mut self) -> Option<PageChange> {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// Changes the page size and always rewinds to page 1. The total page count
    /// is recomputed from the current `total_count` before any refetch lands.
    pub fn set_per_page(&mut self, per_page: u32) -> Option<PageChange> {
        if !self.options.per_page_options.contains(&per_page) {
            tracing::warn!(
                per_page,
                options = ?self.options.per_page_options,
                "pagination: rejected page size outside allowed options"
            );
            return None;
        }
        let changed = per_page != self.per_page || self.current_page != 1;
        self.per_page = per_page;
        self.current_page = 1;
        self.total_pages = ceil_pages(self.total_count, self.per_page);
        changed.then(|| self.notify(ChangeCause::PerPage))
    }

    pub fn set_total_count(&mut self, total_count: u64) -> Option<PageChange> {
        self.total_count = total_count;
        self.recompute_total_pages()
            .then(|| self.notify(ChangeCause::Page))
    }

    /// Restores defaults without notifying listeners. With nothing counted
    /// yet, a configured start page beyond 1 clamps back to 1.
    pub fn reset(&mut self) {
        self.current_page = self.options.default_page;
        self.per_page = self.options.default_per_page;
        self.total_count = 0;
        self.recompute_total_pages();
    }

    /// Adopts the server's view of the current page. Silent: reconciling a
    /// fetch response must never schedule another fetch.
    pub fn apply_page_meta(&mut self, meta: &PageMeta) {
        self.total_count = meta.total_count;
        if meta.per_page > 0 {
            self.per_page = meta.per_page;
        }
        self.current_page = meta.page.max(1);
        self.recompute_total_pages();
        if meta.total_pages != self.total_pages {
            tracing::debug!(
                server_total_pages = meta.total_pages,
                derived_total_pages = self.total_pages,
                "pagination: server total pages disagree with derived value"
            );
        }
    }

    pub fn data_range(&self) -> DataRange {
        let per_page = u64::from(self.per_page);
        let page = u64::from(self.current_page);
        let start = (page.saturating_sub(1)) * per_page + 1;
        let end = (page * per_page).min(self.total_count);
        DataRange { start, end }
    }

    /// Recomputes `total_pages` and clamps `current_page` into
    /// `1..=max(total_pages, 1)`. Returns whether the page was clamped.
    fn recompute_total_pages(&mut self) -> bool {
        self.total_pages = ceil_pages(self.total_count, self.per_page);
        let upper = self.total_pages.max(1);
        if self.current_page > upper || self.current_page < 1 {
            self.current_page = 1;
            return true;
        }
        false
    }

    fn notify(&self, cause: ChangeCause) -> PageChange {
        let change = PageChange {
            page: self.current_page,
            per_page: self.per_page,
            cause,
        };
        for listener in &self.listeners {
            listener(&change);
        }
        change
    }
}
