//! Offset pagination for list endpoints
//!
//! List endpoints (`getAll`, `getBySearch`, `getModifiedSince`, ...) take
//! `qty` and `offset`. A page shorter than `qty` is the last one.

use crate::validate::MAX_PAGE_SIZE;
use serde::Serialize;

/// `qty`/`offset` pair embedded in list requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Records per page (1..=50)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
    /// Records to skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl Page {
    pub fn new(qty: u32, offset: u32) -> Self {
        Self {
            qty: Some(qty),
            offset: Some(offset),
        }
    }

    /// First page of the given size
    pub fn first(qty: u32) -> Self {
        Self::new(qty, 0)
    }
}

/// Request models that carry a `Page`
pub trait Paginated {
    fn page(&self) -> Page;
    fn set_page(&mut self, page: Page);
}

/// Implements `Paginated` for models with a `page: Page` field
macro_rules! impl_paginated {
    ($($model:ty),+ $(,)?) => {
        $(
            impl $crate::pagination::Paginated for $model {
                fn page(&self) -> $crate::pagination::Page {
                    self.page
                }

                fn set_page(&mut self, page: $crate::pagination::Page) {
                    self.page = page;
                }
            }
        )+
    };
}

pub(crate) use impl_paginated;

/// Walks offset pages until a short page or the record cap
#[derive(Debug, Clone)]
pub struct OffsetPager {
    qty: u32,
    offset: u32,
    fetched: u64,
    max_records: Option<u64>,
    done: bool,
}

impl OffsetPager {
    /// Pager with the given page size, clamped to `1..=50`
    pub fn new(qty: u32) -> Self {
        Self {
            qty: qty.clamp(1, MAX_PAGE_SIZE),
            offset: 0,
            fetched: 0,
            max_records: None,
            done: false,
        }
    }

    /// Continue from the page a request already carries
    pub fn from_page(page: Page) -> Self {
        let mut pager = Self::new(page.qty.unwrap_or(MAX_PAGE_SIZE));
        pager.offset = page.offset.unwrap_or(0);
        pager
    }

    /// Stop after this many records
    #[must_use]
    pub fn with_max_records(mut self, max: u64) -> Self {
        self.max_records = Some(max);
        if max == 0 {
            self.done = true;
        }
        self
    }

    /// Parameters for the next request, or None when finished
    pub fn next_page(&self) -> Option<Page> {
        if self.done {
            return None;
        }
        Some(Page::new(self.qty, self.offset))
    }

    /// Record how many items the last page returned
    pub fn advance(&mut self, records: usize) {
        self.fetched += records as u64;

        if records < self.qty as usize {
            self.done = true;
        }
        if let Some(max) = self.max_records {
            if self.fetched >= max {
                self.done = true;
            }
        }

        self.offset = self.offset.saturating_add(self.qty);
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Total records seen so far
    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    pub fn max_records(&self) -> Option<u64> {
        self.max_records
    }
}
