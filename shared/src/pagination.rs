//! Page-by-page loading state for infinite lists.
//!
//! The paginator hands out [`PageRequest`]s and folds the results back in.
//! The fetch itself happens elsewhere; a request carries a generation so a
//! result that arrives after a reset is ignored.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Paginated REST envelope: `{"results": [...], "next": "<url>" | null}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub next: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip)]
    pub reset: bool,
    #[serde(skip)]
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct Paginator<T> {
    initial_page: u32,
    page_size: u32,
    enabled: bool,
    page: u32,
    items: Vec<T>,
    loading: bool,
    has_more: bool,
    error: Option<String>,
    generation: u64,
}

impl<T: Clone> Paginator<T> {
    pub fn new(initial_page: u32, page_size: u32) -> Self {
        Self {
            initial_page,
            page_size,
            enabled: true,
            page: initial_page,
            items: Vec::new(),
            loading: false,
            has_more: true,
            error: None,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// A disabled paginator hands out no requests; items stay as they are.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Seed the list with previously cached first-page results.
    pub fn prefill(&mut self, items: Vec<T>) {
        if self.items.is_empty() && !items.is_empty() {
            self.items = items;
            self.page = self.initial_page + 1;
        }
    }

    /// Request the next page. `None` while a load is running, when disabled,
    /// after a failed page until [`retry`](Self::retry), or once the server
    /// reported no further pages.
    pub fn begin(&mut self) -> Option<PageRequest> {
        if !self.enabled || self.loading || !self.has_more || self.error.is_some() {
            return None;
        }
        Some(self.start(self.page, false))
    }

    /// Request the page that failed last time. `None` when nothing failed.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if !self.enabled || self.loading || self.error.is_none() {
            return None;
        }
        Some(self.start(self.page, false))
    }

    /// Drop all items and reload from the first page, superseding any load
    /// in flight.
    pub fn reset(&mut self) -> Option<PageRequest> {
        self.items.clear();
        self.page = self.initial_page;
        self.has_more = true;
        self.error = None;
        self.refresh()
    }

    /// Reload from the first page; current items stay visible until the
    /// first page replaces them.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        if !self.enabled {
            return None;
        }
        Some(self.start(self.initial_page, true))
    }

    /// Fold a finished request back in. Returns `false` for a stale request.
    pub fn finish(&mut self, request: PageRequest, result: Result<Page<T>, String>) -> bool {
        if request.generation != self.generation {
            log::debug!("pagination: ignoring stale page {}", request.page);
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                if request.reset {
                    self.items = page.results;
                } else {
                    self.items.extend(page.results);
                }
                self.page = request.page + 1;
                self.has_more = page.next.is_some();
            }
            Err(error) => {
                log::warn!("Error in infinite scroll (page {}): {error}", request.page);
                self.error = Some(error);
            }
        }
        true
    }

    fn start(&mut self, page: u32, reset: bool) -> PageRequest {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        PageRequest {
            page,
            page_size: self.page_size,
            reset,
            generation: self.generation,
        }
    }
}

impl<T: Clone> Default for Paginator<T> {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::VisibilityTrigger;

    fn page(results: &[u32], has_next: bool) -> Page<u32> {
        Page {
            results: results.to_vec(),
            next: has_next.then(|| "/api/courses/?page=next".to_string()),
        }
    }

    #[test]
    fn test_sequential_pages_append() {
        let mut paginator = Paginator::new(1, 2);
        let first = paginator.begin().unwrap();
        assert_eq!((first.page, first.page_size), (1, 2));
        assert!(paginator.is_loading());
        assert!(paginator.begin().is_none()); // guarded while loading

        assert!(paginator.finish(first, Ok(page(&[1, 2], true))));
        let second = paginator.begin().unwrap();
        assert_eq!(second.page, 2);
        paginator.finish(second, Ok(page(&[3], false)));

        assert_eq!(paginator.items(), &[1, 2, 3]);
        assert!(!paginator.has_more());
        assert!(paginator.begin().is_none());
    }

    #[test]
    fn test_error_is_kept_and_page_retried() {
        let mut paginator = Paginator::<u32>::new(1, 10);
        let request = paginator.begin().unwrap();
        paginator.finish(request, Err("Network error".to_string()));
        assert_eq!(paginator.error(), Some("Network error"));
        assert!(!paginator.is_loading());

        assert!(paginator.begin().is_none());
        let retry = paginator.retry().unwrap();
        assert_eq!(retry.page, 1);
        assert_eq!(paginator.error(), None);
        assert!(paginator.retry().is_none());
    }

    #[test]
    fn test_failed_page_with_visible_sentinel_requests_once() {
        let mut paginator = Paginator::<u32>::new(1, 10);
        let mut trigger = VisibilityTrigger::default();
        let mut requests = 0;

        for _ in 0..50 {
            trigger.set_flags(paginator.has_more(), paginator.is_loading());
            if !trigger.on_intersection(true) {
                continue;
            }
            if let Some(request) = paginator.begin() {
                requests += 1;
                trigger.set_flags(paginator.has_more(), paginator.is_loading());
                paginator.finish(request, Err("503 Service Unavailable".to_string()));
            }
        }

        assert_eq!(requests, 1);
        assert_eq!(paginator.error(), Some("503 Service Unavailable"));
    }

    #[test]
    fn test_reset_supersedes_inflight_load() {
        let mut paginator = Paginator::new(1, 10);
        let first = paginator.begin().unwrap();
        paginator.finish(first, Ok(page(&[1, 2], true)));

        let stale = paginator.begin().unwrap();
        let fresh = paginator.reset().unwrap();
        assert!(paginator.items().is_empty());
        assert!(fresh.reset);

        assert!(!paginator.finish(stale, Ok(page(&[99], true))));
        assert!(paginator.is_loading());
        assert!(paginator.finish(fresh, Ok(page(&[5], true))));
        assert_eq!(paginator.items(), &[5]);
        assert_eq!(paginator.page(), 2);
    }

    #[test]
    fn test_refresh_replaces_items() {
        let mut paginator = Paginator::new(1, 10);
        let first = paginator.begin().unwrap();
        paginator.finish(first, Ok(page(&[1, 2], false)));

        let refresh = paginator.refresh().unwrap();
        assert_eq!(paginator.items(), &[1, 2]);
        paginator.finish(refresh, Ok(page(&[7], true)));
        assert_eq!(paginator.items(), &[7]);
        assert!(paginator.has_more());
    }

    #[test]
    fn test_disabled_paginator_never_loads() {
        let mut paginator = Paginator::<u32>::default();
        paginator.set_enabled(false);
        assert!(paginator.begin().is_none());
        assert!(paginator.reset().is_none());

        paginator.set_enabled(true);
        assert_eq!(paginator.begin().unwrap().page, 1);
    }

    #[test]
    fn test_prefill_skips_first_page() {
        let mut paginator = Paginator::new(1, 10);
        paginator.prefill(vec![1, 2, 3]);
        assert_eq!(paginator.begin().unwrap().page, 2);
    }

    #[test]
    fn test_page_envelope_deserializes() {
        let parsed: Page<u32> = serde_json::from_str(r#"{"results":[4,5],"next":null}"#).unwrap();
        assert_eq!(parsed, page(&[4, 5], false));
    }
}
