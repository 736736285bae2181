//! Lazy pagination over token-based AWS list operations.

use super::types::Page;
use crate::error::Result;

/// Iterator that pulls one page at a time from a fetch function.
///
/// The fetch function receives the continuation token and the number of
/// items to ask for. Iteration ends on the first empty page, when the
/// service stops returning a token, once `max_items` items have been
/// yielded, or after the first error. Items rejected by the filter (see
/// [`Paginator::with_filter`]) do not count towards `max_items`. Single
/// pass only.
pub struct Paginator<T, F, K = fn(&T) -> bool>
where
    F: FnMut(Option<String>, usize) -> Result<Page<T>>,
{
    fetch: F,
    keep: K,
    next_token: Option<String>,
    remaining: usize,
    page_size: usize,
    finished: bool,
    pages_fetched: usize,
}

impl<T, F> Paginator<T, F>
where
    F: FnMut(Option<String>, usize) -> Result<Page<T>>,
{
    /// Create a paginator yielding at most `max_items` items, requesting at
    /// most `page_size` per call.
    pub fn new(max_items: usize, page_size: usize, fetch: F) -> Self {
        Self {
            fetch,
            keep: |_| true,
            next_token: None,
            remaining: max_items,
            page_size: page_size.max(1),
            finished: false,
            pages_fetched: 0,
        }
    }
}

impl<T, F, K> Paginator<T, F, K>
where
    F: FnMut(Option<String>, usize) -> Result<Page<T>>,
    K: FnMut(&T) -> bool,
{
    /// Drop items failing `keep` before they are counted or yielded.
    pub fn with_filter<K2>(self, keep: K2) -> Paginator<T, F, K2>
    where
        K2: FnMut(&T) -> bool,
    {
        Paginator {
            fetch: self.fetch,
            keep,
            next_token: self.next_token,
            remaining: self.remaining,
            page_size: self.page_size,
            finished: self.finished,
            pages_fetched: self.pages_fetched,
        }
    }

    /// Number of requests issued so far.
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Drain every page into a single vector.
    pub fn collect_items(self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in self {
            items.extend(page?);
        }
        Ok(items)
    }
}

impl<T, F, K> Iterator for Paginator<T, F, K>
where
    F: FnMut(Option<String>, usize) -> Result<Page<T>>,
    K: FnMut(&T) -> bool,
{
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.remaining == 0 {
            return None;
        }

        let request_size = self.remaining.min(self.page_size);
        self.pages_fetched += 1;
        let page = match (self.fetch)(self.next_token.take(), request_size) {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        if page.items.is_empty() {
            tracing::debug!("Empty page after {} request(s), stopping", self.pages_fetched);
            self.finished = true;
            return None;
        }

        let mut items = page.items;
        let keep = &mut self.keep;
        items.retain(|item| keep(item));
        items.truncate(self.remaining);
        self.remaining -= items.len();

        match page.next_token {
            Some(token) => self.next_token = Some(token),
            None => self.finished = true,
        }

        Some(Ok(items))
    }
}
