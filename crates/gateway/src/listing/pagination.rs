//! Page-size parsing, window computation, and pagination links.

use std::collections::BTreeMap;

/// Sentinel accepted in `itemsPerPage` to request the full result set.
const INFINITE_SENTINEL: &str = "inf";

/// Requested page size: a positive row count or the whole result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Finite(u64),
    Infinite,
}

impl PageSize {
    /// Parse the `itemsPerPage` parameter.
    ///
    /// `"inf"` (case-insensitive) selects [`PageSize::Infinite`]; a positive
    /// integer selects that count; anything else falls back to `default`.
    pub fn parse(raw: Option<&str>, default: u64) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case(INFINITE_SENTINEL) => PageSize::Infinite,
            Some(s) => match s.parse::<u64>() {
                Ok(n) if n > 0 => PageSize::Finite(n),
                _ => PageSize::Finite(default),
            },
            None => PageSize::Finite(default),
        }
    }
}

/// A resolved window into a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: u64,
    pub total_pages: u64,
    pub items_per_page: PageSize,
    offset: usize,
    limit: Option<usize>,
}

impl PageWindow {
    /// Compute the window for `total` rows.
    ///
    /// `total_pages` is 1 for an infinite page size, otherwise
    /// `max(1, ceil(total / size))`; the requested page (default 1) is
    /// clamped into `1..=total_pages`.
    pub fn compute(total: usize, size: PageSize, requested_page: Option<u64>) -> Self {
        let total_pages = match size {
            PageSize::Infinite => 1,
            PageSize::Finite(per_page) => {
                ((total as u64).div_ceil(per_page)).max(1)
            }
        };
        let current_page = requested_page.unwrap_or(1).clamp(1, total_pages);

        let (offset, limit) = match size {
            PageSize::Infinite => (0, None),
            PageSize::Finite(per_page) => (
                ((current_page - 1) * per_page) as usize,
                Some(per_page as usize),
            ),
        };

        Self {
            current_page,
            total_pages,
            items_per_page: size,
            offset,
            limit,
        }
    }

    /// Slice `rows` down to this window.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.offset.min(rows.len());
        let end = match self.limit {
            Some(limit) => (start + limit).min(rows.len()),
            None => rows.len(),
        };
        &rows[start..end]
    }

    /// True when there is no page after the current one.
    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }
}

/// Relative links to the neighbouring pages, reproducing the original query
/// with `page` overwritten.
///
/// `last` points at the PREVIOUS page and exists only past page one; `next`
/// exists only before the final page. The field name is historical contract.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl PageLinks {
    pub fn build(key: &str, query: &BTreeMap<String, String>, window: &PageWindow) -> Self {
        let last = (window.current_page > 1)
            .then(|| page_url(key, query, window.current_page - 1));
        let next = (window.current_page < window.total_pages)
            .then(|| page_url(key, query, window.current_page + 1));
        Self { last, next }
    }
}

fn page_url(key: &str, query: &BTreeMap<String, String>, page: u64) -> String {
    let mut params: BTreeMap<&str, String> = query
        .iter()
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    params.insert("page", page.to_string());
    let qs = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("/api/{key}?{qs}")
}
