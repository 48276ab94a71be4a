//! Paged-listing policy: page windows, pagination links, sort resolution,
//! and filter echo.
//!
//! Listing endpoints compose these pieces instead of inheriting them: a
//! [`pagination::PageWindow`] derived from the query, a [`sort::SortPolicy`]
//! with a per-endpoint allow-list, and a [`filter::FilterSet`] built from the
//! recognized filter parameters.

pub mod filter;
pub mod pagination;
pub mod sort;

pub use filter::FilterSet;
pub use pagination::{PageSize, PageWindow};
pub use sort::{SortDirection, SortPolicy};
