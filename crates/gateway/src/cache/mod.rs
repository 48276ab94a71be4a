//! Response cache with tag-based bulk invalidation.
//!
//! Fully-formed [`common::ResponseContent`] values are stored under composite
//! keys of the form `{domain}/{endpointKey}/{pathId}{queryJson}`. Entries
//! live until a tag they carry is invalidated; there is no TTL. The `noCache`
//! query flag bypasses the read path only — a bypassed request still writes
//! its result, refreshing the entry for subsequent readers.

pub mod store;

pub use store::ResponseCache;
