//! # Snapshot Adapter
//!
//! Fetches camera snapshots from the signed, expiring locators the upstream
//! client reports and caches the last picture per owner.
//!
//! ## Cache Rules
//!
//! - A fetch happens only when the locator differs from the cached one
//! - A failed fetch leaves the previous locator and bytes in place
//! - Entries are independent: a slow fetch for one owner never blocks another

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod fetch;

pub use cache::SnapshotCache;
pub use fetch::{FetchError, Fetcher, HttpFetcher, HttpFetcherConfig};
