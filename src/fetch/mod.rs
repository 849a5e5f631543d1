//! Paginated aggregation: the page fan-out and the single-flight cache.
//!
//! [`fetch_all`] turns an unknown-length paginated resource into a single
//! in-memory sequence with minimal round trips; [`FetchCache`] deduplicates
//! concurrent aggregations for the same logical resource and evicts failed
//! entries so a retry is always possible.

mod cache;
mod error;
mod paginator;

pub use cache::{CacheKey, FetchCache};
pub use error::{FetchError, ResourceKind};
pub use paginator::{Page, fetch_all};
