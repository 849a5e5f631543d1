use thiserror::Error;

use crate::http::HttpError;

/// The resource kinds served by the paginated API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Session,
    Wallets,
    Transactions,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Session => write!(f, "session"),
            ResourceKind::Wallets => write!(f, "wallets"),
            ResourceKind::Transactions => write!(f, "transactions"),
        }
    }
}

/// Failure of a single page fetch, or of the aggregation built on top of
/// one.
///
/// Transport and decode failures are not distinguished at this level:
/// either way the enclosing aggregation fails fast and already-fetched
/// pages are discarded. The underlying [`HttpError`] keeps the detail.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {resource} page {page}: {source}")]
    PageFetch {
        resource: ResourceKind,
        page: u32,
        #[source]
        source: HttpError,
    },

    /// The session endpoint answered without any portfolio.
    #[error("session contains no portfolio")]
    NoPortfolio,
}

impl FetchError {
    pub fn page_fetch(resource: ResourceKind, page: u32, source: HttpError) -> Self {
        Self::PageFetch { resource, page, source }
    }
}
