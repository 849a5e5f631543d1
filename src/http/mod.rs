//! HTTP access to the accounting API.
//!
//! The low-level client wraps `reqwest` with the pre-supplied
//! authentication headers; [`PortfolioClient`] exposes the page-level
//! resources ([`PortfolioApi`]) the aggregation layer is built on. No
//! caching and no retrying happens at this layer — callers own both
//! concerns.

mod error;
mod http_client;
mod portfolio_client;
mod types;

pub use error::HttpError;
pub use http_client::AuthTokens;
pub use portfolio_client::{PAGE_SIZE, PortfolioApi, PortfolioClient};
