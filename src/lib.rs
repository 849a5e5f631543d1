pub mod cli;
pub mod config;
pub mod export;
pub mod fetch;
pub mod http;
pub mod log;
pub mod models;

pub use crate::export::{ExportDriver, ExportFormat, ExportTarget};
pub use crate::fetch::{FetchCache, fetch_all};
pub use crate::http::{PortfolioApi, PortfolioClient};
