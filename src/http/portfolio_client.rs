//! Domain-level client for the accounting API.

use async_trait::async_trait;
use log::debug;
use url::Url;

use super::http_client::{AuthTokens, HttpClient};
use super::types::{SessionEnvelope, TransactionsEnvelope, WalletsEnvelope};
use crate::fetch::{FetchError, Page, ResourceKind};
use crate::models::{Session, Transaction, Wallet};

/// Items requested per page from every paginated endpoint.
pub const PAGE_SIZE: u32 = 25;

/// Page-level view of the accounting API.
///
/// The paginator and the export driver are written against this trait;
/// tests substitute an in-memory implementation. Every method is a single
/// network round trip with no retry and no caching.
#[async_trait]
pub trait PortfolioApi: Send + Sync {
    /// Establishes per-run session state from the sessions endpoint.
    async fn fetch_session(&self) -> Result<Session, FetchError>;

    /// One page of the wallet list.
    async fn fetch_wallets_page(&self, page: u32) -> Result<Page<Wallet>, FetchError>;

    /// One page of transactions, optionally restricted to a single wallet.
    ///
    /// `wallet_filter = None` addresses the combined view across every
    /// wallet.
    async fn fetch_transactions_page(
        &self,
        wallet_filter: Option<i64>,
        page: u32,
    ) -> Result<Page<Transaction>, FetchError>;
}

/// HTTP implementation of [`PortfolioApi`].
pub struct PortfolioClient {
    http: HttpClient,
}

impl PortfolioClient {
    pub fn new(base_url: Url, tokens: &AuthTokens) -> Result<Self, anyhow::Error> {
        Ok(Self {
            http: HttpClient::new(base_url, tokens)?,
        })
    }
}

#[async_trait]
impl PortfolioApi for PortfolioClient {
    async fn fetch_session(&self) -> Result<Session, FetchError> {
        debug!("HTTP: Requesting session");
        let envelope: SessionEnvelope = self
            .http
            .get_json("/api/sessions")
            .await
            .map_err(|source| FetchError::page_fetch(ResourceKind::Session, 1, source))?;

        let portfolio = envelope
            .portfolios
            .into_iter()
            .next()
            .ok_or(FetchError::NoPortfolio)?;

        Ok(Session {
            base_currency: portfolio.base_currency.symbol,
        })
    }

    async fn fetch_wallets_page(&self, page: u32) -> Result<Page<Wallet>, FetchError> {
        debug!(page = page; "HTTP: Requesting wallets page");
        let path = format!("/api/wallets?per_page={}&page={}", PAGE_SIZE, page);
        let envelope: WalletsEnvelope = self
            .http
            .get_json(&path)
            .await
            .map_err(|source| FetchError::page_fetch(ResourceKind::Wallets, page, source))?;
        Ok(envelope.into())
    }

    async fn fetch_transactions_page(
        &self,
        wallet_filter: Option<i64>,
        page: u32,
    ) -> Result<Page<Transaction>, FetchError> {
        let path = match wallet_filter {
            Some(wallet_id) => format!(
                "/api/transactions?order=date&q[m]=and&q[g][0][from_wallet_id_or_to_wallet_id_eq]={}&page={}&per_page={}",
                wallet_id, page, PAGE_SIZE
            ),
            None => format!("/api/transactions?per_page={}&order=date&page={}", PAGE_SIZE, page),
        };

        debug!(page = page; "HTTP: Requesting transactions page");
        let envelope: TransactionsEnvelope = self
            .http
            .get_json(&path)
            .await
            .map_err(|source| FetchError::page_fetch(ResourceKind::Transactions, page, source))?;
        Ok(envelope.into())
    }
}
