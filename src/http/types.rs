use serde::Deserialize;

use crate::fetch::Page;
use crate::models::{Transaction, Wallet};

/// Pagination metadata common to every paginated endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub page: PageStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageStats {
    pub total_pages: u32,
}

/// Envelope returned by `GET /api/sessions`.
#[derive(Debug, Deserialize)]
pub struct SessionEnvelope {
    pub portfolios: Vec<PortfolioSummary>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioSummary {
    pub base_currency: BaseCurrency,
}

#[derive(Debug, Deserialize)]
pub struct BaseCurrency {
    pub symbol: String,
}

/// Envelope returned by the wallets endpoint.
#[derive(Debug, Deserialize)]
pub struct WalletsEnvelope {
    pub meta: PageMeta,
    pub wallets: Vec<Wallet>,
}

/// Envelope returned by the transactions endpoint.
#[derive(Debug, Deserialize)]
pub struct TransactionsEnvelope {
    pub meta: PageMeta,
    pub transactions: Vec<Transaction>,
}

impl From<WalletsEnvelope> for Page<Wallet> {
    fn from(envelope: WalletsEnvelope) -> Self {
        Page {
            total_pages: envelope.meta.page.total_pages,
            items: envelope.wallets,
        }
    }
}

impl From<TransactionsEnvelope> for Page<Transaction> {
    fn from(envelope: TransactionsEnvelope) -> Self {
        Page {
            total_pages: envelope.meta.page.total_pages,
            items: envelope.transactions,
        }
    }
}
