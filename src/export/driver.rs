//! Orchestration of one export session: session state, wallet discovery,
//! cached aggregation, serialization and delivery.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

use super::csv::to_delimited_text;
use super::sink::FileSink;
use super::structured::to_structured_text;
use crate::fetch::{CacheKey, FetchCache, FetchError, fetch_all};
use crate::http::PortfolioApi;
use crate::models::{Session, Transaction, Wallet};

/// Display name and file-name label of the combined export target.
pub const ALL_TRANSACTIONS_LABEL: &str = "All Transactions";

/// One exportable unit: a single wallet, or the combined view across every
/// wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    AllTransactions,
    Wallet(Wallet),
}

impl ExportTarget {
    pub fn name(&self) -> &str {
        match self {
            ExportTarget::AllTransactions => ALL_TRANSACTIONS_LABEL,
            ExportTarget::Wallet(wallet) => &wallet.name,
        }
    }

    fn cache_key(&self) -> CacheKey {
        match self {
            ExportTarget::AllTransactions => CacheKey::AllTransactions,
            ExportTarget::Wallet(wallet) => CacheKey::Wallet(wallet.id),
        }
    }

    fn wallet_filter(&self) -> Option<i64> {
        match self {
            ExportTarget::AllTransactions => None,
            ExportTarget::Wallet(wallet) => Some(wallet.id),
        }
    }

    fn file_name(&self, format: ExportFormat) -> String {
        format!("{} - Transactions.{}", self.name(), format.extension())
    }
}

/// Output document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Observable progress of one target's export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetState {
    #[default]
    Idle,
    Fetching,
    Serializing,
    Delivering,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Fetch(Arc<FetchError>),

    #[error("could not deliver {file_name}: {source}")]
    Deliver {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Drives exports end to end.
///
/// Holds the per-run session state, the wallet list and the fetch cache.
/// Distinct targets may export concurrently; repeated exports of one
/// target — including the same target in both formats — share a single
/// cached aggregation. A failed export invalidates only its own cache
/// entry and leaves the target idle, so the caller can simply retry.
pub struct ExportDriver<S: FileSink> {
    api: Arc<dyn PortfolioApi>,
    sink: S,
    cache: FetchCache,
    session: OnceCell<Session>,
    wallets: OnceCell<Vec<Wallet>>,
    states: Mutex<HashMap<CacheKey, TargetState>>,
}

impl<S: FileSink> ExportDriver<S> {
    pub fn new(api: Arc<dyn PortfolioApi>, sink: S) -> Self {
        Self {
            api,
            sink,
            cache: FetchCache::new(),
            session: OnceCell::new(),
            wallets: OnceCell::new(),
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Session state for the run, fetched on first use and immutable
    /// afterwards.
    pub async fn session(&self) -> Result<&Session, ExportError> {
        self.session
            .get_or_try_init(|| self.api.fetch_session())
            .await
            .map_err(|e| ExportError::Fetch(Arc::new(e)))
    }

    /// The complete wallet list, aggregated across pages on first use.
    pub async fn wallets(&self) -> Result<&[Wallet], ExportError> {
        let wallets = self
            .wallets
            .get_or_try_init(|| fetch_all(|page| self.api.fetch_wallets_page(page)))
            .await
            .map_err(|e| ExportError::Fetch(Arc::new(e)))?;

        if wallets.is_empty() {
            info!("Portfolio contains no wallets");
        }
        Ok(wallets)
    }

    /// Current state of `target`'s export; `Idle` when nothing is in
    /// progress.
    pub async fn state(&self, target: &ExportTarget) -> TargetState {
        self.states
            .lock()
            .await
            .get(&target.cache_key())
            .copied()
            .unwrap_or_default()
    }

    async fn set_state(&self, target: &ExportTarget, state: TargetState) {
        self.states.lock().await.insert(target.cache_key(), state);
    }

    /// Obtains `target`'s transactions through the single-flight cache.
    async fn transactions(&self, target: &ExportTarget) -> Result<Arc<Vec<Transaction>>, ExportError> {
        let api = Arc::clone(&self.api);
        let filter = target.wallet_filter();
        self.cache
            .get_or_fetch(target.cache_key(), move || async move {
                fetch_all(|page| api.fetch_transactions_page(filter, page)).await
            })
            .await
            .map_err(ExportError::Fetch)
    }

    /// Exports one target in one format: fetch (cached) → serialize →
    /// deliver.
    pub async fn export(&self, target: &ExportTarget, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let session = self.session().await?.clone();

        self.set_state(target, TargetState::Fetching).await;
        let result = self.run_export(target, format, &session).await;
        self.set_state(target, TargetState::Idle).await;

        match &result {
            Ok(path) => {
                info!(target_name = target.name(), path:% = path.display(); "Export delivered");
            },
            Err(e) => {
                warn!(target_name = target.name(), error:% = e; "Export failed");
            },
        }
        result
    }

    async fn run_export(
        &self,
        target: &ExportTarget,
        format: ExportFormat,
        session: &Session,
    ) -> Result<PathBuf, ExportError> {
        let transactions = self.transactions(target).await?;
        if transactions.is_empty() {
            info!(target_name = target.name(); "Target has no transactions");
        }

        self.set_state(target, TargetState::Serializing).await;
        let document = match format {
            ExportFormat::Csv => to_delimited_text(&session.base_currency, &transactions),
            ExportFormat::Json => to_structured_text(&transactions),
        };

        self.set_state(target, TargetState::Delivering).await;
        let file_name = target.file_name(format);
        self.sink
            .save(&file_name, &document)
            .map_err(|source| ExportError::Deliver { file_name, source })
    }

    /// Clears every cached aggregation. The driver is told when the
    /// enclosing session ends; it does not decide that itself.
    pub async fn teardown(&self) {
        self.cache.clear().await;
    }
}
