use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use futures::future::join_all;
use url::Url;

use folio::cli::{Cli, Commands, Format};
use folio::config::{Settings, load_configuration};
use folio::export::{DirectorySink, ExportDriver, ExportTarget};
use folio::http::{AuthTokens, PortfolioClient};
use folio::log::init_logging;
use folio::models::Wallet;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Wallets {
            config_file,
            base_url,
            auth_token,
            portfolio_token,
        } => {
            let settings = resolve_settings(&config_file, base_url, auth_token, portfolio_token, None)?;
            list_wallets(&settings).await
        },
        Commands::Export {
            config_file,
            base_url,
            auth_token,
            portfolio_token,
            wallet,
            all_transactions,
            format,
            output_dir,
        } => {
            let settings =
                resolve_settings(&config_file, base_url, auth_token, portfolio_token, output_dir)?;
            run_export(&settings, wallet, all_transactions, format).await
        },
    }
}

fn resolve_settings(
    config_file: &str,
    base_url: Option<String>,
    auth_token: Option<String>,
    portfolio_token: Option<String>,
    output_dir: Option<String>,
) -> Result<Settings, anyhow::Error> {
    let mut settings = load_configuration(Path::new(config_file))?;
    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    if let Some(auth_token) = auth_token {
        settings.auth_token = Some(auth_token);
    }
    if let Some(portfolio_token) = portfolio_token {
        settings.portfolio_token = Some(portfolio_token);
    }
    if let Some(output_dir) = output_dir {
        settings.output_dir = output_dir;
    }
    Ok(settings)
}

fn build_driver(settings: &Settings) -> Result<ExportDriver<DirectorySink>, anyhow::Error> {
    let tokens = AuthTokens {
        auth_token: settings.auth_token.clone().context(
            "No auth token configured; set auth_token in the config file, FOLIO_AUTH_TOKEN, or --auth-token",
        )?,
        portfolio_token: settings.portfolio_token.clone().context(
            "No portfolio token configured; set portfolio_token in the config file, FOLIO_PORTFOLIO_TOKEN, or --portfolio-token",
        )?,
    };
    let base_url = Url::parse(&settings.base_url).context("Invalid base URL")?;
    let client = PortfolioClient::new(base_url, &tokens)?;

    Ok(ExportDriver::new(
        Arc::new(client),
        DirectorySink::new(&settings.output_dir),
    ))
}

async fn list_wallets(settings: &Settings) -> Result<(), anyhow::Error> {
    let driver = build_driver(settings)?;

    let session = driver.session().await?;
    println!("Base currency: {}", session.base_currency);

    let wallets = driver.wallets().await?;
    if wallets.is_empty() {
        println!("No wallets found.");
        return Ok(());
    }
    for wallet in wallets {
        println!("{:>10}  {}", wallet.id, wallet.name);
    }
    Ok(())
}

async fn run_export(
    settings: &Settings,
    wallets: Vec<String>,
    all_transactions: bool,
    format: Format,
) -> Result<(), anyhow::Error> {
    if wallets.is_empty() && !all_transactions {
        bail!("Nothing to export: pass --wallet and/or --all-transactions");
    }

    let driver = build_driver(settings)?;

    let mut targets = Vec::new();
    if all_transactions {
        targets.push(ExportTarget::AllTransactions);
    }
    if !wallets.is_empty() {
        let known = driver.wallets().await?;
        for selector in &wallets {
            targets.push(ExportTarget::Wallet(find_wallet(known, selector)?));
        }
    }

    let formats = format.export_formats();

    // Targets are independent: one failure must not stop the others.
    let driver_ref = &driver;
    let exports = targets.iter().flat_map(|target| {
        formats.iter().map(move |format| {
            let format = *format;
            async move { (target, format, driver_ref.export(target, format).await) }
        })
    });
    let results = join_all(exports).await;

    let mut failures = 0usize;
    for (target, format, result) in results {
        match result {
            Ok(path) => println!(
                "Exported {} ({}) -> {}",
                target.name(),
                format.extension(),
                path.display()
            ),
            Err(e) => {
                failures += 1;
                eprintln!(
                    "Export of {} ({}) failed: {}",
                    target.name(),
                    format.extension(),
                    e
                );
            },
        }
    }

    driver.teardown().await;

    if failures > 0 {
        bail!("{} export(s) failed", failures);
    }
    Ok(())
}

fn find_wallet(wallets: &[Wallet], selector: &str) -> Result<Wallet, anyhow::Error> {
    if let Ok(id) = selector.parse::<i64>() {
        if let Some(wallet) = wallets.iter().find(|w| w.id == id) {
            return Ok(wallet.clone());
        }
    }
    wallets
        .iter()
        .find(|w| w.name == selector)
        .cloned()
        .with_context(|| format!("Unknown wallet: {}", selector))
}
