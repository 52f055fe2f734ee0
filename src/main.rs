mod account;
mod checker;
mod config;
mod models;
mod proxy;
mod rabby;
mod report;
mod retry;
mod storage;
#[cfg(test)]
mod test_support;

use std::{collections::BTreeMap, path::Path, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::checker::Checker;
use crate::proxy::ProxyList;
use crate::rabby::RabbyClient;
use crate::report::Bucket;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // RUST_LOG overrides, info otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("Rabby checker starting...");

    let cfg = config::load()?;

    let proxies = ProxyList::from_lines(storage::read_lines(Path::new(&cfg.proxies_file)).await?);
    if proxies.is_empty() {
        warn!("No proxies in {}, connecting directly", cfg.proxies_file);
    } else {
        info!("Rotating over {} proxies", proxies.len());
    }

    let accounts = storage::read_lines(Path::new(&cfg.accounts_file)).await?;
    if accounts.is_empty() {
        warn!("No accounts found in {}, nothing to do", cfg.accounts_file);
        return Ok(());
    }
    info!("Loaded {} accounts from {}", accounts.len(), cfg.accounts_file);

    tokio::fs::create_dir_all(&cfg.results_dir).await?;

    let rabby = RabbyClient::new(Arc::new(proxies), cfg.retry.clone(), cfg.request_timeout);
    let checker = Checker::new(rabby, &cfg.results_dir);

    let run = async {
        let mut tally: BTreeMap<Bucket, usize> = BTreeMap::new();
        let mut skipped = 0usize;

        for (i, account) in accounts.iter().enumerate() {
            info!("[{}/{}] Checking account...", i + 1, accounts.len());
            match checker.check_account(account).await {
                Some(bucket) => *tally.entry(bucket).or_default() += 1,
                None => skipped += 1,
            }
        }

        (tally, skipped)
    };

    tokio::select! {
        (tally, skipped) = run => {
            for bucket in Bucket::ALL {
                info!("  {}: {}", bucket, tally.get(&bucket).copied().unwrap_or(0));
            }
            info!(
                "Done: {} reports written to {}, {} skipped",
                tally.values().sum::<usize>(),
                cfg.results_dir,
                skipped
            );
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    info!("Rabby checker stopped.");
    Ok(())
}
