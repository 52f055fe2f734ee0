use std::path::PathBuf;
use tracing::{debug, error};

use crate::account::parse_account_data;
use crate::rabby::RabbyClient;
use crate::report::{self, Bucket};

/// Runs one account through extract → fetch → report.
pub struct Checker {
    rabby: RabbyClient,
    results_dir: PathBuf,
}

impl Checker {
    pub fn new(rabby: RabbyClient, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            rabby,
            results_dir: results_dir.into(),
        }
    }

    /// Returns the bucket the report was filed under, `None` if the account
    /// was skipped.
    pub async fn check_account(&self, account_data: &str) -> Option<Bucket> {
        let account = match parse_account_data(account_data) {
            Ok(acc) => acc,
            Err(e) => {
                error!("{}", e);
                return None;
            }
        };

        self.check_address(account_data, &account.address.to_string())
            .await
    }

    pub async fn check_address(&self, account_data: &str, address: &str) -> Option<Bucket> {
        let result = match self.rabby.get_total_balance(address).await {
            Ok(r) => r,
            Err(e) => {
                error!("{} | {}", address, e);
                return None;
            }
        };

        match report::write_report(&self.results_dir, account_data, address, result).await {
            Ok((bucket, path)) => {
                debug!("{} | appended to {}", address, path.display());
                Some(bucket)
            }
            Err(e) => {
                error!("{} | Failed to write report: {:?}", address, e);
                None
            }
        }
    }
}
