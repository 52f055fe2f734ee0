use eyre::Result;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::models::{ChainBalance, FetchResult};
use crate::storage;

/// Balance range a report is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    ZeroToOne,
    OneToTen,
    TenToHundred,
    HundredToFiveHundred,
    FiveHundredToThousand,
    ThousandPlus,
}

impl Bucket {
    pub const ALL: [Bucket; 6] = [
        Bucket::ZeroToOne,
        Bucket::OneToTen,
        Bucket::TenToHundred,
        Bucket::HundredToFiveHundred,
        Bucket::FiveHundredToThousand,
        Bucket::ThousandPlus,
    ];

    /// Lower bound inclusive, upper exclusive. Anything outside
    /// `[0, 1000)`, negatives and NaN included, lands in `ThousandPlus`.
    pub fn classify(total_usd: f64) -> Self {
        match total_usd {
            t if (0.0..1.0).contains(&t) => Bucket::ZeroToOne,
            t if (1.0..10.0).contains(&t) => Bucket::OneToTen,
            t if (10.0..100.0).contains(&t) => Bucket::TenToHundred,
            t if (100.0..500.0).contains(&t) => Bucket::HundredToFiveHundred,
            t if (500.0..1000.0).contains(&t) => Bucket::FiveHundredToThousand,
            _ => Bucket::ThousandPlus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::ZeroToOne => "0_1",
            Bucket::OneToTen => "1_10",
            Bucket::TenToHundred => "10_100",
            Bucket::HundredToFiveHundred => "100_500",
            Bucket::FiveHundredToThousand => "500_1000",
            Bucket::ThousandPlus => "1000_plus",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}_rabby.txt", self.label())
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Richest chain first. Stable, so equal balances keep API order.
pub fn sort_by_balance(chains: &mut [ChainBalance]) {
    chains.sort_by(|a, b| b.usd_balance.total_cmp(&a.usd_balance));
}

/// Text block appended to a bucket file. Expects chains already sorted.
pub fn format_report(account_data: &str, address: &str, result: &FetchResult) -> String {
    let mut out = format!(
        "Account Data: {}\nAddress: {}\nTotal Balance: {:.2} $\n\n",
        account_data, address, result.total_usd_balance
    );

    for chain in &result.chain_balances {
        out.push_str(&format!("{} | {:.2} $\n", chain.chain_name, chain.usd_balance));
    }

    out.push_str("\n\n");
    out
}

/// Sort, format and append the report to its bucket file under `results_dir`.
pub async fn write_report(
    results_dir: &Path,
    account_data: &str,
    address: &str,
    mut result: FetchResult,
) -> Result<(Bucket, PathBuf)> {
    sort_by_balance(&mut result.chain_balances);
    let block = format_report(account_data, address, &result);

    info!(
        "{} | Total USD Balance: {:.2} $",
        address, result.total_usd_balance
    );

    let bucket = Bucket::classify(result.total_usd_balance);
    let path = results_dir.join(bucket.file_name());
    storage::append_file(&path, &block).await?;

    Ok((bucket, path))
}
