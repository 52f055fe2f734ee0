// src/rabby.rs
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::models::{ChainBalance, FetchResult};
use crate::proxy::{build_client, ProxyProvider};
use crate::retry::RetryPolicy;

pub const TOTAL_BALANCE_URL: &str = "https://api.rabby.io/v1/user/total_balance";

/// Body Rabby sends instead of data when throttling
const RATE_LIMIT_MESSAGE: &str = "Too Many Requests";

/// `null` reads as the zero value, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ChainEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[allow(dead_code)]
    #[serde(rename = "native_token_id", default, deserialize_with = "null_as_default")]
    native_token: String,
    #[serde(default)]
    usd_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TotalBalanceResponse {
    #[allow(dead_code)]
    #[serde(default, deserialize_with = "null_as_default")]
    error_code: i64,
    #[serde(default)]
    total_usd_value: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    chain_list: Vec<ChainEntry>,
    #[serde(default)]
    message: Option<String>,
}

impl TotalBalanceResponse {
    /// Keep only chains actually holding value.
    fn into_fetch_result(self) -> FetchResult {
        let chain_balances = self
            .chain_list
            .into_iter()
            .filter_map(|c| match c.usd_value {
                Some(v) if v > 0.0 => Some(ChainBalance::new(c.name, v)),
                _ => None,
            })
            .collect();

        FetchResult {
            total_usd_balance: self.total_usd_value.unwrap_or(0.0),
            chain_balances,
        }
    }
}

/// Why a single request attempt did not produce a balance.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("Request Error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Rate Limited (HTTP {0})")]
    RateLimited(u16),

    #[error("Failed To Parse JSON Response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate Limited by Message")]
    RateLimitedMessage,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("giving up after {attempts} attempts, last error: {last}")]
    RetriesExhausted { attempts: u32, last: AttemptError },
}

/// Client for Rabby's total balance endpoint
pub struct RabbyClient {
    base_url: String,
    proxies: Arc<dyn ProxyProvider>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl RabbyClient {
    pub fn new(proxies: Arc<dyn ProxyProvider>, retry: RetryPolicy, timeout: Duration) -> Self {
        Self::with_base_url(TOTAL_BALANCE_URL, proxies, retry, timeout)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        proxies: Arc<dyn ProxyProvider>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            proxies,
            retry,
            timeout,
        }
    }

    /// One request through a freshly picked proxy.
    async fn attempt(&self, address: &str) -> Result<FetchResult, AttemptError> {
        let proxy = self.proxies.next_proxy();
        let client = build_client(proxy.as_deref(), self.timeout)?;

        debug!("📡 GET {} id={} via {:?}", self.base_url, address, proxy);

        let resp = client
            .get(&self.base_url)
            .query(&[("id", address)])
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            return Err(AttemptError::RateLimited(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let parsed: TotalBalanceResponse = serde_json::from_slice(&body)?;

        if parsed.message.as_deref() == Some(RATE_LIMIT_MESSAGE) {
            return Err(AttemptError::RateLimitedMessage);
        }

        Ok(parsed.into_fetch_result())
    }

    /// Total USD balance plus non-zero chains for `address`.
    ///
    /// Transport errors, HTTP 429/403, unparsable bodies and the rate-limit
    /// message are all retried after the policy's delay. With no attempt
    /// ceiling this only returns on success.
    pub async fn get_total_balance(&self, address: &str) -> Result<FetchResult, FetchError> {
        let mut attempts: u32 = 0;

        loop {
            let err = match self.attempt(address).await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            attempts += 1;
            if self.retry.exhausted(attempts) {
                return Err(FetchError::RetriesExhausted {
                    attempts,
                    last: err,
                });
            }

            let delay = self.retry.delay_for(attempts);
            warn!(
                "{} | {} - Sleeping {:.1} seconds (attempt {})...",
                address,
                err,
                delay.as_secs_f64(),
                attempts
            );
            sleep(delay).await;
        }
    }
}
