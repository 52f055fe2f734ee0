use dotenvy::dotenv;
use eyre::Result;
use std::{env, str::FromStr, time::Duration};
use tracing::info;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub accounts_file: String,
    pub proxies_file: String,
    pub results_dir: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // ✅ .env is optional

    let accounts_file = env::var("ACCOUNTS_FILE").unwrap_or_else(|_| "accounts.txt".to_string());
    let proxies_file = env::var("PROXIES_FILE").unwrap_or_else(|_| "proxies.txt".to_string());
    let results_dir = env::var("RESULTS_DIR").unwrap_or_else(|_| "results".to_string());

    let request_timeout = Duration::from_secs(env_or("REQUEST_TIMEOUT_SECS", 15u64));

    // ✅ Defaults keep the legacy behaviour: fixed 3s sleep, retry forever
    let max_attempts = match env_or("RETRY_MAX_ATTEMPTS", 0u32) {
        0 => None,
        n => Some(n),
    };
    let retry = RetryPolicy {
        base_delay: Duration::from_secs(env_or("RETRY_DELAY_SECS", 3u64)),
        backoff: env_or("RETRY_BACKOFF", 1.0f64).max(1.0),
        max_delay: Duration::from_secs(env_or("RETRY_MAX_DELAY_SECS", 120u64)),
        max_attempts,
    };

    let cfg = Config {
        accounts_file,
        proxies_file,
        results_dir,
        request_timeout,
        retry,
    };

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}
