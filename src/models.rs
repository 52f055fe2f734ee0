// src/models.rs

/// USD balance of one address on one chain
#[derive(Debug, Clone, PartialEq)]
pub struct ChainBalance {
    pub chain_name: String,
    pub usd_balance: f64, // always > 0 once it leaves the fetcher
}

/// Outcome of a successful balance lookup
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub total_usd_balance: f64,
    pub chain_balances: Vec<ChainBalance>,
}

impl ChainBalance {
    pub fn new(chain_name: impl Into<String>, usd_balance: f64) -> Self {
        Self {
            chain_name: chain_name.into(),
            usd_balance,
        }
    }
}
