// src/account.rs
use alloy::primitives::Address;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0} | Invalid private key: {1}")]
    InvalidPrivateKey(String, String),

    #[error("{0} | Invalid mnemonic: {1}")]
    InvalidMnemonic(String, String),

    #[error("{0} | Unrecognized account data")]
    Unrecognized(String),
}

/// What a raw account line resolved to
#[derive(Debug, Clone)]
pub struct AccountData {
    pub address: Address,
    #[allow(dead_code)]
    pub private_key: Option<String>,
    #[allow(dead_code)]
    pub mnemonic: Option<String>,
}

const MNEMONIC_LENGTHS: [usize; 5] = [12, 15, 18, 21, 24];

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Resolve an address, private key or seed phrase to the wallet address.
pub fn parse_account_data(raw: &str) -> Result<AccountData, AccountError> {
    let data = raw.trim();
    let body = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))
        .unwrap_or(data);

    // plain address
    if body.len() == 40 && is_hex(body) && body.len() != data.len() {
        let address = data
            .parse::<Address>()
            .map_err(|_| AccountError::Unrecognized(data.to_string()))?;
        return Ok(AccountData {
            address,
            private_key: None,
            mnemonic: None,
        });
    }

    if body.len() == 64 && is_hex(body) {
        let signer = body
            .parse::<PrivateKeySigner>()
            .map_err(|e| AccountError::InvalidPrivateKey(data.to_string(), e.to_string()))?;
        return Ok(AccountData {
            address: signer.address(),
            private_key: Some(format!("0x{body}")),
            mnemonic: None,
        });
    }

    let words: Vec<&str> = data.split_whitespace().collect();
    if MNEMONIC_LENGTHS.contains(&words.len()) {
        let phrase = words.join(" ");
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.as_str())
            .index(0u32)
            .and_then(|b| b.build())
            .map_err(|e| AccountError::InvalidMnemonic(data.to_string(), e.to_string()))?;
        let key = hex::encode(signer.credential().to_bytes());
        return Ok(AccountData {
            address: signer.address(),
            private_key: Some(format!("0x{key}")),
            mnemonic: Some(phrase),
        });
    }

    Err(AccountError::Unrecognized(data.to_string()))
}
