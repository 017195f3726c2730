//! JSON snapshot persistence for wallet state

use std::path::Path;

use crate::error::WalletError;
use crate::wallet::SharedWallet;

pub fn load(path: &str) -> Result<SharedWallet, WalletError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| WalletError::StateError(format!("read {}: {}", path, e)))?;
    serde_json::from_str(&data)
        .map_err(|e| WalletError::StateError(format!("parse {}: {}", path, e)))
}

pub fn save(path: &str, wallet: &SharedWallet) -> Result<(), WalletError> {
    let data = serde_json::to_string_pretty(wallet)
        .map_err(|e| WalletError::StateError(format!("serialize state: {}", e)))?;
    std::fs::write(path, data)
        .map_err(|e| WalletError::StateError(format!("write {}: {}", path, e)))?;
    Ok(())
}

pub fn exists(path: &str) -> bool {
    Path::new(path).exists()
}
