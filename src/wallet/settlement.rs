//! Value-transfer primitive backing the treasury
//!
//! Models the environment's ability to credit an arbitrary address with
//! native funds. The wallet holds a custody pool here; paying out moves value
//! from custody to an external account and can fail, in which case the caller
//! is expected to roll back the ledger state it already committed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{Address, Amount};
use crate::error::WalletError;

/// In-process settlement: the custody pool plus every external account this
/// wallet has ever credited.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LocalSettlement {
    custody: Amount,
    accounts: HashMap<Address, Amount>,
}

impl LocalSettlement {
    pub fn new(initial_custody: Amount) -> Self {
        Self {
            custody: initial_custody,
            accounts: HashMap::new(),
        }
    }

    /// Funds actually held by the wallet. The treasury's accounting balance
    /// must always equal this.
    pub fn custody_balance(&self) -> Amount {
        self.custody
    }

    /// Balance credited to an external address so far.
    pub fn held(&self, address: &Address) -> Amount {
        self.accounts.get(address).copied().unwrap_or(0)
    }

    /// Add incoming value to custody.
    pub fn fund(&mut self, amount: Amount) -> Result<(), WalletError> {
        self.custody = self
            .custody
            .checked_add(amount)
            .ok_or_else(|| WalletError::SettlementFailed("custody overflow".to_string()))?;
        Ok(())
    }

    /// Pay `amount` from custody to `to`. All-or-nothing: on any failure the
    /// custody pool is left exactly as it was.
    pub fn pay(&mut self, to: &Address, amount: Amount) -> Result<(), WalletError> {
        if self.custody < amount {
            return Err(WalletError::SettlementFailed(
                "custody underfunded".to_string(),
            ));
        }

        let current = self.accounts.get(to).copied().unwrap_or(0);
        let credited = current.checked_add(amount).ok_or_else(|| {
            WalletError::SettlementFailed(format!("receiving account {} overflow", to))
        })?;

        self.custody -= amount;
        self.accounts.insert(to.clone(), credited);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_held(&mut self, address: &Address, amount: Amount) {
        self.accounts.insert(address.clone(), amount);
    }
}
