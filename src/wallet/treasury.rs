//! Pooled fund accounting

use serde::{Deserialize, Serialize};

use super::types::Amount;
use crate::error::WalletError;

/// The pooled accounting balance: sum of all deposits minus all successful
/// withdrawals and transfers. Must equal the custody balance held by the
/// settlement layer at all times.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Treasury {
    pooled: Amount,
}

impl Treasury {
    pub fn new(initial: Amount) -> Self {
        Self { pooled: initial }
    }

    pub fn balance(&self) -> Amount {
        self.pooled
    }

    pub fn deposit(&mut self, amount: Amount) -> Result<(), WalletError> {
        self.pooled = self
            .pooled
            .checked_add(amount)
            .ok_or_else(|| WalletError::InvalidParameters("deposit overflow".to_string()))?;
        Ok(())
    }

    pub fn debit(&mut self, amount: Amount) -> Result<(), WalletError> {
        if self.pooled < amount {
            return Err(WalletError::InsufficientFunds);
        }
        self.pooled -= amount;
        Ok(())
    }

    /// Restore a debit whose downstream settlement failed.
    pub(crate) fn restore(&mut self, amount: Amount) {
        self.pooled = self.pooled.saturating_add(amount);
    }
}
