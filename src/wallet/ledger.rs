//! Per-beneficiary allowance and spend tracking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{Address, Amount, Timestamp};
use crate::error::WalletError;

/// Length of one spending window. `spent` resets when a spend arrives at
/// least this long after `window_start` (rolling window, per beneficiary).
pub const SPEND_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Spending allowance for one beneficiary.
///
/// `allocated_balance` is a lifetime budget, not a live cash balance;
/// `daily_limit` caps what can be drawn within one window. `spent` tracks the
/// current window and `lifetime_spent` the total drawn since the record was
/// created.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BeneficiaryRecord {
    pub allocated_balance: Amount,
    pub daily_limit: Amount,
    pub spent: Amount,
    pub lifetime_spent: Amount,
    pub window_start: Timestamp,
}

/// Owner-managed registry of beneficiary records. Records are never deleted.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct BeneficiaryLedger {
    records: HashMap<Address, BeneficiaryRecord>,
}

impl BeneficiaryLedger {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Create a record with zero spend. Re-adding an existing beneficiary is
    /// rejected rather than silently resetting its limits.
    pub fn add_beneficiary(
        &mut self,
        address: &Address,
        allocated_balance: Amount,
        daily_limit: Amount,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        if self.records.contains_key(address) {
            return Err(WalletError::InvalidParameters(format!(
                "beneficiary {} already exists",
                address
            )));
        }

        self.records.insert(
            address.clone(),
            BeneficiaryRecord {
                allocated_balance,
                daily_limit,
                spent: 0,
                lifetime_spent: 0,
                window_start: now,
            },
        );
        Ok(())
    }

    pub fn get(&self, address: &Address) -> Result<&BeneficiaryRecord, WalletError> {
        self.records
            .get(address)
            .ok_or_else(|| WalletError::NotFound(address.clone()))
    }

    pub fn is_beneficiary(&self, address: &Address) -> bool {
        self.records.contains_key(address)
    }

    pub fn require_beneficiary(&self, caller: &Address) -> Result<(), WalletError> {
        if self.is_beneficiary(caller) {
            Ok(())
        } else {
            Err(WalletError::Unauthorized("a beneficiary"))
        }
    }

    /// Number of registered beneficiaries (the quorum denominator).
    pub fn beneficiary_count(&self) -> usize {
        self.records.len()
    }

    /// Charge `amount` against the beneficiary's window and lifetime caps.
    ///
    /// Rolls the window first if 24h have passed since `window_start`. Fails
    /// without mutating the record if either cap would be exceeded. Does not
    /// move funds.
    pub(crate) fn record_spend(
        &mut self,
        address: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<BeneficiaryRecord, WalletError> {
        let record = self
            .records
            .get_mut(address)
            .ok_or_else(|| WalletError::NotFound(address.clone()))?;

        // Validate against the rolled window without touching the record;
        // nothing is written until every check has passed.
        let (window_spent, window_start) =
            if now >= record.window_start.saturating_add(SPEND_WINDOW_SECS) {
                (0, now)
            } else {
                (record.spent, record.window_start)
            };

        let new_spent = window_spent
            .checked_add(amount)
            .ok_or_else(|| WalletError::InvalidParameters("spend amount overflow".to_string()))?;
        if new_spent > record.daily_limit {
            return Err(WalletError::DailyLimitExceeded);
        }

        let new_lifetime = record
            .lifetime_spent
            .checked_add(amount)
            .ok_or_else(|| WalletError::InvalidParameters("spend amount overflow".to_string()))?;
        if new_lifetime > record.allocated_balance {
            return Err(WalletError::AllowanceExceeded);
        }

        record.spent = new_spent;
        record.lifetime_spent = new_lifetime;
        record.window_start = window_start;
        Ok(record.clone())
    }

    /// Put a record back as it was before a spend whose fund movement
    /// failed. Restoring the whole record also undoes any window roll the
    /// spend committed, so a failed call leaves no trace.
    pub(crate) fn restore(&mut self, address: &Address, record: BeneficiaryRecord) {
        self.records.insert(address.clone(), record);
    }
}
