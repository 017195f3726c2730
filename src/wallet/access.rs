//! Owner and guardian identities with role checks

use serde::{Deserialize, Serialize};

use super::types::Address;
use crate::error::WalletError;

/// The two privileged identities of a wallet.
///
/// The owner manages beneficiaries and can be replaced through a successful
/// succession election. The guardian starts and finalizes elections and is
/// fixed for the lifetime of the wallet.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AccessControl {
    owner: Address,
    guardian: Address,
}

impl AccessControl {
    pub fn new(owner: Address, guardian: Address) -> Self {
        Self { owner, guardian }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn guardian(&self) -> &Address {
        &self.guardian
    }

    pub fn require_owner(&self, caller: &Address) -> Result<(), WalletError> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(WalletError::Unauthorized("the owner"))
        }
    }

    pub fn require_guardian(&self, caller: &Address) -> Result<(), WalletError> {
        if caller == &self.guardian {
            Ok(())
        } else {
            Err(WalletError::Unauthorized("the guardian"))
        }
    }

    /// Rotate the owner identity. Only a finalized election with quorum may
    /// reach this; nothing else in the crate mutates `owner` or `guardian`.
    pub(crate) fn transfer_ownership(&mut self, new_owner: Address) {
        self.owner = new_owner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        let access = AccessControl::new("alice".to_string(), "gwen".to_string());

        assert!(access.require_owner(&"alice".to_string()).is_ok());
        assert_eq!(
            access.require_owner(&"gwen".to_string()),
            Err(WalletError::Unauthorized("the owner"))
        );

        assert!(access.require_guardian(&"gwen".to_string()).is_ok());
        assert!(access.require_guardian(&"alice".to_string()).is_err());
    }

    #[test]
    fn test_ownership_rotation() {
        let mut access = AccessControl::new("alice".to_string(), "gwen".to_string());
        access.transfer_ownership("bob".to_string());

        assert_eq!(access.owner(), "bob");
        assert!(access.require_owner(&"bob".to_string()).is_ok());
        assert!(access.require_owner(&"alice".to_string()).is_err());
        // Guardian is untouched by ownership rotation
        assert_eq!(access.guardian(), "gwen");
    }
}
