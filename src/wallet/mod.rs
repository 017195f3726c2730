//! Shared custodial wallet core
//!
//! One owner pre-authorizes a fixed set of beneficiaries to spend from a
//! pooled treasury under per-beneficiary caps; a guardian can run a
//! time-boxed succession election that replaces the owner when a strict
//! majority of beneficiaries votes for the candidate.
//!
//! All state lives in a single [`SharedWallet`] aggregate. Every mutating
//! operation takes an explicit caller identity and runs to completion;
//! callers on a multi-threaded host must serialize mutations through one
//! lock (the RPC layer does exactly that).

pub mod access;
pub mod election;
pub mod ledger;
pub mod settlement;
pub mod treasury;
pub mod types;

pub use access::AccessControl;
pub use election::{ElectionOutcome, ElectionStage, SuccessionElection, VOTING_WINDOW_SECS};
pub use ledger::{BeneficiaryLedger, BeneficiaryRecord, SPEND_WINDOW_SECS};
pub use settlement::LocalSettlement;
pub use treasury::Treasury;
pub use types::{Address, Amount, EtherTransferred, Timestamp};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WalletError;

/// The wallet aggregate: roles, beneficiary ledger, pooled treasury,
/// succession election and the settlement layer holding the actual funds.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SharedWallet {
    access: AccessControl,
    ledger: BeneficiaryLedger,
    treasury: Treasury,
    election: SuccessionElection,
    settlement: LocalSettlement,
    events: Vec<EtherTransferred>,
}

impl SharedWallet {
    /// Deploy a wallet with an initial funding amount already in custody.
    pub fn new(owner: Address, guardian: Address, initial_funding: Amount) -> Self {
        Self {
            access: AccessControl::new(owner, guardian),
            ledger: BeneficiaryLedger::new(),
            treasury: Treasury::new(initial_funding),
            election: SuccessionElection::new(),
            settlement: LocalSettlement::new(initial_funding),
            events: Vec::new(),
        }
    }

    pub fn owner(&self) -> &Address {
        self.access.owner()
    }

    pub fn guardian(&self) -> &Address {
        self.access.guardian()
    }

    // --- Beneficiary management ---

    pub fn add_beneficiary(
        &mut self,
        caller: &Address,
        address: &Address,
        allocated_balance: Amount,
        daily_limit: Amount,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        self.access.require_owner(caller)?;
        self.ledger
            .add_beneficiary(address, allocated_balance, daily_limit, now)?;
        info!(
            beneficiary = %address,
            allocated_balance,
            daily_limit,
            "beneficiary added"
        );
        Ok(())
    }

    pub fn get_beneficiary_data(
        &self,
        address: &Address,
    ) -> Result<&BeneficiaryRecord, WalletError> {
        self.ledger.get(address)
    }

    // --- Treasury ---

    /// Open to any caller; depositing is not role-gated.
    pub fn deposit(&mut self, caller: &Address, amount: Amount) -> Result<(), WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidParameters(
                "deposit amount must be positive".to_string(),
            ));
        }
        self.treasury.deposit(amount)?;
        if let Err(e) = self.settlement.fund(amount) {
            // Undo the accounting credit that was just applied
            let _ = self.treasury.debit(amount);
            return Err(e);
        }
        info!(from = %caller, amount, "deposit received");
        Ok(())
    }

    /// Accounting balance and actual custody balance. The two must always be
    /// equal; returning both keeps the invariant externally auditable.
    pub fn get_wallet_balance(&self) -> (Amount, Amount) {
        (self.treasury.balance(), self.settlement.custody_balance())
    }

    /// Pay `amount` from the pool to the calling beneficiary.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        self.spend(caller, caller.clone(), amount, now)?;
        info!(to = %caller, amount, "withdrawal paid");
        Ok(())
    }

    /// Pay `amount` from the pool to `to`, emitting an [`EtherTransferred`]
    /// notification on success.
    pub fn transfer_to(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        self.spend(caller, to.clone(), amount, now)?;
        let event = EtherTransferred {
            from: caller.clone(),
            to: to.clone(),
            amount,
        };
        info!(from = %event.from, to = %event.to, amount, "ether transferred");
        self.events.push(event);
        Ok(())
    }

    /// Shared spend path: charge the ledger, debit the pool, then settle.
    /// The settlement credit is the last step; any failure after the ledger
    /// commit restores the record wholesale (charge and window roll alike)
    /// so no failed call leaves state mutated.
    fn spend(
        &mut self,
        caller: &Address,
        payee: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        self.ledger.require_beneficiary(caller)?;
        if amount == 0 {
            return Err(WalletError::InvalidParameters(
                "spend amount must be positive".to_string(),
            ));
        }

        let prior = self.ledger.get(caller)?.clone();
        self.ledger.record_spend(caller, amount, now)?;

        if let Err(e) = self.treasury.debit(amount) {
            self.ledger.restore(caller, prior);
            return Err(e);
        }

        if let Err(e) = self.settlement.pay(&payee, amount) {
            self.treasury.restore(amount);
            self.ledger.restore(caller, prior);
            return Err(e);
        }

        Ok(())
    }

    // --- Succession election ---

    pub fn start_election(
        &mut self,
        caller: &Address,
        candidate: &Address,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        self.access.require_guardian(caller)?;
        if self.election.stage() == ElectionStage::Voting {
            return Err(WalletError::ElectionAlreadyInProgress);
        }
        if !self.ledger.is_beneficiary(candidate) {
            return Err(WalletError::InvalidParameters(format!(
                "candidate {} is not a beneficiary",
                candidate
            )));
        }
        if candidate == self.access.owner() {
            return Err(WalletError::InvalidParameters(
                "candidate is already the owner".to_string(),
            ));
        }
        self.election.start(candidate.clone(), now)?;
        info!(candidate = %candidate, "succession election started");
        Ok(())
    }

    pub fn vote(&mut self, caller: &Address) -> Result<(), WalletError> {
        self.ledger.require_beneficiary(caller)?;
        self.election.vote(caller)?;
        info!(voter = %caller, votes = self.election.vote_count(), "vote recorded");
        Ok(())
    }

    /// Close the election once the 24h window has elapsed. On quorum the
    /// owner identity rotates to the candidate; either way the round ends
    /// and a new one may start.
    pub fn finalize_election(
        &mut self,
        caller: &Address,
        now: Timestamp,
    ) -> Result<ElectionOutcome, WalletError> {
        self.access.require_guardian(caller)?;
        let outcome = self
            .election
            .finalize(now, self.ledger.beneficiary_count())?;
        match &outcome {
            ElectionOutcome::QuorumReached { new_owner } => {
                self.access.transfer_ownership(new_owner.clone());
                info!(new_owner = %new_owner, "election reached quorum, ownership rotated");
            }
            ElectionOutcome::QuorumFailed {
                votes,
                beneficiaries,
            } => {
                info!(votes, beneficiaries, "election failed quorum, owner unchanged");
            }
        }
        Ok(outcome)
    }

    pub fn get_election_stage(&self) -> ElectionStage {
        self.election.stage()
    }

    /// Candidate of the current or last round, if any.
    pub fn election_candidate(&self) -> Option<&Address> {
        self.election.candidate()
    }

    // --- Audit boundary ---

    /// Notifications emitted so far, oldest first.
    pub fn events(&self) -> &[EtherTransferred] {
        &self.events
    }

    /// Hand the pending notifications to a consumer, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<EtherTransferred> {
        std::mem::take(&mut self.events)
    }

    /// Funds credited to an external address by past payouts.
    pub fn held_by(&self, address: &Address) -> Amount {
        self.settlement.held(address)
    }

    #[cfg(test)]
    fn settlement_mut(&mut self) -> &mut LocalSettlement {
        &mut self.settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETH: u64 = 1_000_000_000; // base units per coin, test scale

    fn deploy() -> SharedWallet {
        SharedWallet::new("owner".to_string(), "guardian".to_string(), 5 * ETH)
    }

    fn deploy_with_beneficiaries(n: usize) -> (SharedWallet, Vec<Address>) {
        let mut wallet = deploy();
        let owner = "owner".to_string();
        let mut bens = Vec::new();
        for i in 1..=n {
            let addr = format!("ben{}", i);
            wallet
                .add_beneficiary(&owner, &addr, 10 * ETH, 10 * ETH, 0)
                .unwrap();
            bens.push(addr);
        }
        (wallet, bens)
    }

    #[test]
    fn test_deployment() {
        let wallet = deploy();
        assert_eq!(wallet.get_wallet_balance(), (5 * ETH, 5 * ETH));
        assert_eq!(wallet.owner(), "owner");
        assert_eq!(wallet.guardian(), "guardian");
        assert_eq!(wallet.get_election_stage(), ElectionStage::Idle);
    }

    #[test]
    fn test_add_beneficiary_with_allowance() {
        let mut wallet = deploy();
        wallet
            .add_beneficiary(&"owner".to_string(), &"ben1".to_string(), ETH, ETH, 0)
            .unwrap();

        let record = wallet.get_beneficiary_data(&"ben1".to_string()).unwrap();
        assert_eq!(record.allocated_balance, ETH);
        assert_eq!(record.daily_limit, ETH);
        assert_eq!(record.spent, 0);
    }

    #[test]
    fn test_add_beneficiary_requires_owner() {
        let mut wallet = deploy();
        assert_eq!(
            wallet.add_beneficiary(&"guardian".to_string(), &"ben1".to_string(), ETH, ETH, 0),
            Err(WalletError::Unauthorized("the owner"))
        );
        assert_eq!(
            wallet.get_beneficiary_data(&"ben1".to_string()),
            Err(WalletError::NotFound("ben1".to_string()))
        );
    }

    #[test]
    fn test_deposit_tracks_balance() {
        let mut wallet = deploy();
        wallet.deposit(&"owner".to_string(), 2 * ETH).unwrap();

        let (accounting, custody) = wallet.get_wallet_balance();
        assert_eq!(accounting, 7 * ETH);
        assert_eq!(accounting, custody);
    }

    #[test]
    fn test_deposit_open_to_anyone() {
        let mut wallet = deploy();
        wallet.deposit(&"stranger".to_string(), ETH).unwrap();
        assert_eq!(wallet.get_wallet_balance().0, 6 * ETH);
    }

    #[test]
    fn test_withdraw_within_daily_limit() {
        let mut wallet = deploy();
        let ben = "ben1".to_string();
        wallet
            .add_beneficiary(&"owner".to_string(), &ben, ETH, ETH, 0)
            .unwrap();

        wallet.withdraw(&ben, ETH / 2, 0).unwrap();

        assert_eq!(wallet.held_by(&ben), ETH / 2);
        assert_eq!(wallet.get_wallet_balance(), (9 * ETH / 2, 9 * ETH / 2));
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap().spent, ETH / 2);
    }

    #[test]
    fn test_withdraw_exceeding_daily_limit() {
        let mut wallet = deploy();
        let ben = "ben1".to_string();
        wallet
            .add_beneficiary(&"owner".to_string(), &ben, ETH, ETH / 2, 0)
            .unwrap();
        wallet.withdraw(&ben, ETH / 2, 0).unwrap();

        assert_eq!(
            wallet.withdraw(&ben, ETH / 5, 10),
            Err(WalletError::DailyLimitExceeded)
        );
        // Failed call left no partial state behind
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap().spent, ETH / 2);
        assert_eq!(wallet.get_wallet_balance(), (9 * ETH / 2, 9 * ETH / 2));
    }

    #[test]
    fn test_withdraw_requires_beneficiary() {
        let mut wallet = deploy();
        assert_eq!(
            wallet.withdraw(&"stranger".to_string(), ETH, 0),
            Err(WalletError::Unauthorized("a beneficiary"))
        );
    }

    #[test]
    fn test_withdraw_insufficient_funds_rolls_back_ledger() {
        let mut wallet = deploy();
        let ben = "ben1".to_string();
        wallet
            .add_beneficiary(&"owner".to_string(), &ben, 100 * ETH, 100 * ETH, 0)
            .unwrap();

        assert_eq!(
            wallet.withdraw(&ben, 6 * ETH, 0),
            Err(WalletError::InsufficientFunds)
        );
        // The ledger charge from step (1) must not survive the failed debit
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap().spent, 0);
        assert_eq!(wallet.get_wallet_balance(), (5 * ETH, 5 * ETH));
    }

    #[test]
    fn test_failed_spend_after_window_leaves_record_untouched() {
        let mut wallet = deploy();
        let ben = "ben1".to_string();
        wallet
            .add_beneficiary(&"owner".to_string(), &ben, 100 * ETH, 100 * ETH, 0)
            .unwrap();
        wallet.withdraw(&ben, ETH, 0).unwrap();
        let before = wallet.get_beneficiary_data(&ben).unwrap().clone();

        // This spend arrives after the window elapsed and would roll it, but
        // the pool cannot cover it. The rejection must leave the whole
        // record intact, window anchor included.
        assert_eq!(
            wallet.withdraw(&ben, 50 * ETH, SPEND_WINDOW_SECS + 100),
            Err(WalletError::InsufficientFunds)
        );
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap(), &before);

        // Same guarantee when the settlement step is what fails
        wallet.settlement_mut().set_held(&ben, u64::MAX);
        let err = wallet
            .withdraw(&ben, ETH, SPEND_WINDOW_SECS + 100)
            .unwrap_err();
        assert!(matches!(err, WalletError::SettlementFailed(_)));
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap(), &before);
    }

    #[test]
    fn test_settlement_failure_rolls_back_everything() {
        let mut wallet = deploy();
        let ben = "ben1".to_string();
        wallet
            .add_beneficiary(&"owner".to_string(), &ben, ETH, ETH, 0)
            .unwrap();
        // Force the payout credit to fail after ledger and treasury commit
        wallet.settlement_mut().set_held(&ben, u64::MAX);

        let err = wallet.withdraw(&ben, ETH / 2, 0).unwrap_err();
        assert!(matches!(err, WalletError::SettlementFailed(_)));
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap().spent, 0);
        assert_eq!(wallet.get_wallet_balance(), (5 * ETH, 5 * ETH));
    }

    #[test]
    fn test_transfer_to_another_address() {
        let mut wallet = deploy();
        let ben = "ben1".to_string();
        let payee = "ben2".to_string();
        wallet
            .add_beneficiary(&"owner".to_string(), &ben, ETH, ETH, 0)
            .unwrap();

        wallet.transfer_to(&ben, &payee, ETH / 4, 0).unwrap();

        assert_eq!(wallet.held_by(&payee), ETH / 4);
        assert_eq!(wallet.held_by(&ben), 0);
        // Exactly one notification, with the caller as `from`
        assert_eq!(
            wallet.events(),
            &[EtherTransferred {
                from: ben.clone(),
                to: payee.clone(),
                amount: ETH / 4,
            }]
        );
        // The transfer charges the sender's limit, not the payee's
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap().spent, ETH / 4);

        // Draining hands the notification off and empties the log
        let drained = wallet.drain_events();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].to, payee);
        assert!(wallet.events().is_empty());
    }

    #[test]
    fn test_conservation_across_operations() {
        let (mut wallet, bens) = deploy_with_beneficiaries(2);
        let mut expected = 5 * ETH;

        wallet.deposit(&"owner".to_string(), 3 * ETH).unwrap();
        expected += 3 * ETH;

        wallet.withdraw(&bens[0], ETH, 0).unwrap();
        expected -= ETH;

        wallet
            .transfer_to(&bens[1], &"payee".to_string(), 2 * ETH, 0)
            .unwrap();
        expected -= 2 * ETH;

        // A failed spend must not move the pool
        let _ = wallet.withdraw(&bens[0], 100 * ETH, 0);

        let (accounting, custody) = wallet.get_wallet_balance();
        assert_eq!(accounting, expected);
        assert_eq!(accounting, custody);
    }

    #[test]
    fn test_election_quorum_rotates_owner() {
        let (mut wallet, bens) = deploy_with_beneficiaries(3);
        let guardian = "guardian".to_string();
        let candidate = bens[0].clone();

        assert_eq!(wallet.election_candidate(), None);
        wallet.start_election(&guardian, &candidate, 0).unwrap();
        assert_eq!(wallet.get_election_stage(), ElectionStage::Voting);
        assert_eq!(wallet.election_candidate(), Some(&candidate));

        for ben in &bens {
            wallet.vote(ben).unwrap();
        }

        let outcome = wallet
            .finalize_election(&guardian, VOTING_WINDOW_SECS)
            .unwrap();
        assert_eq!(
            outcome,
            ElectionOutcome::QuorumReached {
                new_owner: candidate.clone()
            }
        );
        assert_eq!(wallet.owner(), &candidate);
        assert_eq!(wallet.get_election_stage(), ElectionStage::Finalized);
    }

    #[test]
    fn test_election_below_quorum_keeps_owner() {
        let (mut wallet, bens) = deploy_with_beneficiaries(3);
        let guardian = "guardian".to_string();

        wallet.start_election(&guardian, &bens[0], 0).unwrap();
        wallet.vote(&bens[0]).unwrap();

        let outcome = wallet
            .finalize_election(&guardian, VOTING_WINDOW_SECS)
            .unwrap();
        assert_eq!(
            outcome,
            ElectionOutcome::QuorumFailed {
                votes: 1,
                beneficiaries: 3
            }
        );
        assert_eq!(wallet.owner(), "owner");
    }

    #[test]
    fn test_finalize_before_window_elapses() {
        let (mut wallet, bens) = deploy_with_beneficiaries(3);
        let guardian = "guardian".to_string();

        wallet.start_election(&guardian, &bens[0], 1_000).unwrap();
        for ben in &bens {
            wallet.vote(ben).unwrap();
        }

        assert_eq!(
            wallet.finalize_election(&guardian, 1_000 + VOTING_WINDOW_SECS - 1),
            Err(WalletError::VotingPeriodNotElapsed)
        );
        // Still open; owner unchanged
        assert_eq!(wallet.get_election_stage(), ElectionStage::Voting);
        assert_eq!(wallet.owner(), "owner");
    }

    #[test]
    fn test_election_role_gates() {
        let (mut wallet, bens) = deploy_with_beneficiaries(3);

        // Only the guardian starts and finalizes
        assert_eq!(
            wallet.start_election(&"owner".to_string(), &bens[0], 0),
            Err(WalletError::Unauthorized("the guardian"))
        );
        wallet
            .start_election(&"guardian".to_string(), &bens[0], 0)
            .unwrap();
        assert_eq!(
            wallet.finalize_election(&bens[0], VOTING_WINDOW_SECS),
            Err(WalletError::Unauthorized("the guardian"))
        );

        // Only beneficiaries vote
        assert_eq!(
            wallet.vote(&"stranger".to_string()),
            Err(WalletError::Unauthorized("a beneficiary"))
        );
    }

    #[test]
    fn test_election_candidate_validation() {
        let (mut wallet, bens) = deploy_with_beneficiaries(1);
        let guardian = "guardian".to_string();

        // Candidate must hold a beneficiary record
        assert!(matches!(
            wallet.start_election(&guardian, &"stranger".to_string(), 0),
            Err(WalletError::InvalidParameters(_))
        ));

        // Resigning is not self-succession: once the candidate owns the
        // wallet it cannot be nominated again.
        wallet.start_election(&guardian, &bens[0], 0).unwrap();
        wallet.vote(&bens[0]).unwrap();
        wallet
            .finalize_election(&guardian, VOTING_WINDOW_SECS)
            .unwrap();
        assert_eq!(wallet.owner(), &bens[0]);
        assert!(matches!(
            wallet.start_election(&guardian, &bens[0], VOTING_WINDOW_SECS),
            Err(WalletError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_new_election_after_finalize() {
        let (mut wallet, bens) = deploy_with_beneficiaries(3);
        let guardian = "guardian".to_string();

        wallet.start_election(&guardian, &bens[0], 0).unwrap();
        wallet
            .finalize_election(&guardian, VOTING_WINDOW_SECS)
            .unwrap();

        // A fresh round can start and collects votes from scratch
        wallet
            .start_election(&guardian, &bens[1], VOTING_WINDOW_SECS)
            .unwrap();
        assert_eq!(wallet.get_election_stage(), ElectionStage::Voting);
        wallet.vote(&bens[0]).unwrap();
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Deploy with 5 units funded, add B with (allocated=1, daily=1);
        // B withdraws 0.5, then 0.2 more within the same window. The second
        // call stays under both caps (cumulative 0.7 <= 1) and succeeds;
        // only exceeding the window cap fails.
        let mut wallet = deploy();
        let ben = "benB".to_string();
        wallet
            .add_beneficiary(&"owner".to_string(), &ben, ETH, ETH, 0)
            .unwrap();

        wallet.withdraw(&ben, ETH / 2, 100).unwrap();
        assert_eq!(wallet.get_beneficiary_data(&ben).unwrap().spent, ETH / 2);

        wallet.withdraw(&ben, ETH / 5, 200).unwrap();
        assert_eq!(
            wallet.get_beneficiary_data(&ben).unwrap().spent,
            ETH / 2 + ETH / 5
        );

        // Pushing past the window cap fails
        assert_eq!(
            wallet.withdraw(&ben, ETH / 2, 300),
            Err(WalletError::DailyLimitExceeded)
        );

        // After the rolling window elapses the daily counter resets, but the
        // lifetime budget of 1 still binds.
        let later = 100 + SPEND_WINDOW_SECS;
        assert_eq!(
            wallet.withdraw(&ben, ETH / 2, later),
            Err(WalletError::AllowanceExceeded)
        );
        wallet.withdraw(&ben, ETH / 4, later).unwrap();
    }
}
