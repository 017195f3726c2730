//! Guardian-initiated succession election state machine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::{Address, Timestamp};
use crate::error::WalletError;

/// Fixed voting window. Finalization before this has elapsed is rejected;
/// the machine never blocks waiting for time to pass.
pub const VOTING_WINDOW_SECS: u64 = 24 * 60 * 60;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElectionStage {
    Idle,
    Voting,
    Finalized,
}

/// One election round: the nominated candidate and the distinct set of
/// beneficiaries that have voted for it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Election {
    pub candidate: Address,
    pub started_at: Timestamp,
    pub votes: HashSet<Address>,
}

/// Outcome of `finalize`. Quorum is a strict majority of all registered
/// beneficiaries, voters and non-voters alike.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ElectionOutcome {
    QuorumReached { new_owner: Address },
    QuorumFailed { votes: usize, beneficiaries: usize },
}

/// At most one live election. The finalized record is kept for inspection
/// until the next `start` overwrites it, so a concurrent second election can
/// never exist.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SuccessionElection {
    current: Option<Election>,
    finalized: bool,
}

impl SuccessionElection {
    pub fn new() -> Self {
        Self {
            current: None,
            finalized: false,
        }
    }

    pub fn stage(&self) -> ElectionStage {
        match &self.current {
            None => ElectionStage::Idle,
            Some(_) if self.finalized => ElectionStage::Finalized,
            Some(_) => ElectionStage::Voting,
        }
    }

    pub fn candidate(&self) -> Option<&Address> {
        self.current.as_ref().map(|e| &e.candidate)
    }

    pub fn vote_count(&self) -> usize {
        self.current.as_ref().map(|e| e.votes.len()).unwrap_or(0)
    }

    /// Open a new round. Any previous finalized round is discarded and its
    /// votes cleared.
    pub(crate) fn start(
        &mut self,
        candidate: Address,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        if self.stage() == ElectionStage::Voting {
            return Err(WalletError::ElectionAlreadyInProgress);
        }
        self.current = Some(Election {
            candidate,
            started_at: now,
            votes: HashSet::new(),
        });
        self.finalized = false;
        Ok(())
    }

    /// Record one vote per beneficiary per round. A repeat vote is an
    /// explicit rejection, not a silent no-op.
    pub(crate) fn vote(&mut self, voter: &Address) -> Result<(), WalletError> {
        if self.stage() != ElectionStage::Voting {
            return Err(WalletError::NoActiveElection);
        }
        let election = self.current.as_mut().ok_or(WalletError::NoActiveElection)?;
        if !election.votes.insert(voter.clone()) {
            return Err(WalletError::AlreadyVoted);
        }
        Ok(())
    }

    /// Close the round after the 24h window. The round is marked finalized
    /// whatever the outcome; ownership rotation is the caller's job.
    pub(crate) fn finalize(
        &mut self,
        now: Timestamp,
        beneficiary_count: usize,
    ) -> Result<ElectionOutcome, WalletError> {
        if self.stage() != ElectionStage::Voting {
            return Err(WalletError::NoActiveElection);
        }
        let election = self.current.as_ref().ok_or(WalletError::NoActiveElection)?;
        if now < election.started_at.saturating_add(VOTING_WINDOW_SECS) {
            return Err(WalletError::VotingPeriodNotElapsed);
        }

        let votes = election.votes.len();
        let outcome = if 2 * votes > beneficiary_count {
            ElectionOutcome::QuorumReached {
                new_owner: election.candidate.clone(),
            }
        } else {
            ElectionOutcome::QuorumFailed {
                votes,
                beneficiaries: beneficiary_count,
            }
        };
        self.finalized = true;
        Ok(outcome)
    }
}
