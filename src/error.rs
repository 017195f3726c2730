use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Unauthorized: caller is not {0}")]
    Unauthorized(&'static str),
    #[error("No beneficiary record for {0}")]
    NotFound(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Daily limit exceeded")]
    DailyLimitExceeded,
    #[error("Allocated balance exhausted")]
    AllowanceExceeded,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("An election is already in progress")]
    ElectionAlreadyInProgress,
    #[error("No active election")]
    NoActiveElection,
    #[error("Caller already voted in this election")]
    AlreadyVoted,
    #[error("Voting period has not elapsed")]
    VotingPeriodNotElapsed,
    #[error("Settlement failed: {0}")]
    SettlementFailed(String),
    #[error("State error: {0}")]
    StateError(String),
}
