//! Shared type definitions for the wallet core

use serde::{Deserialize, Serialize};

/// Caller / payee identity. Supplied by the call-submission layer with every
/// call; the core never derives or verifies it.
pub type Address = String;

/// Native value amount in base units.
pub type Amount = u64;

/// Unix timestamp in seconds. Time is an external input: the core treats it
/// as monotonic and authoritative and never waits for it to pass.
pub type Timestamp = u64;

/// Notification emitted on every successful `transfer_to`, consumed by the
/// external audit/UI layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EtherTransferred {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}
