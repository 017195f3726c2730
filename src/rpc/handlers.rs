use super::types::*;
use crate::error::WalletError;
use crate::rpc::RpcState;
use crate::storage;
use crate::wallet::SharedWallet;
use axum::{debug_handler, extract::State, Json};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

/// Main dispatcher: routes incoming JSON-RPC requests to the correct handler.
#[debug_handler]
pub async fn handle_rpc_request(
    State(state): State<RpcState>,
    Json(req): Json<RpcRequest>,
) -> Json<RpcResponse> {
    debug!("RPC Request: method={}, id={}", req.method, req.id);

    let result = match req.method.as_str() {
        "deposit" => handle_deposit(&state, req.params),
        "withdraw" => handle_withdraw(&state, req.params),
        "transferTo" => handle_transfer_to(&state, req.params),
        "addBeneficiary" => handle_add_beneficiary(&state, req.params),
        "getBeneficiaryData" => handle_get_beneficiary_data(&state, req.params),
        "getWalletBalance" => handle_get_wallet_balance(&state),
        "startElection" => handle_start_election(&state, req.params),
        "vote" => handle_vote(&state, req.params),
        "finalizeElection" => handle_finalize_election(&state, req.params),
        "getElectionStage" => handle_get_election_stage(&state),
        "getOwner" => handle_get_owner(&state),
        "getGuardian" => handle_get_guardian(&state),
        "getVersion" => handle_get_version(),
        _ => Err(RpcError {
            code: -32601,
            message: format!("Method not found: {}", req.method),
        }),
    };

    match result {
        Ok(val) => Json(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(val),
            error: None,
            id: req.id,
        }),
        Err(err) => Json(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(err),
            id: req.id,
        }),
    }
}

//
// === Helpers ===
//

/// Safely acquire a mutex lock, recovering from poison
fn safe_lock(
    mutex: &Arc<Mutex<SharedWallet>>,
) -> Result<std::sync::MutexGuard<'_, SharedWallet>, RpcError> {
    mutex.lock().map_err(|e| {
        error!("Mutex poisoned: {}", e);
        RpcError {
            code: -32603,
            message: "Internal error: mutex poisoned".to_string(),
        }
    })
}

fn parse_params<T: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<T, RpcError> {
    serde_json::from_value(params).map_err(|e| RpcError {
        code: -32602,
        message: format!("Invalid params: {}", e),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError {
        code: -32603,
        message: format!("Serialization error: {}", e),
    })
}

fn to_rpc_error(err: WalletError) -> RpcError {
    let code = match &err {
        WalletError::InvalidParameters(_) => -32602,
        WalletError::Unauthorized(_) => -32010,
        WalletError::NotFound(_) => -32011,
        WalletError::DailyLimitExceeded => -32012,
        WalletError::AllowanceExceeded => -32013,
        WalletError::InsufficientFunds => -32014,
        WalletError::ElectionAlreadyInProgress => -32015,
        WalletError::NoActiveElection => -32016,
        WalletError::AlreadyVoted => -32017,
        WalletError::VotingPeriodNotElapsed => -32018,
        WalletError::SettlementFailed(_) => -32019,
        WalletError::StateError(_) => -32603,
    };
    RpcError {
        code,
        message: err.to_string(),
    }
}

/// Current time as seen at this boundary; the core takes it as an input.
fn now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Write the snapshot after a successful mutation, if a path is configured.
/// A failed save never un-applies the mutation; it is logged and surfaced
/// on the next restart instead.
fn persist(state: &RpcState, wallet: &SharedWallet) {
    if let Some(path) = &state.state_path {
        if let Err(e) = storage::save(path, wallet) {
            warn!("Failed to persist wallet state: {}", e);
        }
    }
}

//
// === Handlers ===
//

fn handle_deposit(state: &RpcState, params: serde_json::Value) -> Result<serde_json::Value, RpcError> {
    let p: DepositParams = parse_params(params)?;
    let mut wallet = safe_lock(&state.wallet)?;
    wallet
        .deposit(&p.caller, p.amount)
        .map_err(to_rpc_error)?;
    persist(state, &wallet);
    let (balance, custody) = wallet.get_wallet_balance();
    Ok(json!({ "balance": balance, "custody": custody }))
}

fn handle_withdraw(state: &RpcState, params: serde_json::Value) -> Result<serde_json::Value, RpcError> {
    let p: WithdrawParams = parse_params(params)?;
    let mut wallet = safe_lock(&state.wallet)?;
    wallet
        .withdraw(&p.caller, p.amount, now())
        .map_err(to_rpc_error)?;
    persist(state, &wallet);
    let record = wallet.get_beneficiary_data(&p.caller).map_err(to_rpc_error)?;
    Ok(json!({ "paid": p.amount, "spent": record.spent }))
}

fn handle_transfer_to(
    state: &RpcState,
    params: serde_json::Value,
) -> Result<serde_json::Value, RpcError> {
    let p: TransferToParams = parse_params(params)?;
    let mut wallet = safe_lock(&state.wallet)?;
    wallet
        .transfer_to(&p.caller, &p.to, p.amount, now())
        .map_err(to_rpc_error)?;
    persist(state, &wallet);
    // The notification just emitted is the last entry in the audit log
    let event = wallet.events().last().cloned();
    Ok(json!({ "event": event }))
}

fn handle_add_beneficiary(
    state: &RpcState,
    params: serde_json::Value,
) -> Result<serde_json::Value, RpcError> {
    let p: AddBeneficiaryParams = parse_params(params)?;
    let mut wallet = safe_lock(&state.wallet)?;
    wallet
        .add_beneficiary(&p.caller, &p.address, p.allocated_balance, p.daily_limit, now())
        .map_err(to_rpc_error)?;
    persist(state, &wallet);
    Ok(json!({ "added": p.address }))
}

fn handle_get_beneficiary_data(
    state: &RpcState,
    params: serde_json::Value,
) -> Result<serde_json::Value, RpcError> {
    let p: GetBeneficiaryDataParams = parse_params(params)?;
    let wallet = safe_lock(&state.wallet)?;
    let record = wallet
        .get_beneficiary_data(&p.address)
        .map_err(to_rpc_error)?;
    to_json(record)
}

fn handle_get_wallet_balance(state: &RpcState) -> Result<serde_json::Value, RpcError> {
    let wallet = safe_lock(&state.wallet)?;
    let (balance, custody) = wallet.get_wallet_balance();
    Ok(json!({ "balance": balance, "custody": custody }))
}

fn handle_start_election(
    state: &RpcState,
    params: serde_json::Value,
) -> Result<serde_json::Value, RpcError> {
    let p: StartElectionParams = parse_params(params)?;
    let mut wallet = safe_lock(&state.wallet)?;
    wallet
        .start_election(&p.caller, &p.candidate, now())
        .map_err(to_rpc_error)?;
    persist(state, &wallet);
    Ok(json!({ "candidate": p.candidate, "stage": "Voting" }))
}

fn handle_vote(state: &RpcState, params: serde_json::Value) -> Result<serde_json::Value, RpcError> {
    let p: VoteParams = parse_params(params)?;
    let mut wallet = safe_lock(&state.wallet)?;
    wallet.vote(&p.caller).map_err(to_rpc_error)?;
    persist(state, &wallet);
    Ok(json!({ "voted": p.caller }))
}

fn handle_finalize_election(
    state: &RpcState,
    params: serde_json::Value,
) -> Result<serde_json::Value, RpcError> {
    let p: FinalizeElectionParams = parse_params(params)?;
    let mut wallet = safe_lock(&state.wallet)?;
    let outcome = wallet
        .finalize_election(&p.caller, now())
        .map_err(to_rpc_error)?;
    persist(state, &wallet);
    Ok(json!({ "outcome": outcome, "owner": wallet.owner() }))
}

fn handle_get_election_stage(state: &RpcState) -> Result<serde_json::Value, RpcError> {
    let wallet = safe_lock(&state.wallet)?;
    Ok(json!({
        "stage": wallet.get_election_stage(),
        "candidate": wallet.election_candidate(),
    }))
}

fn handle_get_owner(state: &RpcState) -> Result<serde_json::Value, RpcError> {
    let wallet = safe_lock(&state.wallet)?;
    Ok(json!({ "owner": wallet.owner() }))
}

fn handle_get_guardian(state: &RpcState) -> Result<serde_json::Value, RpcError> {
    let wallet = safe_lock(&state.wallet)?;
    Ok(json!({ "guardian": wallet.guardian() }))
}

fn handle_get_version() -> Result<serde_json::Value, RpcError> {
    Ok(json!({ "version": env!("CARGO_PKG_VERSION") }))
}
