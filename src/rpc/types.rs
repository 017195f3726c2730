// RPC types for JSON-RPC 2.0 protocol
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

#[derive(Serialize, Debug)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

// Method-specific parameter types. Every mutating call carries the caller
// identity attached by the call-submission layer.
#[derive(Deserialize, Debug)]
pub struct DepositParams {
    pub caller: String,
    pub amount: u64,
}

#[derive(Deserialize, Debug)]
pub struct WithdrawParams {
    pub caller: String,
    pub amount: u64,
}

#[derive(Deserialize, Debug)]
pub struct TransferToParams {
    pub caller: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Deserialize, Debug)]
pub struct AddBeneficiaryParams {
    pub caller: String,
    pub address: String,
    pub allocated_balance: u64,
    pub daily_limit: u64,
}

#[derive(Deserialize, Debug)]
pub struct GetBeneficiaryDataParams {
    pub address: String,
}

#[derive(Deserialize, Debug)]
pub struct StartElectionParams {
    pub caller: String,
    pub candidate: String,
}

#[derive(Deserialize, Debug)]
pub struct VoteParams {
    pub caller: String,
}

#[derive(Deserialize, Debug)]
pub struct FinalizeElectionParams {
    pub caller: String,
}
