// RPC client for making JSON-RPC requests against a wallet node
use reqwest::Client;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct RpcClient {
    url: String,
    client: Client,
    request_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: Client::new(),
            request_id: AtomicU64::new(1),
        }
    }

    /// Send one JSON-RPC call and return its `result` value.
    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("RPC request failed: {}", e))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        if let Some(error) = body.get("error") {
            return Err(error["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string());
        }

        Ok(body.get("result").cloned().unwrap_or(serde_json::Value::Null))
    }

    pub async fn deposit(&self, caller: &str, amount: u64) -> Result<u64, String> {
        let result = self
            .call("deposit", json!({ "caller": caller, "amount": amount }))
            .await?;
        Ok(result["balance"].as_u64().unwrap_or(0))
    }

    pub async fn withdraw(&self, caller: &str, amount: u64) -> Result<serde_json::Value, String> {
        self.call("withdraw", json!({ "caller": caller, "amount": amount }))
            .await
    }

    pub async fn transfer_to(
        &self,
        caller: &str,
        to: &str,
        amount: u64,
    ) -> Result<serde_json::Value, String> {
        self.call(
            "transferTo",
            json!({ "caller": caller, "to": to, "amount": amount }),
        )
        .await
    }

    pub async fn add_beneficiary(
        &self,
        caller: &str,
        address: &str,
        allocated_balance: u64,
        daily_limit: u64,
    ) -> Result<(), String> {
        self.call(
            "addBeneficiary",
            json!({
                "caller": caller,
                "address": address,
                "allocated_balance": allocated_balance,
                "daily_limit": daily_limit,
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn get_beneficiary_data(&self, address: &str) -> Result<serde_json::Value, String> {
        self.call("getBeneficiaryData", json!({ "address": address }))
            .await
    }

    pub async fn get_wallet_balance(&self) -> Result<(u64, u64), String> {
        let result = self.call("getWalletBalance", serde_json::Value::Null).await?;
        Ok((
            result["balance"].as_u64().unwrap_or(0),
            result["custody"].as_u64().unwrap_or(0),
        ))
    }

    pub async fn start_election(&self, caller: &str, candidate: &str) -> Result<(), String> {
        self.call(
            "startElection",
            json!({ "caller": caller, "candidate": candidate }),
        )
        .await?;
        Ok(())
    }

    pub async fn vote(&self, caller: &str) -> Result<(), String> {
        self.call("vote", json!({ "caller": caller })).await?;
        Ok(())
    }

    pub async fn finalize_election(&self, caller: &str) -> Result<serde_json::Value, String> {
        self.call("finalizeElection", json!({ "caller": caller }))
            .await
    }

    pub async fn get_election_stage(&self) -> Result<String, String> {
        let result = self.call("getElectionStage", serde_json::Value::Null).await?;
        Ok(result["stage"].as_str().unwrap_or("Unknown").to_string())
    }

    pub async fn get_owner(&self) -> Result<String, String> {
        let result = self.call("getOwner", serde_json::Value::Null).await?;
        Ok(result["owner"].as_str().unwrap_or_default().to_string())
    }

    pub async fn get_guardian(&self) -> Result<String, String> {
        let result = self.call("getGuardian", serde_json::Value::Null).await?;
        Ok(result["guardian"].as_str().unwrap_or_default().to_string())
    }
}
