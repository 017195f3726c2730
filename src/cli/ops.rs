//! Client-side command handlers: thin RPC calls that print what the node
//! returns, never computing balances or outcomes locally.

use crate::client::RpcClient;

pub async fn handle_deposit(node_url: String, caller: String, amount: u64) {
    let client = RpcClient::new(node_url);
    match client.deposit(&caller, amount).await {
        Ok(balance) => println!("Deposited {}. Pooled balance: {}", amount, balance),
        Err(e) => eprintln!("Deposit failed: {}", e),
    }
}

pub async fn handle_withdraw(node_url: String, caller: String, amount: u64) {
    let client = RpcClient::new(node_url);
    match client.withdraw(&caller, amount).await {
        Ok(result) => println!(
            "Withdrew {}. Spent this window: {}",
            amount, result["spent"]
        ),
        Err(e) => eprintln!("Withdrawal failed: {}", e),
    }
}

pub async fn handle_transfer(node_url: String, caller: String, to: String, amount: u64) {
    let client = RpcClient::new(node_url);
    match client.transfer_to(&caller, &to, amount).await {
        Ok(result) => println!("Transferred {} to {}. Event: {}", amount, to, result["event"]),
        Err(e) => eprintln!("Transfer failed: {}", e),
    }
}

pub async fn handle_add_beneficiary(
    node_url: String,
    caller: String,
    address: String,
    allocated_balance: u64,
    daily_limit: u64,
) {
    let client = RpcClient::new(node_url);
    match client
        .add_beneficiary(&caller, &address, allocated_balance, daily_limit)
        .await
    {
        Ok(()) => println!(
            "Added beneficiary {} (allocated {}, daily limit {})",
            address, allocated_balance, daily_limit
        ),
        Err(e) => eprintln!("Add beneficiary failed: {}", e),
    }
}

pub async fn handle_beneficiary(node_url: String, address: String) {
    let client = RpcClient::new(node_url);
    match client.get_beneficiary_data(&address).await {
        Ok(record) => println!("{}", record),
        Err(e) => eprintln!("Lookup failed: {}", e),
    }
}

pub async fn handle_balance(node_url: String) {
    let client = RpcClient::new(node_url);
    match client.get_wallet_balance().await {
        Ok((balance, custody)) => {
            println!("Pooled balance: {} (custody: {})", balance, custody)
        }
        Err(e) => eprintln!("Balance check failed: {}", e),
    }
}

pub async fn handle_start_election(node_url: String, caller: String, candidate: String) {
    let client = RpcClient::new(node_url);
    match client.start_election(&caller, &candidate).await {
        Ok(()) => println!("Election started for candidate {}", candidate),
        Err(e) => eprintln!("Start election failed: {}", e),
    }
}

pub async fn handle_vote(node_url: String, caller: String) {
    let client = RpcClient::new(node_url);
    match client.vote(&caller).await {
        Ok(()) => println!("Vote recorded for {}", caller),
        Err(e) => eprintln!("Vote failed: {}", e),
    }
}

pub async fn handle_finalize_election(node_url: String, caller: String) {
    let client = RpcClient::new(node_url);
    match client.finalize_election(&caller).await {
        Ok(result) => println!(
            "Election finalized. Outcome: {} Owner: {}",
            result["outcome"], result["owner"]
        ),
        Err(e) => eprintln!("Finalize failed: {}", e),
    }
}

pub async fn handle_election_stage(node_url: String) {
    let client = RpcClient::new(node_url);
    match client.get_election_stage().await {
        Ok(stage) => println!("Election stage: {}", stage),
        Err(e) => eprintln!("Stage check failed: {}", e),
    }
}

pub async fn handle_roles(node_url: String) {
    let client = RpcClient::new(node_url);
    match (client.get_owner().await, client.get_guardian().await) {
        (Ok(owner), Ok(guardian)) => {
            println!("Owner: {}", owner);
            println!("Guardian: {}", guardian);
        }
        (Err(e), _) | (_, Err(e)) => eprintln!("Role check failed: {}", e),
    }
}
