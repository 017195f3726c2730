use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shared_wallet::cli::{ops, Cli, Commands};
use shared_wallet::config::WalletConfig;
use shared_wallet::rpc::RpcServer;
use shared_wallet::storage;
use shared_wallet::wallet::SharedWallet;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            owner,
            guardian,
            funding,
        } => {
            run_node(config, owner, guardian, funding).await;
        }
        Commands::Deposit { caller, amount } => {
            ops::handle_deposit(cli.node_url, caller, amount).await;
        }
        Commands::Withdraw { caller, amount } => {
            ops::handle_withdraw(cli.node_url, caller, amount).await;
        }
        Commands::Transfer { caller, to, amount } => {
            ops::handle_transfer(cli.node_url, caller, to, amount).await;
        }
        Commands::AddBeneficiary {
            caller,
            address,
            allocated_balance,
            daily_limit,
        } => {
            ops::handle_add_beneficiary(cli.node_url, caller, address, allocated_balance, daily_limit)
                .await;
        }
        Commands::Beneficiary { address } => {
            ops::handle_beneficiary(cli.node_url, address).await;
        }
        Commands::Balance => {
            ops::handle_balance(cli.node_url).await;
        }
        Commands::StartElection { caller, candidate } => {
            ops::handle_start_election(cli.node_url, caller, candidate).await;
        }
        Commands::Vote { caller } => {
            ops::handle_vote(cli.node_url, caller).await;
        }
        Commands::FinalizeElection { caller } => {
            ops::handle_finalize_election(cli.node_url, caller).await;
        }
        Commands::ElectionStage => {
            ops::handle_election_stage(cli.node_url).await;
        }
        Commands::Roles => {
            ops::handle_roles(cli.node_url).await;
        }
    }
}

async fn run_node(
    config_path: String,
    owner: Option<String>,
    guardian: Option<String>,
    funding: u64,
) {
    let config = WalletConfig::load_or_default(&config_path);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.node.log_level.clone())),
        )
        .init();

    let state_path = config.node.state_path.clone();
    let wallet = if storage::exists(&state_path) {
        match storage::load(&state_path) {
            Ok(w) => {
                tracing::info!("Wallet state loaded from {}", state_path);
                w
            }
            Err(e) => {
                eprintln!("Failed to load wallet state: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        let (owner, guardian) = match (owner, guardian) {
            (Some(o), Some(g)) => (o, g),
            _ => {
                eprintln!(
                    "No state at {}; --owner and --guardian are required to create a wallet",
                    state_path
                );
                std::process::exit(1);
            }
        };
        tracing::info!(
            owner = %owner,
            guardian = %guardian,
            funding,
            "Creating new wallet"
        );
        let wallet = SharedWallet::new(owner, guardian, funding);
        if let Err(e) = storage::save(&state_path, &wallet) {
            eprintln!("Failed to write initial wallet state: {}", e);
            std::process::exit(1);
        }
        wallet
    };

    let server = RpcServer::new(
        Arc::new(Mutex::new(wallet)),
        Some(state_path),
        config.node.rpc_port,
    );
    if let Err(e) = server.start().await {
        eprintln!("RPC server failed: {}", e);
        std::process::exit(1);
    }
}
