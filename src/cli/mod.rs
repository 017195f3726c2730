pub mod ops;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shared_wallet")]
#[command(about = "Shared custodial wallet node and client", long_about = None)]
pub struct Cli {
    /// Node URL for client commands
    #[arg(long, default_value = "http://localhost:9600", global = true)]
    pub node_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the wallet RPC node
    Serve {
        #[arg(long, default_value = "wallet_config.toml")]
        config: String,
        /// Owner identity (required when no state snapshot exists yet)
        #[arg(long)]
        owner: Option<String>,
        /// Guardian identity (required when no state snapshot exists yet)
        #[arg(long)]
        guardian: Option<String>,
        /// Initial funding for a freshly created wallet
        #[arg(long, default_value_t = 0)]
        funding: u64,
    },
    /// Deposit into the pooled treasury
    Deposit {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        amount: u64,
    },
    /// Withdraw to the calling beneficiary
    Withdraw {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        amount: u64,
    },
    /// Transfer to another address
    Transfer {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: u64,
    },
    /// Register a beneficiary (owner only)
    AddBeneficiary {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        allocated_balance: u64,
        #[arg(long)]
        daily_limit: u64,
    },
    /// Show a beneficiary's allowance record
    Beneficiary {
        address: String,
    },
    /// Show the pooled balance
    Balance,
    /// Start a succession election (guardian only)
    StartElection {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        candidate: String,
    },
    /// Vote in the running election (beneficiaries only)
    Vote {
        #[arg(long)]
        caller: String,
    },
    /// Finalize the election after the voting window (guardian only)
    FinalizeElection {
        #[arg(long)]
        caller: String,
    },
    /// Show the current election stage
    ElectionStage,
    /// Show the current owner and guardian
    Roles,
}
