pub mod wallet;
pub mod error;
pub mod config;
pub mod storage;
pub mod rpc;
pub mod client;
pub mod cli;
