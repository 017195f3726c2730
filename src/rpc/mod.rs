pub mod handlers;
pub mod types;

use axum::{routing::post, Router};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::wallet::SharedWallet;

/// Shared server state. The single mutex is the serialization discipline for
/// the core: every mutating call runs to completion under it, so no call
/// ever observes a partially-applied effect of another.
#[derive(Clone)]
pub struct RpcState {
    pub wallet: Arc<Mutex<SharedWallet>>,
    /// Snapshot file written after each successful mutation, if configured.
    pub state_path: Option<String>,
}

pub struct RpcServer {
    state: RpcState,
    bind_addr: String,
}

impl RpcServer {
    pub fn new(wallet: Arc<Mutex<SharedWallet>>, state_path: Option<String>, port: u16) -> Self {
        Self {
            state: RpcState { wallet, state_path },
            bind_addr: format!("0.0.0.0:{}", port),
        }
    }

    pub async fn start(self) -> std::io::Result<()> {
        let app = Router::new()
            .route("/", post(handlers::handle_rpc_request))
            .layer(CorsLayer::permissive())
            .with_state(self.state);

        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        info!("RPC server listening on {}", self.bind_addr);
        axum::serve(listener, app).await
    }
}
