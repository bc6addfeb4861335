use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{Res, api, config, errors::CapsuleError, types::PkceToken};

pub fn router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr()).map_err(|e| {
        CapsuleError::Configuration(format!("failed to parse server address: {}", e))
    })?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CapsuleError::Configuration(format!("cannot bind {}: {}", addr, e)))?;

    axum::serve(listener, router(state))
        .await
        .map_err(|e| CapsuleError::Configuration(format!("callback server failed: {}", e)))
}
