//! API Gateway Library
//!
//! The HTTP REST surface of the user directory. It parses and validates
//! requests, calls the in-process user service, and maps typed errors
//! onto response statuses; no business logic lives here.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use user_service::{UserManager, UserStore};

use crate::routes::create_router;
use crate::state::AppState;

/// Run the HTTP server over a fresh in-memory store.
///
/// The store owns every user record for the lifetime of the process;
/// nothing survives a restart.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Create repository and service
    let user_repo = Arc::new(UserStore::new());
    let user_service = Arc::new(UserManager::new(user_repo));

    // Create app state
    let state = AppState::new(user_service);

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
