use std::sync::Arc;

use axum_test::TestServer;

use roster_core::{mailer::LogMailer, store::MemoryStore};
use roster_server::{
    infra::app_state::AppState, routes, users::auth::TokenKeys,
};

/// Spin up the full router against a fresh in-memory store.
pub fn build_test_server() -> TestServer {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(LogMailer),
        TokenKeys::new("integration-test-signing-secret"),
    );
    TestServer::new(routes::create_app(state)).expect("test server starts")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
