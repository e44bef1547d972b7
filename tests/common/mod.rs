#![allow(dead_code)]

use axum::http::{HeaderName, header};
use axum_test::TestServer;
use contatos_regionais::AppState;
use contatos_regionais::auth::encode_jwt;
use contatos_regionais::dtos::RegistrarRequest;
use contatos_regionais::entities::Usuario;
use contatos_regionais::services::auth::registrar;
use sqlx::MySqlPool;
use std::sync::Arc;

pub const JWT_SECRET: &str = "segredo-dos-testes-de-integracao";

/// Creates an AppState for the tests, reads and writes share the same pool
///
/// # Arguments
/// * `pool` - MySQL connection pool
pub fn create_test_state(pool: MySqlPool) -> Arc<AppState> {
    Arc::new(AppState::new(pool.clone(), pool, JWT_SECRET.to_string()))
}

/// Creates a TestServer for the tests
///
/// # Arguments
/// * `state` - AppState used by the server
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = contatos_regionais::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Generates a JWT token valid for 24 hours
pub fn create_test_jwt(id: i32, login: &str) -> String {
    encode_jwt(login.to_string(), id, JWT_SECRET, 24).expect("Failed to create JWT token")
}

/// Header name and value for `Authorization: Bearer <token>`
pub fn bearer(token: &str) -> (HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers a user through the auth service, password is hashed like a real registration
pub async fn seed_usuario(state: &AppState, login: &str, senha: &str) -> Usuario {
    registrar(
        state,
        RegistrarRequest {
            login: login.to_string(),
            senha: senha.to_string(),
        },
    )
    .await
    .expect("Failed to seed user")
}

/// Server plus a token for the seeded user `teste`
pub async fn authenticated_server(pool: MySqlPool) -> (TestServer, String) {
    let state = create_test_state(pool);
    let usuario = seed_usuario(&state, "teste", "teste").await;
    let token = create_test_jwt(usuario.id, &usuario.login);
    (create_test_server(state), token)
}
