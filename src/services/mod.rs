//! Services module - HTTP handlers and the business rules behind them
//!
//! Each sub-module covers one resource. Handlers are thin: they extract the request,
//! call the service function of the same module and wrap the result in `ApiResponse`.

pub mod area;
pub mod auth;
pub mod contato;

// Re-exports for easier imports
pub use area::{atualizar_area, cadastrar_area, excluir_area, listar_areas, obter_area};
pub use auth::{login_usuario, registrar_usuario, usuario_atual};
pub use contato::{
    atualizar_contato, cadastrar_contato, excluir_contato, listar_contatos, obter_contato,
};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
