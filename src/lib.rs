//! Server library - exposes the main modules for the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod monitoring;
pub mod repositories;
pub mod services;

// Re-exports of the main types for easier imports
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use crate::core::error::messages;
use axum::{
    Router,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use monitoring::{metrics_handler, track_metrics};

    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
        .expose_headers([header::AUTHORIZATION]);

    Router::new()
        .route("/", get(root))
        .route("/metrics", get(metrics_handler))
        .nest("/api/auth", configure_auth_routes(state.clone()))
        .nest("/api/contatos", configure_contato_routes(state.clone()))
        .nest("/api/areas", configure_area_routes(state.clone()))
        .fallback(rota_nao_encontrada)
        .method_not_allowed_fallback(metodo_nao_permitido)
        .layer(middleware::from_fn(track_metrics))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Auth routes: login and registration are public, `/me` needs a token
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/login", post(login_usuario))
        .route("/registrar", post(registrar_usuario))
        .route(
            "/me",
            get(usuario_atual).layer(middleware::from_fn_with_state(
                state,
                authentication_middleware,
            )),
        )
}

fn configure_contato_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(listar_contatos).post(cadastrar_contato))
        .route(
            "/{id}",
            get(obter_contato)
                .patch(atualizar_contato)
                .delete(excluir_contato),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_area_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(listar_areas).post(cadastrar_area))
        .route(
            "/{id}",
            get(obter_area).patch(atualizar_area).delete(excluir_area),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

async fn rota_nao_encontrada() -> AppError {
    AppError::not_found(messages::RECURSO_NAO_ENCONTRADO)
}

async fn metodo_nao_permitido() -> AppError {
    AppError::new(StatusCode::METHOD_NOT_ALLOWED, messages::METODO_NAO_PERMITIDO)
}

/// Panics inside a handler become a 500 with the usual envelope
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    AppError::internal_server_error(messages::ERRO_INESPERADO).into_response()
}
