//! Auth services - Registration, login and resolution of the current user

use crate::core::crypto::{hash_password, verify_password, verify_unknown_user};
use crate::core::error::messages;
use crate::core::{AppError, AppState, ApiResponse, Claims, ValidatedJson, encode_jwt};
use crate::dtos::{LoginRequest, LoginResponse, RegistrarRequest, UsuarioResponse};
use crate::entities::Usuario;
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Creates a user with a hashed password.
/// Fails with 409 when the login is already taken.
#[instrument(skip(state, request), fields(login = %request.login))]
pub async fn registrar(state: &AppState, request: RegistrarRequest) -> Result<Usuario, AppError> {
    debug!("Registering new user");
    if state.usuario.find_by_login(&request.login).await?.is_some() {
        warn!("Login already in use");
        return Err(AppError::conflict(messages::LOGIN_INDISPONIVEL));
    }

    let senha = hash_password(&request.senha)?;
    let novo_usuario = RegistrarRequest {
        login: request.login,
        senha,
    };

    // a concurrent registration can still win the race, the unique key catches it
    state.usuario.create(&novo_usuario).await.map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::conflict(messages::LOGIN_INDISPONIVEL)
        }
        other => AppError::from(other),
    })
}

/// Checks the credentials and issues a signed token.
/// Unknown login and wrong password fail with the same 401.
#[instrument(skip(state, request), fields(login = %request.login))]
pub async fn logar(state: &AppState, request: &LoginRequest) -> Result<String, AppError> {
    debug!("Logging in");
    // an unknown login still pays for one bcrypt verification
    let usuario = match state.usuario.find_by_login(&request.login).await? {
        Some(usuario) => Some(usuario).filter(|u| verify_password(&request.senha, &u.senha)),
        None => {
            verify_unknown_user(&request.senha);
            None
        }
    }
    .ok_or_else(|| {
        warn!("Incorrect credentials");
        AppError::unauthorized(messages::DADOS_INCORRETOS)
    })?;

    let token = encode_jwt(
        usuario.login,
        usuario.id,
        &state.jwt_secret,
        state.jwt_expiration_hours,
    )?;
    info!("User logged in");
    Ok(token)
}

/// Resolves the user the claims belong to, `None` when there are no claims
#[instrument(skip(state, claims))]
pub async fn usuario_logado(
    state: &AppState,
    claims: Option<&Claims>,
) -> Result<Option<Usuario>, AppError> {
    let Some(claims) = claims else {
        return Ok(None);
    };

    let usuario = state.usuario.read(&claims.id).await?.ok_or_else(|| {
        error!(usuario_id = claims.id, "Token refers to a missing user");
        AppError::internal_server_error(messages::USUARIO_NAO_ENCONTRADO)
    })?;

    if usuario.removed {
        warn!(usuario_id = usuario.id, "Token refers to a removed user");
        return Err(AppError::forbidden(messages::SEM_PERMISSAO));
    }

    Ok(Some(usuario))
}

#[debug_handler]
pub async fn login_usuario(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = logar(&state, &body).await?;

    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
        AppError::internal_server_error(messages::ERRO_INESPERADO).with_details(e.to_string())
    })?;
    headers.insert(header::AUTHORIZATION, bearer);

    Ok((headers, ApiResponse::ok(LoginResponse { token })))
}

#[debug_handler]
pub async fn registrar_usuario(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RegistrarRequest>,
) -> Result<ApiResponse<UsuarioResponse>, AppError> {
    let usuario = registrar(&state, body).await?;
    Ok(ApiResponse::ok(UsuarioResponse::from(usuario)))
}

pub async fn usuario_atual(
    Extension(usuario): Extension<Usuario>,
) -> Result<ApiResponse<UsuarioResponse>, AppError> {
    Ok(ApiResponse::ok(UsuarioResponse::from(usuario)))
}
