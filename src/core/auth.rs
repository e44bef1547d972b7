use crate::core::error::messages;
use crate::core::{AppError, AppState};
use crate::services::auth::usuario_logado;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// Claims carried by the JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i32,
    pub login: String,
}

#[instrument(skip(secret), fields(login = %login, id = %id))]
pub fn encode_jwt(
    login: String,
    id: i32,
    secret: &str,
    expiration_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire = Duration::hours(expiration_hours);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims { iat, exp, login, id };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .inspect(|_| info!("JWT token encoded successfully"))
    .inspect_err(|e| error!("Failed to encode JWT token: {:?}", e))
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(
    jwt_token: &str,
    secret: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    debug!("Decoding JWT token");
    // exp is mandatory and checked by the default validation (HS256)
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .inspect(|data| debug!("JWT token decoded for user id {}", data.claims.id))
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Resolves the current user from the bearer token and stores it in the request extensions.
/// Handlers behind this middleware read it with `Extension<Usuario>`.
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AppError::unauthorized(messages::NAO_AUTORIZADO)
        })?
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| {
            warn!("Invalid authorization header format");
            AppError::unauthorized(messages::NAO_AUTORIZADO)
        })?;

    let token_data = decode_jwt(token, &state.jwt_secret).map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        AppError::unauthorized(messages::NAO_AUTORIZADO)
    })?;

    let current_user = usuario_logado(&state, Some(&token_data.claims))
        .await?
        .ok_or_else(|| AppError::unauthorized(messages::NAO_AUTORIZADO))?;

    info!("User authenticated: {}", current_user.login);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}
