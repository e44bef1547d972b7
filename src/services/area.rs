//! Area services - CRUD for telephone area codes

use crate::core::error::messages;
use crate::core::{AppError, AppState, ApiResponse, ValidatedJson, ValidatedPath};
use crate::dtos::{AreaResponse, AtualizarAreaRequest, ListarAreaResponse, NovaAreaRequest};
use crate::entities::Area;
use crate::repositories::{Create, Delete, Read, Update};
use axum::extract::State;
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const CACHE_KEY_AREAS: &str = "areas:all";

/// Duplicate `Codigo` surfaces as a conflict on the area code, not a generic duplicate
fn map_codigo_duplicado(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::conflict(messages::CODIGO_AREA_DUPLICADO)
        }
        sqlx::Error::RowNotFound => AppError::not_found(messages::AREA_NAO_ENCONTRADA),
        other => AppError::from(other),
    }
}

// Contacts embed their area, so area writes drop both namespaces
fn invalidar_cache(state: &AppState) {
    state.cache.invalidate_prefix("areas:");
    state.cache.invalidate_prefix("contatos:");
}

#[instrument(skip(state))]
pub async fn listar(state: &AppState) -> Result<ListarAreaResponse, AppError> {
    state
        .cache
        .get_or_try_insert(CACHE_KEY_AREAS, move || async move {
            let areas = state.area.find_all().await?;
            debug!("Loaded {} areas from the database", areas.len());
            Ok::<_, AppError>(ListarAreaResponse {
                total_resultados: areas.len() as i64,
                areas: areas.into_iter().map(AreaResponse::from).collect(),
            })
        })
        .await
}

#[instrument(skip(state))]
pub async fn obter(state: &AppState, id: i32) -> Result<Area, AppError> {
    state.area.read(&id).await?.ok_or_else(|| {
        warn!("Area not found");
        AppError::not_found(messages::AREA_NAO_ENCONTRADA)
    })
}

#[instrument(skip(state, request), fields(codigo = %request.codigo))]
pub async fn cadastrar(state: &AppState, request: &NovaAreaRequest) -> Result<Area, AppError> {
    if state.area.find_by_codigo(request.codigo).await?.is_some() {
        warn!("Area code already registered");
        return Err(AppError::conflict(messages::CODIGO_AREA_DUPLICADO));
    }

    let area = state
        .area
        .create(request)
        .await
        .map_err(map_codigo_duplicado)?;
    invalidar_cache(state);
    info!(area_id = area.id, "Area registered");
    Ok(area)
}

/// Partial update. Changing `codigo` moves the linked contacts along through the foreign key.
#[instrument(skip(state, request))]
pub async fn atualizar(
    state: &AppState,
    id: i32,
    request: &AtualizarAreaRequest,
) -> Result<Area, AppError> {
    let atual = obter(state, id).await?;

    if let Some(codigo) = request.codigo.filter(|codigo| *codigo != atual.codigo) {
        if state.area.find_by_codigo(codigo).await?.is_some() {
            warn!(codigo, "Area code already registered");
            return Err(AppError::conflict(messages::CODIGO_AREA_DUPLICADO));
        }
    }

    let area = state
        .area
        .update(&id, request)
        .await
        .map_err(map_codigo_duplicado)?;
    invalidar_cache(state);
    info!("Area updated");
    Ok(area)
}

/// Hard delete, the area's contacts are removed with it
#[instrument(skip(state))]
pub async fn excluir(state: &AppState, id: i32) -> Result<(), AppError> {
    if !state.area.delete(&id).await? {
        warn!("Area not found");
        return Err(AppError::not_found(messages::AREA_NAO_ENCONTRADA));
    }
    invalidar_cache(state);
    info!("Area deleted");
    Ok(())
}

pub async fn listar_areas(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<ListarAreaResponse>, AppError> {
    Ok(ApiResponse::ok(listar(&state).await?))
}

pub async fn obter_area(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<AreaResponse>, AppError> {
    let area = obter(&state, id).await?;
    Ok(ApiResponse::ok(AreaResponse::from(area)))
}

#[debug_handler]
pub async fn cadastrar_area(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<NovaAreaRequest>,
) -> Result<ApiResponse<AreaResponse>, AppError> {
    let area = cadastrar(&state, &body).await?;
    Ok(ApiResponse::ok(AreaResponse::from(area)).with_message("Área cadastrada."))
}

#[debug_handler]
pub async fn atualizar_area(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(body): ValidatedJson<AtualizarAreaRequest>,
) -> Result<ApiResponse<AreaResponse>, AppError> {
    let area = atualizar(&state, id, &body).await?;
    Ok(ApiResponse::ok(AreaResponse::from(area)).with_message("Área atualizada."))
}

pub async fn excluir_area(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<()>, AppError> {
    excluir(&state, id).await?;
    Ok(ApiResponse::empty("Área excluída."))
}
