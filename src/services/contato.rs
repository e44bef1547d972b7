//! Contato services - CRUD for contacts, each one bound to an existing area code

use crate::core::error::messages;
use crate::core::{
    AppError, AppState, ApiResponse, ValidatedJson, ValidatedPath, ValidatedQuery,
};
use crate::dtos::{
    AtualizarContatoRequest, CadastrarContatoRequest, ContatoResponse, ListarContatoResponse,
    ListarContatosQuery,
};
use crate::entities::Contato;
use crate::repositories::{Create, Delete, Read, Update};
use axum::extract::State;
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

fn map_contato_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::bad_request(messages::CODIGO_AREA_INVALIDO)
        }
        sqlx::Error::RowNotFound => AppError::not_found(messages::CONTATO_NAO_ENCONTRADO),
        other => AppError::from(other),
    }
}

/// The area code must belong to a registered area
async fn validar_codigo_area(state: &AppState, codigo_area: i32) -> Result<(), AppError> {
    match state.area.find_by_codigo(codigo_area).await? {
        Some(_) => Ok(()),
        None => {
            warn!(codigo_area, "Unknown area code");
            Err(AppError::bad_request(messages::CODIGO_AREA_INVALIDO))
        }
    }
}

#[instrument(skip(state))]
pub async fn listar(
    state: &AppState,
    query: &ListarContatosQuery,
) -> Result<ListarContatoResponse, AppError> {
    let codigo_area = query.codigo_area;
    state
        .cache
        .get_or_try_insert(&query.cache_key(), move || async move {
            let contatos = state.contato.find_all(codigo_area).await?;
            debug!("Loaded {} contacts from the database", contatos.len());
            // the total always matches the listed rows
            Ok::<_, AppError>(ListarContatoResponse {
                total_resultados: contatos.len() as i64,
                contatos: contatos.into_iter().map(ContatoResponse::from).collect(),
            })
        })
        .await
}

#[instrument(skip(state))]
pub async fn obter(state: &AppState, id: i32) -> Result<Contato, AppError> {
    state.contato.read(&id).await?.ok_or_else(|| {
        warn!("Contact not found");
        AppError::not_found(messages::CONTATO_NAO_ENCONTRADO)
    })
}

#[instrument(skip(state, request), fields(codigo_area = %request.codigo_area))]
pub async fn cadastrar(
    state: &AppState,
    request: &CadastrarContatoRequest,
) -> Result<Contato, AppError> {
    validar_codigo_area(state, request.codigo_area).await?;

    let contato = state
        .contato
        .create(request)
        .await
        .map_err(map_contato_error)?;
    state.cache.invalidate_prefix("contatos:");
    info!(contato_id = contato.id, "Contact registered");
    Ok(contato)
}

/// Partial update, fields left out of the request keep their value
#[instrument(skip(state, request))]
pub async fn atualizar(
    state: &AppState,
    id: i32,
    request: &AtualizarContatoRequest,
) -> Result<Contato, AppError> {
    obter(state, id).await?;
    if let Some(codigo_area) = request.codigo_area {
        validar_codigo_area(state, codigo_area).await?;
    }

    let contato = state
        .contato
        .update(&id, request)
        .await
        .map_err(map_contato_error)?;
    state.cache.invalidate_prefix("contatos:");
    info!("Contact updated");
    Ok(contato)
}

/// Soft delete, the row stays flagged as removed
#[instrument(skip(state))]
pub async fn excluir(state: &AppState, id: i32) -> Result<(), AppError> {
    if !state.contato.delete(&id).await? {
        warn!("Contact not found");
        return Err(AppError::not_found(messages::CONTATO_NAO_ENCONTRADO));
    }
    state.cache.invalidate_prefix("contatos:");
    info!("Contact deleted");
    Ok(())
}

#[debug_handler]
pub async fn listar_contatos(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ListarContatosQuery>,
) -> Result<ApiResponse<ListarContatoResponse>, AppError> {
    Ok(ApiResponse::ok(listar(&state, &query).await?))
}

pub async fn obter_contato(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<ContatoResponse>, AppError> {
    let contato = obter(&state, id).await?;
    Ok(ApiResponse::ok(ContatoResponse::from(contato)))
}

#[debug_handler]
pub async fn cadastrar_contato(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CadastrarContatoRequest>,
) -> Result<ApiResponse<ContatoResponse>, AppError> {
    let contato = cadastrar(&state, &body).await?;
    Ok(ApiResponse::ok(ContatoResponse::from(contato)).with_message("Contato cadastrado."))
}

pub async fn atualizar_contato(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(body): ValidatedJson<AtualizarContatoRequest>,
) -> Result<ApiResponse<ContatoResponse>, AppError> {
    let contato = atualizar(&state, id, &body).await?;
    Ok(ApiResponse::ok(ContatoResponse::from(contato)).with_message("Contato atualizado."))
}

pub async fn excluir_contato(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<ApiResponse<()>, AppError> {
    excluir(&state, id).await?;
    Ok(ApiResponse::empty("Contato excluído."))
}
