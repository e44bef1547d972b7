//! Contato DTOs - Data Transfer Objects for contacts

use super::area::AreaResponse;
use crate::entities::Contato;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CadastrarContatoRequest {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres"))]
    pub nome: String,

    #[validate(range(min = 10_000_000, max = 999_999_999, message = "O telefone deve ter 8 ou 9 dígitos"))]
    pub telefone: i32,

    #[validate(email(message = "E-mail inválido"))]
    pub email: String,

    #[validate(range(min = 11, max = 99, message = "O código de área deve estar entre 11 e 99"))]
    pub codigo_area: i32,
}

/// Partial update, only `Some(_)` fields are applied
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarContatoRequest {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres"))]
    pub nome: Option<String>,

    #[validate(range(min = 10_000_000, max = 999_999_999, message = "O telefone deve ter 8 ou 9 dígitos"))]
    pub telefone: Option<i32>,

    #[validate(email(message = "E-mail inválido"))]
    pub email: Option<String>,

    #[validate(range(min = 11, max = 99, message = "O código de área deve estar entre 11 e 99"))]
    pub codigo_area: Option<i32>,
}

impl AtualizarContatoRequest {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.telefone.is_none()
            && self.email.is_none()
            && self.codigo_area.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContatoResponse {
    pub id: i32,
    pub nome: String,
    pub telefone: i32,
    pub email: String,
    pub codigo_area: i32,
    pub area: AreaResponse,
}

impl From<Contato> for ContatoResponse {
    fn from(value: Contato) -> Self {
        Self {
            id: value.id,
            nome: value.nome,
            telefone: value.telefone,
            email: value.email,
            codigo_area: value.codigo_area,
            area: AreaResponse::from(value.area),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListarContatoResponse {
    pub contatos: Vec<ContatoResponse>,
    pub total_resultados: i64,
}
