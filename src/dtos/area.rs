//! Area DTOs - Data Transfer Objects for area codes

use crate::entities::{Area, RegiaoBrasil};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref SIGLA_ESTADO_REGEX: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();
}

#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NovaAreaRequest {
    #[validate(range(min = 11, max = 99, message = "O código de área deve estar entre 11 e 99"))]
    pub codigo: i32,

    pub regiao: RegiaoBrasil,

    #[validate(regex(path = *SIGLA_ESTADO_REGEX, message = "A sigla do estado deve ter duas letras maiúsculas"))]
    pub sigla_estado: String,

    #[serde(default)]
    pub cidades: Vec<String>,

    #[validate(length(max = 500, message = "A descrição deve ter no máximo 500 caracteres"))]
    pub descricao: Option<String>,
}

/// Partial update, only `Some(_)` fields are applied
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarAreaRequest {
    #[validate(range(min = 11, max = 99, message = "O código de área deve estar entre 11 e 99"))]
    pub codigo: Option<i32>,

    pub regiao: Option<RegiaoBrasil>,

    #[validate(regex(path = *SIGLA_ESTADO_REGEX, message = "A sigla do estado deve ter duas letras maiúsculas"))]
    pub sigla_estado: Option<String>,

    pub cidades: Option<Vec<String>>,

    #[validate(length(max = 500, message = "A descrição deve ter no máximo 500 caracteres"))]
    pub descricao: Option<String>,
}

impl AtualizarAreaRequest {
    pub fn is_empty(&self) -> bool {
        self.codigo.is_none()
            && self.regiao.is_none()
            && self.sigla_estado.is_none()
            && self.cidades.is_none()
            && self.descricao.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AreaResponse {
    pub id: i32,
    pub codigo: i32,
    pub regiao: RegiaoBrasil,
    pub sigla_estado: String,
    pub cidades: Vec<String>,
    pub descricao: Option<String>,
}

impl From<Area> for AreaResponse {
    fn from(value: Area) -> Self {
        let cidades = value.lista_cidades();
        Self {
            id: value.id,
            codigo: value.codigo,
            regiao: value.regiao,
            sigla_estado: value.sigla_estado,
            cidades,
            descricao: value.descricao,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListarAreaResponse {
    pub areas: Vec<AreaResponse>,
    pub total_resultados: i64,
}
