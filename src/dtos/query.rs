//! Query DTOs - Query string parameters

use serde::{Deserialize, Serialize};

/// Query parameters of `GET /api/contatos?codigoArea=11`
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListarContatosQuery {
    #[serde(default)]
    pub codigo_area: Option<i32>,
}

impl ListarContatosQuery {
    /// Key used to cache the listing for this filter
    pub fn cache_key(&self) -> String {
        match self.codigo_area {
            Some(codigo) => format!("contatos:area={}", codigo),
            None => "contatos:all".to_string(),
        }
    }
}
