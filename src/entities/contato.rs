//! Contato entity - Contact, always loaded together with its Area

use super::area::Area;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, mysql::MySqlRow};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Contato {
    pub id: i32,
    pub nome: String,
    pub telefone: i32,
    pub email: String,
    pub codigo_area: i32,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub removed: bool,
    pub area: Area,
}

// Rows come from `Contatos JOIN Areas`, area columns are prefixed with `area_`
impl<'r> FromRow<'r, MySqlRow> for Contato {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let area = Area {
            id: row.try_get("area_id")?,
            codigo: row.try_get("area_codigo")?,
            regiao: row.try_get("area_regiao")?,
            sigla_estado: row.try_get("area_sigla_estado")?,
            cidades: row.try_get("area_cidades")?,
            descricao: row.try_get("area_descricao")?,
            created: row.try_get("area_created")?,
            updated: row.try_get("area_updated")?,
            removed: row.try_get("area_removed")?,
        };

        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            telefone: row.try_get("telefone")?,
            email: row.try_get("email")?,
            codigo_area: row.try_get("codigo_area")?,
            created: row.try_get("created")?,
            updated: row.try_get("updated")?,
            removed: row.try_get("removed")?,
            area,
        })
    }
}
