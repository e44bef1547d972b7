//! Area entity - Telephone area code (DDD) and the region it covers

use super::enums::RegiaoBrasil;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used to store the city list in a single column
pub const SEPARADOR_CIDADES: char = ';';

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Area {
    pub id: i32,
    pub codigo: i32,
    pub regiao: RegiaoBrasil,
    pub sigla_estado: String,
    pub cidades: Option<String>,
    pub descricao: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub removed: bool,
}

impl Area {
    /// Splits the stored city list, trimming names and dropping empty entries
    pub fn lista_cidades(&self) -> Vec<String> {
        self.cidades
            .as_deref()
            .map(|cidades| {
                cidades
                    .split(SEPARADOR_CIDADES)
                    .map(str::trim)
                    .filter(|cidade| !cidade.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Joins a city list into its stored form; an empty list is stored as NULL
    pub fn juntar_cidades(cidades: &[String]) -> Option<String> {
        let nomes: Vec<&str> = cidades
            .iter()
            .map(|cidade| cidade.trim())
            .filter(|cidade| !cidade.is_empty())
            .collect();
        if nomes.is_empty() {
            None
        } else {
            Some(nomes.join(&SEPARADOR_CIDADES.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_com_cidades(cidades: Option<&str>) -> Area {
        Area {
            id: 1,
            codigo: 31,
            regiao: RegiaoBrasil::Sudeste,
            sigla_estado: "MG".to_string(),
            cidades: cidades.map(String::from),
            descricao: None,
            created: Utc::now(),
            updated: None,
            removed: false,
        }
    }

    #[test]
    fn test_lista_cidades_splits_and_trims() {
        let area = area_com_cidades(Some("Belo Horizonte; Contagem;;Betim ;Nova Lima"));
        assert_eq!(
            area.lista_cidades(),
            vec!["Belo Horizonte", "Contagem", "Betim", "Nova Lima"]
        );
    }

    #[test]
    fn test_lista_cidades_empty_when_null() {
        assert!(area_com_cidades(None).lista_cidades().is_empty());
        assert!(area_com_cidades(Some("")).lista_cidades().is_empty());
    }

    #[test]
    fn test_juntar_cidades() {
        let cidades = vec![" Campinas".to_string(), "".to_string(), "Santos".to_string()];
        assert_eq!(Area::juntar_cidades(&cidades), Some("Campinas;Santos".to_string()));
        assert_eq!(Area::juntar_cidades(&[]), None);
    }
}
