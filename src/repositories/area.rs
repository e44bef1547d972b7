//! AreaRepository - Repository for the `Areas` table

use super::{Create, Delete, Read, Update};
use crate::dtos::{AtualizarAreaRequest, NovaAreaRequest};
use crate::entities::Area;
use chrono::Utc;
use sqlx::{Error, MySqlPool};
use tracing::{debug, info, instrument};

const SELECT_AREA: &str = r#"
    SELECT ID AS id, Codigo AS codigo, Regiao AS regiao, SiglaEstado AS sigla_estado,
           Cidades AS cidades, Descricao AS descricao,
           Created AS created, Updated AS updated, Removed AS removed
    FROM Areas
"#;

pub struct AreaRepository {
    reader: MySqlPool,
    writer: MySqlPool,
}

impl AreaRepository {
    pub fn new(reader: MySqlPool, writer: MySqlPool) -> Self {
        Self { reader, writer }
    }

    #[instrument(skip(self))]
    pub async fn find_by_codigo(&self, codigo: i32) -> Result<Option<Area>, Error> {
        debug!("Finding area by codigo");
        let query = format!("{SELECT_AREA} WHERE Codigo = ? AND Removed = 0");
        let area = sqlx::query_as::<_, Area>(&query)
            .bind(codigo)
            .fetch_optional(&self.reader)
            .await?;

        Ok(area)
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Area>, Error> {
        debug!("Listing areas");
        let query = format!("{SELECT_AREA} WHERE Removed = 0 ORDER BY Codigo");
        let areas = sqlx::query_as::<_, Area>(&query)
            .fetch_all(&self.reader)
            .await?;

        debug!("Found {} areas", areas.len());
        Ok(areas)
    }

    /// Reads through the writer pool, used right after a write
    async fn read_written(&self, id: i32) -> Result<Area, Error> {
        let query = format!("{SELECT_AREA} WHERE ID = ? AND Removed = 0");
        sqlx::query_as::<_, Area>(&query)
            .bind(id)
            .fetch_optional(&self.writer)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}

impl Create<Area, NovaAreaRequest> for AreaRepository {
    #[instrument(skip(self, data), fields(codigo = %data.codigo))]
    async fn create(&self, data: &NovaAreaRequest) -> Result<Area, Error> {
        debug!("Creating new area");
        let now = Utc::now();
        let cidades = Area::juntar_cidades(&data.cidades);

        let result = sqlx::query(
            r#"
            INSERT INTO Areas (Codigo, Regiao, SiglaEstado, Cidades, Descricao, Created, Removed)
            VALUES (?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(data.codigo)
        .bind(data.regiao)
        .bind(&data.sigla_estado)
        .bind(&cidades)
        .bind(&data.descricao)
        .bind(now)
        .execute(&self.writer)
        .await?;

        let new_id = result.last_insert_id() as i32;
        info!("Area created with id {}", new_id);

        Ok(Area {
            id: new_id,
            codigo: data.codigo,
            regiao: data.regiao,
            sigla_estado: data.sigla_estado.clone(),
            cidades,
            descricao: data.descricao.clone(),
            created: now,
            updated: None,
            removed: false,
        })
    }
}

impl Read<Area, i32> for AreaRepository {
    #[instrument(skip(self), fields(area_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Area>, Error> {
        debug!("Reading area by id");
        let query = format!("{SELECT_AREA} WHERE ID = ? AND Removed = 0");
        let area = sqlx::query_as::<_, Area>(&query)
            .bind(id)
            .fetch_optional(&self.reader)
            .await?;

        Ok(area)
    }
}

impl Update<Area, AtualizarAreaRequest, i32> for AreaRepository {
    #[instrument(skip(self, data), fields(area_id = %id))]
    async fn update(&self, id: &i32, data: &AtualizarAreaRequest) -> Result<Area, Error> {
        debug!("Updating area");
        if data.is_empty() {
            debug!("No fields to update, returning current area");
            return self.read_written(*id).await;
        }

        let mut query_builder = sqlx::QueryBuilder::new("UPDATE Areas SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(codigo) = data.codigo {
            separated.push("Codigo = ");
            separated.push_bind_unseparated(codigo);
        }
        if let Some(regiao) = data.regiao {
            separated.push("Regiao = ");
            separated.push_bind_unseparated(regiao);
        }
        if let Some(ref sigla_estado) = data.sigla_estado {
            separated.push("SiglaEstado = ");
            separated.push_bind_unseparated(sigla_estado);
        }
        if let Some(ref cidades) = data.cidades {
            separated.push("Cidades = ");
            separated.push_bind_unseparated(Area::juntar_cidades(cidades));
        }
        if let Some(ref descricao) = data.descricao {
            separated.push("Descricao = ");
            separated.push_bind_unseparated(descricao);
        }
        separated.push("Updated = ");
        separated.push_bind_unseparated(Utc::now());

        query_builder.push(" WHERE Removed = 0 AND ID = ");
        query_builder.push_bind(id);

        let result = query_builder.build().execute(&self.writer).await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        info!("Area updated successfully");
        self.read_written(*id).await
    }
}

impl Delete<i32> for AreaRepository {
    /// Physically deletes the area, the foreign key cascades to its contacts
    #[instrument(skip(self), fields(area_id = %id))]
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        debug!("Deleting area");
        let result = sqlx::query("DELETE FROM Areas WHERE ID = ? AND Removed = 0")
            .bind(id)
            .execute(&self.writer)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Area deleted successfully");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RegiaoBrasil;
    use sqlx::MySqlPool;

    fn repo(pool: MySqlPool) -> AreaRepository {
        AreaRepository::new(pool.clone(), pool)
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("areas")))]
    async fn test_find_by_codigo(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = repo(pool);

        let area = repo.find_by_codigo(31).await?.expect("area 31 is seeded");
        assert_eq!(area.id, 2);
        assert_eq!(area.sigla_estado, "MG");
        assert_eq!(area.regiao, RegiaoBrasil::Sudeste);
        assert_eq!(area.lista_cidades().len(), 4);

        assert!(repo.find_by_codigo(21).await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("areas")))]
    async fn test_find_all_orders_by_codigo(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = repo(pool);

        let areas = repo.find_all().await?;
        let codigos: Vec<i32> = areas.iter().map(|a| a.codigo).collect();
        assert_eq!(codigos, vec![11, 31]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("areas")))]
    async fn test_create_assigns_next_id(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = repo(pool);

        let area = repo
            .create(&NovaAreaRequest {
                codigo: 21,
                regiao: RegiaoBrasil::Sudeste,
                sigla_estado: "RJ".to_string(),
                cidades: vec!["Rio de Janeiro".to_string(), "Niterói".to_string()],
                descricao: Some("Capital fluminense".to_string()),
            })
            .await?;

        assert_eq!(area.id, 3);
        assert_eq!(area.cidades.as_deref(), Some("Rio de Janeiro;Niterói"));

        let read = repo.read(&3).await?.expect("created area is readable");
        assert_eq!(read.codigo, 21);
        assert_eq!(read.descricao.as_deref(), Some("Capital fluminense"));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("areas")))]
    async fn test_update_only_touches_given_fields(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = repo(pool);

        let updated = repo
            .update(
                &1,
                &AtualizarAreaRequest {
                    cidades: Some(vec!["São Paulo".to_string(), "Guarulhos".to_string()]),
                    ..Default::default()
                },
            )
            .await?;

        assert_eq!(updated.codigo, 11);
        assert_eq!(updated.sigla_estado, "SP");
        assert_eq!(updated.lista_cidades(), vec!["São Paulo", "Guarulhos"]);
        assert!(updated.updated.is_some());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("areas")))]
    async fn test_update_missing_area(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = repo(pool);

        let result = repo
            .update(
                &99,
                &AtualizarAreaRequest {
                    descricao: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("areas", "contatos")))]
    async fn test_update_codigo_cascades_to_contatos(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = repo(pool.clone());

        repo.update(
            &2,
            &AtualizarAreaRequest {
                codigo: Some(32),
                ..Default::default()
            },
        )
        .await?;

        let codigo: i32 = sqlx::query_scalar("SELECT CodigoArea FROM Contatos WHERE ID = 1")
            .fetch_one(&pool)
            .await?;
        assert_eq!(codigo, 32);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("areas", "contatos")))]
    async fn test_delete_cascades_to_contatos(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = repo(pool.clone());

        assert!(repo.delete(&2).await?);
        assert!(repo.read(&2).await?.is_none());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Contatos WHERE CodigoArea = 31")
            .fetch_one(&pool)
            .await?;
        assert_eq!(remaining, 0, "Contacts of the deleted area should be gone (CASCADE)");

        let others: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Contatos")
            .fetch_one(&pool)
            .await?;
        assert_eq!(others, 1);

        assert!(!repo.delete(&2).await?, "second delete finds nothing");
        Ok(())
    }
}
