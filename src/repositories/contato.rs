//! ContatoRepository - Repository for the `Contatos` table
//!
//! Every read joins `Areas` so a contact always comes back with its area.
//! Deletion is a soft delete: the row is flagged `Removed` and hidden from all reads.

use super::{Create, Delete, Read, Update};
use crate::dtos::{AtualizarContatoRequest, CadastrarContatoRequest};
use crate::entities::Contato;
use chrono::Utc;
use sqlx::{Error, MySql, MySqlPool, QueryBuilder};
use tracing::{debug, info, instrument};

const SELECT_CONTATO: &str = r#"
    SELECT c.ID AS id, c.Nome AS nome, c.Telefone AS telefone, c.Email AS email,
           c.CodigoArea AS codigo_area, c.Created AS created, c.Updated AS updated,
           c.Removed AS removed,
           a.ID AS area_id, a.Codigo AS area_codigo, a.Regiao AS area_regiao,
           a.SiglaEstado AS area_sigla_estado, a.Cidades AS area_cidades,
           a.Descricao AS area_descricao, a.Created AS area_created,
           a.Updated AS area_updated, a.Removed AS area_removed
    FROM Contatos c
    INNER JOIN Areas a ON a.Codigo = c.CodigoArea
    WHERE c.Removed = 0 AND a.Removed = 0
"#;

pub struct ContatoRepository {
    reader: MySqlPool,
    writer: MySqlPool,
}

impl ContatoRepository {
    pub fn new(reader: MySqlPool, writer: MySqlPool) -> Self {
        Self { reader, writer }
    }

    /// Lists visible contacts, optionally only those of one area code
    #[instrument(skip(self))]
    pub async fn find_all(&self, codigo_area: Option<i32>) -> Result<Vec<Contato>, Error> {
        debug!("Listing contacts");
        let mut query_builder: QueryBuilder<MySql> = QueryBuilder::new(SELECT_CONTATO);
        if let Some(codigo) = codigo_area {
            query_builder.push(" AND c.CodigoArea = ");
            query_builder.push_bind(codigo);
        }
        query_builder.push(" ORDER BY c.ID");

        let contatos = query_builder
            .build_query_as::<Contato>()
            .fetch_all(&self.reader)
            .await?;

        debug!("Found {} contacts", contatos.len());
        Ok(contatos)
    }

    /// Reads through the writer pool, used right after a write
    async fn read_written(&self, id: i32) -> Result<Contato, Error> {
        let query = format!("{SELECT_CONTATO} AND c.ID = ?");
        sqlx::query_as::<_, Contato>(&query)
            .bind(id)
            .fetch_optional(&self.writer)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}

impl Create<Contato, CadastrarContatoRequest> for ContatoRepository {
    #[instrument(skip(self, data), fields(codigo_area = %data.codigo_area))]
    async fn create(&self, data: &CadastrarContatoRequest) -> Result<Contato, Error> {
        debug!("Creating new contact");
        let result = sqlx::query(
            r#"
            INSERT INTO Contatos (Nome, Telefone, Email, CodigoArea, Created, Removed)
            VALUES (?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&data.nome)
        .bind(data.telefone)
        .bind(&data.email)
        .bind(data.codigo_area)
        .bind(Utc::now())
        .execute(&self.writer)
        .await?;

        let new_id = result.last_insert_id() as i32;
        info!("Contact created with id {}", new_id);

        self.read_written(new_id).await
    }
}

impl Read<Contato, i32> for ContatoRepository {
    #[instrument(skip(self), fields(contato_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Contato>, Error> {
        debug!("Reading contact by id");
        let query = format!("{SELECT_CONTATO} AND c.ID = ?");
        let contato = sqlx::query_as::<_, Contato>(&query)
            .bind(id)
            .fetch_optional(&self.reader)
            .await?;

        Ok(contato)
    }
}

impl Update<Contato, AtualizarContatoRequest, i32> for ContatoRepository {
    #[instrument(skip(self, data), fields(contato_id = %id))]
    async fn update(&self, id: &i32, data: &AtualizarContatoRequest) -> Result<Contato, Error> {
        debug!("Updating contact");
        if data.is_empty() {
            debug!("No fields to update, returning current contact");
            return self.read_written(*id).await;
        }

        let mut query_builder: QueryBuilder<MySql> = QueryBuilder::new("UPDATE Contatos SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref nome) = data.nome {
            separated.push("Nome = ");
            separated.push_bind_unseparated(nome);
        }
        if let Some(telefone) = data.telefone {
            separated.push("Telefone = ");
            separated.push_bind_unseparated(telefone);
        }
        if let Some(ref email) = data.email {
            separated.push("Email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(codigo_area) = data.codigo_area {
            separated.push("CodigoArea = ");
            separated.push_bind_unseparated(codigo_area);
        }
        separated.push("Updated = ");
        separated.push_bind_unseparated(Utc::now());

        query_builder.push(" WHERE Removed = 0 AND ID = ");
        query_builder.push_bind(id);

        let result = query_builder.build().execute(&self.writer).await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        info!("Contact updated successfully");
        self.read_written(*id).await
    }
}

impl Delete<i32> for ContatoRepository {
    #[instrument(skip(self), fields(contato_id = %id))]
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        debug!("Soft deleting contact");
        let result =
            sqlx::query("UPDATE Contatos SET Removed = 1, Updated = ? WHERE ID = ? AND Removed = 0")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.writer)
                .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Contact deleted successfully");
        }
        Ok(deleted)
    }
}
