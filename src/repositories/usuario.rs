//! UsuarioRepository - Repository for the `Usuarios` table

use super::{Create, Read};
use crate::dtos::RegistrarRequest;
use crate::entities::Usuario;
use chrono::Utc;
use sqlx::{Error, MySqlPool};
use tracing::{debug, info, instrument};

const SELECT_USUARIO: &str = r#"
    SELECT ID AS id, Login AS login, Senha AS senha,
           Created AS created, Updated AS updated, Removed AS removed
    FROM Usuarios
"#;

pub struct UsuarioRepository {
    reader: MySqlPool,
    writer: MySqlPool,
}

impl UsuarioRepository {
    pub fn new(reader: MySqlPool, writer: MySqlPool) -> Self {
        Self { reader, writer }
    }

    /// Logins are unique; removed users are never returned
    #[instrument(skip(self))]
    pub async fn find_by_login(&self, login: &str) -> Result<Option<Usuario>, Error> {
        debug!("Finding user by login");
        let query = format!("{SELECT_USUARIO} WHERE Login = ? AND Removed = 0");
        let usuario = sqlx::query_as::<_, Usuario>(&query)
            .bind(login)
            .fetch_optional(&self.reader)
            .await?;

        Ok(usuario)
    }
}

impl Create<Usuario, RegistrarRequest> for UsuarioRepository {
    /// `data.senha` must already be hashed
    #[instrument(skip(self, data), fields(login = %data.login))]
    async fn create(&self, data: &RegistrarRequest) -> Result<Usuario, Error> {
        debug!("Creating new user");
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO Usuarios (Login, Senha, Created, Removed) VALUES (?, ?, ?, 0)",
        )
        .bind(&data.login)
        .bind(&data.senha)
        .bind(now)
        .execute(&self.writer)
        .await?;

        let new_id = result.last_insert_id() as i32;
        info!("User created with id {}", new_id);

        Ok(Usuario {
            id: new_id,
            login: data.login.clone(),
            senha: data.senha.clone(),
            created: now,
            updated: None,
            removed: false,
        })
    }
}

impl Read<Usuario, i32> for UsuarioRepository {
    /// Returns removed users too, callers decide what a removed user may do
    #[instrument(skip(self), fields(usuario_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Usuario>, Error> {
        debug!("Reading user by id");
        let query = format!("{SELECT_USUARIO} WHERE ID = ?");
        let usuario = sqlx::query_as::<_, Usuario>(&query)
            .bind(id)
            .fetch_optional(&self.reader)
            .await?;

        Ok(usuario)
    }
}
