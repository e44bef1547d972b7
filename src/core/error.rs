use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{error, warn};

/// Localized messages shared by handlers and middleware
pub mod messages {
    pub const NAO_AUTORIZADO: &str = "Você não tem autorização para acessar este recurso.";
    pub const SEM_PERMISSAO: &str = "Você não tem permissão para acessar este recurso.";
    pub const LOGIN_INDISPONIVEL: &str = "Login indisponível.";
    pub const DADOS_INCORRETOS: &str = "Login e/ou senha incorretos.";
    pub const USUARIO_NAO_ENCONTRADO: &str = "Usuário não encontrado.";
    pub const CONTATO_NAO_ENCONTRADO: &str = "Contato não encontrado.";
    pub const AREA_NAO_ENCONTRADA: &str = "Área não encontrada.";
    pub const CODIGO_AREA_INVALIDO: &str = "Código de área inválido.";
    pub const CODIGO_AREA_DUPLICADO: &str = "Código de área já cadastrado.";
    pub const DADOS_INVALIDOS: &str = "Dados inválidos.";
    pub const CORPO_INVALIDO: &str = "Corpo da requisição inválido.";
    pub const PARAMETRO_INVALIDO: &str = "Parâmetro da requisição inválido.";
    pub const METODO_NAO_PERMITIDO: &str = "Método não permitido.";
    pub const REGISTRO_DUPLICADO: &str = "Registro duplicado.";
    pub const REFERENCIA_INVALIDA: &str = "Referência inválida.";
    pub const RECURSO_NAO_ENCONTRADO: &str = "Recurso não encontrado.";
    pub const BANCO_INDISPONIVEL: &str = "Banco de dados indisponível.";
    pub const ERRO_INESPERADO: &str = "Ocorreu um erro inesperado.";
}

/// Error body, same envelope as successful responses with `data` always null
#[derive(Serialize)]
struct ErrorResponse {
    status: u16,
    data: Option<()>,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found(messages::RECURSO_NAO_ENCONTRADO),

            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::conflict(messages::REGISTRO_DUPLICADO)
            }

            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Self::bad_request(messages::REFERENCIA_INVALIDA)
            }

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::service_unavailable(messages::BANCO_INDISPONIVEL)
            }

            other => Self::internal_server_error(messages::ERRO_INESPERADO)
                .with_details(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request(messages::DADOS_INVALIDOS).with_details(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), messages::CORPO_INVALIDO).with_details(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), messages::PARAMETRO_INVALIDO)
            .with_details(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), messages::PARAMETRO_INVALIDO)
            .with_details(rejection.body_text())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal_server_error(messages::ERRO_INESPERADO).with_details(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::internal_server_error(messages::ERRO_INESPERADO).with_details(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                details = ?self.details,
                "{}",
                self.message
            );
        } else {
            warn!(status = self.status.as_u16(), "{}", self.message);
        }

        // internal details never leave the server
        let details = if self.status.is_server_error() {
            None
        } else {
            self.details
        };

        let body = Json(ErrorResponse {
            status: self.status.as_u16(),
            data: None,
            message: self.message,
            details,
        });
        (self.status, body).into_response()
    }
}
