//! Auth DTOs - Login and registration payloads

use crate::entities::Usuario;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "O login é obrigatório"))]
    pub login: String,
    #[validate(length(min = 1, message = "A senha é obrigatória"))]
    pub senha: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, Debug, Clone, Validate)]
pub struct RegistrarRequest {
    #[validate(length(min = 3, max = 50, message = "O login deve ter entre 3 e 50 caracteres"))]
    pub login: String,
    #[validate(length(min = 4, max = 100, message = "A senha deve ter entre 4 e 100 caracteres"))]
    pub senha: String,
}

/// Public view of a user, the password hash is never exposed
#[derive(Serialize, Deserialize, Debug)]
pub struct UsuarioResponse {
    pub id: i32,
    pub login: String,
}

impl From<Usuario> for UsuarioResponse {
    fn from(value: Usuario) -> Self {
        Self {
            id: value.id,
            login: value.login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_registrar_request_validation() {
        let ok = RegistrarRequest {
            login: "teste".to_string(),
            senha: "teste".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_login = RegistrarRequest {
            login: "ab".to_string(),
            senha: "teste".to_string(),
        };
        let errors = short_login.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("login"));

        let short_senha = RegistrarRequest {
            login: "teste".to_string(),
            senha: "123".to_string(),
        };
        let errors = short_senha.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("senha"));
    }

    #[test]
    fn test_login_request_requires_both_fields() {
        let empty = LoginRequest {
            login: String::new(),
            senha: String::new(),
        };
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("login"));
        assert!(errors.field_errors().contains_key("senha"));
    }

    #[test]
    fn test_usuario_response_hides_password() {
        let usuario = Usuario {
            id: 7,
            login: "teste".to_string(),
            senha: "$2b$12$hash".to_string(),
            created: Utc::now(),
            updated: None,
            removed: false,
        };
        let value = serde_json::to_value(UsuarioResponse::from(usuario)).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 7, "login": "teste" }));
    }
}
