//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the API representation (camelCase JSON) from the entities persisted in the database.

pub mod area;
pub mod auth;
pub mod contato;
pub mod query;

pub use area::{AreaResponse, AtualizarAreaRequest, ListarAreaResponse, NovaAreaRequest};
pub use auth::{LoginRequest, LoginResponse, RegistrarRequest, UsuarioResponse};
pub use contato::{
    AtualizarContatoRequest, CadastrarContatoRequest, ContatoResponse, ListarContatoResponse,
};
pub use query::ListarContatosQuery;
