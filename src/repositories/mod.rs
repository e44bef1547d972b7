//! Repositories module - Database access for every entity
//!
//! Each repository owns two pools: a `reader` for queries and a `writer` for mutations.
//! In a single-database deployment both point to the same server.
//!
//! Queries are checked at runtime (`sqlx::query_as` + `FromRow`) so the crate builds
//! without a live database; dynamic statements use `sqlx::QueryBuilder`.

pub mod area;
pub mod contato;
pub mod traits;
pub mod usuario;

pub use traits::{Create, Delete, Read, Update};

pub use area::AreaRepository;
pub use contato::ContatoRepository;
pub use usuario::UsuarioRepository;
