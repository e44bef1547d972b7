//! Entities module - Domain entities
//!
//! Each entity mirrors one table of the database (`Usuarios`, `Areas`, `Contatos`).

pub mod area;
pub mod contato;
pub mod enums;
pub mod usuario;

// Re-exports for easier imports
pub use area::Area;
pub use contato::Contato;
pub use enums::RegiaoBrasil;
pub use usuario::Usuario;
