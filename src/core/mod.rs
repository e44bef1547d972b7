//! Core Module - Infrastructure shared by the whole application
//!
//! - Authentication and JWT
//! - Password hashing
//! - Configuration
//! - Errors and the response envelope
//! - Response cache
//! - Application state

pub mod auth;
pub mod cache;
pub mod config;
pub mod crypto;
pub mod error;
pub mod extract;
pub mod response;
pub mod state;

pub use auth::{Claims, authentication_middleware, decode_jwt, encode_jwt};
pub use cache::ResponseCache;
pub use config::Config;
pub use error::AppError;
pub use extract::{ValidatedJson, ValidatedPath, ValidatedQuery};
pub use response::ApiResponse;
pub use state::AppState;
