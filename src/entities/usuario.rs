//! Usuario entity - Registered user, `senha` always holds a bcrypt hash

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Usuario {
    pub id: i32,
    pub login: String,
    pub senha: String,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub removed: bool,
}
