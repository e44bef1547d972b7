//! Enums - Enumerated types used by the entities

use serde::{Deserialize, Serialize};

/// Brazilian geographic regions, stored as INT in `Areas.Regiao`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum RegiaoBrasil {
    Norte = 0,
    Nordeste = 1,
    CentroOeste = 2,
    Sudeste = 3,
    Sul = 4,
}
