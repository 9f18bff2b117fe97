use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

/// Divisions and positions share one shape (unique code + name) and one
/// delete policy, so they are served by the same repository and handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum CatalogKind {
    Division,
    Position,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Division => "divisions",
            CatalogKind::Position => "positions",
        }
    }

    /// Column on `users` referencing this catalog.
    pub fn user_column(self) -> &'static str {
        match self {
            CatalogKind::Division => "division_id",
            CatalogKind::Position => "position_id",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CatalogEntry {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "FIN")]
    pub code: String,
    #[schema(example = "Finance")]
    pub name: String,
    pub is_active: bool,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CatalogRequest {
    #[schema(example = "FIN")]
    pub code: String,
    #[schema(example = "Finance")]
    pub name: String,
}
