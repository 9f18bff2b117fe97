use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Role {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "admin")]
    pub name: String,
    /// Seniority; higher sorts first.
    #[schema(example = 100)]
    pub level: i32,
    pub is_active: bool,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoleRequest {
    #[schema(example = "manager")]
    pub name: String,
    #[schema(example = 50)]
    pub level: i32,
}
