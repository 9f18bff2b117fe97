use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DivisionCount {
    pub division: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PositionCount {
    pub position: String,
    pub count: i64,
}

/// Dashboard aggregates. Per-division/position counts include active users only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Statistics {
    pub total_users: i64,
    pub active_users: i64,
    pub total_divisions: i64,
    pub total_positions: i64,
    pub users_per_division: Vec<DivisionCount>,
    pub users_per_position: Vec<PositionCount>,
    pub new_users_this_month: i64,
}
