use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A `users` row joined with the display names of its division, position and
/// manager. `roles` is filled by the repository from `user_roles`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub uid: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    /// argon2 PHC string
    pub password: String,
    pub phone: String,
    pub address: String,
    pub birthdate: Option<NaiveDate>,
    pub join_date: NaiveDate,
    pub profile_image: String,
    pub division_id: Option<u64>,
    pub position_id: Option<u64>,
    pub is_manager: bool,
    pub manager_id: Option<u64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,

    pub division_name: Option<String>,
    pub position_name: Option<String>,
    pub manager_name: Option<String>,
    #[sqlx(skip)]
    pub roles: Vec<String>,
}

/// Insert payload for the users table; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uid: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub birthdate: Option<NaiveDate>,
    pub join_date: NaiveDate,
    pub profile_image: String,
    pub division_id: Option<u64>,
    pub position_id: Option<u64>,
    pub is_manager: bool,
    pub manager_id: Option<u64>,
    pub is_active: bool,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "8f14e45f-ceea-467f-a0e6-6e0b9b2c1a3d")]
    pub uid: String,
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@company.com", format = "email")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub address: String,
    #[schema(example = "1990-04-12", format = "date")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[schema(example = "2024-01-01", format = "date")]
    pub join_date: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub profile_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub is_manager: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub is_active: bool,
    #[schema(example = json!(["admin"]))]
    pub roles: Vec<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            uid: user.uid.clone(),
            employee_id: user.employee_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            birthdate: user.birthdate.map(|d| d.format(DATE_FORMAT).to_string()),
            join_date: user.join_date.format(DATE_FORMAT).to_string(),
            profile_image: user.profile_image.clone(),
            division_id: user.division_id,
            division: user.division_name.clone(),
            position_id: user.position_id,
            position: user.position_name.clone(),
            is_manager: user.is_manager,
            manager_id: user.manager_id,
            manager: user.manager_name.clone(),
            is_active: user.is_active,
            roles: user.roles.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@company.com", format = "email")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[schema(example = "1990-04-12", format = "date")]
    pub birthdate: Option<String>,
    #[schema(example = "2024-01-01", format = "date")]
    pub join_date: String,
    #[serde(default)]
    pub profile_image: String,
    pub division_id: Option<u64>,
    pub position_id: Option<u64>,
    #[serde(default)]
    pub is_manager: bool,
    pub manager_id: Option<u64>,
    #[serde(default)]
    #[schema(example = json!([1]))]
    pub role_ids: Vec<u64>,
}

/// Partial update: absent fields keep their stored value.
///
/// `role_ids` absent keeps the current roles, `[]` removes all of them.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[schema(example = "1990-04-12", format = "date")]
    pub birthdate: Option<String>,
    #[schema(example = "2024-01-01", format = "date")]
    pub join_date: Option<String>,
    pub profile_image: Option<String>,
    pub division_id: Option<u64>,
    pub position_id: Option<u64>,
    pub is_manager: Option<bool>,
    pub manager_id: Option<u64>,
    pub is_active: Option<bool>,
    pub role_ids: Option<Vec<u64>>,
}

impl UpdateUserRequest {
    /// True when the update changes what the account may do: its role set or
    /// whether it can log in at all.
    pub fn touches_access(&self) -> bool {
        self.role_ids.is_some() || self.is_active.is_some()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    #[schema(example = "n3w-secret")]
    pub password: String,
}
