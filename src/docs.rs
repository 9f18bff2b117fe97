use crate::model::{
    catalog::{CatalogEntry, CatalogRequest},
    role::{Role, RoleRequest},
    statistics::{DivisionCount, PositionCount, Statistics},
    user::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UserResponse},
};
use crate::models::{CatalogPage, LoginRequest, LoginResponse, RolePage, UserPage};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Staff Admin API",
        version = "1.0.0",
        description = r#"
## Staff Administration Backend

Manages the people side of an organisation: user accounts, the roles they
hold, and the divisions and positions they belong to.

### 🔹 Key Features
- **Authentication**
  - Email/password login returning a signed bearer token
- **User Management**
  - Create, update, list, view and delete users; assign role sets
- **Roles, Divisions & Positions**
  - Catalog CRUD; entries still in use are deactivated instead of deleted
- **Dashboard**
  - Headcount statistics per division and position

### 🔐 Security
Every endpoint except login and health needs **JWT Bearer authentication**.
Role administration and user deletion require an admin role.

### 📦 Response Format
- JSON bodies; errors are always `{"error": "<message>"}`
- List endpoints accept `page`, `limit` and `search`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::profile,

        crate::api::user::list_users,
        crate::api::user::get_user,
        crate::api::user::create_user,
        crate::api::user::update_user,
        crate::api::user::update_password,
        crate::api::user::delete_user,

        crate::api::role::list_roles,
        crate::api::role::list_active_roles,
        crate::api::role::get_role,
        crate::api::role::create_role,
        crate::api::role::update_role,
        crate::api::role::delete_role,

        crate::api::catalog::list_entries,
        crate::api::catalog::list_active_entries,
        crate::api::catalog::get_entry,
        crate::api::catalog::create_entry,
        crate::api::catalog::update_entry,
        crate::api::catalog::delete_entry,

        crate::api::dashboard::statistics,
        crate::api::health::health
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UpdatePasswordRequest,
            UserPage,
            Role,
            RoleRequest,
            RolePage,
            CatalogEntry,
            CatalogRequest,
            CatalogPage,
            Statistics,
            DivisionCount,
            PositionCount
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and current profile"),
        (name = "User", description = "User management APIs"),
        (name = "Role", description = "Role management APIs"),
        (name = "Catalog", description = "Division and position APIs"),
        (name = "Dashboard", description = "Aggregated statistics"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
