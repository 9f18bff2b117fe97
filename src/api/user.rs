use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::debug;

use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppResult,
    model::user::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UserResponse},
    models::{PageQuery, UserPage},
    service::UserService,
};

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated user list", body = UserPage),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    _user: AuthUser,
    users: web::Data<UserService>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query.normalize();
    debug!(page = page.page, limit = page.limit, search = ?page.search, "Listing users");

    Ok(HttpResponse::Ok().json(users.list(&page).await?))
}

/// Get user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id", Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User with role, division, position and manager names", body = UserResponse),
        (status = 404, description = "User not found", body = Object, example = json!({
            "error": "User not found"
        }))
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    _user: AuthUser,
    users: web::Data<UserService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(users.get(path.into_inner()).await?))
}

/// Create user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Duplicate employee ID / email or malformed field", body = Object, example = json!({
            "error": "email already exists"
        })),
        (status = 403, description = "Insufficient permissions")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_user(
    user: AuthUser,
    users: web::Data<UserService>,
    config: web::Data<Config>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    user.require_any_role(config.admin_roles.as_slice())?;

    let created = users.create(body.into_inner(), user.actor()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Update user
///
/// Only the fields present in the body change. `role_ids` replaces the whole
/// role set; leave it out to keep the current roles.
///
/// Users may edit their own profile fields. Another user's record, the role
/// set and the active flag need an admin role.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id", Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Duplicate email or malformed field"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "User not found")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    user: AuthUser,
    users: web::Data<UserService>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let body = body.into_inner();
    if id != user.user_id || body.touches_access() {
        user.require_any_role(config.admin_roles.as_slice())?;
    }

    let updated = users.update(id, body, user.actor()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Change password
///
/// Users may change their own password; anyone else's needs an admin role.
#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    params(
        ("id", Path, description = "User ID")
    ),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = Object, example = json!({
            "message": "Password updated successfully"
        })),
        (status = 400, description = "Password too short"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "User not found")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_password(
    user: AuthUser,
    users: web::Data<UserService>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    body: web::Json<UpdatePasswordRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if id != user.user_id {
        user.require_any_role(config.admin_roles.as_slice())?;
    }

    users.update_password(id, &body.password, user.actor()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id", Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User and role assignments removed", body = Object, example = json!({
            "message": "User deleted successfully"
        })),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "User not found")
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    user: AuthUser,
    users: web::Data<UserService>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    user.require_any_role(config.admin_roles.as_slice())?;

    users.delete(path.into_inner(), user.actor()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}
