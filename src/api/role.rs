use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppResult,
    model::role::{Role, RoleRequest},
    models::{PageQuery, RolePage},
    service::RoleService,
};

/// List roles
#[utoipa::path(
    get,
    path = "/api/roles",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated role list", body = RolePage)
    ),
    tag = "Role",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_roles(
    _user: AuthUser,
    roles: web::Data<RoleService>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(roles.list(&query.normalize()).await?))
}

/// All active roles, highest level first
#[utoipa::path(
    get,
    path = "/api/roles/all",
    responses(
        (status = 200, description = "Active roles", body = [Role])
    ),
    tag = "Role",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_active_roles(
    _user: AuthUser,
    roles: web::Data<RoleService>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(roles.list_active().await?))
}

/// Get role
#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(
        ("id", Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 404, description = "Role not found")
    ),
    tag = "Role",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_role(
    _user: AuthUser,
    roles: web::Data<RoleService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(roles.get(path.into_inner()).await?))
}

/// Create role
#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Role name already exists"),
        (status = 403, description = "Insufficient permissions")
    ),
    tag = "Role",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_role(
    user: AuthUser,
    roles: web::Data<RoleService>,
    config: web::Data<Config>,
    body: web::Json<RoleRequest>,
) -> AppResult<HttpResponse> {
    user.require_any_role(config.admin_roles.as_slice())?;

    let role = roles.create(body.into_inner(), user.actor()).await?;
    Ok(HttpResponse::Created().json(role))
}

/// Update role
#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    params(
        ("id", Path, description = "Role ID")
    ),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 400, description = "Role name already exists"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Role not found")
    ),
    tag = "Role",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_role(
    user: AuthUser,
    roles: web::Data<RoleService>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    body: web::Json<RoleRequest>,
) -> AppResult<HttpResponse> {
    user.require_any_role(config.admin_roles.as_slice())?;

    let role = roles
        .update(path.into_inner(), body.into_inner(), user.actor())
        .await?;
    Ok(HttpResponse::Ok().json(role))
}

/// Delete role
///
/// A role still assigned to any user is deactivated instead of removed.
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    params(
        ("id", Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role deleted or deactivated", body = Object, example = json!({
            "message": "Role deleted successfully"
        })),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Role not found")
    ),
    tag = "Role",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_role(
    user: AuthUser,
    roles: web::Data<RoleService>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    user.require_any_role(config.admin_roles.as_slice())?;

    roles.delete(path.into_inner(), user.actor()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Role deleted successfully" })))
}
