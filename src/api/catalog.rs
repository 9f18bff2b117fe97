//! Handlers shared by `/divisions` and `/positions`. The route scope registers
//! which [`CatalogKind`] it serves as app data.

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::{
    auth::auth::AuthUser,
    error::AppResult,
    model::catalog::{CatalogEntry, CatalogKind, CatalogRequest},
    models::{CatalogPage, PageQuery},
    service::CatalogService,
};

/// List divisions or positions
#[utoipa::path(
    get,
    path = "/api/{catalog}",
    params(
        ("catalog", Path, description = "`divisions` or `positions`"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Paginated list", body = CatalogPage)
    ),
    tag = "Catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_entries(
    _user: AuthUser,
    kind: web::Data<CatalogKind>,
    catalog: web::Data<CatalogService>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = catalog.list(**kind, &query.normalize()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// All active divisions or positions
#[utoipa::path(
    get,
    path = "/api/{catalog}/all",
    params(
        ("catalog", Path, description = "`divisions` or `positions`")
    ),
    responses(
        (status = 200, description = "Active entries", body = [CatalogEntry])
    ),
    tag = "Catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_active_entries(
    _user: AuthUser,
    kind: web::Data<CatalogKind>,
    catalog: web::Data<CatalogService>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.list_active(**kind).await?))
}

/// Get division or position
#[utoipa::path(
    get,
    path = "/api/{catalog}/{id}",
    params(
        ("catalog", Path, description = "`divisions` or `positions`"),
        ("id", Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry", body = CatalogEntry),
        (status = 404, description = "Not found", body = Object, example = json!({
            "error": "Division not found"
        }))
    ),
    tag = "Catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_entry(
    _user: AuthUser,
    kind: web::Data<CatalogKind>,
    catalog: web::Data<CatalogService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.get(**kind, path.into_inner()).await?))
}

/// Create division or position
#[utoipa::path(
    post,
    path = "/api/{catalog}",
    params(
        ("catalog", Path, description = "`divisions` or `positions`")
    ),
    request_body = CatalogRequest,
    responses(
        (status = 201, description = "Entry created", body = CatalogEntry),
        (status = 400, description = "Code already exists or missing field")
    ),
    tag = "Catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_entry(
    user: AuthUser,
    kind: web::Data<CatalogKind>,
    catalog: web::Data<CatalogService>,
    body: web::Json<CatalogRequest>,
) -> AppResult<HttpResponse> {
    let entry = catalog
        .create(**kind, body.into_inner(), user.actor())
        .await?;
    Ok(HttpResponse::Created().json(entry))
}

/// Update division or position
#[utoipa::path(
    put,
    path = "/api/{catalog}/{id}",
    params(
        ("catalog", Path, description = "`divisions` or `positions`"),
        ("id", Path, description = "Entry ID")
    ),
    request_body = CatalogRequest,
    responses(
        (status = 200, description = "Entry updated", body = CatalogEntry),
        (status = 400, description = "Code already exists or missing field"),
        (status = 404, description = "Not found")
    ),
    tag = "Catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_entry(
    user: AuthUser,
    kind: web::Data<CatalogKind>,
    catalog: web::Data<CatalogService>,
    path: web::Path<u64>,
    body: web::Json<CatalogRequest>,
) -> AppResult<HttpResponse> {
    let entry = catalog
        .update(**kind, path.into_inner(), body.into_inner(), user.actor())
        .await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// Delete division or position
///
/// Entries still referenced by a user are deactivated instead of removed.
#[utoipa::path(
    delete,
    path = "/api/{catalog}/{id}",
    params(
        ("catalog", Path, description = "`divisions` or `positions`"),
        ("id", Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Deleted or deactivated", body = Object, example = json!({
            "message": "Division deleted successfully"
        })),
        (status = 404, description = "Not found")
    ),
    tag = "Catalog",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_entry(
    user: AuthUser,
    kind: web::Data<CatalogKind>,
    catalog: web::Data<CatalogService>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    catalog
        .delete(**kind, path.into_inner(), user.actor())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": format!("{} deleted successfully", *kind) })))
}
