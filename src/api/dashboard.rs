use actix_web::{HttpResponse, web};

use crate::{
    auth::auth::AuthUser, error::AppResult, model::statistics::Statistics,
    service::DashboardService,
};

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/api/dashboard/statistics",
    responses(
        (status = 200, description = "User, division and position counts", body = Statistics)
    ),
    tag = "Dashboard",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn statistics(
    _user: AuthUser,
    dashboard: web::Data<DashboardService>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(dashboard.statistics().await?))
}
