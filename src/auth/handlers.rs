use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument};

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::user::UserResponse,
    models::{LoginRequest, LoginResponse},
    service::AuthService,
};

// auth end points

/// Login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = Object, example = json!({
            "error": "email and password are required"
        })),
        (status = 401, description = "Bad credentials or inactive account", body = Object, example = json!({
            "error": "invalid email or password"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(auth, body), fields(email = %body.email))]
pub async fn login(
    body: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> AppResult<HttpResponse> {
    info!("Login request received");

    if body.email.trim().is_empty() || body.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(AppError::invalid("email and password are required"));
    }

    let resp = auth.authenticate(body.email.trim(), &body.password).await?;

    info!(user_id = resp.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(resp))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile of the token's user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile(user: AuthUser, auth: web::Data<AuthService>) -> AppResult<HttpResponse> {
    debug!(user_id = user.user_id, "Profile requested");
    let profile = auth.profile(user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
