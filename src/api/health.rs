use actix_web::{HttpResponse, Responder, get};

/// Liveness probe; needs no token.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = String, example = json!("OK"))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}
