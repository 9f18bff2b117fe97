use crate::{
    api::{catalog, dashboard, health, role, user},
    auth::{handlers, jwt::TokenCodec, middleware::auth_middleware},
    config::Config,
    error::AppError,
    model::catalog::CatalogKind,
    service::Services,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

fn catalog_scope(path: &str, kind: CatalogKind) -> actix_web::Scope {
    web::scope(path)
        .app_data(web::Data::new(kind))
        .service(
            web::resource("")
                .route(web::get().to(catalog::list_entries))
                .route(web::post().to(catalog::create_entry)),
        )
        .service(web::resource("/all").route(web::get().to(catalog::list_active_entries)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(catalog::get_entry))
                .route(web::put().to(catalog::update_entry))
                .route(web::delete().to(catalog::delete_entry)),
        )
}

pub fn configure(
    cfg: &mut web::ServiceConfig,
    config: &Config,
    services: &Services,
    tokens: web::Data<TokenCodec>,
) {
    cfg.app_data(web::Data::new(config.clone()))
        .app_data(tokens)
        .app_data(services.auth.clone())
        .app_data(services.users.clone())
        .app_data(services.roles.clone())
        .app_data(services.catalog.clone())
        .app_data(services.dashboard.clone())
        // malformed bodies, paths and queries answer in the usual {"error": ...} shape
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::invalid(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| AppError::invalid(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| AppError::invalid(err.to_string()).into()),
        );

    cfg.service(health::health);

    // Public routes
    cfg.service(
        web::scope(&format!("{}/auth", config.api_prefix))
            .service(
                web::resource("/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/profile")
                    .wrap(from_fn(auth_middleware))
                    .route(web::get().to(handlers::profile)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .service(
                web::scope("/users")
                    // /users
                    .service(
                        web::resource("")
                            .route(web::get().to(user::list_users))
                            .route(web::post().to(user::create_user)),
                    )
                    // /users/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(user::get_user))
                            .route(web::put().to(user::update_user))
                            .route(web::delete().to(user::delete_user)),
                    )
                    // /users/{id}/password
                    .service(
                        web::resource("/{id}/password").route(web::put().to(user::update_password)),
                    ),
            )
            .service(
                web::scope("/roles")
                    .service(
                        web::resource("")
                            .route(web::get().to(role::list_roles))
                            .route(web::post().to(role::create_role)),
                    )
                    .service(web::resource("/all").route(web::get().to(role::list_active_roles)))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(role::get_role))
                            .route(web::put().to(role::update_role))
                            .route(web::delete().to(role::delete_role)),
                    ),
            )
            .service(catalog_scope("/divisions", CatalogKind::Division))
            .service(catalog_scope("/positions", CatalogKind::Position))
            .service(
                web::resource("/dashboard/statistics")
                    .route(web::get().to(dashboard::statistics)),
            ),
    );
}
