use std::sync::Arc;

use actix_web::web;
use strum_macros::{AsRefStr, Display};

use crate::{
    auth::jwt::TokenCodec,
    repository::{CatalogRepository, RoleRepository, StatsRepository, UserRepository},
};

pub mod auth_service;
pub mod catalog_service;
pub mod dashboard_service;
pub mod role_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use dashboard_service::DashboardService;
pub use role_service::RoleService;
pub use user_service::UserService;

/// What a referential-guard delete actually did. The HTTP response is the
/// same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DeleteOutcome {
    /// No references; the row is gone.
    Deleted,
    /// Still referenced; `is_active` was cleared instead.
    Deactivated,
}

/// Every service, ready to be registered as app data.
#[derive(Clone)]
pub struct Services {
    pub auth: web::Data<AuthService>,
    pub users: web::Data<UserService>,
    pub roles: web::Data<RoleService>,
    pub catalog: web::Data<CatalogService>,
    pub dashboard: web::Data<DashboardService>,
}

impl Services {
    /// Wires every service to one store that implements all repository ports.
    pub fn new<S>(store: Arc<S>, tokens: Arc<TokenCodec>) -> Self
    where
        S: UserRepository + RoleRepository + CatalogRepository + StatsRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let roles: Arc<dyn RoleRepository> = store.clone();
        let catalog: Arc<dyn CatalogRepository> = store.clone();
        let stats: Arc<dyn StatsRepository> = store;

        Self {
            auth: web::Data::new(AuthService::new(users.clone(), tokens)),
            users: web::Data::new(UserService::new(users)),
            roles: web::Data::new(RoleService::new(roles)),
            catalog: web::Data::new(CatalogService::new(catalog)),
            dashboard: web::Data::new(DashboardService::new(stats)),
        }
    }
}
