use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    auth::{auth::AuthUser, jwt::TokenCodec, password::verify_password},
    error::{AppError, AppResult},
    model::user::UserResponse,
    models::LoginResponse,
    repository::UserRepository,
};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenCodec>) -> Self {
        Self { users, tokens }
    }

    /// Checks credentials and issues a token carrying the user's role names.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => {
                info!("Invalid credentials: user not found");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !user.is_active {
            info!(user_id = user.id, "Login refused: account inactive");
            return Err(AppError::AccountInactive);
        }

        if !verify_password(password, &user.password) {
            info!(user_id = user.id, "Invalid credentials: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        debug!(user_id = user.id, roles = ?user.roles, "Issuing token");

        let identity = AuthUser {
            user_id: user.id,
            uid: user.uid.clone(),
            employee_id: user.employee_id.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
        };
        let token = self.tokens.issue(&identity)?;

        Ok(LoginResponse {
            token,
            user: UserResponse::from(&user),
        })
    }

    pub async fn profile(&self, user_id: u64) -> AppResult<UserResponse> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|u| UserResponse::from(&u))
            .ok_or_else(|| AppError::not_found("User"))
    }
}
