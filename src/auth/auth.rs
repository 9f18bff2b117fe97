use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::{
    error::{AppError, AppResult},
    models::Claims,
};

/// Identity attached to a request by the access guard.
///
/// Handlers take it as an extractor; it is read from the request extensions,
/// never re-decoded from the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: u64,
    pub uid: String,
    pub employee_id: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            uid: claims.uid,
            employee_id: claims.employee_id,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| AppError::Unauthenticated("User not authenticated".to_string())),
        )
    }
}

impl AuthUser {
    /// True when the identity holds at least one of `required`.
    pub fn has_any_role<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required
            .iter()
            .any(|r| self.roles.iter().any(|own| own == r.as_ref()))
    }

    pub fn require_any_role<S: AsRef<str>>(&self, required: &[S]) -> AppResult<()> {
        if self.has_any_role(required) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Insufficient permissions".to_string()))
        }
    }

    /// Value stamped into created_by / updated_by.
    pub fn actor(&self) -> &str {
        &self.employee_id
    }
}
