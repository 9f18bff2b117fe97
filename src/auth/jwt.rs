use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, error};

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    models::Claims,
};

/// Issues and verifies HMAC-signed bearer tokens.
///
/// The secret is fixed at construction; the codec holds no other state and is
/// shared by every worker as-is.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry_hours: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Header `alg` must be one of these or decoding fails.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_hours,
        }
    }

    pub fn expiry_hours(&self) -> i64 {
        self.expiry_hours
    }

    pub fn issue(&self, identity: &AuthUser) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: identity.user_id,
            uid: identity.uid.clone(),
            employee_id: identity.employee_id.clone(),
            email: identity.email.clone(),
            roles: identity.roles.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            error!(error = %e, user_id = identity.user_id, "Failed to sign token");
            AppError::Internal(format!("token signing failed: {e}"))
        })
    }

    /// Every failure cause (encoding, signature, algorithm, expiry) maps to
    /// `InvalidToken`.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Token rejected");
                AppError::InvalidToken
            })
    }
}
