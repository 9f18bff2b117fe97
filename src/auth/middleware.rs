use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
    web::Data,
};
use tracing::debug;

use crate::{
    auth::{auth::AuthUser, jwt::TokenCodec},
    error::AppError,
};

/// Extracts `<token>` from a header value of the exact form `Bearer <token>`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let value = header.ok_or_else(|| {
        AppError::Unauthenticated("Authorization header is required".to_string())
    })?;

    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::Unauthenticated(
            "Authorization header format must be Bearer {token}".to_string(),
        ));
    }

    Ok(parts[1])
}

fn reject(req: ServiceRequest, err: AppError) -> ServiceResponse<BoxBody> {
    let resp = err.error_response();
    req.into_response(resp.map_into_boxed_body())
}

/// Access guard for every protected scope: decodes the bearer token and stores
/// the resulting [`AuthUser`] in the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let codec = match req.app_data::<Data<TokenCodec>>() {
        Some(c) => c.clone(),
        None => {
            let err = AppError::Internal("token codec not registered".to_string());
            return Ok(reject(req, err));
        }
    };

    let header = match req.headers().get(AUTHORIZATION) {
        Some(h) => match h.to_str() {
            Ok(v) => Some(v.to_string()),
            Err(_) => Some(String::new()),
        },
        None => None,
    };

    let token = match bearer_token(header.as_deref()) {
        Ok(t) => t.to_string(),
        Err(e) => {
            debug!(path = %req.path(), reason = %e, "Rejected request without usable bearer token");
            return Ok(reject(req, e));
        }
    };

    let claims = match codec.decode(&token) {
        Ok(c) => c,
        Err(_) => {
            // expired, forged and malformed tokens all look the same to the client
            let err = AppError::Unauthenticated("Invalid or expired token".to_string());
            return Ok(reject(req, err));
        }
    };

    req.extensions_mut().insert(AuthUser::from(claims));

    next.call(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_accepts_exact_shape() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let err = bearer_token(None).unwrap_err();
        assert_eq!(err.to_string(), "Authorization header is required");
    }

    #[test]
    fn test_bearer_token_rejects_other_shapes() {
        for header in [
            "",
            "Bearer",
            "bearer abc",
            "Basic abc",
            "Bearer  abc",
            "Bearer abc def",
            "Token abc",
        ] {
            let err = bearer_token(Some(header)).unwrap_err();
            assert!(
                matches!(err, AppError::Unauthenticated(ref m) if m.contains("format")),
                "header {header:?} should be rejected"
            );
        }
    }
}
