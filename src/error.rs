use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use sqlx::mysql::MySqlDatabaseError;
use tracing::error;

/// Every failure the service layer can surface to a client.
///
/// The `Display` text is what ends up in the `{"error": ...}` body, except for
/// `Internal`, whose detail only goes to the log.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "invalid email or password")]
    InvalidCredentials,

    #[display(fmt = "your account is inactive")]
    AccountInactive,

    /// Name of the field that collided, e.g. `email`.
    #[display(fmt = "{} already exists", _0)]
    DuplicateField(String),

    #[display(fmt = "{}", _0)]
    InvalidFormat(String),

    /// Entity label, e.g. `User`.
    #[display(fmt = "{} not found", _0)]
    NotFound(String),

    #[display(fmt = "Invalid or expired token")]
    InvalidToken,

    #[display(fmt = "{}", _0)]
    Unauthenticated(String),

    #[display(fmt = "{}", _0)]
    Forbidden(String),

    #[display(fmt = "internal error: {}", _0)]
    Internal(String),
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(entity.to_string())
    }

    pub fn duplicate(field: &str) -> Self {
        AppError::DuplicateField(field.to_string())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidFormat(message.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::AccountInactive
            | AppError::InvalidToken
            | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::DuplicateField(_) | AppError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                error!(error = %detail, "Request failed with internal error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

// MySQL server error numbers
const ER_DUP_ENTRY: u16 = 1062;
const ER_NO_REFERENCED_ROW: u16 = 1452;

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
                match mysql_err.number() {
                    ER_DUP_ENTRY => return AppError::duplicate("record"),
                    ER_NO_REFERENCED_ROW => {
                        return AppError::invalid("referenced record does not exist");
                    }
                    _ => {}
                }
            }
        }

        AppError::Internal(e.to_string())
    }
}
