// HTTP API Error Types
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{AuthError, JwtError};
use crate::database::DatabaseError;
use crate::services::ServiceError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity
    UnprocessableEntity(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::UnprocessableEntity(_) => 422,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::InvalidJson(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::UnprocessableEntity(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        ApiError::UnprocessableEntity(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ForeignKeyViolation(msg) => {
                ApiError::bad_request(format!("Referenced record does not exist: {}", msg))
            }
            DatabaseError::ConnectionError(msg) => {
                tracing::error!("Database connection error: {}", msg);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(denied) => ApiError::forbidden(denied.to_string()),
            ServiceError::NotFound { .. } => ApiError::not_found(err.to_string()),
            ServiceError::InvalidHierarchy(msg) => ApiError::unprocessable_entity(msg),
            ServiceError::Database(db) => db.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken(msg) => ApiError::unauthorized(msg),
            AuthError::Jwt(JwtError::InvalidToken(msg)) => ApiError::unauthorized(format!("Invalid JWT token: {}", msg)),
            AuthError::Jwt(jwt) => {
                tracing::error!("JWT configuration error: {}", jwt);
                ApiError::internal_server_error("Authentication is not configured")
            }
            AuthError::UnknownDealership(_) => ApiError::unauthorized("Unknown dealership"),
            AuthError::Database(db) => db.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessDenied;

    #[test]
    fn access_denial_is_forbidden_not_unauthenticated() {
        let err: ApiError = ServiceError::from(AccessDenied {
            caller: "x".to_string(),
            target: "y".to_string(),
        })
        .into();

        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
    }

    #[test]
    fn service_errors_map_to_statuses() {
        let not_found: ApiError = ServiceError::not_found("customer", "c-1").into();
        assert_eq!(not_found.status_code(), 404);
        assert_eq!(not_found.message(), "customer 'c-1' not found");

        let cycle: ApiError = ServiceError::InvalidHierarchy("loop".to_string()).into();
        assert_eq!(cycle.status_code(), 422);

        let fk: ApiError = ServiceError::Database(DatabaseError::ForeignKeyViolation("vehicle".to_string())).into();
        assert_eq!(fk.status_code(), 400);

        let down: ApiError = ServiceError::Database(DatabaseError::ConnectionError("refused".to_string())).into();
        assert_eq!(down.status_code(), 503);
    }

    #[test]
    fn query_errors_hide_their_detail() {
        let err: ApiError = DatabaseError::QueryError("syntax error at or near SELECT".to_string()).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("SELECT"));
    }

    #[test]
    fn bad_tokens_are_unauthenticated() {
        let err: ApiError = AuthError::Jwt(JwtError::InvalidToken("ExpiredSignature".to_string())).into();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "UNAUTHORIZED");

        let err: ApiError = AuthError::UnknownDealership("gone".to_string()).into();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn json_body_has_error_message_and_code() {
        let body = ApiError::not_found("sale 's-1' not found").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "sale 's-1' not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
