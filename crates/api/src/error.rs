use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinica_core::error::CoreError;
use clinica_storage::StorageError;
use serde::Serialize;

/// Error returned by every handler.
///
/// Domain failures arrive as [`CoreError`]; database and storage failures
/// convert through `?`. The response body is always `{ "error", "code" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Status and body for one error, before it is turned into a response.
struct Classified {
    status: StatusCode,
    body: ErrorBody,
}

impl Classified {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                code,
            },
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    /// A 500 whose detail stays in the log.
    fn internal(detail: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed with an internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Classified { status, body } = match &self {
            AppError::Core(err) => classify_core(err),
            AppError::Database(err) => classify_sqlx(err),
            AppError::Storage(err) => classify_storage(err),
            AppError::BadRequest(msg) => {
                Classified::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.as_str())
            }
            AppError::InternalError(msg) => Classified::internal(msg),
        };
        (status, Json(body)).into_response()
    }
}

fn classify_core(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => {
            Classified::not_found(format!("{entity} with id {id} not found"))
        }
        CoreError::SlugNotFound { entity, slug } => {
            Classified::not_found(format!("{entity} '{slug}' not found"))
        }
        CoreError::ContentKeyNotFound(key) => {
            Classified::not_found(format!("Content key '{key}' not found"))
        }
        CoreError::Validation(msg) => Classified::invalid(msg.as_str()),
        CoreError::Conflict(msg) => Classified::new(StatusCode::CONFLICT, "CONFLICT", msg.as_str()),
        CoreError::Unauthorized(msg) => {
            Classified::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.as_str())
        }
        CoreError::Forbidden(msg) => {
            Classified::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.as_str())
        }
        CoreError::Internal(msg) => Classified::internal(msg),
    }
}

/// Map Postgres constraint violations to client errors.
///
/// Unique constraints are named `uq_*` in the migrations; a hit on one is a
/// 409. Foreign key and check violations mean the client sent a reference or
/// value the schema rejects. Anything else is a 500.
fn classify_sqlx(err: &sqlx::Error) -> Classified {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return Classified::not_found("Resource not found");
        }
        return Classified::internal(err);
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => Classified::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        Some("23503") => Classified::invalid(format!("Referenced row does not exist: {constraint}")),
        Some("23514") => Classified::invalid(format!("Value rejected by constraint: {constraint}")),
        _ => Classified::internal(db_err),
    }
}

fn classify_storage(err: &StorageError) -> Classified {
    match err {
        StorageError::InvalidName(_) | StorageError::UnknownBucket(_) => {
            Classified::invalid(err.to_string())
        }
        StorageError::Io(_) | StorageError::Backend(_) | StorageError::Config(_) => {
            Classified::internal(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn core_errors_map_to_statuses() {
        assert_eq!(
            status_of(CoreError::NotFound { entity: "Doctor", id: 3 }.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::Validation("name is required".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::Conflict("taken".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CoreError::Forbidden("admin only".into()).into()),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn row_not_found_is_404_and_pool_errors_are_500() {
        assert_eq!(status_of(sqlx::Error::RowNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(sqlx::Error::PoolTimedOut.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_name_errors_are_client_errors() {
        assert_eq!(
            status_of(StorageError::InvalidName("../x".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }
}
