use actix_web::{HttpResponse, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error taxonomy shared by the matching engine and the settlement flow.
///
/// Every variant except `Database` and `Provider` is a deliberate rejection
/// of the requested action and carries a human-readable reason.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("payment provider error: {0}")]
    Provider(String),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden(why: impl Into<String>) -> Self {
        Self::Forbidden(why.into())
    }

    pub fn conflict(why: impl Into<String>) -> Self {
        Self::Conflict(why.into())
    }

    pub fn invalid_state(why: impl Into<String>) -> Self {
        Self::InvalidState(why.into())
    }

    /// Whether a store error is a unique-constraint violation (duplicate
    /// bid/order/chat insert lost a race to a concurrent request).
    pub fn is_unique_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    /// Whether a store error is a serialization/deadlock conflict that is
    /// worth retrying once before surfacing as `Conflict`.
    pub fn is_serialization_conflict(err: &DbErr) -> bool {
        let msg = err.to_string().to_lowercase();
        msg.contains("serialize") || msg.contains("serialization") || msg.contains("deadlock")
    }
}

impl actix_web::ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
            EngineError::Conflict(_) => StatusCode::CONFLICT,
            EngineError::InvalidState(_) => StatusCode::BAD_REQUEST,
            EngineError::BadRequest(_) => StatusCode::BAD_REQUEST,
            EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(
            EngineError::not_found("project").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngineError::forbidden("not yours").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EngineError::conflict("duplicate bid").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EngineError::invalid_state("not open").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::Provider("stripe down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn error_body_carries_the_reason() {
        let resp = EngineError::invalid_state("project is not open").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
