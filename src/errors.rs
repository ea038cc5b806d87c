use actix_web::{error, http::StatusCode, HttpResponse};
use derive_more::Display;
use log::error;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    // One message for both unknown email and wrong password, so a caller
    // cannot probe which accounts exist.
    #[display(fmt = "Invalid email or password")]
    Unauthorized,

    #[display(fmt = "Not authorized to modify this event")]
    Forbidden,

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "Server Error")]
    Internal,
}

impl error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "message": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Record not found".to_string()),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Backend(msg) => {
                error!("storage backend failure: {msg}");
                ApiError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn conflict_surfaces_from_store_errors() {
        let err: ApiError = StoreError::Conflict("User with this email already exists".into()).into();
        assert_eq!(
            err,
            ApiError::Conflict("User with this email already exists".into())
        );
    }

    #[test]
    fn backend_failures_collapse_to_a_generic_server_error() {
        let err: ApiError = StoreError::Backend("connection reset".into()).into();
        assert_eq!(err, ApiError::Internal);
        assert!(!err.to_string().contains("connection reset"));
    }
}
