//! Central error taxonomy.
//!
//! Every failure the API can produce is one of these variants, and every
//! handler returns `Result<_, AppError>`. `IntoResponse` is the single place
//! where a failure becomes a wire response: `{status, message}` JSON with the
//! variant's status code, where `status` is `"fail"` for client faults and
//! `"error"` for server faults. Internal sources are logged here and never
//! serialized to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Order must contain at least one item.")]
    EmptyOrder,

    #[error("Dish with ID {0} not found.")]
    DishNotFound(String),

    #[error("Dish \"{0}\" is currently not available.")]
    DishUnavailable(String),

    #[error("Quantity for dish \"{0}\" must be at least 1.")]
    InvalidQuantity(String),

    #[error("Duplicate field value: {0}. Please use another value!")]
    DuplicateField(String),

    #[error("Invalid ID: {0}.")]
    MalformedId(String),

    #[error("Invalid input data. {}", .0.join(". "))]
    Validation(Vec<String>),

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("Cannot find the requested route on this server.")]
    RouteNotFound,

    #[error("Something went very wrong!")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyOrder
            | AppError::DishNotFound(_)
            | AppError::DishUnavailable(_)
            | AppError::InvalidQuantity(_)
            | AppError::DuplicateField(_)
            | AppError::MalformedId(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,

            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,

            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(source) = &self {
            error!("Internal failure: {source}");
        }

        let code = self.status_code();
        let status = if code.is_server_error() { "error" } else { "fail" };

        let body = Json(json!({
            "status": status,
            "message": self.to_string(),
        }));

        (code, body).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(source: redis::RedisError) -> Self {
        AppError::Internal(Box::new(source))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(source: serde_json::Error) -> Self {
        AppError::Internal(Box::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_faults_map_to_400() {
        for err in [
            AppError::EmptyOrder,
            AppError::DishNotFound("abc".into()),
            AppError::DishUnavailable("Pad Thai".into()),
            AppError::InvalidQuantity("Pad Thai".into()),
            AppError::DuplicateField("Pad Thai".into()),
            AppError::MalformedId("not-a-uuid".into()),
            AppError::Validation(vec!["A price is required".into()]),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn lookup_misses_map_to_404() {
        assert_eq!(
            AppError::NotFound("Dish").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::RouteNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_masks_its_source() {
        let err: AppError = Box::<dyn std::error::Error + Send + Sync>::from("driver exploded").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Something went very wrong!");
    }

    #[test]
    fn messages_carry_the_offending_context() {
        assert_eq!(
            AppError::DishUnavailable("Pho".into()).to_string(),
            "Dish \"Pho\" is currently not available."
        );
        assert_eq!(
            AppError::InvalidQuantity("Pho".into()).to_string(),
            "Quantity for dish \"Pho\" must be at least 1."
        );
        assert_eq!(
            AppError::Validation(vec!["A dish name is required".into(), "A price is required".into()])
                .to_string(),
            "Invalid input data. A dish name is required. A price is required"
        );
    }
}
