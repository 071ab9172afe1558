use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    /// Payload or query parameter rejected; the message is shown to clients as is.
    #[error("{0}")]
    Validation(String),

    #[error("Product with id '{0}' was not found.")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub(crate) fn missing(field: &str) -> Self {
        ProductError::Validation(format!("Invalid product: missing {}", field))
    }

    pub(crate) fn invalid(details: impl std::fmt::Display) -> Self {
        ProductError::Validation(format!("Invalid product: {}", details))
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            not_found @ ProductError::NotFound(_) => AppError::NotFound(not_found.to_string()),
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
