use crate::middleware::auth::Role;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid login")]
    InvalidLogin,

    #[error("{0} session required")]
    RoleRequired(Role),

    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl utoipa::ToSchema for AppError {
    fn name() -> std::borrow::Cow<'static, str> {
        "ErrorResponse".into()
    }
}

impl utoipa::PartialSchema for AppError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                json!({ "error": "Database error" })
            }
            AppError::InvalidLogin => json!({ "error": "Invalid login" }),
            // Gated route hit without the matching role session: point the
            // client at that role's login route.
            AppError::RoleRequired(role) => json!({
                "error": format!("{} login required", role),
                "login": role.login_path(),
            }),
            AppError::NotFound => json!({ "error": "Resource not found" }),
            AppError::Forbidden => json!({ "error": "Forbidden" }),
            AppError::Validation(msg) => json!({ "error": msg }),
            AppError::Conflict(msg) => json!({ "error": msg }),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                json!({ "error": "Internal server error" })
            }
        };

        let status = match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidLogin | AppError::RoleRequired(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
