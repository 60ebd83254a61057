use crate::error::{AppError, AppResult};
use crate::middleware::Session;
use crate::models::ReportModel;
use crate::response::ApiResponse;
use crate::services::account::AccountService;
use crate::services::report::ReportService;
use crate::services::upload::{UploadConfig, UploadService};
use axum::{extract::Multipart, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Phone number, unique among citizens
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    /// Home location
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    /// Password
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Phone number
    pub phone: String,
    /// Password
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Row id in the role's table
    pub id: i32,
    /// Display name
    pub name: String,
    /// Role carried by the session cookie
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    /// Report ID
    pub id: i32,
    /// Owning citizen's user ID
    pub user_id: i32,
    /// Incident location
    pub location: String,
    /// Incident description
    pub description: String,
    /// Submitted photo filename
    pub image: String,
    /// Completion evidence filename
    pub completed_image: Option<String>,
    /// Lifecycle status
    pub status: String,
    /// Assigned volunteer ID
    pub volunteer_id: Option<i32>,
    /// Creation timestamp
    pub created_at: String,
}

impl From<ReportModel> for ReportResponse {
    fn from(r: ReportModel) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            location: r.location,
            description: r.description,
            image: r.image,
            completed_image: r.completed_image,
            status: r.status,
            volunteer_id: r.volunteer_id,
            created_at: r.created_at.to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/user_register",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "User registered", body = SessionResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 409, description = "Phone already exists", body = AppError),
    ),
    tag = "users"
)]
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterUserRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = AccountService::new(db);
    let user = service
        .register_user(
            &payload.name,
            &payload.phone,
            &payload.location,
            &payload.password,
        )
        .await?;

    Ok(ApiResponse::with_message(
        SessionResponse {
            id: user.id,
            name: user.name,
            role: "user".to_string(),
        },
        "User registered successfully".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/user_login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 401, description = "Invalid login", body = AppError),
    ),
    tag = "users"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AccountService::new(db);
    let user = service.login_user(&payload.phone, &payload.password).await?;

    let token = crate::utils::token::encode_session_token(user.id, "user")
        .map_err(AppError::Internal)?;

    let mut response = ApiResponse::ok(SessionResponse {
        id: user.id,
        name: user.name,
        role: "user".to_string(),
    })
    .into_response();
    super::auth::set_session_cookie(&mut response, &token)?;
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/report",
    responses(
        (status = 200, description = "Reports submitted by the session user", body = Vec<ReportResponse>),
        (status = 401, description = "User session required", body = AppError),
    ),
    tag = "reports"
)]
pub async fn list_my_reports(
    Extension(db): Extension<DatabaseConnection>,
    session: Session,
) -> AppResult<impl IntoResponse> {
    let user_id = session.user_id()?;

    let service = ReportService::new(db);
    let reports = service.list_for_user(user_id).await?;
    let items: Vec<ReportResponse> = reports.into_iter().map(ReportResponse::from).collect();

    Ok(ApiResponse::ok(items))
}

/// Submit a waste report.
/// POST /report (multipart form: "location", "description", "image")
#[utoipa::path(
    post,
    path = "/report",
    responses(
        (status = 200, description = "Report created with status Pending", body = ReportResponse),
        (status = 400, description = "Missing form field", body = AppError),
        (status = 401, description = "User session required", body = AppError),
    ),
    tag = "reports"
)]
pub async fn create_report(
    Extension(db): Extension<DatabaseConnection>,
    Extension(config): Extension<UploadConfig>,
    session: Session,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let user_id = session.user_id()?;

    let mut location = None;
    let mut description = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "location" => {
                location = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read location: {}", e))
                })?);
            }
            "description" => {
                description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read description: {}", e))
                })?);
            }
            "image" => {
                let original_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read file data: {}", e))
                })?;
                image = Some((original_name, data));
            }
            _ => {}
        }
    }

    let location =
        location.ok_or_else(|| AppError::Validation("Missing field: location".to_string()))?;
    let description = description
        .ok_or_else(|| AppError::Validation("Missing field: description".to_string()))?;
    let (original_name, data) =
        image.ok_or_else(|| AppError::Validation("Missing field: image".to_string()))?;

    let filename = UploadService::save_image(&config, &data, &original_name).await?;

    let service = ReportService::new(db);
    let report = service
        .create(user_id, &location, &description, &filename)
        .await?;

    Ok(ApiResponse::with_message(
        ReportResponse::from(report),
        "Waste reported successfully".to_string(),
    ))
}
