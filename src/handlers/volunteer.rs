use crate::error::{AppError, AppResult};
use crate::middleware::Session;
use crate::response::ApiResponse;
use crate::services::account::AccountService;
use crate::services::report::ReportService;
use crate::services::upload::{UploadConfig, UploadService};
use axum::{extract::Multipart, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::user::{LoginRequest, ReportResponse, SessionResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterVolunteerRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Phone number, unique among volunteers
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    /// Service area
    #[validate(length(min = 1, max = 200))]
    pub area: String,
    /// Password
    #[validate(length(min = 1))]
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/volunteer_register",
    request_body = RegisterVolunteerRequest,
    responses(
        (status = 200, description = "Volunteer registered", body = SessionResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 409, description = "Phone already exists", body = AppError),
    ),
    tag = "volunteers"
)]
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterVolunteerRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = AccountService::new(db);
    let volunteer = service
        .register_volunteer(
            &payload.name,
            &payload.phone,
            &payload.area,
            &payload.password,
        )
        .await?;

    Ok(ApiResponse::with_message(
        SessionResponse {
            id: volunteer.id,
            name: volunteer.name,
            role: "volunteer".to_string(),
        },
        "Volunteer registered".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/volunteer_login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 401, description = "Invalid login", body = AppError),
    ),
    tag = "volunteers"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AccountService::new(db);
    let volunteer = service
        .login_volunteer(&payload.phone, &payload.password)
        .await?;

    let token = crate::utils::token::encode_session_token(volunteer.id, "volunteer")
        .map_err(AppError::Internal)?;

    let mut response = ApiResponse::ok(SessionResponse {
        id: volunteer.id,
        name: volunteer.name,
        role: "volunteer".to_string(),
    })
    .into_response();
    super::auth::set_session_cookie(&mut response, &token)?;
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/volunteer_dashboard",
    responses(
        (status = 200, description = "Reports assigned to the session volunteer", body = Vec<ReportResponse>),
        (status = 401, description = "Volunteer session required", body = AppError),
    ),
    tag = "volunteers"
)]
pub async fn dashboard(
    Extension(db): Extension<DatabaseConnection>,
    session: Session,
) -> AppResult<impl IntoResponse> {
    let volunteer_id = session.volunteer_id()?;

    let service = ReportService::new(db);
    let reports = service.list_assigned(volunteer_id).await?;
    let items: Vec<ReportResponse> = reports.into_iter().map(ReportResponse::from).collect();

    Ok(ApiResponse::ok(items))
}

/// Submit completion evidence for an assigned report.
/// POST /volunteer_complete (multipart form: "report_id", "completed_image")
#[utoipa::path(
    post,
    path = "/volunteer_complete",
    responses(
        (status = 200, description = "Completion submitted, pending admin approval", body = ReportResponse),
        (status = 400, description = "Missing field or report not in Assigned state", body = AppError),
        (status = 401, description = "Volunteer session required", body = AppError),
        (status = 403, description = "Report assigned to another volunteer", body = AppError),
    ),
    tag = "volunteers"
)]
pub async fn complete(
    Extension(db): Extension<DatabaseConnection>,
    Extension(config): Extension<UploadConfig>,
    session: Session,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let volunteer_id = session.volunteer_id()?;

    let mut report_id = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "report_id" => {
                let raw = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read report_id: {}", e))
                })?;
                report_id = Some(raw.trim().parse::<i32>().map_err(|_| {
                    AppError::Validation(format!("Invalid report_id '{}'", raw.trim()))
                })?);
            }
            "completed_image" => {
                let original_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read file data: {}", e))
                })?;
                image = Some((original_name, data));
            }
            _ => {}
        }
    }

    let report_id =
        report_id.ok_or_else(|| AppError::Validation("Missing field: report_id".to_string()))?;
    let (original_name, data) =
        image.ok_or_else(|| AppError::Validation("Missing field: completed_image".to_string()))?;

    let filename = UploadService::save_image(&config, &data, &original_name).await?;

    let service = ReportService::new(db);
    let report = service.complete(report_id, volunteer_id, &filename).await?;

    Ok(ApiResponse::with_message(
        ReportResponse::from(report),
        "Work submitted. Waiting for admin approval.".to_string(),
    ))
}
