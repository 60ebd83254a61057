use crate::error::{AppError, AppResult};
use crate::middleware::Session;
use crate::models::VolunteerModel;
use crate::response::ApiResponse;
use crate::services::account::AccountService;
use crate::services::report::ReportService;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::ReportResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    /// Administrator username
    pub username: String,
    /// Administrator password
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSessionResponse {
    /// Administrator row id
    pub id: i32,
    /// Administrator username
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VolunteerSummary {
    /// Volunteer ID
    pub id: i32,
    /// Display name
    pub name: String,
    /// Service area
    pub area: String,
}

impl From<VolunteerModel> for VolunteerSummary {
    fn from(v: VolunteerModel) -> Self {
        Self {
            id: v.id,
            name: v.name,
            area: v.area,
        }
    }
}

/// Everything the assignment view needs in one payload: all reports plus
/// the volunteer roster to pick assignees from.
#[derive(Debug, Serialize, ToSchema)]
pub struct ManageReportsResponse {
    pub reports: Vec<ReportResponse>,
    pub volunteers: Vec<VolunteerSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRequest {
    /// Report to assign
    pub report_id: i32,
    /// Volunteer receiving the assignment
    pub volunteer_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveRequest {
    /// Report to approve
    pub report_id: i32,
}

#[utoipa::path(
    post,
    path = "/admin_login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminSessionResponse),
        (status = 401, description = "Invalid login", body = AppError),
    ),
    tag = "admin"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<AdminLoginRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AccountService::new(db);
    let admin = service
        .login_admin(&payload.username, &payload.password)
        .await?;

    let token = crate::utils::token::encode_session_token(admin.id, "admin")
        .map_err(AppError::Internal)?;

    let mut response = ApiResponse::ok(AdminSessionResponse {
        id: admin.id,
        username: admin.username,
    })
    .into_response();
    super::auth::set_session_cookie(&mut response, &token)?;
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/manage_reports",
    responses(
        (status = 200, description = "All reports and the volunteer roster", body = ManageReportsResponse),
        (status = 401, description = "Admin session required", body = AppError),
    ),
    tag = "admin"
)]
pub async fn manage_reports(
    Extension(db): Extension<DatabaseConnection>,
    session: Session,
) -> AppResult<impl IntoResponse> {
    session.admin_id()?;

    let reports = ReportService::new(db.clone()).list_all().await?;
    let volunteers = AccountService::new(db).list_volunteers().await?;

    Ok(ApiResponse::ok(ManageReportsResponse {
        reports: reports.into_iter().map(ReportResponse::from).collect(),
        volunteers: volunteers.into_iter().map(VolunteerSummary::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/manage_reports",
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Report assigned", body = ReportResponse),
        (status = 400, description = "Report not in Pending state or unknown volunteer", body = AppError),
        (status = 401, description = "Admin session required", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn assign_report(
    Extension(db): Extension<DatabaseConnection>,
    session: Session,
    Json(payload): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    session.admin_id()?;

    let service = ReportService::new(db);
    let report = service
        .assign(payload.report_id, payload.volunteer_id)
        .await?;

    Ok(ApiResponse::ok(ReportResponse::from(report)))
}

#[utoipa::path(
    post,
    path = "/admin_approve",
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Report marked Completed", body = ReportResponse),
        (status = 400, description = "Report has no pending completion", body = AppError),
        (status = 401, description = "Admin session required", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn approve_report(
    Extension(db): Extension<DatabaseConnection>,
    session: Session,
    Json(payload): Json<ApproveRequest>,
) -> AppResult<impl IntoResponse> {
    session.admin_id()?;

    let service = ReportService::new(db);
    let report = service.approve(payload.report_id).await?;

    Ok(ApiResponse::with_message(
        ReportResponse::from(report),
        "Task marked as completed".to_string(),
    ))
}
