use crate::{
    error::{AppError, AppResult},
    models::{report, Report, ReportModel, ReportStatus, Volunteer},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Report lifecycle operations. Every mutation re-checks the stored status
/// against the state machine, so a stale or out-of-order request is
/// rejected instead of overwriting newer state.
pub struct ReportService {
    db: DatabaseConnection,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        location: &str,
        description: &str,
        image: &str,
    ) -> AppResult<ReportModel> {
        let now = chrono::Utc::now().naive_utc();
        let model = report::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(user_id),
            location: sea_orm::ActiveValue::Set(location.to_string()),
            description: sea_orm::ActiveValue::Set(description.to_string()),
            image: sea_orm::ActiveValue::Set(image.to_string()),
            completed_image: sea_orm::ActiveValue::Set(None),
            status: sea_orm::ActiveValue::Set(ReportStatus::Pending.as_str().to_string()),
            volunteer_id: sea_orm::ActiveValue::Set(None),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        Ok(saved)
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<ReportModel>> {
        Ok(Report::find()
            .filter(report::Column::UserId.eq(user_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn list_assigned(&self, volunteer_id: i32) -> AppResult<Vec<ReportModel>> {
        Ok(Report::find()
            .filter(report::Column::VolunteerId.eq(volunteer_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn list_all(&self) -> AppResult<Vec<ReportModel>> {
        Ok(Report::find()
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Pending → Assigned. Rejects unknown volunteers and reports that have
    /// already left the Pending state.
    pub async fn assign(&self, report_id: i32, volunteer_id: i32) -> AppResult<ReportModel> {
        Volunteer::find_by_id(volunteer_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation("Volunteer not found".to_string()))?;

        let existing = self.get(report_id).await?;
        let status = parse_status(&existing.status)?;
        if !status.can_transition_to(ReportStatus::Assigned) {
            return Err(AppError::Validation(format!(
                "Cannot assign a report in status {}",
                status
            )));
        }

        let mut active: report::ActiveModel = existing.into();
        active.volunteer_id = sea_orm::ActiveValue::Set(Some(volunteer_id));
        active.status = sea_orm::ActiveValue::Set(ReportStatus::Assigned.as_str().to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Assigned → Completed_by_volunteer. Only the assigned volunteer may
    /// submit completion evidence.
    pub async fn complete(
        &self,
        report_id: i32,
        volunteer_id: i32,
        completed_image: &str,
    ) -> AppResult<ReportModel> {
        let existing = self.get(report_id).await?;

        if existing.volunteer_id != Some(volunteer_id) {
            return Err(AppError::Forbidden);
        }

        let status = parse_status(&existing.status)?;
        if !status.can_transition_to(ReportStatus::CompletedByVolunteer) {
            return Err(AppError::Validation(format!(
                "Cannot submit completion for a report in status {}",
                status
            )));
        }

        let mut active: report::ActiveModel = existing.into();
        active.completed_image = sea_orm::ActiveValue::Set(Some(completed_image.to_string()));
        active.status =
            sea_orm::ActiveValue::Set(ReportStatus::CompletedByVolunteer.as_str().to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Completed_by_volunteer → Completed. Status is the only field touched.
    pub async fn approve(&self, report_id: i32) -> AppResult<ReportModel> {
        let existing = self.get(report_id).await?;
        let status = parse_status(&existing.status)?;
        if !status.can_transition_to(ReportStatus::Completed) {
            return Err(AppError::Validation(format!(
                "Cannot approve a report in status {}",
                status
            )));
        }

        let mut active: report::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(ReportStatus::Completed.as_str().to_string());
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    async fn get(&self, report_id: i32) -> AppResult<ReportModel> {
        Report::find_by_id(report_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

fn parse_status(raw: &str) -> AppResult<ReportStatus> {
    ReportStatus::parse(raw)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Corrupt report status '{}'", raw)))
}
