use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub location: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Filename of the submitted photo, relative to the upload directory.
    pub image: String,
    /// Completion evidence filename, set by the assigned volunteer.
    pub completed_image: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(32))")]
    pub status: String,
    pub volunteer_id: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::volunteer::Entity",
        from = "Column::VolunteerId",
        to = "super::volunteer::Column::Id"
    )]
    Assignee,
}

impl ActiveModelBehavior for ActiveModel {}

/// Report lifecycle. Transitions form a strict progression; there is no
/// backward move, no skip, and no cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    Pending,
    Assigned,
    CompletedByVolunteer,
    Completed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Assigned => "Assigned",
            ReportStatus::CompletedByVolunteer => "Completed_by_volunteer",
            ReportStatus::Completed => "Completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(ReportStatus::Pending),
            "Assigned" => Some(ReportStatus::Assigned),
            "Completed_by_volunteer" => Some(ReportStatus::CompletedByVolunteer),
            "Completed" => Some(ReportStatus::Completed),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (ReportStatus::Pending, ReportStatus::Assigned)
                | (ReportStatus::Assigned, ReportStatus::CompletedByVolunteer)
                | (ReportStatus::CompletedByVolunteer, ReportStatus::Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == ReportStatus::Completed
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
