use crate::{
    error::{AppError, AppResult},
    models::{admin, user, volunteer, Admin, AdminModel, User, UserModel, Volunteer, VolunteerModel},
    utils::{hash_password, verify_password},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter,
};

/// Registration and credential verification for all three role tables.
pub struct AccountService {
    db: DatabaseConnection,
}

impl AccountService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a citizen account. Phone numbers are unique within the
    /// users table; a reuse is reported as a conflict, not a raw DB error.
    pub async fn register_user(
        &self,
        name: &str,
        phone: &str,
        location: &str,
        password: &str,
    ) -> AppResult<UserModel> {
        let taken = User::find()
            .filter(user::Column::Phone.eq(phone))
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(AppError::Conflict("Phone already exists".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            name: sea_orm::ActiveValue::Set(name.to_string()),
            phone: sea_orm::ActiveValue::Set(phone.to_string()),
            location: sea_orm::ActiveValue::Set(location.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        insert_or_conflict(new_user.insert(&self.db).await)
    }

    /// Register a volunteer account; same rules as citizens, separate table.
    pub async fn register_volunteer(
        &self,
        name: &str,
        phone: &str,
        area: &str,
        password: &str,
    ) -> AppResult<VolunteerModel> {
        let taken = Volunteer::find()
            .filter(volunteer::Column::Phone.eq(phone))
            .count(&self.db)
            .await?
            > 0;
        if taken {
            return Err(AppError::Conflict("Phone already exists".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_volunteer = volunteer::ActiveModel {
            name: sea_orm::ActiveValue::Set(name.to_string()),
            phone: sea_orm::ActiveValue::Set(phone.to_string()),
            area: sea_orm::ActiveValue::Set(area.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        insert_or_conflict(new_volunteer.insert(&self.db).await)
    }

    /// Verify citizen credentials. Unknown phone and wrong password are
    /// indistinguishable to the caller.
    pub async fn login_user(&self, phone: &str, password: &str) -> AppResult<UserModel> {
        let user = User::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&self.db)
            .await?
            .ok_or(AppError::InvalidLogin)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidLogin);
        }
        Ok(user)
    }

    pub async fn login_volunteer(&self, phone: &str, password: &str) -> AppResult<VolunteerModel> {
        let volunteer = Volunteer::find()
            .filter(volunteer::Column::Phone.eq(phone))
            .one(&self.db)
            .await?
            .ok_or(AppError::InvalidLogin)?;

        if !verify_password(password, &volunteer.password_hash)? {
            return Err(AppError::InvalidLogin);
        }
        Ok(volunteer)
    }

    pub async fn login_admin(&self, username: &str, password: &str) -> AppResult<AdminModel> {
        let admin = Admin::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .ok_or(AppError::InvalidLogin)?;

        if !verify_password(password, &admin.password_hash)? {
            return Err(AppError::InvalidLogin);
        }
        Ok(admin)
    }

    pub async fn list_volunteers(&self) -> AppResult<Vec<VolunteerModel>> {
        Ok(Volunteer::find().all(&self.db).await?)
    }
}

/// Collapse a racing duplicate-key insert into the same conflict result as
/// the pre-insert check.
fn insert_or_conflict<T>(result: Result<T, DbErr>) -> AppResult<T> {
    match result {
        Ok(model) => Ok(model),
        Err(err) if is_unique_violation(&err) => {
            Err(AppError::Conflict("Phone already exists".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    // Postgres unique_violation (23505) surfaces through sqlx as a
    // "duplicate key value violates unique constraint" message.
    err.to_string().contains("duplicate key")
}
