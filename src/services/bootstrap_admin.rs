use crate::error::AppResult;
use crate::models::{admin, Admin};
use crate::services::account::is_unique_violation;
use crate::utils::hash_password;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use std::env;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Seed the single administrator row at first startup. Does nothing once a
/// row exists. The default credential is a known bootstrap secret and must
/// be rotated in any real deployment.
pub async fn ensure_default_admin(db: &DatabaseConnection) -> AppResult<()> {
    if Admin::find().one(db).await?.is_some() {
        return Ok(());
    }

    let username =
        env::var("ADMIN_USERNAME").unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string());
    let password =
        env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

    let password_hash = hash_password(&password)?;

    let seeded = admin::ActiveModel {
        username: sea_orm::ActiveValue::Set(username.clone()),
        password_hash: sea_orm::ActiveValue::Set(password_hash),
        ..Default::default()
    };
    match seeded.insert(db).await {
        Ok(_) => {
            tracing::warn!(
                "Seeded default administrator '{}'; rotate this credential before going live",
                username
            );
            Ok(())
        }
        // Another instance seeded the row between the lookup and the insert.
        Err(err) if is_unique_violation(&err) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
