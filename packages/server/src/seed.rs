use anyhow::{Context, anyhow};
use sea_orm::*;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::entity::admin_user;
use crate::utils::hash;

/// Create the configured admin account if it does not exist yet.
///
/// An already-present account is left untouched, so rotating
/// `auth.admin_password` never overwrites a live credential.
pub async fn seed_admin_user(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let Some(password) = auth.admin_password.as_deref().filter(|p| !p.is_empty()) else {
        warn!("auth.admin_password is not set, skipping admin user seed");
        return Ok(());
    };

    let password_hash =
        hash::hash_password(password).map_err(|e| anyhow!("Failed to hash admin password: {e}"))?;

    let model = admin_user::ActiveModel {
        username: Set(auth.admin_username.clone()),
        password: Set(password_hash),
        is_super_admin: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = admin_user::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(admin_user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => {
            info!(username = %auth.admin_username, "Seeded admin user");
            Ok(())
        }
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e).context("Failed to seed admin user"),
    }
}
