pub mod admin;
pub mod tasks;
pub mod user;
pub mod wallet;

use axum::http::StatusCode;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::ledger::LedgerError;
use crate::models::settings::SystemSettings;
use crate::models::user::{Profile, UserRole};

// Callers identify themselves by profile id; admin routes additionally
// check the stored role.

pub async fn require_profile(id: Uuid) -> Result<Profile, AppError> {
    db::find_profile(id)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Unknown user"))
}

pub async fn require_admin(id: Uuid) -> Result<Profile, AppError> {
    let profile = require_profile(id).await?;
    if profile.role != UserRole::Admin {
        return Err(AppError::new(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(profile)
}

// Earning/spending guard: suspended accounts never transact, and the
// maintenance toggle closes the app for everyone but admins.
pub fn ensure_can_transact(
    profile: &Profile,
    settings: &SystemSettings,
) -> Result<(), AppError> {
    if profile.is_blocked {
        return Err(LedgerError::AccountBlocked.into());
    }
    if settings.is_under_maintenance && profile.role != UserRole::Admin {
        return Err(AppError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service is under maintenance",
        ));
    }
    Ok(())
}

pub fn uuid_param(params: &HashMap<String, String>, key: &str) -> Result<Uuid, AppError> {
    params
        .get(key)
        .ok_or_else(|| AppError::new(StatusCode::BAD_REQUEST, format!("Missing {} param", key)))?
        .parse()
        .map_err(|_| AppError::new(StatusCode::BAD_REQUEST, format!("Invalid {} param", key)))
}
