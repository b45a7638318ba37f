use axum::extract::Query;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::{ensure_can_transact, require_profile, uuid_param};
use crate::models::transaction::{new_code, NewTransaction, TxStatus, TxType};
use crate::models::user::Profile;
use crate::{db, error::AppError, ledger};
use serde_json::json;

#[derive(Deserialize)]
struct RegisterRequest {
    email: String,
    full_name: Option<String>,
    referral_code: Option<String>,
}

#[derive(Deserialize)]
struct CheckInRequest {
    user_id: Uuid,
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/user/register", post(register))
        .route("/api/user/profile", get(get_profile))
        .route("/api/user/check_in", post(check_in))
        .route("/api/leaderboard", get(get_leaderboard))
}

pub async fn register(
    Json(req): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (profile, created) = db::create_profile(&req.email, req.full_name.as_deref()).await?;

    if created {
        if let Some(code) = req.referral_code.as_deref() {
            credit_referrer(&profile, code).await?;
        }
        tracing::info!(user = %profile.id, "profile registered");
    }

    Ok(Json(json!({ "status": "registered", "profile": profile })))
}

// Invite bonus goes to the referrer, once, and shows up in their history.
async fn credit_referrer(profile: &Profile, code: &str) -> Result<(), AppError> {
    let referrer = match db::profile_by_referral_code(code).await? {
        Some(r) => r,
        None => return Ok(()),
    };
    if !db::set_referrer(profile.id, referrer.id).await? {
        return Ok(());
    }

    let settings = db::get_settings().await?;
    db::add_points(referrer.id, settings.referral_bonus).await?;
    db::insert_transaction(NewTransaction {
        code: new_code("BN"),
        user_id: referrer.id,
        tx_type: TxType::Bonus,
        amount: 0.0,
        points: Some(settings.referral_bonus),
        status: TxStatus::Completed,
        payment_method: None,
        account_number: None,
        operator: None,
    })
    .await?;
    tracing::info!(
        referrer = %referrer.id,
        invited = %profile.id,
        bonus = settings.referral_bonus,
        "referral bonus credited"
    );
    Ok(())
}

pub async fn get_profile(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = uuid_param(&params, "user_id")?;
    let profile = require_profile(user_id).await?;
    let settings = db::get_settings().await?;

    let rank = db::rank_by_points(profile.points).await?;
    let referrals = db::referral_count(profile.id).await?;
    let completed = db::completed_task_ids(profile.id).await?;
    let total_earned =
        profile.points as f64 / settings.points_per_taka as f64 + profile.wallet_balance;

    Ok(Json(json!({
        "profile": profile,
        "rank": rank,
        "referrals": referrals,
        "tasks_completed": completed,
        "total_earned": total_earned,
        "app_notice": settings.app_notice,
        "support_link": settings.support_link,
    })))
}

pub async fn check_in(
    Json(req): Json<CheckInRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = require_profile(req.user_id).await?;
    let settings = db::get_settings().await?;
    ensure_can_transact(&profile, &settings)?;

    let now = chrono::Utc::now();
    if !ledger::check_in_due(profile.last_check_in, now) {
        return Err(ledger::LedgerError::AlreadyCheckedIn.into());
    }

    db::add_points(profile.id, settings.referral_bonus).await?;
    db::mark_checked_in(profile.id, now).await?;
    let tx = db::insert_transaction(NewTransaction {
        code: new_code("BN"),
        user_id: profile.id,
        tx_type: TxType::Bonus,
        amount: 0.0,
        points: Some(settings.referral_bonus),
        status: TxStatus::Completed,
        payment_method: None,
        account_number: None,
        operator: None,
    })
    .await?;

    tracing::info!(user = %profile.id, bonus = settings.referral_bonus, "daily bonus claimed");
    Ok(Json(json!({
        "status": "bonus claimed",
        "points_awarded": settings.referral_bonus,
        "transaction": tx,
    })))
}

pub async fn get_leaderboard() -> Result<Json<serde_json::Value>, AppError> {
    let top = db::leaderboard(5).await?;
    Ok(Json(json!({ "top_earners": top })))
}
