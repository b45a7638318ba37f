use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::{require_admin, uuid_param};
use crate::models::settings::SystemSettings;
use crate::models::task::{NewTask, TaskUpdate};
use crate::models::transaction::{TxStatus, TxType};
use crate::models::user::UserRole;
use crate::{db, error::AppError};

#[derive(Deserialize)]
struct AdjustUserRequest {
    admin_id: Uuid,
    user_id: Uuid,
    points_diff: Option<i64>,
    balance_diff: Option<f64>,
}

#[derive(Deserialize)]
struct SetRoleRequest {
    admin_id: Uuid,
    user_id: Uuid,
    role: UserRole,
}

#[derive(Deserialize)]
struct ToggleBlockRequest {
    admin_id: Uuid,
    user_id: Uuid,
}

#[derive(Deserialize)]
struct CreateTaskRequest {
    admin_id: Uuid,
    #[serde(flatten)]
    task: NewTask,
}

#[derive(Deserialize)]
struct ImportTasksRequest {
    admin_id: Uuid,
    tasks: Vec<NewTask>,
}

#[derive(Deserialize)]
struct UpdateTaskRequest {
    admin_id: Uuid,
    #[serde(flatten)]
    task: TaskUpdate,
}

#[derive(Deserialize)]
struct ReviewTransactionRequest {
    admin_id: Uuid,
    transaction_id: Uuid,
    status: TxStatus,
}

#[derive(Deserialize)]
struct UpdateSettingsRequest {
    admin_id: Uuid,
    #[serde(flatten)]
    settings: SystemSettings,
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/adjust", post(adjust_user))
        .route("/api/admin/users/role", post(set_role))
        .route("/api/admin/users/block", post(toggle_block))
        .route("/api/admin/tasks", get(list_tasks).post(create_task))
        .route("/api/admin/tasks/import", post(import_tasks))
        .route("/api/admin/tasks/:id", axum::routing::put(update_task).delete(delete_task))
        .route("/api/admin/transactions", get(list_transactions))
        .route("/api/admin/transactions/review", post(review_transaction))
        .route("/api/admin/settings", get(get_settings).put(update_settings))
        .route("/api/admin/stats", get(get_stats))
}

async fn list_users(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(uuid_param(&params, "admin_id")?).await?;
    let users = db::list_profiles(params.get("search").map(String::as_str)).await?;
    Ok(Json(json!(users)))
}

async fn adjust_user(
    Json(req): Json<AdjustUserRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;

    let mut profile = None;
    if let Some(diff) = req.points_diff {
        profile = db::adjust_points(req.user_id, diff).await?;
        if profile.is_none() {
            return Err(AppError::new(StatusCode::NOT_FOUND, "Unknown user"));
        }
    }
    if let Some(diff) = req.balance_diff {
        profile = db::adjust_balance(req.user_id, diff).await?;
        if profile.is_none() {
            return Err(AppError::new(StatusCode::NOT_FOUND, "Unknown user"));
        }
    }
    let profile = match profile {
        Some(p) => p,
        None => {
            return Err(AppError::new(
                StatusCode::BAD_REQUEST,
                "Nothing to adjust",
            ))
        }
    };

    tracing::info!(
        admin = %req.admin_id,
        user = %req.user_id,
        points_diff = req.points_diff,
        balance_diff = req.balance_diff,
        "manual ledger adjustment"
    );
    Ok(Json(json!({ "status": "adjusted", "profile": profile })))
}

async fn set_role(Json(req): Json<SetRoleRequest>) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;
    if req.admin_id == req.user_id {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "You cannot change your own role",
        ));
    }
    if !db::set_role(req.user_id, req.role).await? {
        return Err(AppError::new(StatusCode::NOT_FOUND, "Unknown user"));
    }
    Ok(Json(json!({ "status": "role updated" })))
}

async fn toggle_block(
    Json(req): Json<ToggleBlockRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;
    let blocked = db::toggle_blocked(req.user_id)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Unknown user"))?;
    tracing::info!(admin = %req.admin_id, user = %req.user_id, blocked, "block toggled");
    Ok(Json(json!({ "status": "updated", "is_blocked": blocked })))
}

async fn list_tasks(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(uuid_param(&params, "admin_id")?).await?;
    let tasks = db::all_tasks().await?;
    Ok(Json(json!(tasks)))
}

async fn create_task(
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;
    let task = db::insert_task(&req.task).await?;
    Ok(Json(json!({ "status": "created", "task": task })))
}

// Batch insert for offers produced by the external generator.
async fn import_tasks(
    Json(req): Json<ImportTasksRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;
    let mut imported = Vec::with_capacity(req.tasks.len());
    for task in &req.tasks {
        imported.push(db::insert_task(task).await?);
    }
    tracing::info!(admin = %req.admin_id, count = imported.len(), "offers imported");
    Ok(Json(json!({ "status": "imported", "tasks": imported })))
}

async fn update_task(
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;
    let task = db::update_task(id, &req.task)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Unknown task"))?;
    Ok(Json(json!({ "status": "updated", "task": task })))
}

async fn delete_task(
    Path(id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(uuid_param(&params, "admin_id")?).await?;
    if !db::delete_task(id).await? {
        return Err(AppError::new(StatusCode::NOT_FOUND, "Unknown task"));
    }
    Ok(Json(json!({ "status": "deleted" })))
}

async fn list_transactions(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(uuid_param(&params, "admin_id")?).await?;
    let status = match params.get("status").map(String::as_str) {
        None => None,
        Some("pending") => Some(TxStatus::Pending),
        Some("completed") => Some(TxStatus::Completed),
        Some("failed") => Some(TxStatus::Failed),
        Some(_) => {
            return Err(AppError::new(StatusCode::BAD_REQUEST, "Invalid status param"))
        }
    };
    let txs = db::list_transactions(status).await?;
    Ok(Json(json!(txs)))
}

// Approving marks the request completed; rejecting puts the debited
// amount back on the user's balance.
async fn review_transaction(
    Json(req): Json<ReviewTransactionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;
    if req.status == TxStatus::Pending {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Status must be completed or failed",
        ));
    }

    let existing = db::find_transaction(req.transaction_id)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Unknown transaction"))?;
    if existing.status != TxStatus::Pending {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Only pending transactions can be reviewed",
        ));
    }

    let tx = db::settle_transaction(req.transaction_id, req.status)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::CONFLICT, "Transaction already reviewed"))?;

    if tx.tx_type == TxType::Cashout && req.status == TxStatus::Failed {
        db::credit_balance(tx.user_id, tx.amount).await?;
        tracing::info!(
            user = %tx.user_id,
            amount = tx.amount,
            code = %tx.code,
            "cashout rejected, balance refunded"
        );
    }

    Ok(Json(json!({ "status": "reviewed", "transaction": tx })))
}

async fn get_settings(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(uuid_param(&params, "admin_id")?).await?;
    let settings = db::get_settings().await?;
    Ok(Json(json!(settings)))
}

async fn update_settings(
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(req.admin_id).await?;
    db::update_settings(&req.settings).await?;
    tracing::info!(admin = %req.admin_id, "system settings updated");
    Ok(Json(json!({ "status": "settings saved" })))
}

async fn get_stats(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(uuid_param(&params, "admin_id")?).await?;
    Ok(Json(json!({
        "total_users": db::count_profiles().await?,
        "pending_cashouts": db::count_pending_cashouts().await?,
        "total_paid_out": db::total_paid_out().await?,
        "points_outstanding": db::total_points_outstanding().await?,
    })))
}
