use axum::extract::Query;
use axum::http::StatusCode;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::{ensure_can_transact, require_profile, uuid_param};
use crate::models::transaction::{new_code, NewTransaction, PaymentMethod, TxStatus, TxType};
use crate::{db, error::AppError, ledger, payout};

#[derive(Deserialize)]
struct ConvertRequest {
    user_id: Uuid,
    points: i64,
}

#[derive(Deserialize)]
struct CashoutRequest {
    user_id: Uuid,
    amount: f64,
    method: PaymentMethod,
    account_number: String,
    operator: Option<String>,
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/wallet/convert", post(convert_points))
        .route("/api/wallet/cashout", post(request_cashout))
        .route("/api/wallet/transactions", get(get_transactions))
}

async fn convert_points(
    Json(req): Json<ConvertRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = require_profile(req.user_id).await?;
    let settings = db::get_settings().await?;
    ensure_can_transact(&profile, &settings)?;

    let cash = ledger::conversion_quote(req.points, profile.points, &settings)?;
    // Guarded debit: a concurrent spend from another session makes this a no-op.
    if !db::deduct_points(profile.id, req.points).await? {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "Insufficient points"));
    }
    db::credit_balance(profile.id, cash).await?;

    let tx = db::insert_transaction(NewTransaction {
        code: new_code("TX"),
        user_id: profile.id,
        tx_type: TxType::Conversion,
        amount: cash,
        points: Some(req.points),
        status: TxStatus::Completed,
        payment_method: None,
        account_number: None,
        operator: None,
    })
    .await?;

    tracing::info!(
        user = %profile.id,
        points = req.points,
        amount = cash,
        code = %tx.code,
        "points converted"
    );
    Ok(Json(json!({ "status": "converted", "transaction": tx })))
}

async fn request_cashout(
    Json(req): Json<CashoutRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = require_profile(req.user_id).await?;
    let settings = db::get_settings().await?;
    ensure_can_transact(&profile, &settings)?;

    ledger::validate_cashout(req.amount, profile.wallet_balance, req.method, &settings)?;
    payout::validate_account(req.method, &req.account_number, req.operator.as_deref())?;

    // The balance comes off up front; a rejected request is refunded later.
    if !db::debit_balance(profile.id, req.amount).await? {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "Insufficient balance"));
    }

    let operator = if req.method == PaymentMethod::Recharge {
        req.operator.clone()
    } else {
        None
    };

    if settings.is_auto_payout_enabled {
        let reference = payout::dispatch(req.method, &req.account_number, req.amount).await?;
        let tx = db::insert_transaction(NewTransaction {
            code: new_code("PAY"),
            user_id: profile.id,
            tx_type: TxType::Cashout,
            amount: req.amount,
            points: None,
            status: TxStatus::Completed,
            payment_method: Some(req.method),
            account_number: Some(req.account_number),
            operator,
        })
        .await?;
        Ok(Json(json!({
            "status": "completed",
            "provider_reference": reference,
            "transaction": tx,
        })))
    } else {
        let tx = db::insert_transaction(NewTransaction {
            code: new_code("REQ"),
            user_id: profile.id,
            tx_type: TxType::Cashout,
            amount: req.amount,
            points: None,
            status: TxStatus::Pending,
            payment_method: Some(req.method),
            account_number: Some(req.account_number),
            operator,
        })
        .await?;
        tracing::info!(user = %profile.id, amount = req.amount, code = %tx.code, "cashout queued for review");
        Ok(Json(json!({ "status": "pending review", "transaction": tx })))
    }
}

async fn get_transactions(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = uuid_param(&params, "user_id")?;
    require_profile(user_id).await?;
    let txs = db::transactions_for_user(user_id).await?;
    Ok(Json(json!(txs)))
}
