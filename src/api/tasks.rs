use axum::http::StatusCode;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::{ensure_can_transact, require_profile};
use crate::models::task::{TaskStatus, TaskType};
use crate::{db, error::AppError, ledger, quiz};

#[derive(Deserialize)]
struct CompleteTaskRequest {
    user_id: Uuid,
    task_id: Uuid,
}

#[derive(Deserialize)]
struct QuizSubmission {
    user_id: Uuid,
    task_id: Uuid,
    answers: Vec<usize>,
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/tasks", get(get_tasks))
        .route("/api/tasks/complete", post(complete_task))
        .route("/api/quiz", get(get_quiz))
        .route("/api/quiz/submit", post(submit_quiz))
}

async fn get_tasks() -> Result<Json<serde_json::Value>, AppError> {
    let tasks = db::active_tasks().await?;
    Ok(Json(json!(tasks)))
}

async fn complete_task(
    Json(req): Json<CompleteTaskRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = require_profile(req.user_id).await?;
    let settings = db::get_settings().await?;
    ensure_can_transact(&profile, &settings)?;

    let task = db::find_task(req.task_id)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Unknown task"))?;
    if task.status != TaskStatus::Active {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "Task is not active"));
    }
    if task.task_type == TaskType::Quiz {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Quiz offers are rewarded through answer submission",
        ));
    }
    if !db::record_completion(profile.id, task.id).await? {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "Task already completed"));
    }

    let awarded = ledger::task_award(task.reward_points, task.reward_percentage);
    db::add_points(profile.id, awarded).await?;

    tracing::info!(user = %profile.id, task = %task.id, awarded, "task reward credited");
    Ok(Json(json!({ "status": "task recorded", "points_awarded": awarded })))
}

async fn get_quiz() -> Json<serde_json::Value> {
    Json(json!({
        "questions": quiz::QUESTIONS,
        "points_per_correct": ledger::QUIZ_POINTS_PER_CORRECT,
    }))
}

async fn submit_quiz(
    Json(req): Json<QuizSubmission>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = require_profile(req.user_id).await?;
    let settings = db::get_settings().await?;
    ensure_can_transact(&profile, &settings)?;

    let task = db::find_task(req.task_id)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "Unknown task"))?;
    if task.status != TaskStatus::Active || task.task_type != TaskType::Quiz {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "Not an active quiz offer"));
    }
    if !db::record_completion(profile.id, task.id).await? {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "Quiz already completed"));
    }

    let score = quiz::grade(&req.answers);
    let awarded = ledger::quiz_award(score);
    if awarded > 0 {
        db::add_points(profile.id, awarded).await?;
    }

    tracing::info!(user = %profile.id, task = %task.id, score, awarded, "quiz graded");
    Ok(Json(json!({
        "score": score,
        "total": quiz::QUESTIONS.len(),
        "points_awarded": awarded,
    })))
}
