use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    VideoAd,
    GameInstall,
    Offerwall,
    Quiz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
    Inactive,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub task_type: TaskType,
    pub title: String,
    pub reward_points: i64,
    pub reward_percentage: i32,
    pub status: TaskStatus,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an offer, by hand or via bulk import of externally
/// generated ones.
#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub task_type: TaskType,
    pub title: String,
    pub reward_points: i64,
    #[serde(default = "default_percentage")]
    pub reward_percentage: i32,
    #[serde(default = "default_icon")]
    pub icon: String,
}

/// Full-row update sent from the admin task editor.
#[derive(Debug, Deserialize)]
pub struct TaskUpdate {
    pub task_type: TaskType,
    pub title: String,
    pub reward_points: i64,
    pub reward_percentage: i32,
    pub icon: String,
    pub status: TaskStatus,
}

fn default_percentage() -> i32 {
    100
}

fn default_icon() -> String {
    "🎯".to_string()
}
