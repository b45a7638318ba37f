use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::config;
use crate::models::settings::SystemSettings;
use crate::models::task::{NewTask, Task, TaskUpdate};
use crate::models::transaction::{NewTransaction, Transaction, TxStatus};
use crate::models::user::{new_referral_code, LeaderboardEntry, Profile, UserRole};

pub static DB_POOL: Lazy<PgPool> = Lazy::new(|| {
    let url = config::get_env("DATABASE_URL");
    PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(&url)
        .expect("Failed to create DB pool")
});

pub async fn init_db() -> Result<(), sqlx::Error> {
    sqlx::migrate!()
        .run(&*DB_POOL)
        .await
        .map_err(|e| sqlx::Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    Ok(())
}

// Create profile if the email is new, otherwise return the existing row.
// The bool reports whether a row was actually created.
pub async fn create_profile(
    email: &str,
    full_name: Option<&str>,
) -> Result<(Profile, bool), sqlx::Error> {
    let inserted = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (id, email, full_name, referral_code)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(full_name)
    .bind(new_referral_code())
    .fetch_optional(&*DB_POOL)
    .await?;

    if let Some(profile) = inserted {
        return Ok((profile, true));
    }

    let existing = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_one(&*DB_POOL)
        .await?;
    Ok((existing, false))
}

pub async fn find_profile(id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(&*DB_POOL)
        .await
}

pub async fn profile_by_referral_code(code: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE referral_code = $1")
        .bind(code)
        .fetch_optional(&*DB_POOL)
        .await
}

// Link the referrer once; self-referrals and already-linked profiles are
// left untouched.
pub async fn set_referrer(user_id: Uuid, referrer_id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE profiles SET referred_by = $1
         WHERE id = $2 AND referred_by IS NULL AND id <> $1",
    )
    .bind(referrer_id)
    .bind(user_id)
    .execute(&*DB_POOL)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn add_points(user_id: Uuid, amount: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET points = points + $1 WHERE id = $2")
        .bind(amount)
        .bind(user_id)
        .execute(&*DB_POOL)
        .await?;
    Ok(())
}

// Guarded debit: loses the race instead of driving the ledger negative.
pub async fn deduct_points(user_id: Uuid, amount: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE profiles SET points = points - $1 WHERE id = $2 AND points >= $1",
    )
    .bind(amount)
    .bind(user_id)
    .execute(&*DB_POOL)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn credit_balance(user_id: Uuid, amount: f64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET wallet_balance = wallet_balance + $1 WHERE id = $2")
        .bind(amount)
        .bind(user_id)
        .execute(&*DB_POOL)
        .await?;
    Ok(())
}

pub async fn debit_balance(user_id: Uuid, amount: f64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE profiles SET wallet_balance = wallet_balance - $1
         WHERE id = $2 AND wallet_balance >= $1",
    )
    .bind(amount)
    .bind(user_id)
    .execute(&*DB_POOL)
    .await?;
    Ok(res.rows_affected() > 0)
}

// Admin adjustments clamp at zero rather than rejecting.
pub async fn adjust_points(user_id: Uuid, diff: i64) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET points = GREATEST(0, points + $1) WHERE id = $2 RETURNING *",
    )
    .bind(diff)
    .bind(user_id)
    .fetch_optional(&*DB_POOL)
    .await
}

pub async fn adjust_balance(user_id: Uuid, diff: f64) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET wallet_balance = GREATEST(0, wallet_balance + $1)
         WHERE id = $2 RETURNING *",
    )
    .bind(diff)
    .bind(user_id)
    .fetch_optional(&*DB_POOL)
    .await
}

pub async fn set_role(user_id: Uuid, role: UserRole) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("UPDATE profiles SET role = $1 WHERE id = $2")
        .bind(role)
        .bind(user_id)
        .execute(&*DB_POOL)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn toggle_blocked(user_id: Uuid) -> Result<Option<bool>, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "UPDATE profiles SET is_blocked = NOT is_blocked WHERE id = $1 RETURNING is_blocked",
    )
    .bind(user_id)
    .fetch_optional(&*DB_POOL)
    .await
}

pub async fn mark_checked_in(user_id: Uuid, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET last_check_in = $1 WHERE id = $2")
        .bind(at)
        .bind(user_id)
        .execute(&*DB_POOL)
        .await?;
    Ok(())
}

pub async fn leaderboard(limit: i64) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT full_name, points FROM profiles ORDER BY points DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(&*DB_POOL)
    .await
}

// 1-based position on the all-time points board.
pub async fn rank_by_points(points: i64) -> Result<i64, sqlx::Error> {
    let above = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE points > $1")
        .bind(points)
        .fetch_one(&*DB_POOL)
        .await?;
    Ok(above + 1)
}

pub async fn referral_count(user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE referred_by = $1")
        .bind(user_id)
        .fetch_one(&*DB_POOL)
        .await
}

pub async fn list_profiles(search: Option<&str>) -> Result<Vec<Profile>, sqlx::Error> {
    match search {
        Some(q) => {
            let pattern = format!("%{}%", q);
            sqlx::query_as::<_, Profile>(
                "SELECT * FROM profiles
                 WHERE email ILIKE $1 OR full_name ILIKE $1 OR id::text = $2
                 ORDER BY created_at DESC",
            )
            .bind(&pattern)
            .bind(q)
            .fetch_all(&*DB_POOL)
            .await
        }
        None => {
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_at DESC")
                .fetch_all(&*DB_POOL)
                .await
        }
    }
}

pub async fn active_tasks() -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE status = 'active' ORDER BY created_at DESC",
    )
    .fetch_all(&*DB_POOL)
    .await
}

pub async fn all_tasks() -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at DESC")
        .fetch_all(&*DB_POOL)
        .await
}

pub async fn find_task(id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(&*DB_POOL)
        .await
}

pub async fn insert_task(new: &NewTask) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, task_type, title, reward_points, reward_percentage, icon)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(new.task_type)
    .bind(&new.title)
    .bind(new.reward_points)
    .bind(new.reward_percentage)
    .bind(&new.icon)
    .fetch_one(&*DB_POOL)
    .await
}

pub async fn update_task(id: Uuid, update: &TaskUpdate) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET task_type = $1, title = $2, reward_points = $3,
             reward_percentage = $4, icon = $5, status = $6
         WHERE id = $7
         RETURNING *",
    )
    .bind(update.task_type)
    .bind(&update.title)
    .bind(update.reward_points)
    .bind(update.reward_percentage)
    .bind(&update.icon)
    .bind(update.status)
    .bind(id)
    .fetch_optional(&*DB_POOL)
    .await
}

pub async fn delete_task(id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(&*DB_POOL)
        .await?;
    Ok(res.rows_affected() > 0)
}

// One completion per user and task; the conflict target is the primary key.
pub async fn record_completion(user_id: Uuid, task_id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO completed_tasks (user_id, task_id) VALUES ($1, $2)
         ON CONFLICT (user_id, task_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(task_id)
    .execute(&*DB_POOL)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn completed_task_ids(user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT task_id FROM completed_tasks WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(&*DB_POOL)
        .await
}

pub async fn insert_transaction(new: NewTransaction) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "INSERT INTO transactions
             (id, code, user_id, tx_type, amount, points, status,
              payment_method, account_number, operator)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&new.code)
    .bind(new.user_id)
    .bind(new.tx_type)
    .bind(new.amount)
    .bind(new.points)
    .bind(new.status)
    .bind(new.payment_method)
    .bind(&new.account_number)
    .bind(&new.operator)
    .fetch_one(&*DB_POOL)
    .await
}

pub async fn transactions_for_user(user_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&*DB_POOL)
    .await
}

pub async fn list_transactions(status: Option<TxStatus>) -> Result<Vec<Transaction>, sqlx::Error> {
    match status {
        Some(s) => {
            sqlx::query_as::<_, Transaction>(
                "SELECT * FROM transactions WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(s)
            .fetch_all(&*DB_POOL)
            .await
        }
        None => {
            sqlx::query_as::<_, Transaction>(
                "SELECT * FROM transactions ORDER BY created_at DESC",
            )
            .fetch_all(&*DB_POOL)
            .await
        }
    }
}

pub async fn find_transaction(id: Uuid) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
        .bind(id)
        .fetch_optional(&*DB_POOL)
        .await
}

// Only pending transactions may change status; a second reviewer loses.
pub async fn settle_transaction(
    id: Uuid,
    status: TxStatus,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "UPDATE transactions SET status = $1
         WHERE id = $2 AND status = 'pending'
         RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(&*DB_POOL)
    .await
}

const SETTINGS_COLS: &str = "min_withdrawal, points_per_taka, referral_bonus, \
     is_under_maintenance, is_bkash_enabled, is_nagad_enabled, is_recharge_enabled, \
     is_giftcard_enabled, is_auto_payout_enabled, app_notice, support_link";

pub async fn get_settings() -> Result<SystemSettings, sqlx::Error> {
    let sql = format!("SELECT {} FROM system_settings WHERE id = 1", SETTINGS_COLS);
    sqlx::query_as::<_, SystemSettings>(&sql)
        .fetch_one(&*DB_POOL)
        .await
}

pub async fn update_settings(settings: &SystemSettings) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE system_settings
         SET min_withdrawal = $1, points_per_taka = $2, referral_bonus = $3,
             is_under_maintenance = $4, is_bkash_enabled = $5, is_nagad_enabled = $6,
             is_recharge_enabled = $7, is_giftcard_enabled = $8,
             is_auto_payout_enabled = $9, app_notice = $10, support_link = $11
         WHERE id = 1",
    )
    .bind(settings.min_withdrawal)
    .bind(settings.points_per_taka)
    .bind(settings.referral_bonus)
    .bind(settings.is_under_maintenance)
    .bind(settings.is_bkash_enabled)
    .bind(settings.is_nagad_enabled)
    .bind(settings.is_recharge_enabled)
    .bind(settings.is_giftcard_enabled)
    .bind(settings.is_auto_payout_enabled)
    .bind(&settings.app_notice)
    .bind(&settings.support_link)
    .execute(&*DB_POOL)
    .await?;
    Ok(())
}

pub async fn count_profiles() -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
        .fetch_one(&*DB_POOL)
        .await
}

pub async fn count_pending_cashouts() -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM transactions WHERE tx_type = 'cashout' AND status = 'pending'",
    )
    .fetch_one(&*DB_POOL)
    .await
}

pub async fn total_paid_out() -> Result<f64, sqlx::Error> {
    sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(amount), 0)
         FROM transactions WHERE tx_type = 'cashout' AND status = 'completed'",
    )
    .fetch_one(&*DB_POOL)
    .await
}

pub async fn total_points_outstanding() -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(points), 0)::BIGINT FROM profiles")
        .fetch_one(&*DB_POOL)
        .await
}
