use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub points: i64,
    pub wallet_balance: f64,
    pub is_blocked: bool,
    pub referral_code: String,
    pub referred_by: Option<Uuid>,
    pub last_check_in: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub full_name: Option<String>,
    pub points: i64,
}

// Six uppercase alphanumerics, handed out as the user's invite code.
pub fn new_referral_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_codes_are_short_and_uppercase() {
        let code = new_referral_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn referral_codes_are_not_constant() {
        let codes: std::collections::HashSet<String> =
            (0..32).map(|_| new_referral_code()).collect();
        assert!(codes.len() > 1);
    }
}
