//! Balance and points transition rules.
//!
//! Every endpoint that moves points or wallet balance runs its inputs
//! through these checks before touching the store, so the rules live in
//! one place instead of being repeated per handler.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::settings::SystemSettings;
use crate::models::transaction::PaymentMethod;

/// Smallest exchange the conversion desk accepts.
pub const MIN_CONVERSION_POINTS: i64 = 1000;

/// Points granted per correct quiz answer.
pub const QUIZ_POINTS_PER_CORRECT: i64 = 50;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("minimum conversion is {0} points")]
    ConversionBelowMinimum(i64),
    #[error("insufficient points: have {have}, need {need}")]
    InsufficientPoints { have: i64, need: i64 },
    #[error("minimum withdrawal is {0:.2}")]
    BelowMinimumWithdrawal(f64),
    #[error("insufficient balance: have {have:.2}, need {need:.2}")]
    InsufficientBalance { have: f64, need: f64 },
    #[error("{0} payouts are currently disabled")]
    ChannelDisabled(&'static str),
    #[error("daily bonus already claimed today")]
    AlreadyCheckedIn,
    #[error("account is suspended")]
    AccountBlocked,
}

/// Currency credited for converting `points` at the configured rate.
pub fn conversion_quote(
    points: i64,
    have: i64,
    settings: &SystemSettings,
) -> Result<f64, LedgerError> {
    if points < MIN_CONVERSION_POINTS {
        return Err(LedgerError::ConversionBelowMinimum(MIN_CONVERSION_POINTS));
    }
    if points > have {
        return Err(LedgerError::InsufficientPoints { have, need: points });
    }
    Ok(points as f64 / settings.points_per_taka as f64)
}

/// Reward credited for a completed offer. The percentage is the user's
/// share of the listed points, floored.
pub fn task_award(reward_points: i64, reward_percentage: i32) -> i64 {
    reward_points * reward_percentage as i64 / 100
}

pub fn quiz_award(correct: usize) -> i64 {
    correct as i64 * QUIZ_POINTS_PER_CORRECT
}

/// A check-in is due once per UTC calendar day.
pub fn check_in_due(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last {
        Some(ts) => ts.date_naive() != now.date_naive(),
        None => true,
    }
}

pub fn validate_cashout(
    amount: f64,
    balance: f64,
    method: PaymentMethod,
    settings: &SystemSettings,
) -> Result<(), LedgerError> {
    if !settings.channel_enabled(method) {
        return Err(LedgerError::ChannelDisabled(method.as_str()));
    }
    if amount < settings.min_withdrawal {
        return Err(LedgerError::BelowMinimumWithdrawal(settings.min_withdrawal));
    }
    if amount > balance {
        return Err(LedgerError::InsufficientBalance {
            have: balance,
            need: amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn settings() -> SystemSettings {
        SystemSettings {
            min_withdrawal: 100.0,
            points_per_taka: 100,
            referral_bonus: 50,
            is_under_maintenance: false,
            is_bkash_enabled: true,
            is_nagad_enabled: true,
            is_recharge_enabled: true,
            is_giftcard_enabled: false,
            is_auto_payout_enabled: true,
            app_notice: String::new(),
            support_link: String::new(),
        }
    }

    #[test]
    fn conversion_below_minimum_is_rejected() {
        let err = conversion_quote(999, 5000, &settings()).unwrap_err();
        assert_eq!(err, LedgerError::ConversionBelowMinimum(1000));
    }

    #[test]
    fn conversion_needs_enough_points() {
        let err = conversion_quote(2000, 1500, &settings()).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientPoints {
                have: 1500,
                need: 2000
            }
        );
    }

    #[test]
    fn conversion_uses_the_configured_rate() {
        // 1000 points at 100 points per taka
        assert_eq!(conversion_quote(1000, 1000, &settings()).unwrap(), 10.0);
        let mut s = settings();
        s.points_per_taka = 200;
        assert_eq!(conversion_quote(1000, 1000, &s).unwrap(), 5.0);
    }

    #[test]
    fn task_award_floors_the_share() {
        assert_eq!(task_award(100, 100), 100);
        assert_eq!(task_award(150, 75), 112);
        assert_eq!(task_award(99, 50), 49);
        assert_eq!(task_award(500, 0), 0);
    }

    #[test]
    fn quiz_award_is_fifty_per_correct() {
        assert_eq!(quiz_award(0), 0);
        assert_eq!(quiz_award(3), 150);
    }

    #[test]
    fn check_in_due_once_per_day() {
        let noon = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert!(check_in_due(None, noon));
        assert!(!check_in_due(Some(noon - Duration::hours(3)), noon));
        assert!(check_in_due(Some(noon - Duration::days(1)), noon));
        // late evening to early morning still counts as a new day
        let night = Utc.with_ymd_and_hms(2024, 5, 10, 23, 50, 0).unwrap();
        assert!(check_in_due(Some(night), night + Duration::minutes(20)));
    }

    #[test]
    fn cashout_enforces_minimum_withdrawal() {
        let err = validate_cashout(50.0, 500.0, PaymentMethod::Bkash, &settings()).unwrap_err();
        assert_eq!(err, LedgerError::BelowMinimumWithdrawal(100.0));
    }

    #[test]
    fn cashout_needs_covering_balance() {
        let err = validate_cashout(200.0, 150.0, PaymentMethod::Nagad, &settings()).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                have: 150.0,
                need: 200.0
            }
        );
    }

    #[test]
    fn cashout_respects_channel_toggles() {
        let err = validate_cashout(200.0, 500.0, PaymentMethod::Giftcard, &settings()).unwrap_err();
        assert_eq!(err, LedgerError::ChannelDisabled("giftcard"));
        assert!(validate_cashout(200.0, 500.0, PaymentMethod::Recharge, &settings()).is_ok());
    }
}
