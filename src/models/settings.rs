use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::transaction::PaymentMethod;

/// Global knobs, stored as the single row of `system_settings`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SystemSettings {
    pub min_withdrawal: f64,
    pub points_per_taka: i64,
    pub referral_bonus: i64,
    pub is_under_maintenance: bool,
    pub is_bkash_enabled: bool,
    pub is_nagad_enabled: bool,
    pub is_recharge_enabled: bool,
    pub is_giftcard_enabled: bool,
    pub is_auto_payout_enabled: bool,
    pub app_notice: String,
    pub support_link: String,
}

impl SystemSettings {
    pub fn channel_enabled(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Bkash => self.is_bkash_enabled,
            PaymentMethod::Nagad => self.is_nagad_enabled,
            PaymentMethod::Recharge => self.is_recharge_enabled,
            PaymentMethod::Giftcard => self.is_giftcard_enabled,
        }
    }
}
