use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tx_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Conversion,
    Cashout,
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tx_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Bkash,
    Nagad,
    Recharge,
    Giftcard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Bkash => "bkash",
            PaymentMethod::Nagad => "nagad",
            PaymentMethod::Recharge => "recharge",
            PaymentMethod::Giftcard => "giftcard",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub tx_type: TxType,
    pub amount: f64,
    pub points: Option<i64>,
    pub status: TxStatus,
    pub payment_method: Option<PaymentMethod>,
    pub account_number: Option<String>,
    pub operator: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewTransaction {
    pub code: String,
    pub user_id: Uuid,
    pub tx_type: TxType,
    pub amount: f64,
    pub points: Option<i64>,
    pub status: TxStatus,
    pub payment_method: Option<PaymentMethod>,
    pub account_number: Option<String>,
    pub operator: Option<String>,
}

// User-facing reference: prefix plus nine uppercase alphanumerics,
// e.g. TX-8FK2Q1ZP4. Conversions use TX, instant payouts PAY, manual
// cashout requests REQ, bonuses BN.
pub fn new_code(prefix: &str) -> String {
    let tail: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("{}-{}", prefix, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_carry_their_prefix() {
        let code = new_code("REQ");
        assert!(code.starts_with("REQ-"));
        assert_eq!(code.len(), "REQ-".len() + 9);
    }

    #[test]
    fn code_tails_are_uppercase_alphanumeric() {
        let code = new_code("TX");
        let tail = code.strip_prefix("TX-").unwrap();
        assert!(tail.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
