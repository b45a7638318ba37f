use axum::http::StatusCode;
use tracing::info;

use crate::error::AppError;
use crate::models::transaction::{new_code, PaymentMethod};

pub const RECHARGE_OPERATORS: [&str; 5] = [
    "Grameenphone",
    "Banglalink",
    "Robi",
    "Airtel",
    "Teletalk",
];

/// Channel-level sanity checks on the destination account before any
/// balance is debited.
pub fn validate_account(
    method: PaymentMethod,
    account: &str,
    operator: Option<&str>,
) -> Result<(), AppError> {
    match method {
        PaymentMethod::Bkash | PaymentMethod::Nagad | PaymentMethod::Recharge => {
            let is_mobile = account.len() == 11
                && account.starts_with("01")
                && account.chars().all(|c| c.is_ascii_digit());
            if !is_mobile {
                return Err(AppError::new(
                    StatusCode::BAD_REQUEST,
                    "Account must be an 11-digit mobile number starting with 01",
                ));
            }
        }
        PaymentMethod::Giftcard => {
            if account.trim().len() < 5 {
                return Err(AppError::new(
                    StatusCode::BAD_REQUEST,
                    "Gift card details are too short",
                ));
            }
        }
    }

    if method == PaymentMethod::Recharge {
        match operator {
            Some(op) if RECHARGE_OPERATORS.contains(&op) => {}
            _ => {
                return Err(AppError::new(
                    StatusCode::BAD_REQUEST,
                    "Unknown recharge operator",
                ))
            }
        }
    }

    Ok(())
}

/// Hands an instant payout to the provider and returns its reference.
///
/// There is no real gateway behind this; it settles immediately with a
/// synthetic reference, matching the simulated instant payouts the
/// auto-payout toggle drives.
pub async fn dispatch(
    method: PaymentMethod,
    account: &str,
    amount: f64,
) -> Result<String, AppError> {
    let reference = new_code("AUTO");
    info!(
        method = method.as_str(),
        account,
        amount,
        reference = %reference,
        "💸 payout dispatched"
    );
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_accounts_must_be_eleven_digits() {
        assert!(validate_account(PaymentMethod::Bkash, "01712345678", None).is_ok());
        assert!(validate_account(PaymentMethod::Bkash, "0171234567", None).is_err());
        assert!(validate_account(PaymentMethod::Nagad, "11712345678", None).is_err());
        assert!(validate_account(PaymentMethod::Bkash, "01712x45678", None).is_err());
    }

    #[test]
    fn recharge_requires_a_known_operator() {
        assert!(
            validate_account(PaymentMethod::Recharge, "01712345678", Some("Robi")).is_ok()
        );
        assert!(validate_account(PaymentMethod::Recharge, "01712345678", None).is_err());
        assert!(
            validate_account(PaymentMethod::Recharge, "01712345678", Some("Vodafone")).is_err()
        );
    }

    #[test]
    fn giftcard_needs_some_detail() {
        assert!(validate_account(PaymentMethod::Giftcard, "Amazon user@mail.com", None).is_ok());
        assert!(validate_account(PaymentMethod::Giftcard, "abc", None).is_err());
    }

    #[tokio::test]
    async fn dispatch_returns_a_provider_reference() {
        let reference = dispatch(PaymentMethod::Bkash, "01712345678", 150.0)
            .await
            .unwrap();
        assert!(reference.starts_with("AUTO-"));
    }
}
