use chrono::{DateTime, Utc};

use crate::core::models::allocation::BucketStatus;
use crate::core::models::bucket::CreditKind;

/// Returns the amount with two decimals, e.g. "12.50".
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Returns "2026-10-20 12:00 UTC".
pub fn format_expiry(expiry: &DateTime<Utc>) -> String {
    expiry.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn expiry_suffix(expiry: Option<&DateTime<Utc>>) -> String {
    expiry
        .map(|e| format!(" (expires {})", format_expiry(e)))
        .unwrap_or_default()
}

/// Returns "Used 50.00 from free credit" plus " (expires …)" when the bucket
/// has an expiry.
pub fn deduction_message(kind: CreditKind, amount: f64, expiry: Option<&DateTime<Utc>>) -> String {
    format!(
        "Used {} from {} credit{}",
        format_amount(amount),
        kind,
        expiry_suffix(expiry)
    )
}

/// Returns "package credit expired (value set to 0)".
pub fn expired_message(kind: CreditKind) -> String {
    format!("{} credit expired (value set to 0)", kind)
}

/// Returns "Warning: 12.00 could not be deducted (insufficient credit)".
pub fn insufficient_credit_warning(remaining_usage: f64) -> String {
    format!(
        "Warning: {} could not be deducted (insufficient credit)",
        format_amount(remaining_usage)
    )
}

/// Returns "topup credit: Expired (expires …) (0.00 remaining)".
pub fn status_line(status: &BucketStatus) -> String {
    format!(
        "{} credit: {}{} ({} remaining)",
        status.kind,
        if status.expired { "Expired" } else { "Valid" },
        expiry_suffix(status.expires_at.as_ref()),
        format_amount(status.available)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn format_amount_two_decimals() {
        assert_eq!(format_amount(12.5), "12.50");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(70.004), "70.00");
    }

    #[test]
    fn format_expiry_utc() {
        assert_eq!(format_expiry(&expiry()), "2026-10-20 12:00 UTC");
    }

    #[test]
    fn deduction_message_without_expiry() {
        assert_eq!(
            deduction_message(CreditKind::Free, 50.0, None),
            "Used 50.00 from free credit"
        );
    }

    #[test]
    fn deduction_message_with_expiry() {
        assert_eq!(
            deduction_message(CreditKind::Package, 70.0, Some(&expiry())),
            "Used 70.00 from package credit (expires 2026-10-20 12:00 UTC)"
        );
    }

    #[test]
    fn expired_message_names_kind() {
        assert_eq!(
            expired_message(CreditKind::Topup),
            "topup credit expired (value set to 0)"
        );
    }

    #[test]
    fn warning_text() {
        assert_eq!(
            insufficient_credit_warning(12.0),
            "Warning: 12.00 could not be deducted (insufficient credit)"
        );
    }

    #[test]
    fn status_line_expired_and_valid() {
        let expired = BucketStatus {
            kind: CreditKind::Topup,
            expired: true,
            expires_at: Some(expiry()),
            available: 0.0,
        };
        assert_eq!(
            status_line(&expired),
            "topup credit: Expired (expires 2026-10-20 12:00 UTC) (0.00 remaining)"
        );

        let valid = BucketStatus {
            kind: CreditKind::Free,
            expired: false,
            expires_at: None,
            available: 25.0,
        };
        assert_eq!(status_line(&valid), "free credit: Valid (25.00 remaining)");
    }
}
