use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    Free,
    Package,
    Topup,
}

impl CreditKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Package => "package",
            Self::Topup => "topup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Package => "Package",
            Self::Topup => "Top-up",
        }
    }
}

impl std::fmt::Display for CreditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One source of credit: a granted amount, what has been consumed from it,
/// and the instant after which the rest is unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditBucket {
    pub kind: CreditKind,
    /// Total granted value
    pub amount: f64,
    /// Cumulative amount already consumed
    #[serde(default)]
    pub used: f64,
    /// Ignored for free credits, which never expire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl CreditBucket {
    pub fn new(kind: CreditKind, amount: f64, expiry: Option<DateTime<Utc>>) -> Self {
        Self {
            kind,
            amount,
            used: 0.0,
            expiry,
        }
    }

    pub fn free(amount: f64) -> Self {
        Self::new(CreditKind::Free, amount, None)
    }

    pub fn package(amount: f64, expiry: DateTime<Utc>) -> Self {
        Self::new(CreditKind::Package, amount, Some(expiry))
    }

    pub fn topup(amount: f64, expiry: DateTime<Utc>) -> Self {
        Self::new(CreditKind::Topup, amount, Some(expiry))
    }

    pub fn is_free(&self) -> bool {
        self.kind == CreditKind::Free
    }

    /// Effective expiry instant. Always `None` for free credits.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        if self.is_free() {
            return None;
        }
        self.expiry
    }

    /// True iff the bucket has an expiry and `at` is strictly after it.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        matches!(self.expiry(), Some(expiry) if at > expiry)
    }

    /// Usable balance at `at`: zero once expired, otherwise `amount - used`
    /// clamped at zero.
    pub fn available_amount(&self, at: DateTime<Utc>) -> f64 {
        if self.is_expired(at) {
            return 0.0;
        }
        (self.amount - self.used).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn free_never_expires() {
        let bucket = CreditBucket::free(50.0);
        assert!(!bucket.is_expired(now()));
        assert!(!bucket.is_expired(now() + Duration::days(36_500)));
        assert!(!bucket.is_expired(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn free_ignores_explicit_expiry() {
        let bucket = CreditBucket::new(CreditKind::Free, 50.0, Some(now() - Duration::days(1)));
        assert_eq!(bucket.expiry(), None);
        assert!(!bucket.is_expired(now()));
        assert_eq!(bucket.available_amount(now()), 50.0);
    }

    #[test]
    fn expiry_is_strictly_after() {
        let bucket = CreditBucket::package(100.0, now());
        assert!(!bucket.is_expired(now()));
        assert!(bucket.is_expired(now() + Duration::seconds(1)));
    }

    #[test]
    fn available_amount_zero_when_expired() {
        let bucket = CreditBucket::topup(10.0, now() - Duration::hours(1));
        assert_eq!(bucket.available_amount(now()), 0.0);
    }

    #[test]
    fn available_amount_subtracts_used() {
        let bucket = CreditBucket {
            used: 30.0,
            ..CreditBucket::package(100.0, now() + Duration::days(1))
        };
        assert_eq!(bucket.available_amount(now()), 70.0);
    }

    #[test]
    fn available_amount_clamps_overused() {
        let bucket = CreditBucket {
            used: 15.0,
            ..CreditBucket::free(10.0)
        };
        assert_eq!(bucket.available_amount(now()), 0.0);
    }

    #[test]
    fn non_free_without_expiry_never_expires() {
        let bucket = CreditBucket::new(CreditKind::Package, 5.0, None);
        assert!(!bucket.is_expired(now()));
        assert_eq!(bucket.available_amount(now()), 5.0);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&CreditKind::Topup).unwrap();
        assert_eq!(json, "\"topup\"");
    }
}
