use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::formatter::{deduction_message, expired_message};
use crate::core::models::allocation::{AllocationResult, BreakdownEntry, BucketStatus};
use crate::core::models::bucket::CreditBucket;

/// Ordering key: free first, then non-expired before expired, then soonest
/// expiry. Free and expired buckets carry `MAX_UTC` so they tie with each
/// other and keep input order under a stable sort.
fn priority_key(bucket: &CreditBucket, at: DateTime<Utc>) -> (u8, u8, DateTime<Utc>) {
    if bucket.is_free() {
        return (0, 0, DateTime::<Utc>::MAX_UTC);
    }
    if bucket.is_expired(at) {
        return (1, 1, DateTime::<Utc>::MAX_UTC);
    }
    (1, 0, bucket.expiry().unwrap_or(DateTime::<Utc>::MAX_UTC))
}

/// Indices of `buckets` in consumption order at `at`.
pub fn priority_order(buckets: &[CreditBucket], at: DateTime<Utc>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..buckets.len()).collect();
    order.sort_by_key(|&i| priority_key(&buckets[i], at));
    order
}

/// Deduct `usage_amount` from `buckets` in priority order as of `at`.
///
/// The input is left untouched; the result carries snapshots of every bucket
/// with `used` increased by what was taken from it. A positive
/// `remaining_usage` means the buckets could not cover the request.
pub fn allocate(buckets: &[CreditBucket], usage_amount: f64, at: DateTime<Utc>) -> AllocationResult {
    let mut snapshots: Vec<CreditBucket> = buckets.to_vec();
    let order = priority_order(&snapshots, at);
    debug!(
        order = ?order.iter().map(|&i| snapshots[i].kind).collect::<Vec<_>>(),
        usage_amount,
        "allocating usage"
    );

    let mut remaining_usage = usage_amount;
    let mut usage_breakdown: Vec<BreakdownEntry> = Vec::new();

    for index in order {
        if remaining_usage <= 0.0 {
            break;
        }

        let bucket = &mut snapshots[index];
        let available = bucket.available_amount(at);

        if available <= 0.0 {
            debug!(kind = %bucket.kind, "bucket unavailable");
            usage_breakdown.push(BreakdownEntry {
                kind: bucket.kind,
                amount: 0.0,
                expires_at: bucket.expiry(),
                message: expired_message(bucket.kind),
            });
            continue;
        }

        let deduction = available.min(remaining_usage);
        if deduction > 0.0 {
            bucket.used += deduction;
            remaining_usage -= deduction;
            debug!(kind = %bucket.kind, deduction, remaining_usage, "deducted");

            let expires_at = bucket.expiry();
            usage_breakdown.push(BreakdownEntry {
                kind: bucket.kind,
                amount: deduction,
                expires_at,
                message: deduction_message(bucket.kind, deduction, expires_at.as_ref()),
            });
        }
    }

    let remaining_total = snapshots.iter().map(|b| b.available_amount(at)).sum();

    AllocationResult {
        remaining_usage,
        usage_breakdown,
        remaining_total,
        buckets: snapshots,
    }
}

/// Validity and availability of each bucket at `at`, in input order.
pub fn bucket_statuses(buckets: &[CreditBucket], at: DateTime<Utc>) -> Vec<BucketStatus> {
    buckets
        .iter()
        .map(|b| BucketStatus {
            kind: b.kind,
            expired: b.is_expired(at),
            expires_at: b.expiry(),
            available: b.available_amount(at),
        })
        .collect()
}
