use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::models::bucket::{CreditBucket, CreditKind};

/// One line of an allocation: how much came out of a bucket, or that the
/// bucket had nothing to give.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub kind: CreditKind,
    /// Amount deducted (0 for unavailable buckets)
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Usage that no bucket could cover
    pub remaining_usage: f64,
    /// Entries in processing (priority) order
    pub usage_breakdown: Vec<BreakdownEntry>,
    /// Sum of available amounts after deduction
    pub remaining_total: f64,
    /// Post-allocation bucket snapshots, in input order
    pub buckets: Vec<CreditBucket>,
}

impl AllocationResult {
    pub fn total_deducted(&self) -> f64 {
        self.usage_breakdown.iter().map(|e| e.amount).sum()
    }

    pub fn is_insufficient(&self) -> bool {
        self.remaining_usage > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStatus {
    pub kind: CreditKind,
    pub expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub available: f64,
}

/// Allocation evaluated at a reference date shifted from now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub days: i64,
    pub reference_date: DateTime<Utc>,
    pub statuses: Vec<BucketStatus>,
    #[serde(flatten)]
    pub result: AllocationResult,
}
