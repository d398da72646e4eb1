use colored::{control, Colorize};

use crate::core::formatter::{format_amount, format_expiry, insufficient_credit_warning, status_line};
use crate::core::models::allocation::{AllocationResult, ScenarioReport};

/// Render an allocation as a colored (or plain) string.
///
/// Layout:
/// ```text
///  Credit usage
///   Remaining  30.00
///   Deducted   120.00
///   Breakdown
///     Used 50.00 from free credit
///     Used 70.00 from package credit (expires 2026-10-20 12:00 UTC)
/// ```
pub fn render_allocation(result: &AllocationResult, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(" Credit usage".bold().to_string());
    lines.push(format!(
        "  {}  {}",
        "Remaining".cyan(),
        format_amount(result.remaining_total)
    ));
    lines.push(format!(
        "  {}   {}",
        "Deducted".cyan(),
        format_amount(result.total_deducted())
    ));
    render_breakdown(&mut lines, result);

    lines.join("\n")
}

/// Render a future-scenario report.
///
/// Layout:
/// ```text
///  Future scenario (3 days later)
///   Date       2026-10-22 12:00 UTC
///   Remaining  100.00
///   Credit status
///     free credit: Valid (0.00 remaining)
///     topup credit: Expired (expires 2026-10-20 12:00 UTC) (0.00 remaining)
///   Breakdown
///     Used 50.00 from free credit
/// ```
pub fn render_scenario(report: &ScenarioReport, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(
        format!(" Future scenario ({} days later)", report.days)
            .bold()
            .to_string(),
    );
    lines.push(format!(
        "  {}       {}",
        "Date".cyan(),
        format_expiry(&report.reference_date)
    ));
    lines.push(format!(
        "  {}  {}",
        "Remaining".cyan(),
        format_amount(report.result.remaining_total)
    ));

    lines.push(format!("  {}", "Credit status".cyan()));
    for status in &report.statuses {
        let line = status_line(status);
        let line = if status.expired {
            line.dimmed().to_string()
        } else {
            line
        };
        lines.push(format!("    {}", line));
    }

    render_breakdown(&mut lines, &report.result);

    lines.join("\n")
}

fn render_breakdown(lines: &mut Vec<String>, result: &AllocationResult) {
    if !result.usage_breakdown.is_empty() {
        lines.push(format!("  {}", "Breakdown".cyan()));
        for entry in &result.usage_breakdown {
            let message = if entry.amount > 0.0 {
                entry.message.green()
            } else {
                entry.message.yellow()
            };
            lines.push(format!("    {}", message));
        }
    }

    if result.is_insufficient() {
        lines.push(format!(
            "  {}",
            insufficient_credit_warning(result.remaining_usage).red()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::allocator::{allocate, bucket_statuses};
    use crate::core::models::bucket::CreditBucket;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn buckets() -> Vec<CreditBucket> {
        vec![
            CreditBucket::free(50.0),
            CreditBucket::package(100.0, now() + Duration::days(1)),
            CreditBucket::topup(10.0, now() - Duration::days(1)),
        ]
    }

    #[test]
    fn render_contains_breakdown() {
        let result = allocate(&buckets(), 120.0, now());
        let output = render_allocation(&result, false);
        assert!(output.contains("Credit usage"));
        assert!(output.contains("Remaining  30.00"));
        assert!(output.contains("Deducted   120.00"));
        assert!(output.contains("Used 50.00 from free credit"));
        assert!(output.contains("Used 70.00 from package credit (expires 2026-10-20 12:00 UTC)"));
        assert!(!output.contains("Warning"));
    }

    #[test]
    fn render_contains_warning_when_insufficient() {
        let result = allocate(&buckets(), 200.0, now());
        let output = render_allocation(&result, false);
        assert!(output.contains("topup credit expired (value set to 0)"));
        assert!(output.contains("Warning: 50.00 could not be deducted (insufficient credit)"));
    }

    #[test]
    fn render_exact_cover_has_no_warning() {
        let result = allocate(&buckets(), 150.0, now());
        assert_eq!(result.remaining_usage, 0.0);
        assert_eq!(result.remaining_total, 0.0);
        let output = render_allocation(&result, false);
        assert!(output.contains("Remaining  0.00"));
        assert!(output.contains("Deducted   150.00"));
        assert!(!output.contains("Warning"));
        assert!(!output.contains("topup credit expired"));
    }

    #[test]
    fn render_no_ansi_when_color_false() {
        let result = allocate(&buckets(), 200.0, now());
        let output = render_allocation(&result, false);
        assert!(!output.contains('\x1b'), "output should not contain ANSI codes");
    }

    #[test]
    fn render_scenario_sections() {
        let at = now() + Duration::days(3);
        let result = allocate(&buckets(), 60.0, at);
        let report = ScenarioReport {
            days: 3,
            reference_date: at,
            statuses: bucket_statuses(&result.buckets, at),
            result,
        };
        let output = render_scenario(&report, false);
        assert!(output.contains("Future scenario (3 days later)"));
        assert!(output.contains("2026-10-22 12:00 UTC"));
        assert!(output.contains("free credit: Valid (0.00 remaining)"));
        assert!(output.contains("package credit: Expired"));
        assert!(output.contains("Warning: 10.00 could not be deducted (insufficient credit)"));
    }
}
