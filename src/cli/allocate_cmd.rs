use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::allocator::allocate;
use crate::core::config::AppConfig;
use crate::core::input::{build_buckets, parse_reference_date, usage_of, CreditInputs};
use crate::core::models::bucket::CreditBucket;

/// Merge flags with config defaults and build the bucket set plus usage.
pub fn gather(
    mut inputs: CreditInputs,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<(Vec<CreditBucket>, f64)> {
    config.credits.fill(&mut inputs);
    let buckets = build_buckets(&inputs, now).context("Invalid credit input")?;
    let usage = usage_of(&inputs);
    tracing::debug!(?buckets, usage, "gathered inputs");
    Ok((buckets, usage))
}

pub fn print_json<T: Serialize>(value: &T, opts: &OutputOptions) -> Result<()> {
    let json = if opts.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

pub fn run(inputs: CreditInputs, at: Option<String>, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let now = Utc::now();
    let at = match at.as_deref() {
        Some(raw) => parse_reference_date("reference date", raw).context("Invalid --at value")?,
        None => now,
    };

    let (buckets, usage) = gather(inputs, config, now)?;
    let result = allocate(&buckets, usage, at);

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_allocation(&result, opts.use_color));
        }
        OutputFormat::Json => print_json(&result, opts)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CreditDefaults;
    use crate::core::models::bucket::CreditKind;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn gather_uses_config_defaults() {
        let config = AppConfig {
            credits: CreditDefaults {
                free: 50.0,
                package: 100.0,
                package_expiry: Some("2026-10-20T12:00:00Z".to_string()),
                topup: 0.0,
                topup_expiry: None,
            },
            ..Default::default()
        };
        let inputs = CreditInputs {
            usage: Some("120".to_string()),
            ..Default::default()
        };
        let (buckets, usage) = gather(inputs, &config, now()).unwrap();
        assert_eq!(usage, 120.0);

        let result = allocate(&buckets, usage, now());
        let deducted: Vec<_> = result
            .usage_breakdown
            .iter()
            .filter(|e| e.amount > 0.0)
            .map(|e| (e.kind, e.amount))
            .collect();
        assert_eq!(
            deducted,
            vec![(CreditKind::Free, 50.0), (CreditKind::Package, 70.0)]
        );
        assert_eq!(result.remaining_usage, 0.0);
    }

    #[test]
    fn gather_reports_invalid_date() {
        let inputs = CreditInputs {
            package: Some("10".to_string()),
            package_expiry: Some("tomorrow".to_string()),
            ..Default::default()
        };
        let err = gather(inputs, &AppConfig::default(), now()).unwrap_err();
        assert!(format!("{:#}", err).contains("tomorrow"));
    }

    #[test]
    fn result_serializes_to_json() {
        let (buckets, _) = gather(
            CreditInputs {
                free: Some("5".to_string()),
                ..Default::default()
            },
            &AppConfig::default(),
            now(),
        )
        .unwrap();
        let result = allocate(&buckets, 8.0, now());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["remaining_usage"], 3.0);
        assert_eq!(value["usage_breakdown"][0]["kind"], "free");
        assert_eq!(value["usage_breakdown"][0]["amount"], 5.0);
        assert!(value["usage_breakdown"][0].get("expires_at").is_none());
    }
}
