use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::cli::allocate_cmd::{gather, print_json};
use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::allocator::{allocate, bucket_statuses};
use crate::core::config::AppConfig;
use crate::core::input::{offset_date, CreditInputs};
use crate::core::models::allocation::ScenarioReport;

/// Allocate as if `days` had passed since `now`. Bucket statuses reflect the
/// post-allocation balances.
pub fn build_report(
    inputs: CreditInputs,
    days: i64,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<ScenarioReport> {
    let (buckets, usage) = gather(inputs, config, now)?;
    let reference_date = offset_date(now, days).context("Invalid --days value")?;
    let result = allocate(&buckets, usage, reference_date);
    let statuses = bucket_statuses(&result.buckets, reference_date);

    Ok(ScenarioReport {
        days,
        reference_date,
        statuses,
        result,
    })
}

pub fn run(inputs: CreditInputs, days: i64, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let report = build_report(inputs, days, config, Utc::now())?;

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_scenario(&report, opts.use_color));
        }
        OutputFormat::Json => print_json(&report, opts)?,
    }

    Ok(())
}
