use anyhow::Result;

use crate::core::config::AppConfig;
use crate::core::formatter::format_amount;
use crate::core::models::bucket::CreditKind;

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    match AppConfig::default().save() {
        Ok(path) => {
            println!("Generated config at {}", path.display());
            println!("  Set default credit amounts under [credits].");
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn check() -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        eprintln!("No config file found at {}", path.display());
        eprintln!("Run `credits config init` to create one.");
        return Ok(());
    }

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        let credits = &config.credits;
        for (kind, amount, expiry) in [
            (CreditKind::Free, credits.free, None),
            (CreditKind::Package, credits.package, credits.package_expiry.as_deref()),
            (CreditKind::Topup, credits.topup, credits.topup_expiry.as_deref()),
        ] {
            println!(
                "  {:<9} {}{}",
                kind.display_name(),
                format_amount(amount),
                expiry.map(|e| format!(" (expires {})", e)).unwrap_or_default()
            );
        }
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}
