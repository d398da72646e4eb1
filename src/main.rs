mod cli;
mod core;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::config::AppConfig;
use crate::core::input::{parse_days, CreditInputs};

#[derive(Parser)]
#[command(name = "credits", about = "Credit bucket usage calculator", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug, Default)]
struct CreditArgs {
    /// Free credit amount (never expires)
    #[arg(long)]
    free: Option<String>,

    /// Package credit amount
    #[arg(long)]
    package: Option<String>,

    /// Package expiry (YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339)
    #[arg(long)]
    package_expiry: Option<String>,

    /// Top-up credit amount
    #[arg(long)]
    topup: Option<String>,

    /// Top-up expiry (default: one day from now)
    #[arg(long)]
    topup_expiry: Option<String>,

    /// Usage to deduct
    #[arg(short, long)]
    usage: Option<String>,
}

impl From<CreditArgs> for CreditInputs {
    fn from(args: CreditArgs) -> Self {
        Self {
            free: args.free,
            package: args.package,
            package_expiry: args.package_expiry,
            topup: args.topup,
            topup_expiry: args.topup_expiry,
            usage: args.usage,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Deduct usage from credit buckets and show the breakdown
    Allocate {
        #[command(flatten)]
        credits: CreditArgs,

        /// Reference date for expiry checks (default: now; a bare date means 00:00 UTC)
        #[arg(long)]
        at: Option<String>,
    },
    /// Simulate the allocation a number of days from now
    Scenario {
        #[command(flatten)]
        credits: CreditArgs,

        /// Days to add to the current date
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        days: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("credits=debug,info")
        } else {
            EnvFilter::new("credits=warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Some(Commands::Config { action }) = &cli.command {
        match action {
            ConfigAction::Init => cli::config_cmd::init()?,
            ConfigAction::Check => cli::config_cmd::check()?,
        }
        return Ok(());
    }

    let config = AppConfig::load().with_context(|| {
        format!(
            "Invalid config at {} (run `credits config check`)",
            AppConfig::config_path().display()
        )
    })?;

    let output_opts = cli::output::OutputOptions::resolve(
        cli.format.as_deref(),
        cli.json,
        cli.pretty,
        cli.no_color,
        &config.settings,
    );

    match cli.command {
        None => cli::allocate_cmd::run(CreditInputs::default(), None, &config, &output_opts)?,
        Some(Commands::Allocate { credits, at }) => {
            cli::allocate_cmd::run(credits.into(), at, &config, &output_opts)?
        }
        Some(Commands::Scenario { credits, days }) => {
            cli::scenario_cmd::run(credits.into(), parse_days(&days), &config, &output_opts)?
        }
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}
