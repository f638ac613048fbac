//! Operator entry point for the retention batch runs.
//!
//! # Responsibility
//! - Resolve configuration from an optional TOML file plus flags.
//! - Trigger one batch run and print its report (text or JSON).
//!
//! # Invariants
//! - A failed run exits non-zero and prints no partial report.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::info;
use retention_core::db::open_db;
use retention_core::{
    init_logging, parse_date, run_all, LegalHoldPlan, LegalHoldService, RetentionConfig,
    RetentionPlan, RetentionService, SqliteDocumentRepository, SqliteEmployeeRepository,
};
use serde::Serialize;
use std::path::PathBuf;

/// retention - legal hold and retention status batches
#[derive(Parser, Debug)]
#[command(name = "retention")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync document legal-hold flags from employees
    LegalHold {
        /// List the flips without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Recompute document retention status and deletion dates
    Retention(RetentionArgs),

    /// Run legal hold, then retention
    All {
        /// Classification date, YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,
    },

    /// Check core linkage
    Ping,
}

#[derive(Args, Debug)]
struct RetentionArgs {
    /// Classification date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_today)]
    today: Option<NaiveDate>,

    /// List the updates without writing
    #[arg(long)]
    dry_run: bool,
}

fn parse_today(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("expected YYYY-MM-DD, got `{value}`"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if matches!(cli.command, Commands::Ping) {
        println!("retention_core ping={}", retention_core::ping());
        println!("retention_core version={}", retention_core::core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let directory = SqliteEmployeeRepository::try_new(&conn)?;
    let store = SqliteDocumentRepository::try_new(&conn)?;

    match cli.command {
        Commands::LegalHold { dry_run: true } => {
            let plan = LegalHoldService::new(&directory, &store).plan()?;
            emit(cli.json, &plan, || render_hold_plan(&plan))?;
        }
        Commands::LegalHold { dry_run: false } => {
            let report = LegalHoldService::new(&directory, &store)
                .with_batch_size(config.hold_batch_size)
                .run()
                .context("legal hold batch failed; earlier batches may already be applied")?;
            emit(cli.json, &report, || report.render_text())?;
        }
        Commands::Retention(args) if args.dry_run => {
            let today = args.today.unwrap_or_else(local_today);
            let plan = RetentionService::new(&directory, &store).plan(today)?;
            emit(cli.json, &plan, || render_retention_plan(&plan))?;
        }
        Commands::Retention(args) => {
            let today = args.today.unwrap_or_else(local_today);
            let report = RetentionService::new(&directory, &store)
                .run(today)
                .context("retention batch failed; earlier rows may already be written")?;
            emit(cli.json, &report, || report.render_text())?;
        }
        Commands::All { today } => {
            let today = today.unwrap_or_else(local_today);
            let report = run_all(&directory, &store, today, config.hold_batch_size)
                .context("maintenance pass failed; earlier writes may already be applied")?;
            emit(cli.json, &report, || {
                format!(
                    "{}\n{}",
                    report.legal_hold.render_text(),
                    report.retention.render_text()
                )
            })?;
        }
        Commands::Ping => {}
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<RetentionConfig> {
    let mut config = match &cli.config {
        Some(path) => RetentionConfig::load(path)?,
        None => RetentionConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if cli.log_level.is_some() && config.log_dir.is_none() {
        bail!("--log-level has no effect without --log-dir or `log_dir` in the config file");
    }
    config.validate()?;
    Ok(config)
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn emit<T: Serialize>(json: bool, report: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn render_hold_plan(plan: &LegalHoldPlan) -> String {
    if plan.is_empty() {
        return "Legal hold dry run: nothing to flip\n".to_string();
    }
    let mut out = format!(
        "Legal hold dry run: {} to activate, {} to remove\n",
        plan.activate.len(),
        plan.remove.len()
    );
    for d_id in &plan.activate {
        out.push_str(&format!("  activate {d_id}\n"));
    }
    for d_id in &plan.remove {
        out.push_str(&format!("  remove   {d_id}\n"));
    }
    out
}

fn render_retention_plan(plan: &RetentionPlan) -> String {
    let mut out = format!(
        "Retention dry run for {}: {} of {} documents would change\n",
        plan.today,
        plan.updates.len(),
        plan.documents_scanned
    );
    for update in &plan.updates {
        out.push_str(&format!(
            "  {} {} ({}) -> {} ({})\n",
            update.d_id,
            update.from_status,
            update.from_deletion.as_deref().unwrap_or("-"),
            update.to.status.as_str(),
            update.to.deletion_text().as_deref().unwrap_or("-")
        ));
    }
    out
}
