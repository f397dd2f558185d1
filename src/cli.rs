//! Command-line front end: loads a ledger snapshot and prints JSON views of it.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::errors::LedgerError;
use crate::ledger::{CatchUpPolicy, EntryFilter, MonthKey};
use crate::snapshot::LedgerSnapshot;
use crate::utils::persistence;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Usage(String),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Output failed: {0}")]
    Output(#[from] io::Error),
}

pub const USAGE: &str = "Usage: split_ledger_cli <command> <snapshot.json> [options]\n\
Commands:\n  \
balances <file>\n  \
settle <file>\n  \
log <file> [--participant NAME] [--from YYYY-MM-DD] [--to YYYY-MM-DD]\n  \
month <file> YYYY-MM\n  \
materialize <file> [--now RFC3339] [--all-missed] [--write]";

/// Runs one command against stdout.
pub fn run_cli<I>(args: I, config: &Config) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(args, config, &mut out)
}

/// Parses `args` (without the program name) and writes the command's JSON to `out`.
pub fn execute<I, W>(args: I, config: &Config, out: &mut W) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    let mut args = args.into_iter();
    let command = args.next().ok_or_else(usage)?;
    let path = args.next().map(PathBuf::from).ok_or_else(usage)?;
    let rest: Vec<String> = args.collect();

    let mut snapshot = persistence::load_snapshot_from_file(&path)?;
    snapshot.ensure_participants(config);
    tracing::debug!(command = %command, path = %path.display(), "running command");

    match command.as_str() {
        "balances" => {
            expect_no_options(&rest)?;
            print_json(out, &snapshot.summary())
        }
        "settle" => {
            expect_no_options(&rest)?;
            let plan = snapshot.settlement_plan();
            if let Some(residual) = &plan.residual {
                tracing::warn!(
                    leftover = %residual.total(),
                    "ledger balances do not sum to zero"
                );
            }
            print_json(out, &plan)
        }
        "log" => {
            let filter = parse_filter(&rest)?;
            print_json(out, &snapshot.log(&filter))
        }
        "month" => {
            let [raw] = rest.as_slice() else {
                return Err(usage());
            };
            let month: MonthKey = raw.parse().map_err(CliError::Input)?;
            print_json(out, &snapshot.monthly_summary(month))
        }
        "materialize" => materialize(snapshot, &path, &rest, config, out),
        other => Err(CliError::Usage(format!("Unknown command `{other}`\n{USAGE}"))),
    }
}

fn materialize<W: Write>(
    mut snapshot: LedgerSnapshot,
    path: &std::path::Path,
    options: &[String],
    config: &Config,
    out: &mut W,
) -> Result<(), CliError> {
    let mut now = Utc::now();
    let mut policy = config.recurring_catch_up;
    let mut write = false;

    let mut options = options.iter();
    while let Some(option) = options.next() {
        match option.as_str() {
            "--now" => now = parse_instant(option_value(option, options.next())?)?,
            "--all-missed" => policy = CatchUpPolicy::AllMissed,
            "--write" => write = true,
            other => return Err(CliError::Input(format!("unknown option `{other}`"))),
        }
    }

    let batch = snapshot.materialize(now, policy);
    print_json(out, &batch)?;
    if write && !batch.is_empty() {
        snapshot.apply_batch(batch)?;
        persistence::save_snapshot_to_file(&snapshot, path)?;
        tracing::info!(path = %path.display(), "saved ledger snapshot");
    }
    Ok(())
}

fn parse_filter(options: &[String]) -> Result<EntryFilter, CliError> {
    let mut filter = EntryFilter::default();
    let mut options = options.iter();
    while let Some(option) = options.next() {
        let value = option_value(option, options.next())?;
        match option.as_str() {
            "--participant" => filter = filter.participant(value),
            "--from" => filter.from = Some(parse_date(value)?),
            "--to" => filter.to = Some(parse_date(value)?),
            other => return Err(CliError::Input(format!("unknown option `{other}`"))),
        }
    }
    Ok(filter)
}

fn option_value<'a>(option: &str, value: Option<&'a String>) -> Result<&'a str, CliError> {
    value
        .map(String::as_str)
        .ok_or_else(|| CliError::Input(format!("`{option}` expects a value")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CliError::Input(format!("expected YYYY-MM-DD, got `{raw}`")))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| CliError::Input(format!("expected an RFC 3339 timestamp, got `{raw}`")))
}

fn expect_no_options(options: &[String]) -> Result<(), CliError> {
    match options.first() {
        Some(extra) => Err(CliError::Input(format!("unexpected argument `{extra}`"))),
        None => Ok(()),
    }
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(LedgerError::from)?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn usage() -> CliError {
    CliError::Usage(USAGE.to_string())
}
