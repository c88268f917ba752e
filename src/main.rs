// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use njmarkets::{config::Config, export, MarketRecord, RecordStore, Summary};
use std::{
    io::{self, Write},
    path::PathBuf,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Query the New Jersey farmers market table")]
struct Args {
    /// YAML config file (defaults to $NJMARKETS_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Market table to load, overriding the config
    #[arg(short, long)]
    source: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every market
    List,
    /// Markets carrying a tag, e.g. WIC
    Tag { tag: String },
    /// Markets whose name contains a substring
    Find { substring: String },
    /// Coverage counts and load diagnostics
    Summary,
    /// Normalised website URLs, one per line
    Websites {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// All markets as JSON
    Json {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) config ───────────────────────────────────────────────────
    let mut cfg = Config::resolve(args.config.as_deref()).context("loading config")?;
    if let Some(source) = args.source {
        cfg.source = source;
    }

    // ─── 2) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // ─── 3) load ─────────────────────────────────────────────────────
    let opts = cfg.load_options()?;
    let store = RecordStore::load_with(&cfg.source, &opts)
        .with_context(|| format!("loading markets from {}", cfg.source.display()))?;
    if !store.diagnostics().is_empty() {
        warn!(count = store.diagnostics().len(), "load finished with diagnostics");
    }

    // ─── 4) run command ──────────────────────────────────────────────
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        Command::List => print_records(&mut out, store.records().iter())?,
        Command::Tag { tag } => {
            let hits = store.filter_by_tag(&tag);
            info!(tag = %tag, hits = hits.len(), "filtered by tag");
            print_records(&mut out, hits.into_iter())?
        }
        Command::Find { substring } => {
            let hits = store.find_by_name(&substring);
            info!(substring = %substring, hits = hits.len(), "searched by name");
            print_records(&mut out, hits.into_iter())?
        }
        Command::Summary => {
            write!(out, "{}", Summary::from_records(store.records()))?;
            if !store.missing_columns().is_empty() {
                writeln!(out, "\nMissing columns: {}", store.missing_columns().join(", "))?;
            }
            if !store.diagnostics().is_empty() {
                writeln!(out, "\nDiagnostics:")?;
                for d in store.diagnostics() {
                    writeln!(out, "  {}", d)?;
                }
            }
        }
        Command::Websites { out: Some(path) } => {
            export::write_websites_file(store.records(), &path)?;
        }
        Command::Websites { out: None } => {
            export::write_websites(store.records(), &mut out)?;
        }
        Command::Json { out: Some(path) } => {
            export::write_json_file(store.records(), &path)?;
        }
        Command::Json { out: None } => {
            export::write_json(store.records(), &mut out)?;
        }
    }

    Ok(())
}

fn print_records<'a, W: Write>(
    out: &mut W,
    records: impl Iterator<Item = &'a MarketRecord>,
) -> Result<()> {
    let mut n = 0;
    for r in records {
        writeln!(out, "{}", r.name)?;
        if !r.schedule.is_empty() {
            writeln!(out, "  when:  {}", r.schedule)?;
        }
        if !r.address.is_empty() {
            writeln!(out, "  where: {}", r.address)?;
        }
        if let Some(url) = &r.url {
            writeln!(out, "  url:   {}", url)?;
        }
        if !r.tags.is_empty() {
            writeln!(out, "  tags:  {}", r.tags)?;
        }
        if let Some(c) = &r.comments {
            writeln!(out, "  note:  {}", c)?;
        }
        n += 1;
    }
    writeln!(out, "{} market(s)", n)?;
    Ok(())
}
