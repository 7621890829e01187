use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bank_ledger::audit::AuditLogger;
use bank_ledger::config::{paths::DATA_DIR_ENV, LedgerPaths, Settings};
use bank_ledger::logging;
use bank_ledger::shell::Session;
use bank_ledger::storage::{LedgerStore, LoadOutcome};

#[derive(Parser)]
#[command(
    name = "bank",
    version,
    about = "Interactive terminal banking backed by a local JSON ledger",
    long_about = "Create accounts, deposit, withdraw, check balances and view \
                  transcripts through a guided prompt. Every change is saved \
                  to accounts.json in the data directory."
)]
struct Cli {
    /// Directory holding accounts.json, audit.log and settings.json
    /// (defaults to the current directory)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Skip the progress bar animation
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive banking session (the default)
    Shell,

    /// Show current configuration and paths
    Config,

    /// Show the most recent audit log entries across all accounts
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let paths = LedgerPaths::resolve(cli.data_dir)?;
    let mut settings = Settings::load_or_default(&paths)?;
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        settings.color = false;
    }
    if cli.no_progress {
        settings.show_progress = false;
    }

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_session(&paths, &settings)?,
        Commands::Log { limit } => show_log(&paths, &settings, limit)?,
        Commands::Config => {
            println!("Bank Ledger Configuration");
            println!("=========================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Ledger file:    {}", paths.accounts_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Colour output:   {}", settings.color);
            println!("  Progress bar:    {}", settings.show_progress);
            println!("  History entries: {}", settings.history_limit);
        }
    }

    Ok(())
}

fn run_session(paths: &LedgerPaths, settings: &Settings) -> Result<()> {
    paths.ensure_directories()?;

    let mut store = LedgerStore::new(paths.accounts_file());
    match store.load() {
        LoadOutcome::Corrupt {
            reason,
            preserved_at,
        } => {
            eprintln!("Warning: could not read the ledger file ({}).", reason);
            match preserved_at {
                Some(path) => eprintln!("The unreadable file was kept at {}.", path.display()),
                None => eprintln!("The unreadable file could not be moved aside."),
            }
            eprintln!("Starting with an empty ledger.");
        }
        LoadOutcome::Partial {
            skipped,
            preserved_at,
            ..
        } => {
            eprintln!(
                "Warning: {} ledger entr{} could not be loaded and will not be shown.",
                skipped,
                if skipped == 1 { "y" } else { "ies" }
            );
            match preserved_at {
                Some(path) => eprintln!("A copy of the original file was kept at {}.", path.display()),
                None => eprintln!("A copy of the original file could not be made."),
            }
        }
        LoadOutcome::Fresh | LoadOutcome::Recovered { .. } => {}
    }

    let audit = AuditLogger::new(paths.audit_log());
    let stdin = io::stdin();
    let stdout = io::stdout();

    Session::new(&mut store, &audit, settings, stdin.lock(), stdout.lock())
        .run()
        .context("banking session aborted")?;

    Ok(())
}

fn show_log(paths: &LedgerPaths, settings: &Settings, limit: usize) -> Result<()> {
    let audit = AuditLogger::new(paths.audit_log());
    let entries = audit
        .read_recent(limit)
        .context("could not read the audit log")?;

    if entries.is_empty() {
        println!("No audit entries recorded yet.");
        return Ok(());
    }

    println!(
        "Showing {} of {} audit entries",
        entries.len(),
        audit.entry_count()?
    );
    for entry in &entries {
        println!("{}", entry.format_human_readable(&settings.currency_symbol));
    }

    Ok(())
}
