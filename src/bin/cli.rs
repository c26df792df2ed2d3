//! Novel Alerts CLI
//!
//! Manage the tracked URL list and run update checks. Scheduling is left to
//! the caller, e.g. a cron entry running `novel-alerts check`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use novel_alerts::{NovelAlerts, Result, models::Config};

/// Novel Alerts - new chapter notifications for web novels
#[derive(Parser, Debug)]
#[command(name = "novel-alerts", version, about = "Web novel chapter alerts")]
struct Cli {
    /// Directory holding the ledger, email file and config.toml
    #[arg(short, long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Path to config file (default: {data_dir}/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start tracking a series page
    Add { url: String },

    /// Stop tracking a series page
    Delete { url: String },

    /// List tracked pages and their latest known chapter
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check every tracked page and mail a digest of new chapters
    Check {
        /// Mail password, held for this run only
        #[arg(long, env = "NOVEL_ALERTS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the notification address, or set it when one is given
    Email { address: Option<String> },

    /// Validate configuration
    Validate,

    /// Show file locations and ledger size
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("config.toml"));
    let config = Config::load_or_default(&config_path);

    let data_dir = cli.data_dir;
    let open = || NovelAlerts::open(&config, &data_dir);

    match cli.command {
        Command::Add { url } => {
            let record = open()?.add_url(&url)?;
            println!("Added {} (latest: {})", record.url, record.latest_chapter);
        }

        Command::Delete { url } => {
            open()?.delete_url(&url)?;
            println!("Success");
        }

        Command::List { json } => {
            let alerts = open()?;
            if json {
                println!("{}", serde_json::to_string_pretty(alerts.records())?);
            } else if alerts.records().is_empty() {
                println!("No tracked URLs. Use `add <url>` to start.");
            } else {
                for record in alerts.records() {
                    println!("{}\t{}", record.latest_chapter, record.url);
                }
            }
        }

        Command::Check { password } => {
            let mut alerts = open()?;
            if let Some(password) = password {
                alerts.set_password(password);
            }
            let report = alerts.check_for_updates()?;
            alerts.clear_password();

            if report.updated.is_empty() {
                println!("No new chapters ({} checked).", report.checked);
            } else {
                println!("New chapters:");
                for url in &report.updated {
                    println!("  {url}");
                }
            }
            if !report.skipped.is_empty() {
                log::warn!(
                    "{} URL(s) could not be checked: {}",
                    report.skipped.len(),
                    report.skipped.join(", ")
                );
            }
        }

        Command::Email { address } => {
            let mut alerts = open()?;
            match address {
                Some(address) => {
                    alerts.set_email(&address)?;
                    println!("Email set to {}", alerts.email());
                }
                None if alerts.email().is_empty() => println!("No email set."),
                None => println!("{}", alerts.email()),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if config_path.exists() {
                Config::load(&config_path)?;
            }
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            let alerts = open()?;
            log::info!("Data directory: {}", data_dir.display());
            log::info!(
                "Ledger: {}",
                config.paths.ledger_path(&data_dir).display()
            );
            log::info!(
                "Email file: {}",
                config.paths.email_path(&data_dir).display()
            );
            log::info!("Tracked URLs: {}", alerts.records().len());
            log::info!(
                "Mail relay: {}:{}",
                config.mail.relay_host,
                config.mail.relay_port
            );
        }
    }

    Ok(())
}
