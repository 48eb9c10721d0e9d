//! Command-line interface for operators.
//!
//! Argument definitions use clap's derive macros; [`run`] executes a parsed [`Cli`].

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;

use crate::app::App;
use crate::managers::record_store::RecordStoreTrait;
use crate::services::exporter::{DetachedTarget, DirectoryTarget};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::status_tracker::VisitOutcome;
use crate::types::record::PageStatus;
use crate::types::ui::{ControlAction, ControlKind};

/// pagetrack - per-URL page tracking with status timestamps and CSV export.
#[derive(Debug, Parser)]
#[command(name = "pagetrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides the platform config directory)
    #[arg(short, long, global = true, env = "PAGETRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides settings)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a visit to a page
    Visit { url: String },

    /// Set the status of a tracked page (viewed, ignored, analyzing, solved)
    Status { url: String, status: PageStatus },

    /// Show the stored record for a page
    Show { url: String },

    /// List all stored records
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all records as CSV
    Export {
        /// Directory to write the file into (overrides settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove all stored records
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the controls a page would get
    Controls { url: String },

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// `config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,
    /// Set one value by dot-notation key, e.g. `tracking.mode simple`
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
    /// Print the settings file path
    Path,
}

/// Parses a CLI value as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn run_config(config: Option<PathBuf>, command: &ConfigCommand) -> anyhow::Result<()> {
    let mut engine = SettingsEngine::new(config);
    engine.load()?;
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(engine.get_settings())?);
        }
        ConfigCommand::Set { key, value } => {
            engine.set_value(key, parse_value(value))?;
            println!("{} updated", key);
        }
        ConfigCommand::Reset => {
            engine.reset()?;
            println!("Settings reset to defaults");
        }
        ConfigCommand::Path => println!("{}", engine.get_config_path().display()),
    }
    Ok(())
}

/// Executes a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Config(command) = &cli.command {
        return run_config(cli.config.clone(), command);
    }

    let app = App::new(cli.config, cli.db).await?;

    match cli.command {
        Commands::Visit { url } => match app.open_page(&url).await? {
            VisitOutcome::Skipped => println!("Not tracked: URL does not match the tracking pattern"),
            VisitOutcome::Tracked { status, identifier, created } => {
                let verb = if created { "Tracking" } else { "Revisited" };
                match identifier {
                    Some(id) => println!("{} {} ({}): {}", verb, url, id, status),
                    None => println!("{} {}: {}", verb, url, status),
                }
            }
            VisitOutcome::Saved { inserted: true } => println!("Saved {}", url),
            VisitOutcome::Saved { inserted: false } => println!("Already saved: {}", url),
        },
        Commands::Status { url, status } => {
            if !app.set_status(&url, status).await? {
                bail!("{} is not tracked", url);
            }
            println!("{}: {}", url, status);
        }
        Commands::Show { url } => match app.get(&url).await? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => bail!("{} is not tracked", url),
        },
        Commands::List { json } => {
            let records = app.store.get_all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    let status = record.status.map(|s| s.label()).unwrap_or("-");
                    println!("{}\t{}", status, record.url);
                }
                println!("{} record(s)", records.len());
            }
        }
        Commands::Export { output } => {
            let dir = output.unwrap_or_else(|| app.settings().export.directory.clone());
            let target = DirectoryTarget::new(dir);
            let result = app.dispatch(None, &ControlAction::Export, &target).await?;
            println!("{}", result.notice.message());
        }
        Commands::Clear { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Clear all saved records?")
                    .default(false)
                    .interact()
                    .context("confirmation prompt failed")?;
            if !confirmed {
                println!("Clear cancelled");
                return Ok(());
            }
            let result = app
                .dispatch(None, &ControlAction::Clear { confirmed }, &DetachedTarget)
                .await?;
            println!("{}", result.notice.message());
        }
        Commands::Controls { url } => {
            let controls = app.controls(&url).await?;
            if controls.is_empty() {
                println!("No controls: URL does not match the tracking pattern");
            }
            for control in controls {
                let marker = if control.active { "*" } else { " " };
                let kind = match control.kind {
                    ControlKind::Button => "button",
                    ControlKind::Label => "label",
                };
                println!("{} {:<7} {:<18} {}", marker, kind, control.id, control.label);
            }
        }
        // Handled above, before the store is opened.
        Commands::Config(_) => {}
    }

    Ok(())
}
