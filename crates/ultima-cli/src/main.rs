//! Última Milla CLI - menu placement and a scripted backoffice demo.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ultima_cli::backoffice::Role;
use ultima_cli::{demo, place};
use ultima_core::ScrollLock;
use ultima_widgets::ActionMenuConfig;

#[derive(Parser)]
#[command(name = "ultima")]
#[command(about = "Action menus for the Última Milla backoffice")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute where a menu panel opens for a trigger
    Place(place::PlaceArgs),

    /// Run a scripted backoffice session and print what happened
    Demo {
        /// Role of the person using the backoffice
        #[arg(short, long, value_enum, default_value = "ADMIN")]
        role: Role,

        /// Viewport height
        #[arg(long, default_value = "720")]
        viewport_height: f32,

        /// Number of user rows
        #[arg(long, default_value = "8")]
        rows: usize,

        /// Menu configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Place(args) => {
            let report = place::run(&args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Demo {
            role,
            viewport_height,
            rows,
            config,
        } => {
            let config = match config {
                Some(path) => ActionMenuConfig::load(&path)
                    .with_context(|| format!("cannot use menu config {}", path.display()))?,
                None => ActionMenuConfig::default(),
            };
            let options = demo::DemoOptions {
                viewer: role,
                viewport_height,
                rows,
                config,
            };
            let report = demo::run(&options, ScrollLock::global())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
