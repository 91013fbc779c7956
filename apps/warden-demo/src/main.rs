//! # warden-demo
//!
//! Demo CLI exercising the warden constitutional governance kernel end
//! to end, via the real `warden-agent` façade, and offering an
//! `ungoverned` subcommand that runs the same representative tasks
//! through an intentionally unguarded stand-in so the contrast is
//! visible side by side.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Constitutional governance runtime demo.
#[derive(Parser)]
#[command(name = "warden-demo", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory). Resolved
    /// against `warden.toml` for governance/violation directory lookup.
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the eight governance checks against the real kernel.
    Demo {
        /// Governance profile to load (defaults to the project's
        /// `warden.toml` setting, or "default").
        #[arg(long)]
        profile: Option<String>,
    },
    /// Run the same representative tasks through an unguarded stand-in,
    /// for contrast with `demo`.
    Ungoverned,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("warden_demo=info".parse()?)
                .add_directive("warden_agent=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);

    match &cli.command {
        Commands::Demo { profile } => commands::demo::execute(&project_root, profile.as_deref()),
        Commands::Ungoverned => commands::ungoverned::execute(),
    }
}
