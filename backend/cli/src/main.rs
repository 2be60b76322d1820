mod auth_cmd;
mod config;
mod config_cmd;
mod convert_cmd;
mod preview_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use config::Config;

#[derive(Parser)]
#[command(name = "eqforge")]
#[command(about = "eqforge — turn $...$ markers in Notion pages into native equations")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ~/.eqforge/config.yaml
    #[arg(long, global = true, env = "EQFORGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace equation markers on a page with native equations
    Convert {
        /// Page URL or id
        page: String,
        /// Skip the scan and confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show what a conversion would produce without changing the page
    Preview {
        /// Page URL or id
        page: String,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the Notion integration token
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Validate and store a token
    Set { token: String },
    /// Show the active token (masked) and where it comes from
    Status,
    /// Remove the stored token
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets masked
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).await?;

    eqforge_logging::init_logger(config.log_dir(), config.log_level());
    config.report.log();
    debug!(path = %config.path.display(), "Loaded configuration");

    match cli.command {
        Commands::Convert { page, yes } => convert_cmd::run(&config, &page, yes).await?,
        Commands::Preview { page, json } => preview_cmd::run(&config, &page, json).await?,
        Commands::Auth { action } => match action {
            AuthAction::Set { token } => auth_cmd::set(&config, &token).await?,
            AuthAction::Status => auth_cmd::status(&config).await?,
            AuthAction::Clear => auth_cmd::clear(&config).await?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(&config)?,
        },
    }

    Ok(())
}
