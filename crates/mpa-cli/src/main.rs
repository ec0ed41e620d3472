mod profile;
mod purchase;
mod search;
mod settings;

use clap::{Parser, Subcommand};
use mpa_client::ApiClient;
use mpa_core::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::profile::ProfileCommands;
use crate::purchase::PurchaseArgs;
use crate::search::SearchArgs;
use crate::settings::SettingsCommands;

#[derive(Debug, Parser)]
#[command(name = "mpa")]
#[command(about = "Manual Purchase Agent command line client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find manuals, the OEM part number and suppliers for a part
    Search(SearchArgs),
    /// Show or change purchase-automation settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Manage the billing profile used for purchases
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Hand a supplier listing to the purchase automation
    Purchase(PurchaseArgs),
}

/// Logs panics through `tracing` before the default hook prints them.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "unhandled panic");
        default_hook(info);
    }));
}

pub(crate) fn api_client(config: &AppConfig) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(&config.api_base_url, &config.user_agent)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = mpa_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    install_panic_hook();

    let cli = Cli::parse();
    tracing::debug!(env = %config.env, api = %config.api_base_url, "configuration loaded");

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&config, &args).await,
        Some(Commands::Settings { command }) => settings::run_settings(&config, command),
        Some(Commands::Profile { command }) => profile::run_profile(&config, command).await,
        Some(Commands::Purchase(args)) => purchase::run_purchase(&config, &args).await,
        None => {
            println!("mpa: no command given; run `mpa --help` for usage");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
