use std::path::PathBuf;

use anyhow::Context as _;
use clap::Subcommand;
use mpa_core::{AppConfig, BillingProfile};
use mpa_search::ProfileStore;

#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show the billing profile purchases will use
    Show,
    /// Create or update a profile from a JSON file
    Save {
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a stored profile
    Delete { id: i64 },
}

fn print_profile(profile: &BillingProfile) {
    println!(
        "Profile {}: {}",
        profile.id.map_or_else(|| "(unsaved)".to_string(), |id| id.to_string()),
        profile.name
    );
    println!("  email: {}", profile.email);
    println!(
        "  ship to: {}, {} {} {}",
        profile.address_line1, profile.city, profile.state, profile.postal_code
    );
    match profile.card_last4() {
        Some(last4) => println!("  card: **** {last4}"),
        None => println!("  card: none on file"),
    }
}

/// # Errors
///
/// Returns an error if the profile file cannot be read or the profile
/// service rejects the change.
pub(crate) async fn run_profile(config: &AppConfig, command: ProfileCommands) -> anyhow::Result<()> {
    let store = ProfileStore::new(crate::api_client(config)?);

    match command {
        ProfileCommands::Show => {
            match store.load_default().await {
                Some(profile) => print_profile(&profile),
                None => println!("No billing profile saved. Purchases are unavailable until one is created."),
            }
            Ok(())
        }
        ProfileCommands::Save { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let profile: BillingProfile = serde_json::from_str(&raw)
                .with_context(|| format!("parsing billing profile from {}", file.display()))?;
            let saved = store.save(&profile).await?;
            print_profile(&saved);
            Ok(())
        }
        ProfileCommands::Delete { id } => {
            store.delete(id).await?;
            println!("Deleted profile {id}");
            Ok(())
        }
    }
}
