use clap::Args;
use mpa_core::{AppConfig, FileStore, SettingsStore};
use mpa_search::{ProfileStore, PurchaseService};

#[derive(Debug, Args)]
pub struct PurchaseArgs {
    /// Part number to order
    #[arg(long)]
    pub part: String,
    /// Product page of the supplier listing
    #[arg(long)]
    pub supplier_url: String,
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
}

/// Submits a purchase with the saved billing profile and settings.
///
/// # Errors
///
/// Returns an error if no billing profile exists or the purchase service
/// rejects the request.
pub(crate) async fn run_purchase(config: &AppConfig, args: &PurchaseArgs) -> anyhow::Result<()> {
    let client = crate::api_client(config)?;
    let settings = SettingsStore::new(FileStore::new(&config.state_path)).load();
    let profiles = ProfileStore::new(client.clone());
    let service = PurchaseService::new(client);

    let profile = profiles.load_default().await;
    let listing = service.listing_for_url(&args.supplier_url).await;
    let outcome = service
        .purchase(
            &listing,
            &args.part,
            args.quantity,
            profile.as_ref(),
            &settings,
        )
        .await?;

    let mode = if outcome.dry_run { "dry run" } else { "LIVE" };
    let route = if outcome.via_recording {
        "recorded flow"
    } else {
        "generic flow"
    };
    println!(
        "Purchase submitted ({mode}, {route}): {}",
        outcome.purchase_id.as_deref().unwrap_or("no id returned")
    );
    if let Some(message) = outcome.message.or(outcome.status) {
        println!("  {message}");
    }
    Ok(())
}
