//! `mpa search`: runs the orchestrator and prints what each stage produced.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Args;
use mpa_core::{AppConfig, SearchQuery};
use mpa_search::{
    render, suppliers_csv, IconResolver, MemoryView, Region, SearchOrchestrator, SearchSnapshot,
    SearchView, Stage, StageStatus,
};

/// Per-provider limit when probing favicons for the written page.
const ICON_PROBE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Equipment manufacturer (e.g., Carrier)
    #[arg(long)]
    pub make: String,
    /// Equipment model (e.g., 58STA)
    #[arg(long)]
    pub model: String,
    /// Free-text part description (e.g., "hi limit switch")
    #[arg(long)]
    pub part: String,
    /// Directory to write the rendered results page into
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// File to write the supplier list to as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Also look up generic alternatives for the resolved part
    #[arg(long)]
    pub generic: bool,
    /// Continue with the Nth similar part (1-based) when no exact match resolves
    #[arg(long)]
    pub select: Option<usize>,
}

/// Prints stage transitions as they happen and keeps the rendered regions.
struct ConsoleView {
    inner: MemoryView,
}

impl SearchView for ConsoleView {
    fn search_started(&self, query: &SearchQuery) {
        self.inner.search_started(query);
    }

    fn stage_changed(&self, stage: Stage, status: StageStatus) {
        if status != StageStatus::Pending {
            println!("  {:<10} {status}", stage.label());
        }
        self.inner.stage_changed(stage, status);
    }

    fn render(&self, region: Region, markup: &str) {
        self.inner.render(region, markup);
    }
}

fn print_results(snapshot: &SearchSnapshot) {
    if let Some(equipment) = &snapshot.equipment {
        println!(
            "\n{} {} ({} videos, {} articles)",
            equipment.make, equipment.model, equipment.video_count, equipment.article_count
        );
    }

    println!("\nManuals:");
    if snapshot.manuals.is_empty() {
        println!("  none found");
    }
    for manual in &snapshot.manuals {
        println!(
            "  - {} [{}]\n    {}",
            manual.title.as_deref().unwrap_or("Technical Manual"),
            manual.source.as_deref().unwrap_or("Unknown Source"),
            manual.url
        );
    }

    match &snapshot.part {
        Some(part) => {
            let badge = if part.verified { "verified" } else { "unverified" };
            println!("\nPart: {} ({badge})\n  {}", part.oem_part_number, part.description);
            if !part.alternates.is_empty() {
                let numbers: Vec<&str> = part.alternates.iter().map(|p| p.part_number.as_str()).collect();
                println!("  alternates: {}", numbers.join(", "));
            }
        }
        None if snapshot.awaiting_selection => {
            println!("\nNo exact match. Similar parts:");
            for (i, candidate) in snapshot.similar_parts.iter().enumerate() {
                println!(
                    "  {}. {} {}",
                    i + 1,
                    candidate.part_number,
                    candidate.description.as_deref().unwrap_or("")
                );
            }
            println!("Re-run with --select N to continue with one of them.");
        }
        None => println!("\nPart: no part number identified"),
    }

    if snapshot.part.is_some() {
        println!("\nSuppliers:");
        if snapshot.suppliers.is_empty() {
            println!("  none found");
        }
        for supplier in &snapshot.suppliers {
            let price = supplier
                .price
                .as_deref()
                .map(render::format_price)
                .unwrap_or_else(|| "-".to_string());
            let marker = if supplier.purchasable { " [purchasable]" } else { "" };
            println!("  - {} {price}{marker}\n    {}", supplier.name, supplier.url);
        }
    }

    if !snapshot.generic_alternatives.is_empty() {
        println!("\nGeneric alternatives:");
        for alt in &snapshot.generic_alternatives {
            println!(
                "  - {} {} ({:.0}% confidence)",
                alt.part_number,
                alt.manufacturer.as_deref().unwrap_or(""),
                alt.confidence * 100.0
            );
        }
    }
}

/// Runs one search and prints the results.
///
/// # Errors
///
/// Returns an error if the query is incomplete, `--select` is out of range,
/// or an output file cannot be written. API failures are reported inline.
pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let client = crate::api_client(config)?;
    let view = Arc::new(ConsoleView {
        inner: MemoryView::new(),
    });
    let orchestrator = SearchOrchestrator::new(client, view.clone(), config.max_manuals);

    let query = SearchQuery::new(&args.make, &args.model, &args.part);
    println!(
        "Searching {} {} for \"{}\"",
        query.make, query.model, query.part_description
    );
    if !orchestrator.submit(query).await {
        anyhow::bail!("--make, --model and --part must all be non-empty");
    }

    if let Some(n) = args.select {
        let snapshot = orchestrator.snapshot();
        if snapshot.awaiting_selection {
            let candidate = n
                .checked_sub(1)
                .and_then(|i| snapshot.similar_parts.get(i))
                .with_context(|| {
                    format!(
                        "--select {n} is out of range; {} similar parts were found",
                        snapshot.similar_parts.len()
                    )
                })?;
            orchestrator.select_part(&candidate.part_number).await;
        } else {
            tracing::info!("a part resolved directly; ignoring --select");
        }
    }

    if args.generic {
        orchestrator.load_generic_alternatives().await;
    }

    let snapshot = orchestrator.snapshot();
    print_results(&snapshot);

    if let Some(dir) = &args.out {
        if !snapshot.suppliers.is_empty() {
            let resolver = IconResolver::new(ICON_PROBE_TIMEOUT_SECS, &config.user_agent)?;
            let icons = resolver
                .resolve_all(snapshot.suppliers.iter().map(|s| s.domain.as_str()))
                .await;
            tracing::debug!(resolved = icons.len(), "supplier icons resolved");
            view.render(
                Region::Suppliers,
                &render::suppliers_with_icons(&snapshot.suppliers, &icons),
            );
        }
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        let page = dir.join("index.html");
        std::fs::write(&page, view.inner.page_html())
            .with_context(|| format!("writing {}", page.display()))?;
        println!("\nWrote {}", page.display());
    }

    if let Some(path) = &args.csv {
        std::fs::write(path, suppliers_csv(&snapshot.suppliers))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {} suppliers to {}", snapshot.suppliers.len(), path.display());
    }

    Ok(())
}
