//! Prism Dental Reference Catalog: Demo CLI
//!
//! Runs the reference scenarios, or browses a catalog with the given filters
//! and selection and prints the resolved recommendations.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- browse --specialty Hygienist
//!   cargo run -p demo -- browse --condition c-xerostomia --phase Moderate --view 4
//!   cargo run -p demo -- browse --settings prism.toml --json
//!   cargo run -p demo -- schema

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use prism_config::Settings;
use prism_contracts::{condition::ConditionId, error::PrismResult};
use prism_core::{cache::CachedSource, traits::CatalogSource, Browser};
use prism_ref_dental::{
    mock_data::reference_catalog,
    scenarios::{self, browse, legacy, reload},
    sources::{JsonFileSource, MockCatalogSource},
};
use prism_validate::CatalogValidator;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Prism: condition filtering and patient-type-aware recommendations.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Prism dental reference catalog demo",
    long_about = "Runs Prism reference scenarios or browses a catalog, showing filtering,\n\
                  selection consistency, and recommendation resolution."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three reference scenarios in sequence.
    RunAll,
    /// Scenario 1: Browse and Resolve.
    Browse(BrowseArgs),
    /// Scenario 2: Reload Consistency.
    Reload,
    /// Scenario 3: Legacy Catalog Entries.
    Legacy,
    /// Print the JSON Schema for catalog documents.
    Schema,
}

#[derive(Args)]
struct BrowseArgs {
    /// TOML settings file.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// JSON catalog document; overrides `[catalog] path`.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    specialty: Option<String>,
    /// Patient-type filter on the condition list.
    #[arg(long)]
    patient_type: Option<String>,
    #[arg(long)]
    search: Option<String>,
    /// Condition id to select.
    #[arg(long)]
    condition: Option<String>,
    #[arg(long)]
    phase: Option<String>,
    /// Patient-type view applied to recommendations.
    #[arg(long)]
    view: Option<String>,
    /// Print the recommendations as JSON.
    #[arg(long)]
    json: bool,
    /// Run the scripted scenario instead of a one-off browse.
    #[arg(long)]
    scenario: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Browse(args) if args.scenario => browse::run_scenario(),
        Command::Browse(args) => run_browse(args),
        Command::Reload => reload::run_scenario(),
        Command::Legacy => legacy::run_scenario(),
        Command::Schema => print_schema(),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run_all() -> PrismResult<()> {
    print_banner();
    browse::run_scenario()?;
    reload::run_scenario()?;
    legacy::run_scenario()?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn run_browse(args: BrowseArgs) -> PrismResult<()> {
    let settings = match &args.settings {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    let catalog_path = args.catalog.clone().or_else(|| settings.catalog.path.clone());
    let source: Arc<dyn CatalogSource> = match catalog_path {
        Some(path) => {
            info!(path = %path.display(), "browsing catalog file");
            Arc::new(CachedSource::new(JsonFileSource::new(path), settings.cache_ttl()))
        }
        None => Arc::new(CachedSource::new(
            MockCatalogSource::new(reference_catalog()?),
            settings.cache_ttl(),
        )),
    };

    let mut browser = Browser::new(
        source,
        Box::new(CatalogValidator::new()),
        settings.resolution.clone(),
    );
    browser.reload(false);

    if let Some(category) = args.category {
        browser.set_category_filter(category);
    }
    if let Some(specialty) = args.specialty {
        browser.set_specialty_filter(specialty);
    }
    if let Some(patient_type) = args.patient_type {
        browser.set_patient_type_filter(patient_type);
    }
    if let Some(search) = args.search {
        browser.set_search_text(search);
    }
    if let Some(id) = args.condition {
        if !browser.select_condition(&ConditionId::new(id.as_str())) {
            eprintln!("Condition '{}' is not in the filtered list; keeping current selection.", id);
        }
    }
    if let Some(phase) = args.phase {
        if !browser.select_phase(&phase) {
            eprintln!("Phase '{}' is not defined for the selected condition.", phase);
        }
    }
    if let Some(view) = args.view {
        browser.select_patient_type_view(&view);
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&browser.recommendations()).map_err(|e| {
            prism_contracts::error::PrismError::Render {
                reason: format!("recommendations: {e}"),
            }
        })?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Catalog status: {:?}", browser.status());
    println!();
    scenarios::print_conditions(&browser);
    println!();
    scenarios::print_recommendations(&browser);
    Ok(())
}

fn print_schema() -> PrismResult<()> {
    let schema = prism_validate::catalog_schema();
    println!("{:#}", schema);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Prism: Clinical Reference Catalog");
    println!("Dental Reference Demo");
    println!("=================================");
    println!();
    println!("Pipeline on every change:");
    println!("  [1] Reload: conditions, products, patient types fetched together");
    println!("  [2] Filter: category AND specialty AND patient type AND search");
    println!("  [3] Selection reconciled against the filtered list");
    println!("  [4] Recommendations resolved for (condition, phase, patient-type view)");
    println!("  [5] Availability annotated; unknown products count as available");
    println!();
}
