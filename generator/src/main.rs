//! Main entry point for the generator binary
//!
//! Wires the file-backed services into the orchestrator and runs a single
//! generation request described on the command line.

use clap::Parser;
use std::path::PathBuf;

use generator::{
    services::{ConfiguredInvalidator, FileTaxonomySource, FileTemplateSource, JsonFileProductStore},
    GenerationOrchestrator, GeneratorConfig, GeneratorResult,
};
use shared::{component_debug, logging, ComponentId, GenerationRequest, ProductStatus};

/// Generate catalog products from the leaves of a taxonomy series
#[derive(Parser)]
#[command(name = "generator")]
#[command(about = "Generates draft products for taxonomy leaves of a series")]
pub struct Args {
    /// Catalog file holding the taxonomy of every series
    #[arg(long)]
    pub catalog: PathBuf,

    /// Template file (JSON array of templates)
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Product output directory (falls back to GENERATOR_STORE_DIR, then ./output/products)
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Series slug to generate into
    #[arg(long)]
    pub series: String,

    /// Leaf slug to generate a product for (repeatable)
    #[arg(long = "leaf", required = true)]
    pub leaves: Vec<String>,

    /// Preview the products without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Status of the created products (draft, active, archived)
    #[arg(long, default_value = "draft")]
    pub status: ProductStatus,

    /// Template applied underneath leaf attributes
    #[arg(long)]
    pub template: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Cache invalidation endpoint (falls back to GENERATOR_INVALIDATION_URL; logs only when unset)
    #[arg(long)]
    pub invalidation_url: Option<String>,

    /// Accepted-leaf count from which generation runs in parallel
    #[arg(long, default_value = "16")]
    pub parallel_threshold: usize,

    /// Invalidation attempts before giving up
    #[arg(long, default_value = "3")]
    pub invalidation_attempts: u32,
}

#[tokio::main]
async fn main() -> GeneratorResult<()> {
    // Load .env before reading fallbacks from the environment
    dotenv::dotenv().ok();

    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));
    logging::log_startup(ComponentId::Cli, &format!("product generator for series '{}'", args.series));

    let config = GeneratorConfig::default()
        .with_parallel_threshold(args.parallel_threshold)
        .with_invalidation_attempts(args.invalidation_attempts);

    let store_dir = args
        .store_dir
        .clone()
        .or_else(|| std::env::var("GENERATOR_STORE_DIR").ok().map(PathBuf::from));
    let store = match store_dir {
        Some(dir) => JsonFileProductStore::with_base_dir(dir),
        None => JsonFileProductStore::new(),
    };

    let invalidation_url = args
        .invalidation_url
        .clone()
        .or_else(|| std::env::var("GENERATOR_INVALIDATION_URL").ok());
    let invalidator = ConfiguredInvalidator::from_endpoint(invalidation_url.as_deref())?;

    let templates = match &args.templates {
        Some(path) => FileTemplateSource::new(path),
        None => FileTemplateSource::empty(),
    };

    component_debug!(
        ComponentId::Cli,
        "Catalog: {}, store: {}, invalidation: {}",
        args.catalog.display(),
        store.base_dir().display(),
        invalidation_url.as_deref().unwrap_or("log only")
    );

    // Create orchestrator with dependency injection
    let orchestrator =
        GenerationOrchestrator::new(FileTaxonomySource::new(&args.catalog), templates, store, invalidator)
            .with_config(config)?;

    let mut request = GenerationRequest::new(args.series.clone(), args.leaves.clone())
        .dry_run(args.dry_run)
        .with_status(args.status);
    if let Some(template_id) = &args.template {
        request = request.with_template(template_id.clone());
    }

    let result = match orchestrator.execute(request).await {
        Ok(result) => result,
        Err(err) => {
            logging::log_shutdown(ComponentId::Cli, &format!("request for '{}' failed", args.series));
            return Err(err);
        }
    };
    println!("{}", serde_json::to_string_pretty(&result)?);

    logging::log_success(
        ComponentId::Cli,
        &format!(
            "{} for '{}': created {}, skipped {}",
            if result.dry_run { "Dry run" } else { "Generation" },
            args.series,
            result.created,
            result.skipped.len()
        ),
    );
    Ok(())
}
