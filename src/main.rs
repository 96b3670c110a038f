//! # ragweed CLI
//!
//! Command-line interface to the ragweed backend, providing end-to-end
//! access to its pipeline through a set of subcommands:
//!
//! - `ingest`: crawl a website and load its chunks into the vector index
//! - `query`: answer a question against an ingested site
//! - `collections`: list the collections in the vector index
//! - `delete`: remove a collection
//!
//! The vector index service is addressed via `RAGWEED_STORE_URL`; the
//! answer model via `OPENAI_API_KEY` and optionally `OPENAI_BASE_URL` and
//! `RAGWEED_MODEL`. `RETRIEVE_N_DOCS` sets the default retrieval depth.
//! All of these can be supplied through a `.env` file.

mod telemetry;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use ragweed::answer::OpenAiGenerator;
use ragweed::chat::{ChatConfig, ChatService};
use ragweed::crawler::{CrawlerConfig, SiteCrawler};
use ragweed::ingest::IngestionPipeline;
use ragweed::processor::ChunkOptions;
use ragweed::store::{HttpVectorStore, VectorStore};

#[derive(Parser)]
#[command(author, version, about = "Retrieval-augmented chatbot backend for company websites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a website and load its content into the vector index
    Ingest(IngestArgs),

    /// Answer a question against an ingested site
    Query(QueryArgs),

    /// List the collections in the vector index
    Collections,

    /// Delete a collection from the vector index
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// Website root URL
    #[arg(required = true)]
    website: String,

    /// Chunk size in characters
    #[arg(long, default_value = "450")]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[arg(long, default_value = "20")]
    chunk_overlap: usize,

    /// Politeness delay between page fetches in milliseconds
    #[arg(short, long, default_value = "1000")]
    delay: u64,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value = "10")]
    timeout: u64,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Collection (company) name to query
    #[arg(required = true)]
    company: String,

    /// The question to answer
    #[arg(required = true)]
    query: String,

    /// Maximum context chunks to retrieve (default: RETRIEVE_N_DOCS or 4)
    #[arg(short, long)]
    n_results: Option<usize>,

    /// Distance cutoff for retrieved chunks
    #[arg(short = 's', long, default_value = "1.5")]
    threshold: f32,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    /// Collection name to delete
    #[arg(required = true)]
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing_subscriber();

    let cli = Cli::parse();
    let store = HttpVectorStore::new(store_url()?)?;

    match cli.command {
        Commands::Ingest(args) => run_ingest(store, args).await,
        Commands::Query(args) => run_query(store, args).await,
        Commands::Collections => run_collections(store).await,
        Commands::Delete(args) => run_delete(store, args).await,
    }
}

fn store_url() -> anyhow::Result<String> {
    std::env::var("RAGWEED_STORE_URL")
        .context("RAGWEED_STORE_URL environment variable not set")
}

async fn run_ingest(store: HttpVectorStore, args: IngestArgs) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder()
        .politeness_delay_ms(args.delay)
        .timeout_secs(args.timeout)
        .build();
    let crawler = SiteCrawler::new(config)?;
    let options = ChunkOptions::new(args.chunk_size, args.chunk_overlap)?;

    let pipeline = IngestionPipeline::new(crawler, options, store);
    let report = pipeline.ingest(&args.website).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.status {
        anyhow::bail!("ingestion failed for {}", args.website);
    }
    Ok(())
}

async fn run_query(store: HttpVectorStore, args: QueryArgs) -> anyhow::Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY environment variable not set")?;

    let mut generator = OpenAiGenerator::new(api_key)?;
    if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
        generator = generator.with_base_url(base_url);
    }
    if let Ok(model) = std::env::var("RAGWEED_MODEL") {
        generator = generator.with_model(model);
    }

    let n_results = match args.n_results {
        Some(n) => n,
        None => std::env::var("RETRIEVE_N_DOCS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| ChatConfig::default().n_results),
    };

    let service = ChatService::new(
        store,
        generator,
        ChatConfig {
            n_results,
            threshold_score: args.threshold,
        },
    );

    let answer = service.answer(&args.company, &args.query).await;
    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}

async fn run_collections(store: HttpVectorStore) -> anyhow::Result<()> {
    let names = store.list_collections().await?;
    println!("{}", serde_json::to_string_pretty(&names)?);
    Ok(())
}

async fn run_delete(store: HttpVectorStore, args: DeleteArgs) -> anyhow::Result<()> {
    store.delete_collection(&args.name).await?;
    println!("deleted collection {}", args.name);
    Ok(())
}
