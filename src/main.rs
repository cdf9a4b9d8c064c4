//! # campusqa CLI
//!
//! Command-line entry point for the QA pipeline:
//!
//! - `schema`: create the Webpage class in the vector store
//! - `crawl`: crawl a website and index its pages
//! - `serve`: run the question-answering HTTP service
//!
//! Credentials come from the environment (`OPENAI_API_KEY`,
//! `WEAVIATE_API_KEY`, `WEAVIATE_URL`); a missing variable fails the command
//! at startup. Service clients are constructed here and passed into the
//! crawler and the server explicitly.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::instrument;

use campusqa::config::Config;
use campusqa::crawler::{self, CrawlerConfig};
use campusqa::llm::LlmClient;
use campusqa::server::{self, AppState};
use campusqa::store::StoreClient;

#[derive(Parser)]
#[command(author, version, about = "Retrieval-augmented question answering for university websites", long_about = None)]
struct Cli {
    /// Directory for log files (console-only logging when omitted)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the Webpage class in the vector store
    Schema,

    /// Crawl a website and index its pages
    Crawl(CrawlArgs),

    /// Run the question-answering HTTP service
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URL to crawl
    #[arg(required = true)]
    url: String,

    /// Additional domains the crawler may follow
    #[arg(long = "allow-domain")]
    allow_domains: Vec<String>,

    /// File of URL substrings to skip, one per line
    #[arg(long)]
    block_list: Option<PathBuf>,

    /// Crawl depth
    #[arg(short, long, default_value = "2")]
    depth: u32,

    /// Maximum number of pages to crawl
    #[arg(short = 'p', long, default_value = "100")]
    max_pages: u32,

    /// Delay between requests in milliseconds
    #[arg(short, long, default_value = "500")]
    rate: u64,

    /// Derive FAQ metadata for each page through the language model
    #[arg(long)]
    faq: bool,

    /// Skip pages whose extracted content counts fewer tokens
    #[arg(long, default_value = "25")]
    min_tokens: usize,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(short, long, default_value = "5000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = campusqa::logging::init(cli.log_dir.as_deref());

    match cli.command {
        Commands::Schema => schema_command().await,
        Commands::Crawl(args) => crawl_command(args).await,
        Commands::Serve(args) => serve_command(args).await,
    }
}

#[instrument]
async fn schema_command() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let store = StoreClient::connect(&config)?;

    store.ensure_schema().await?;
    println!("Webpage class is ready");
    Ok(())
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let store = StoreClient::connect(&config)?;
    store.ensure_schema().await?;

    let blocked = match &args.block_list {
        Some(path) => crawler::load_block_list(path)
            .with_context(|| format!("failed to read block list {}", path.display()))?,
        None => Vec::new(),
    };

    let crawler_config = CrawlerConfig::builder()
        .allowed_domains(args.allow_domains)
        .blocked_urls(blocked)
        .max_depth(args.depth)
        .max_pages(args.max_pages)
        .rate_limit_ms(args.rate)
        .generate_faq(args.faq)
        .min_content_tokens(args.min_tokens)
        .build();

    let llm = args.faq.then(|| LlmClient::new(&config));

    println!("Crawling {}...", args.url);
    let report = crawler::crawl_site(&args.url, crawler_config, &store, llm).await?;

    println!(
        "Visited {} pages, skipped {}, indexed {}",
        report.visited, report.skipped, report.indexed
    );
    Ok(())
}

#[instrument]
async fn serve_command(args: ServeArgs) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let store = StoreClient::connect(&config)?;
    let llm = LlmClient::new(&config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;

    server::serve(addr, AppState::new(store, llm)).await?;
    Ok(())
}
