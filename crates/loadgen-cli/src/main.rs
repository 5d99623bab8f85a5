use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use loadgen_common::config::LoadTestConfig;
use loadgen_mock::MockSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "loadgen", version, about = "Concurrent load generator for chat-completion APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fire one burst of concurrent requests and report the results
    Run(RunArgs),
    /// Serve a mock chat-completions endpoint
    ServeMock(MockArgs),
    Version,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Chat-completions URL, e.g. http://localhost:8000/v1/chat/completions
    #[arg(short, long)]
    endpoint: Option<String>,
    #[arg(short, long)]
    concurrency: Option<usize>,
    #[arg(short, long)]
    prompt: Option<String>,
    #[arg(short, long)]
    model: Option<String>,
    #[arg(long)]
    max_tokens: Option<u32>,
    /// Per-request timeout; none by default
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Directory for the JSON result file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Print the summary only
    #[arg(long)]
    no_save: bool,
}

#[derive(Args, Debug)]
struct MockArgs {
    #[arg(long, default_value_t = 8000)]
    port: u16,
    #[arg(long, default_value_t = 50)]
    delay_ms: u64,
    #[arg(long, default_value_t = 0)]
    jitter_ms: u64,
    #[arg(long, default_value_t = 100)]
    completion_tokens: u32,
    /// Answer every request with this HTTP status
    #[arg(long)]
    fail_status: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::ServeMock(args) => serve_mock(args).await,
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let mut cfg = LoadTestConfig::load().context("failed to load configuration")?;
    if let Some(v) = args.endpoint { cfg.endpoint = v; }
    if let Some(v) = args.concurrency { cfg.concurrency = v; }
    if let Some(v) = args.prompt { cfg.prompt = v; }
    if let Some(v) = args.model { cfg.model = v; }
    if let Some(v) = args.max_tokens { cfg.max_tokens = v; }
    if let Some(v) = args.timeout_secs { cfg.request_timeout_secs = Some(v); }
    if let Some(v) = args.output_dir { cfg.output_dir = v; }

    tracing::info!(endpoint = %cfg.endpoint, concurrency = cfg.concurrency, model = %cfg.model, "resolved run configuration");
    println!("Starting test with {} concurrent requests...", cfg.concurrency);
    let result = loadgen_core::run_load_test(&cfg).await?;
    println!("\n{}", loadgen_report::render_summary(&result));

    if !args.no_save {
        let path = match loadgen_report::write_json(&result, &cfg.output_dir) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(dir = %cfg.output_dir.display(), "saving results failed: {}", e);
                return Err(e).with_context(|| format!("failed to write results into {}", cfg.output_dir.display()));
            }
        };
        println!("Detailed results saved to {}", path.display());
    }
    Ok(())
}

async fn serve_mock(args: MockArgs) -> Result<()> {
    let settings = MockSettings {
        delay: Duration::from_millis(args.delay_ms),
        jitter: Duration::from_millis(args.jitter_ms),
        completion_tokens: args.completion_tokens,
        fail_status: args.fail_status,
        ..Default::default()
    };
    settings.validate().context("invalid --fail-status")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    loadgen_mock::serve(addr, settings)
        .await
        .with_context(|| format!("mock server on {} failed", addr))
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
