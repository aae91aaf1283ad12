use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use pdf_quiz::config::GeneratorArgs;
use pdf_quiz::server::{create_router, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "PDF quiz generator web server", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    GEMINI_API_KEY     API key for the Gemini API (also GOOGLE_GENERATIVE_AI_API_KEY, GOOGLE_API_KEY)
    QUIZ_CLIENT        gemini | mock
    RUST_LOG           Log filter, e.g. info,pdf_quiz=debug")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "QUIZ_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "QUIZ_MAX_UPLOAD_BYTES", default_value_t = pdf_quiz::server::state::DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Log filter
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log: String,

    #[command(flatten)]
    generator: GeneratorArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (if present) before clap reads the environment
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_target(false)
        .init();

    let config = ServerConfig {
        max_upload_bytes: args.max_upload_bytes,
        request_timeout: Duration::from_secs(args.generator.timeout_secs),
    };
    let state = AppState::new(args.generator.build_generator(), config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(client = %args.generator.client, "Listening on {}", args.bind);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
