//! Blame Viewer - line-by-line authorship annotation for a local git repository
//!
//! # Usage
//! ```bash
//! blame-viewer /path/to/repository        # Start server
//! blame-viewer /path/to/repository --open # Start and open browser
//! blame-viewer status                     # Check if running
//! blame-viewer kill                       # Stop running instance
//! ```
//!
//! Blame for a file: `GET /api/v1/repository/blame?path=src/main.rs&commit=HEAD`

mod error;
mod git;
mod models;
mod pidfile;
mod render;
mod routes;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git::GitRepository;
use pidfile::PidInfo;
use render::BlameRenderer;
use routes::AppState;

/// Blame Viewer - serve per-line commit attribution for a git repository
#[derive(Parser)]
#[command(name = "blame-viewer")]
#[command(about = "Serves blame annotation for files of a git repository", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the git repository to serve
    #[arg(value_name = "REPO_PATH")]
    repo_path: Option<String>,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// URL prefix for commit links, e.g. `/owner/repo` gives `/owner/repo/commit/<sha>`
    #[arg(long, default_value = "")]
    commit_link_prefix: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check if blame-viewer is currently running
    Status,
    /// Stop the running blame-viewer instance
    Kill,
}

fn handle_status() {
    match pidfile::running_instance() {
        Some(info) => {
            println!("✓ blame-viewer is running");
            println!("  PID:  {}", info.pid);
            println!("  Repo: {}", info.repo_path);
            println!("  URL:  http://127.0.0.1:{}", info.port);
        }
        None => println!("✗ blame-viewer is not running"),
    }
}

fn handle_kill() {
    match pidfile::running_instance() {
        Some(info) if pidfile::terminate(info.pid) => {
            println!("✓ Stopped blame-viewer (PID {})", info.pid);
            pidfile::remove();
        }
        Some(info) => println!("✗ Failed to stop blame-viewer (PID {})", info.pid),
        None => println!("✗ blame-viewer is not running"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Status) => {
            handle_status();
            return Ok(());
        }
        Some(Commands::Kill) => {
            handle_kill();
            return Ok(());
        }
        None => {}
    }

    let Some(repo_path) = cli.repo_path else {
        eprintln!("Usage: blame-viewer <REPO_PATH> [--open] [--port <PORT>]");
        eprintln!("       blame-viewer status");
        eprintln!("       blame-viewer kill");
        std::process::exit(1);
    };

    if let Some(info) = pidfile::running_instance() {
        eprintln!("✗ blame-viewer is already running (PID {})", info.pid);
        eprintln!("  Repo: {}", info.repo_path);
        eprintln!("  URL:  http://127.0.0.1:{}", info.port);
        eprintln!();
        eprintln!("Run 'blame-viewer kill' to stop it first.");
        std::process::exit(1);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let repo = match GitRepository::open(&repo_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ Failed to open repository: {}", e);
            eprintln!("  Path: {}", repo_path);
            std::process::exit(1);
        }
    };

    let canonical_path = std::fs::canonicalize(&repo_path)
        .unwrap_or_else(|_| PathBuf::from(&repo_path))
        .to_string_lossy()
        .to_string();

    let state = AppState {
        repo: Arc::new(RwLock::new(repo)),
        renderer: Arc::new(BlameRenderer::new(cli.commit_link_prefix)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", cli.port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    pidfile::write(&PidInfo {
        pid: std::process::id(),
        repo_path: canonical_path.clone(),
        port: cli.port,
    })?;
    tracing::info!("Serving {} on {}", canonical_path, addr);

    let url = format!("http://127.0.0.1:{}", cli.port);
    println!();
    println!("  Blame Viewer");
    println!("  Repository: {}", canonical_path);
    println!("  Server:     {}", url);
    println!("  Blame API:  {}/api/v1/repository/blame?path=<file>", url);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    if cli.open {
        if let Err(e) = open::that(&url) {
            eprintln!("  Warning: Could not open browser: {}", e);
        }
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
        pidfile::remove();
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
