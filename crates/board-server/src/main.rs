//! Server entry point.
//!
//! Startup order: parse arguments, initialize tracing, load the signing
//! secret (fatal if absent), open the post store, build the shared state,
//! serve. The secret's value is never logged.

use anyhow::{Context, Result};
use board_server::config::Args;
use board_server::store::PostStore;
use board_server::{AppState, app};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let secret = args
        .load_secret()
        .context("signing secret is required at startup")?;
    let users = args.load_users().context("failed to load user table")?;

    let store = PostStore::open(&args.db_path)
        .with_context(|| format!("failed to open database {}", args.db_path.display()))?;

    let state = AppState::new(secret, store, users).context("failed to build signer")?;

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(addr = %args.listen, db = %args.db_path.display(), "board server listening");

    axum::serve(listener, app(state))
        .await
        .context("server error")?;

    Ok(())
}
