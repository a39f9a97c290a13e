//! Board host
//!
//! Owns one persisted board store and serves a UI shell over stdio:
//! commands arrive as JSON lines on stdin, state updates leave as JSON lines
//! on stdout. Logs go to stderr.

mod protocol;
mod session;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_core::config::BoardConfig;
use board_core::store::BoardStore;

use crate::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "board_host=info,board_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BoardConfig::from_env();
    tracing::info!(
        "Using data directory {:?}, storage key {}",
        config.data_dir,
        config.storage_key
    );

    let store = BoardStore::open_with_config(&config).await?;
    let session = Session::new(store, config.drag);

    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
