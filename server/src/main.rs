//! Quotebook Server - hosts the random-quote widget's data.
//!
//! This server exposes the quote collection over HTTP, pushes live updates to
//! open pages over WebSocket, and periodically merges quotes from a remote
//! endpoint using the quotebook-engine merge rules.

mod config;
mod error;
mod handlers;
mod routes;
mod storage;
mod sync;
mod websocket;

use crate::config::Config;
use crate::storage::FileStore;
use crate::sync::{RemoteSyncClient, SyncScheduler};
use crate::websocket::ConnectionManager;
use axum::Router;
use quotebook_engine::{Error as EngineError, MemoryStore, QuoteBook, QuoteStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The quote book shared across handlers and the sync scheduler.
pub type SharedBook = Arc<Mutex<QuoteBook>>;

/// Run `f` against the book on the blocking thread pool.
///
/// Book operations read and write through the file store, so they run off the
/// async workers. The lock is held until `f` returns, keeping each operation
/// atomic.
pub async fn with_book<T, F>(book: &SharedBook, f: F) -> Result<T, tokio::task::JoinError>
where
    F: FnOnce(&mut QuoteBook) -> T + Send + 'static,
    T: Send + 'static,
{
    let mut guard = Arc::clone(book).lock_owned().await;
    tokio::task::spawn_blocking(move || f(&mut *guard)).await
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub book: SharedBook,
    pub config: Arc<Config>,
    pub conn_manager: Arc<ConnectionManager>,
    pub scheduler: Arc<SyncScheduler>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotebook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Quotebook Server on {}:{}", config.host, config.port);

    // Durable quotes live on disk; the session only lasts as long as the process
    let durable = Arc::new(FileStore::open(&config.data_dir)?);
    tracing::info!(dir = %durable.dir().display(), "Using data directory");
    let session = Arc::new(MemoryStore::new());

    let book = match QuoteBook::open(durable.clone(), session.clone()) {
        Ok(book) => book,
        Err(e @ EngineError::CorruptState { .. }) => {
            tracing::warn!("{}; starting from the default quotes", e);
            QuoteBook::with_store(QuoteStore::with_defaults(), durable, session)
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(quotes = book.store().len(), "Quote book loaded");
    let book: SharedBook = Arc::new(Mutex::new(book));

    // Build application state
    let conn_manager = ConnectionManager::new_shared();
    let client = RemoteSyncClient::new(config.sync.url.clone(), config.sync.timeout)?;
    let scheduler = SyncScheduler::new(
        client,
        book.clone(),
        conn_manager.clone(),
        config.sync.interval,
    );

    let sync_task = if config.sync.enabled {
        Some(scheduler.spawn())
    } else {
        tracing::info!("Periodic sync disabled");
        None
    };

    let state = AppState {
        book,
        config: Arc::new(config.clone()),
        conn_manager,
        scheduler: scheduler.clone(),
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    if let Some(task) = sync_task {
        if let Err(e) = task.await {
            tracing::warn!("Sync scheduler ended abnormally: {}", e);
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve when Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn with_book_runs_off_the_async_worker() {
        let book: SharedBook = Arc::new(Mutex::new(QuoteBook::with_store(
            QuoteStore::with_defaults(),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )));

        // A single-threaded runtime keeps ticking while the closure blocks
        let slow = async {
            with_book(&book, |_| std::thread::sleep(Duration::from_millis(300)))
                .await
                .unwrap();
            Instant::now()
        };
        let ticks = async {
            for _ in 0..5 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Instant::now()
        };

        let (slow_done, ticks_done) = tokio::join!(slow, ticks);
        assert!(ticks_done < slow_done);
    }

    #[tokio::test]
    async fn with_book_returns_the_closure_result() {
        let book: SharedBook = Arc::new(Mutex::new(QuoteBook::with_store(
            QuoteStore::with_defaults(),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )));

        let added = with_book(&book, |book| book.add("Off the worker", "Ops"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(added.category, "Ops");
        assert_eq!(book.lock().await.store().len(), 4);
    }
}
