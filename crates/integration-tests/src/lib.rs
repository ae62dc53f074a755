//! Integration tests for Shopora.
//!
//! # Running Tests
//!
//! ```bash
//! # Memory-backed API tests (no external services)
//! cargo test -p shopora-integration-tests
//!
//! # Include the PostgreSQL tests
//! DATABASE_URL=postgres://localhost/shopora_test \
//!     cargo test -p shopora-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - HTTP API over the fixture catalog
//! - `shopping_flow` - Client, cart and checkout against a live server
//! - `postgres_catalog` - `PostgreSQL` backend parity (ignored by default)

use std::error::Error;
use std::net::SocketAddr;

use axum::ServiceExt;
use axum::extract::Request;
use secrecy::SecretString;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use shopora_cli::ApiClient;
use shopora_storefront::catalog::{Catalog, MemoryCatalog};
use shopora_storefront::config::{CatalogBackend, DatabaseConfig, StorefrontConfig};
use shopora_storefront::state::AppState;

/// A storefront server running on an ephemeral local port.
///
/// The server task is aborted when the value is dropped.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve `state` on `127.0.0.1:0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(state: AppState) -> Result<Self, Box<dyn Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = shopora_storefront::app(state);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await {
                report_server_error(&e);
            }
        });

        Ok(Self { addr, handle })
    }

    /// Serve the built-in fixture catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn memory() -> Result<Self, Box<dyn Error>> {
        let config = StorefrontConfig::memory(0)?;
        Self::start(AppState::new(config, Catalog::Memory(MemoryCatalog::fixtures()))).await
    }

    /// Serve the catalog stored in `pool`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn postgres(pool: PgPool) -> Result<Self, Box<dyn Error>> {
        let mut config = StorefrontConfig::memory(0)?;
        config.backend = CatalogBackend::Postgres;
        Self::start(AppState::new(config, Catalog::Postgres(pool))).await
    }

    /// API base URL, e.g. `http://127.0.0.1:41234/api`.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Typed client pointed at this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn client(&self) -> Result<ApiClient, Box<dyn Error>> {
        Ok(ApiClient::from_url(&self.api_url())?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[allow(clippy::print_stderr)]
fn report_server_error(e: &std::io::Error) {
    eprintln!("test server stopped: {e}");
}

/// Connect to the test database named by `DATABASE_URL`, if set.
///
/// # Errors
///
/// Returns an error if the variable is set but the database is unreachable.
pub async fn test_pool() -> Result<Option<PgPool>, Box<dyn Error>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        return Ok(None);
    };
    let config = DatabaseConfig {
        url: SecretString::from(url),
        max_connections: 4,
    };
    Ok(Some(shopora_storefront::db::create_pool(&config).await?))
}
