//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, MemoryCatalog};
use crate::config::{CatalogBackend, StorefrontConfig};
use crate::db;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("postgres backend selected but no database configured")]
    MissingDatabase,
    #[error("failed to create database pool: {0}")]
    Pool(#[from] sqlx::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
}

impl AppState {
    /// Create application state around an existing catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Build state for the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `PostgreSQL` pool cannot be created.
    pub async fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match config.backend {
            CatalogBackend::Memory => Catalog::Memory(MemoryCatalog::fixtures()),
            CatalogBackend::Postgres => {
                let database = config.database.as_ref().ok_or(StateError::MissingDatabase)?;
                let pool = db::create_pool(database).await?;
                tracing::info!("Database pool created");
                Catalog::Postgres(pool)
            }
        };
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }
}
