//! CLI command implementations.

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod health;
pub mod migrate;
pub mod products;
pub mod seed;

use secrecy::SecretString;

use shopora_storefront::config::DatabaseConfig;

/// Environment variable holding the catalog database URL.
pub const DATABASE_URL_VAR: &str = "STOREFRONT_DATABASE_URL";

/// Database settings for one-off commands.
///
/// Reads `STOREFRONT_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_config() -> Option<DatabaseConfig> {
    dotenvy::dotenv().ok();

    let url = std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())?;

    Some(DatabaseConfig {
        url: SecretString::from(url),
        max_connections: 2,
    })
}
