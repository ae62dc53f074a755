//! Shopora CLI - database tooling and a command-line shopping client.
//!
//! # Usage
//!
//! ```bash
//! # Database
//! shopora migrate
//! shopora seed --clear
//! shopora seed --file catalog.yaml
//!
//! # Browse the catalog (SHOPORA_API_URL, default http://localhost:5000/api)
//! shopora products list --category furniture --sort-by price --sort-order asc
//! shopora products search lamp
//! shopora categories list --with-counts
//!
//! # Shop
//! shopora cart add 3 --quantity 2
//! shopora cart show
//! shopora checkout --form form.yaml
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run catalog database migrations
//! - `seed` - Load the fixture catalog (or a YAML catalog) into `PostgreSQL`
//! - `products` / `categories` - Query the storefront API
//! - `cart` - Manage the local cart (stored under `--cart-dir`)
//! - `checkout` - Place a mock order for the cart contents
//! - `health` - Check that the API is up

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use shopora_cli::ApiClient;
use shopora_cli::client::DEFAULT_API_URL;
use shopora_cli::output::Format;
use shopora_cli::storage::{DEFAULT_CART_DIR, FileStorage};

mod commands;

#[derive(Parser)]
#[command(name = "shopora")]
#[command(author, version, about = "Shopora CLI tools")]
struct Cli {
    /// Storefront API base URL
    #[arg(long, global = true, env = "SHOPORA_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory holding the local cart
    #[arg(long, global = true, env = "SHOPORA_CART_DIR", default_value = DEFAULT_CART_DIR)]
    cart_dir: PathBuf,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run catalog database migrations
    Migrate,
    /// Seed the catalog database
    Seed {
        /// YAML catalog to load instead of the built-in fixtures
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Remove all existing categories and products first
        #[arg(long)]
        clear: bool,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place a mock order for everything in the cart
    Checkout {
        /// YAML or JSON file with the shipping and payment form
        #[arg(short, long)]
        form: PathBuf,
    },
    /// Check API liveness and readiness
    Health,
}

/// Sorting and paging shared by listing commands.
#[derive(Args, Debug, Default)]
struct PageArgs {
    /// Page number (1-based)
    #[arg(long)]
    page: Option<u32>,

    /// Items per page (max 100)
    #[arg(long)]
    limit: Option<u32>,

    /// Sort field (`createdAt`, `updatedAt`, `price`, `name`, `stock`)
    #[arg(long)]
    sort_by: Option<String>,

    /// Sort order (`asc`, `desc`)
    #[arg(long)]
    sort_order: Option<String>,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products with filters
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Only featured (`true`) or non-featured (`false`) products
        #[arg(long)]
        featured: Option<bool>,

        /// Substring match on name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Minimum price
        #[arg(long)]
        min_price: Option<String>,

        /// Maximum price
        #[arg(long)]
        max_price: Option<String>,
    },
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
    /// Featured products
    Featured {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Search by relevance
    Search {
        /// Search term
        query: String,

        #[arg(long)]
        limit: Option<u32>,
    },
    /// Products of one category
    Category {
        /// Category slug
        slug: String,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Minimum, maximum and average price
    PriceRange,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List active categories
    List {
        /// Include product counts
        #[arg(long)]
        with_counts: bool,
    },
    /// Show one category
    Show {
        /// Category slug
        slug: String,
    },
    /// Products of one category
    Products {
        /// Category slug
        slug: String,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line (0 removes it)
    Set {
        /// Product ID
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing; logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopora=info,shopora_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let format = if cli.json { Format::Json } else { Format::Text };

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, clear } => commands::seed::run(file.as_deref(), clear).await?,
        Commands::Products { action } => {
            let client = ApiClient::from_url(&cli.api_url)?;
            match action {
                ProductAction::List {
                    page,
                    category,
                    featured,
                    search,
                    min_price,
                    max_price,
                } => {
                    let params = commands::products::list_params(
                        &page, category, featured, search, min_price, max_price,
                    );
                    commands::products::list(&client, &params, format).await?;
                }
                ProductAction::Show { id } => commands::products::show(&client, &id, format).await?,
                ProductAction::Featured { limit } => {
                    commands::products::featured(&client, limit, format).await?;
                }
                ProductAction::Search { query, limit } => {
                    commands::products::search(&client, &query, limit, format).await?;
                }
                ProductAction::Category { slug, page } => {
                    commands::products::by_category(&client, &slug, &page.into(), format).await?;
                }
                ProductAction::PriceRange => commands::products::price_range(&client, format).await?,
            }
        }
        Commands::Categories { action } => {
            let client = ApiClient::from_url(&cli.api_url)?;
            match action {
                CategoryAction::List { with_counts } => {
                    commands::categories::list(&client, with_counts, format).await?;
                }
                CategoryAction::Show { slug } => {
                    commands::categories::show(&client, &slug, format).await?;
                }
                CategoryAction::Products { slug, page } => {
                    commands::categories::products(&client, &slug, &page.into(), format).await?;
                }
            }
        }
        Commands::Cart { action } => {
            let storage = FileStorage::new(&cli.cart_dir);
            match action {
                CartAction::Show => commands::cart::show(storage, format)?,
                CartAction::Add { id, quantity } => {
                    let client = ApiClient::from_url(&cli.api_url)?;
                    commands::cart::add(&client, storage, &id, quantity, format).await?;
                }
                CartAction::Set { id, quantity } => {
                    commands::cart::set(storage, &id, quantity, format)?;
                }
                CartAction::Remove { id } => commands::cart::remove(storage, &id, format)?,
                CartAction::Clear => commands::cart::clear(storage, format)?,
            }
        }
        Commands::Checkout { form } => {
            let storage = FileStorage::new(&cli.cart_dir);
            commands::checkout::run(storage, &form, format).await?;
        }
        Commands::Health => {
            let client = ApiClient::from_url(&cli.api_url)?;
            commands::health::run(&client, format).await?;
        }
    }
    Ok(())
}

impl From<PageArgs> for shopora_core::query::CategoryProductParams {
    fn from(args: PageArgs) -> Self {
        Self {
            page: args.page.map(|p| p.to_string()),
            limit: args.limit.map(|l| l.to_string()),
            sort_by: args.sort_by,
            sort_order: args.sort_order,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from(["shopora", "cart", "add", "7", "-q", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { ref id, quantity: 3 }
            } if id == "7"
        ));
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_product_list_filters() {
        let cli = Cli::try_parse_from([
            "shopora",
            "--json",
            "products",
            "list",
            "--category",
            "furniture",
            "--featured",
            "true",
            "--sort-by",
            "price",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::Products {
            action: ProductAction::List {
                page,
                category,
                featured,
                ..
            },
        } = cli.command
        else {
            panic!("expected products list");
        };
        assert_eq!(category.as_deref(), Some("furniture"));
        assert_eq!(featured, Some(true));
        assert_eq!(page.sort_by.as_deref(), Some("price"));
    }
}
