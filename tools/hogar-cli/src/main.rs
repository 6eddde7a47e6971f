//! Hogar CLI - Manage a furniture and home-decor storefront from the terminal.
//!
//! Commands:
//! - `hogar products` - Catalog administration, trash, import/export
//! - `hogar browse` - Filter, sort and page through the shop
//! - `hogar cart` - Shopping cart
//! - `hogar coupon` - Coupons and the applied discount
//! - `hogar favorites` - Saved products
//! - `hogar reviews` - Product reviews
//! - `hogar checkout` - WhatsApp order and product inquiry links
//! - `hogar remote` - Hosted product table
//! - `hogar contact` - Send the contact form
//! - `hogar config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    BrowseArgs, CartArgs, CheckoutArgs, ConfigArgs, ContactArgs, CouponArgs, FavoritesArgs,
    ProductsArgs, RemoteArgs, ReviewsArgs,
};

/// Environment variable holding a tracing filter, e.g. `hogar_core=debug`.
const LOG_ENV: &str = "HOGAR_LOG";

/// Hogar CLI - Manage the storefront catalog, cart and orders
#[derive(Parser)]
#[command(name = "hogar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Products(ProductsArgs),

    /// Browse the shop with filters and sorting
    Browse(BrowseArgs),

    /// Manage the shopping cart
    Cart(CartArgs),

    /// Manage and apply coupons
    Coupon(CouponArgs),

    /// Manage favorite products
    Favorites(FavoritesArgs),

    /// Read and write product reviews
    Reviews(ReviewsArgs),

    /// Hand the cart off to WhatsApp
    Checkout(CheckoutArgs),

    /// Work with the hosted product table
    Remote(RemoteArgs),

    /// Send a message through the contact form
    Contact(ContactArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;
    if ctx.output.is_verbose() {
        if let Some(path) = &ctx.config_path {
            ctx.output.debug(&format!("Usando configuración {}", path.display()));
        }
    }

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Coupon(args) => commands::coupons::run(args, &ctx).await,
        Commands::Favorites(args) => commands::favorites::run(args, &ctx).await,
        Commands::Reviews(args) => commands::reviews::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Remote(args) => commands::remote::run(args, &ctx).await,
        Commands::Contact(args) => commands::contact::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
