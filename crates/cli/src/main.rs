//! Cartwheel CLI - a Shopify cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart (creates one on first use)
//! cartwheel show
//!
//! # Add two of a variant
//! cartwheel add gid://shopify/ProductVariant/123 -q 2 --title "Tee" --price 24.00
//!
//! # Add a product by handle, picking a variant by title
//! cartwheel add-product canvas-tote --variant Large
//!
//! # Print the checkout URL
//! cartwheel checkout
//! ```
//!
//! The cart id is persisted in `CARTWHEEL_CART_FILE` so consecutive commands
//! operate on the same remote cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cartwheel_storefront::config::CartwheelConfig;
use cartwheel_storefront::state::AppState;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about = "Shopify cart from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add a variant to the cart
    Add {
        /// Product variant ID
        variant_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Product title shown until the cart is synced
        #[arg(long)]
        title: Option<String>,

        /// Variant title shown until the cart is synced
        #[arg(long)]
        variant_title: Option<String>,

        /// Unit price shown until the cart is synced
        #[arg(long)]
        price: Option<Decimal>,

        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Look up a product by handle and add one of its variants
    AddProduct {
        /// Product handle
        handle: String,

        /// Variant title (defaults to the first available variant)
        #[arg(long)]
        variant: Option<String>,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a variant from the cart
    Remove {
        /// Product variant ID
        variant_id: String,
    },
    /// Set the quantity of a variant (values below 1 are ignored)
    Update {
        /// Product variant ID
        variant_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every item and start a new cart
    Clear,
    /// Print the checkout URL
    Checkout,
    /// Reload the cart from Shopify
    Sync,
    /// Forget the stored cart
    Reset,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartwheelConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed for Sentry, which must be set up before tracing
    let config = CartwheelConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartwheel=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time(),
        )
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: CartwheelConfig) -> Result<(), CommandError> {
    let state = AppState::new(config)?;

    if matches!(cli.command, Commands::Reset) {
        return commands::cart::reset(&state);
    }

    state.cart().initialize().await?;

    match cli.command {
        Commands::Show => commands::cart::show(&state),
        Commands::Add {
            variant_id,
            quantity,
            title,
            variant_title,
            price,
            image,
        } => {
            let item = commands::cart::NewItem {
                variant_id,
                quantity,
                title,
                variant_title,
                price,
                image,
            };
            commands::cart::add(&state, item).await
        }
        Commands::AddProduct {
            handle,
            variant,
            quantity,
        } => commands::cart::add_product(&state, &handle, variant.as_deref(), quantity).await,
        Commands::Remove { variant_id } => commands::cart::remove(&state, &variant_id).await,
        Commands::Update {
            variant_id,
            quantity,
        } => commands::cart::update(&state, &variant_id, quantity).await,
        Commands::Clear => commands::cart::clear(&state).await,
        Commands::Checkout => commands::cart::checkout(&state).await,
        Commands::Sync => commands::cart::sync(&state).await,
        Commands::Reset => commands::cart::reset(&state),
    }
}
