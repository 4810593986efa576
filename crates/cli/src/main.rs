//! Emerald CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations (schema + session table)
//! em-cli migrate
//!
//! # Create a storefront account
//! em-cli user create --first-name Ada --last-name Lovelace \
//!     --email ada@example.com --password 'correct horse battery'
//!
//! # Work with file-backed stores
//! em-cli local --dir .emerald cart add 3
//! em-cli local --dir .emerald cart show --promo discount20
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create storefront accounts
//! - `local` - Cart, wishlist, and recently viewed over a directory of JSON files

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use emerald_storefront::catalog::Catalog;
use emerald_storefront::context::ClientContext;
use emerald_storefront::notify::TracingNotifier;
use emerald_storefront::persistence::FileStorage;
use emerald_storefront::pricing::PromoPolicy;
use emerald_storefront::services::auth::Registration;

mod commands;

use commands::local::Collection;

#[derive(Parser)]
#[command(name = "em-cli")]
#[command(author, version, about = "Emerald CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage storefront accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Drive the client stores against local JSON files
    Local {
        /// Storage directory (one JSON file per collection)
        #[arg(short, long, default_value = ".emerald")]
        dir: PathBuf,

        /// Promo code accepted by `cart show --promo`
        #[arg(long, env = "STOREFRONT_PROMO_CODE", default_value = "discount20")]
        promo_code: String,

        /// Percent taken off by the promo code
        #[arg(long, env = "STOREFRONT_PROMO_PERCENT", default_value_t = 20)]
        promo_percent: u32,

        #[command(subcommand)]
        collection: Collection,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                first_name,
                last_name,
                email,
                password,
            } => {
                commands::user::create(Registration {
                    first_name,
                    last_name,
                    email,
                    password,
                })
                .await?;
            }
        },
        Commands::Local {
            dir,
            promo_code,
            promo_percent,
            collection,
        } => {
            let storage = FileStorage::open(&dir)?;
            tracing::debug!(dir = %storage.dir().display(), "Opened local storage");

            let mut context = ClientContext::hydrated(&storage);
            let output = commands::local::execute(
                &mut context,
                &Catalog::builtin(),
                &PromoPolicy::new(&promo_code, promo_percent),
                collection,
                &TracingNotifier,
            )?;

            #[allow(clippy::print_stdout)]
            {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
    }
    Ok(())
}
