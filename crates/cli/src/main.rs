//! Mearim CLI - Terminal storefront for the order-session engine.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! mearim catalog
//!
//! # Identify yourself (scopes addresses and history to the phone)
//! mearim profile set -n "Maria Silva" -p "(99) 98888-7777" -a "Rua A, 10"
//!
//! # Manage delivery addresses
//! mearim address add -n Casa -a "Rua A, 10"
//!
//! # Place an order and get the wa.me link
//! mearim order place -i gas-ultragaz-13kg -i water-cristalina-20l
//!
//! # Repeat a past order
//! mearim order reorder <order-id>
//! ```
//!
//! State lives in a per-directory file store (`--data-dir`, default
//! `./mearim-data`), so consecutive invocations see the same customer.
//!
//! # Environment Variables
//!
//! - `MEARIM_MERCHANT_NAME`, `MEARIM_WHATSAPP_NUMBER`, `MEARIM_NAMESPACE`,
//!   `MEARIM_HANDOFF_DELAY_SECS` - engine configuration
//! - `MEARIM_LOG_JSON` - set to emit JSON logs
//! - `RUST_LOG` - tracing filter (default `mearim=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mearim")]
#[command(author, version, about = "Mearim delivery storefront")]
struct Cli {
    /// Directory holding the persistent store
    #[arg(long, global = true, default_value = "./mearim-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Catalog,
    /// Manage the customer profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage saved delivery addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Place or repeat orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Show past orders
    History,
    /// Show the recurring-order suggestion, if one applies
    Suggest,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the active profile
    Show,
    /// Save the profile (rescopes addresses and history to the phone)
    Set {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer phone, free-form
        #[arg(short, long)]
        phone: String,

        /// Initial delivery address
        #[arg(short, long, default_value = "")]
        address: String,
    },
    /// Clear the profile along with its addresses and history
    Clear,
}

#[derive(Subcommand)]
enum AddressAction {
    /// List saved addresses
    List,
    /// Add an address (the first one becomes the default)
    Add {
        /// Label, e.g. "Casa"
        #[arg(short, long)]
        name: String,

        /// Address text
        #[arg(short, long)]
        address: String,
    },
    /// Edit an address
    Edit {
        /// Address id
        id: String,

        /// New label
        #[arg(short, long)]
        name: String,

        /// New address text
        #[arg(short, long)]
        address: String,
    },
    /// Remove an address (the last one cannot be removed)
    Remove {
        /// Address id
        id: String,
    },
    /// Make an address the default
    SetDefault {
        /// Address id
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Place an order for one or more products
    Place {
        /// Product id, repeatable
        #[arg(short = 'i', long = "item", required = true)]
        items: Vec<String>,

        /// Payment method (`pix`, `dinheiro`, `cartao`)
        #[arg(short, long, default_value = "pix")]
        payment: String,

        /// Delivery type (`entrega`, `retirada`)
        #[arg(short, long, default_value = "entrega")]
        delivery: String,

        /// Saved address id to deliver to (defaults to the default address)
        #[arg(long, conflicts_with = "address")]
        address_id: Option<String>,

        /// One-off address text to deliver to
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Repeat a past order as-is
    Reorder {
        /// Order id from `mearim history`
        id: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mearim=info,mearim_engine=info".into());

    let json = std::env::var("MEARIM_LOG_JSON").is_ok();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = commands::open_session(&cli.data_dir)?;

    match cli.command {
        Commands::Catalog => commands::catalog::list(&session),
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&session),
            ProfileAction::Set {
                name,
                phone,
                address,
            } => commands::profile::set(&mut session, &name, &phone, &address)?,
            ProfileAction::Clear => commands::profile::clear(&mut session)?,
        },
        Commands::Address { action } => match action {
            AddressAction::List => commands::address::list(&session)?,
            AddressAction::Add { name, address } => {
                commands::address::add(&session, &name, &address)?;
            }
            AddressAction::Edit { id, name, address } => {
                commands::address::edit(&session, &id, &name, &address)?;
            }
            AddressAction::Remove { id } => commands::address::remove(&session, &id)?,
            AddressAction::SetDefault { id } => commands::address::set_default(&session, &id)?,
        },
        Commands::Order { action } => match action {
            OrderAction::Place {
                items,
                payment,
                delivery,
                address_id,
                address,
            } => {
                commands::order::place(
                    &mut session,
                    &items,
                    &payment,
                    &delivery,
                    address_id.as_deref(),
                    address.as_deref(),
                )
                .await?;
            }
            OrderAction::Reorder { id } => commands::order::reorder(&session, &id)?,
        },
        Commands::History => commands::history::list(&session)?,
        Commands::Suggest => commands::history::suggest(&session)?,
    }
    Ok(())
}
