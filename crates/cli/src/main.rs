//! Wildroot CLI - Cart inspection and mutation tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a variant to a new cart
//! wildroot cart add -m gid://shopify/ProductVariant/123 -q 2
//!
//! # Show an existing cart
//! wildroot cart show -c gid://shopify/Cart/abc
//!
//! # Set a line's quantity
//! wildroot cart update -c gid://shopify/Cart/abc -l gid://shopify/CartLine/1 -q 3
//!
//! # Remove lines
//! wildroot cart remove -c gid://shopify/Cart/abc -l gid://shopify/CartLine/1
//!
//! # Replace discount codes
//! wildroot cart discount -c gid://shopify/Cart/abc SAVE10
//!
//! # Print the checkout URL
//! wildroot cart checkout -c gid://shopify/Cart/abc
//! ```
//!
//! # Commands
//!
//! - `cart show` - Fetch and print a cart
//! - `cart add` - Add a variant (creates the cart if none given)
//! - `cart update` - Set a line's quantity
//! - `cart remove` - Remove lines
//! - `cart discount` - Replace discount codes
//! - `cart checkout` - Print the checkout URL

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "wildroot")]
#[command(author, version, about = "Wildroot CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and mutate carts
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Fetch and print a cart
    Show {
        /// Cart ID
        #[arg(short, long)]
        cart: String,
    },
    /// Add a variant to a cart (creates one if no cart ID is given)
    Add {
        /// Existing cart ID (omit to create a new cart)
        #[arg(short, long)]
        cart: Option<String>,

        /// Product variant ID
        #[arg(short, long)]
        merchandise: String,

        /// Quantity to add
        #[arg(short, long, default_value = "1")]
        quantity: i64,
    },
    /// Set a line's quantity (0 removes the line)
    Update {
        /// Cart ID
        #[arg(short, long)]
        cart: String,

        /// Cart line ID
        #[arg(short, long)]
        line: String,

        /// New absolute quantity
        #[arg(short, long)]
        quantity: i64,
    },
    /// Remove lines from a cart
    Remove {
        /// Cart ID
        #[arg(short, long)]
        cart: String,

        /// Cart line IDs to remove
        #[arg(short, long, required = true)]
        line: Vec<String>,
    },
    /// Replace the cart's discount codes (pass none to clear)
    Discount {
        /// Cart ID
        #[arg(short, long)]
        cart: String,

        /// Discount codes
        codes: Vec<String>,
    },
    /// Print the checkout URL for a cart
    Checkout {
        /// Cart ID
        #[arg(short, long)]
        cart: String,
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
        Commands::Cart { action } => match action {
            CartAction::Show { cart } => commands::cart::show(&cart).await?,
            CartAction::Add {
                cart,
                merchandise,
                quantity,
            } => commands::cart::add(cart.as_deref(), &merchandise, quantity).await?,
            CartAction::Update {
                cart,
                line,
                quantity,
            } => commands::cart::update(&cart, &line, quantity).await?,
            CartAction::Remove { cart, line } => commands::cart::remove(&cart, &line).await?,
            CartAction::Discount { cart, codes } => {
                commands::cart::discount(&cart, &codes).await?;
            }
            CartAction::Checkout { cart } => commands::cart::checkout(&cart).await?,
        },
    }
    Ok(())
}
