use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::checkout::PaymentMethod;
use crate::types::PartCategory;

/// GigaHz - build a compatible PC and check out from the terminal
#[derive(Parser, Debug)]
#[command(name = "gigahz")]
#[command(about = "Terminal PC builder and checkout for the GigaHz store")]
#[command(version)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Product API base URL (overrides config and GIGAHZ_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Serve the catalog from a local JSON file instead of the API
    #[arg(long, global = true, value_name = "CATALOG_JSON")]
    pub offline: Option<PathBuf>,

    /// Directory for the session store and logs
    #[arg(long, global = true)]
    pub session_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive PC builder
    Build,
    /// Print the normalized part list for a category
    Catalog {
        /// Part category (cpu, motherboard, ram, storage, casing, cooling, psu, gpu)
        category: PartCategory,
        /// Only parts for this socket
        #[arg(long)]
        socket: Option<String>,
        /// Only RAM of this generation (DDR4, DDR5)
        #[arg(long)]
        ram_type: Option<String>,
        /// Include inactive listings
        #[arg(long)]
        include_inactive: bool,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Place a demo order for the last build added to the cart
    Checkout(CheckoutArgs),
    /// Validate a configuration file
    ValidateConfig {
        /// Path to configuration file to validate
        path: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    pub name: String,
    /// Phone number
    #[arg(long)]
    pub phone: String,
    /// Email address
    #[arg(long, default_value = "")]
    pub email: String,
    /// Address line 1
    #[arg(long)]
    pub address: String,
    /// Address line 2
    #[arg(long, default_value = "")]
    pub address2: String,
    /// City
    #[arg(long)]
    pub city: String,
    /// Province
    #[arg(long, default_value = "")]
    pub province: String,
    /// Postal code
    #[arg(long, default_value = "")]
    pub postal: String,
    /// Promo code (GIGAHZ10, FREESHIP)
    #[arg(long)]
    pub promo: Option<String>,
    /// Payment method (cod, card, bank)
    #[arg(long, default_value = "cod")]
    pub payment: PaymentMethod,
    /// Only print the totals, do not place the order
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_args() {
        let cli = Cli::try_parse_from([
            "gigahz", "catalog", "motherboard", "--socket", "AM5", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Catalog {
                category,
                socket,
                json,
                ..
            }) => {
                assert_eq!(category, PartCategory::Motherboard);
                assert_eq!(socket.as_deref(), Some("AM5"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_checkout_args_defaults() {
        let cli = Cli::try_parse_from([
            "gigahz", "--offline", "parts.json", "checkout", "--name", "A", "--phone", "1",
            "--address", "x", "--city", "y",
        ])
        .unwrap();
        assert_eq!(cli.offline, Some(PathBuf::from("parts.json")));
        let Some(Commands::Checkout(args)) = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(args.payment, PaymentMethod::Cod);
        assert!(args.promo.is_none());
    }

    #[test]
    fn test_no_command_defaults_to_tui() {
        let cli = Cli::try_parse_from(["gigahz"]).unwrap();
        assert!(cli.command.is_none());
    }
}
