use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-cart")]
#[command(about = "Storefront catalog and shopping cart")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the directory holding cart state
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: CartCli,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CartCli {
    /// List products, optionally for one category
    Products {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product
    Product { id: String },
    /// Add one unit of a product to the cart
    Add { id: String },
    /// Remove a line from the cart
    Remove { id: String },
    /// Set a line's quantity; zero or less removes it
    Set {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Restore a recently removed line
    Undo { id: String },
    /// Show cart contents and totals
    Cart,
    /// Show lines that can still be restored
    Removed,
}

impl CliConfig {
    /// Loads the TOML file if one was given and applies command line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        // 命令列覆蓋設定
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_with_negative_quantity() {
        let cli = CliConfig::try_parse_from(["storefront-cart", "set", "3", "-1"]).unwrap();
        assert_eq!(
            cli.command,
            CartCli::Set {
                id: "3".to_string(),
                quantity: -1
            }
        );
    }

    #[test]
    fn test_data_dir_override() {
        let cli =
            CliConfig::try_parse_from(["storefront-cart", "cart", "--data-dir", "/tmp/cart"]).unwrap();
        let config = cli.resolve().unwrap();
        assert_eq!(config.data_dir(), "/tmp/cart");
        assert_eq!(cli.command, CartCli::Cart);
    }

    #[test]
    fn test_products_category_filter() {
        let cli = CliConfig::try_parse_from(["storefront-cart", "products", "--category", "Apparel"])
            .unwrap();
        assert_eq!(
            cli.command,
            CartCli::Products {
                category: Some("Apparel".to_string())
            }
        );
    }
}
