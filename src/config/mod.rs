pub mod toml_config;

use crate::core::{ConfigProvider, ReconcilePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_API_ENDPOINT: &str = "https://api.mercadolibre.com/sites/MLA/search";
pub const DEFAULT_SEARCH_QUERY: &str = "tecnologia";
pub const DEFAULT_RESULT_LIMIT: u32 = 20;
pub const MAX_RESULT_LIMIT: u32 = 50;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_STORAGE_PATH: &str = "./.storefront";
pub const DEFAULT_CART_KEY: &str = "cart";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Args)]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value = DEFAULT_SEARCH_QUERY, help = "Search keyword for the catalog")]
    pub query: String,

    #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: u32,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS, help = "Request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, default_value = DEFAULT_STORAGE_PATH)]
    pub storage_path: String,

    #[arg(long, default_value = DEFAULT_CART_KEY)]
    pub cart_key: String,

    #[arg(long, value_enum, default_value_t = ReconcilePolicy::Clamp)]
    pub reconcile: ReconcilePolicy,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn search_query(&self) -> &str {
        &self.query
    }

    fn result_limit(&self) -> u32 {
        self.limit
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn cart_key(&self) -> &str {
        &self.cart_key
    }

    fn reconcile_policy(&self) -> ReconcilePolicy {
        self.reconcile
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration front end.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_url("api_endpoint", config.api_endpoint())?;
    validation::validate_non_empty_string("query", config.search_query())?;
    validation::validate_range("limit", config.result_limit(), 1, MAX_RESULT_LIMIT)?;
    validation::validate_positive_number("timeout", config.request_timeout_seconds(), 1)?;
    validation::validate_path("storage_path", config.storage_path())?;
    validation::validate_storage_key("cart_key", config.cart_key())?;
    Ok(())
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: CliConfig,
    }

    #[test]
    fn test_cli_defaults_are_valid() {
        let harness = Harness::parse_from(["storefront-cart"]);

        assert_eq!(harness.config.api_endpoint(), DEFAULT_API_ENDPOINT);
        assert_eq!(harness.config.result_limit(), 20);
        assert_eq!(harness.config.reconcile_policy(), ReconcilePolicy::Clamp);
        assert!(harness.config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_out_of_range_limit() {
        let harness = Harness::parse_from(["storefront-cart", "--limit", "500"]);
        assert!(harness.config.validate().is_err());
    }

    #[test]
    fn test_cli_reconcile_flag() {
        let harness = Harness::parse_from(["storefront-cart", "--reconcile", "accept"]);
        assert_eq!(harness.config.reconcile_policy(), ReconcilePolicy::Accept);
    }
}
