use crate::config::{
    validate_provider, DEFAULT_API_ENDPOINT, DEFAULT_CART_KEY, DEFAULT_RESULT_LIMIT,
    DEFAULT_SEARCH_QUERY, DEFAULT_STORAGE_PATH, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::{ConfigProvider, ReconcilePolicy};
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cart: CartConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub query: Option<String>,
    pub limit: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: Option<String>,
    pub cart_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    pub reconcile: Option<ReconcilePolicy>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ShopError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let substituted = Self::substitute_env_vars(content)?;
        let config: TomlConfig = toml::from_str(&substituted)?;
        Ok(config)
    }

    /// Replaces `${VAR_NAME}` with the environment value, leaving unknown names as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShopError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        self.source.endpoint.as_deref().unwrap_or(DEFAULT_API_ENDPOINT)
    }

    fn search_query(&self) -> &str {
        self.source.query.as_deref().unwrap_or(DEFAULT_SEARCH_QUERY)
    }

    fn result_limit(&self) -> u32 {
        self.source.limit.unwrap_or(DEFAULT_RESULT_LIMIT)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn storage_path(&self) -> &str {
        self.storage.path.as_deref().unwrap_or(DEFAULT_STORAGE_PATH)
    }

    fn cart_key(&self) -> &str {
        self.storage.cart_key.as_deref().unwrap_or(DEFAULT_CART_KEY)
    }

    fn reconcile_policy(&self) -> ReconcilePolicy {
        self.cart.reconcile.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
