//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_API_BASE_URL` - Base URL of the product/stock API
//!
//! ## Optional
//! - `CART_API_TOKEN` - Bearer token sent with every API request
//! - `CART_STORAGE_PATH` - File backing the key-value store (default: rocketshoes-storage.json)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: @RocketShoes:cart)
//! - `CART_PRODUCT_CACHE_TTL_SECS` - Catalog cache TTL, 0 disables (default: 300)
//! - `CART_RESET_ON_CORRUPT` - Start with an empty cart if the stored one is unreadable (default: false)
//! - `CART_CURRENCY` - ISO 4217 code used when displaying prices (default: BRL)

use std::path::PathBuf;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Key the cart has always been stored under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";
const DEFAULT_STORAGE_PATH: &str = "rocketshoes-storage.json";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What to do when the stored cart cannot be decoded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Refuse to start.
    #[default]
    Strict,
    /// Start with an empty cart and log a warning. The bad entry is
    /// overwritten by the next successful mutation.
    ResetOnCorrupt,
}

/// Product/stock API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Catalog cache TTL (`None` disables caching)
    pub product_cache_ttl: Option<Duration>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

impl ApiConfig {
    /// Config for `base_url` with no token and the default cache TTL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            token: None,
            product_cache_ttl: Some(Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS)),
        }
    }
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Product/stock API settings
    pub api: ApiConfig,
    /// File backing the key-value store
    pub storage_path: PathBuf,
    /// Key the serialized cart lives under
    pub storage_key: String,
    /// Startup behavior for an unreadable stored cart
    pub load_policy: LoadPolicy,
    /// Currency used for display
    pub currency: CurrencyCode,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = env.required("CART_API_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CART_API_BASE_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_API_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let ttl_secs = env.parsed::<u64>(
            "CART_PRODUCT_CACHE_TTL_SECS",
            DEFAULT_PRODUCT_CACHE_TTL_SECS,
        )?;
        let api = ApiConfig {
            base_url: with_trailing_slash(base_url),
            token: env
                .optional("CART_API_TOKEN")
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            product_cache_ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
        };

        let storage_key = env.or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let load_policy = if env.parsed::<bool>("CART_RESET_ON_CORRUPT", false)? {
            LoadPolicy::ResetOnCorrupt
        } else {
            LoadPolicy::Strict
        };

        Ok(Self {
            api,
            storage_path: PathBuf::from(env.or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            storage_key,
            load_policy,
            currency: env.parsed("CART_CURRENCY", CurrencyCode::BRL)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Relative joins drop the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required environment variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional environment variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get an environment variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.0)(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        }
    }
}
