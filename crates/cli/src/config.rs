//! CLI configuration loaded from environment variables.

use secrecy::SecretString;
use thiserror::Error;
use wildroot_cart::ShopifyConfig;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Load the Shopify Storefront configuration from the environment.
///
/// Calls `dotenvy::dotenv()` to load from `.env` file if present.
///
/// # Errors
///
/// Returns `ConfigError` if `SHOPIFY_STORE` or
/// `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` is missing.
pub fn shopify_from_env() -> Result<ShopifyConfig, ConfigError> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    Ok(ShopifyConfig {
        store: get_required_env("SHOPIFY_STORE")?,
        api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
        storefront_private_token: get_required_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?,
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
