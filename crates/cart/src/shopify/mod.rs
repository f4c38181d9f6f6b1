//! Shopify Storefront API cart service.
//!
//! Implements [`CartService`] with hand-written GraphQL documents over
//! `reqwest`. Every mutation returns the full authoritative cart; nothing
//! here is cached - cart state is mutable and always fetched fresh.
//!
//! The service creates a cart lazily on the first add (or discount update)
//! and remembers its ID for subsequent mutations.

mod queries;
pub mod types;

use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use wildroot_core::CartId;

use crate::mutation::CartMutation;
use crate::service::{CartService, ServiceError};
use crate::snapshot::CartSnapshot;

use types::{WireCart, WireMutationPayload, convert_cart, join_user_errors};

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the private token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_private_token", &"[REDACTED]")
            .finish()
    }
}

struct ServiceInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cart_id: Mutex<Option<CartId>>,
}

/// Cart service backed by the Shopify Storefront API.
#[derive(Clone)]
pub struct ShopifyCartService {
    inner: Arc<ServiceInner>,
}

#[derive(Deserialize)]
struct GraphQLEnvelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQLResponseError>>,
}

#[derive(Deserialize)]
struct GraphQLResponseError {
    message: String,
}

impl ShopifyCartService {
    /// Create a new cart service with no cart bound yet.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self {
            inner: Arc::new(ServiceInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: config.storefront_private_token.expose_secret().to_string(),
                cart_id: Mutex::new(None),
            }),
        }
    }

    /// Bind the service to an existing cart (e.g., restored from a session).
    pub fn set_cart_id(&self, cart_id: CartId) {
        *self.lock_cart_id() = Some(cart_id);
    }

    /// The cart this service is currently bound to, if any.
    #[must_use]
    pub fn cart_id(&self) -> Option<CartId> {
        self.lock_cart_id().clone()
    }

    fn lock_cart_id(&self) -> std::sync::MutexGuard<'_, Option<CartId>> {
        match self.inner.cart_id.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Execute a GraphQL document and return the `data` payload.
    async fn execute(
        &self,
        query: String,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ServiceError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header("Shopify-Storefront-Private-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ServiceError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Storefront API returned non-success status"
            );
            return Err(ServiceError::GraphQL(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        let envelope: GraphQLEnvelope = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Storefront GraphQL response"
                );
                return Err(ServiceError::Parse(e));
            }
        };

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            return Err(ServiceError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ServiceError::GraphQL("No data in response".to_string()))
    }

    /// Run a cart mutation and unwrap its payload at `key`, remembering the
    /// returned cart ID.
    async fn run_mutation(
        &self,
        query: String,
        variables: serde_json::Value,
        key: &str,
    ) -> Result<CartSnapshot, ServiceError> {
        let mut data = self.execute(query, variables).await?;
        let payload: WireMutationPayload = serde_json::from_value(data[key].take())?;

        if !payload.user_errors.is_empty() {
            return Err(ServiceError::UserError(join_user_errors(
                &payload.user_errors,
            )));
        }

        let cart = payload
            .cart
            .ok_or_else(|| ServiceError::GraphQL(format!("{key} returned no cart")))?;
        let snapshot = convert_cart(cart);
        self.set_cart_id(snapshot.id.clone());
        Ok(snapshot)
    }

    fn require_cart_id(&self) -> Result<CartId, ServiceError> {
        self.cart_id()
            .ok_or_else(|| ServiceError::NotFound("No cart exists yet".to_string()))
    }
}

#[async_trait::async_trait]
impl CartService for ShopifyCartService {
    #[instrument(skip(self, mutation))]
    async fn apply(&self, mutation: &CartMutation) -> Result<CartSnapshot, ServiceError> {
        match mutation {
            CartMutation::LinesAdd {
                merchandise_id,
                quantity,
            } => {
                let line = json!({
                    "merchandiseId": merchandise_id.as_str(),
                    "quantity": quantity,
                });
                match self.cart_id() {
                    Some(cart_id) => {
                        self.run_mutation(
                            queries::cart_lines_add(),
                            json!({ "cartId": cart_id.as_str(), "lines": [line] }),
                            "cartLinesAdd",
                        )
                        .await
                    }
                    None => {
                        // No cart yet: create one with this line
                        self.run_mutation(
                            queries::cart_create(),
                            json!({ "input": { "lines": [line] } }),
                            "cartCreate",
                        )
                        .await
                    }
                }
            }
            CartMutation::LinesUpdate { line_id, quantity } => {
                let cart_id = self.require_cart_id()?;
                self.run_mutation(
                    queries::cart_lines_update(),
                    json!({
                        "cartId": cart_id.as_str(),
                        "lines": [{ "id": line_id.as_str(), "quantity": quantity }],
                    }),
                    "cartLinesUpdate",
                )
                .await
            }
            CartMutation::LinesRemove { line_ids } => {
                let cart_id = self.require_cart_id()?;
                let ids: Vec<&str> = line_ids.iter().map(wildroot_core::LineId::as_str).collect();
                self.run_mutation(
                    queries::cart_lines_remove(),
                    json!({ "cartId": cart_id.as_str(), "lineIds": ids }),
                    "cartLinesRemove",
                )
                .await
            }
            CartMutation::DiscountCodesUpdate { codes } => match self.cart_id() {
                Some(cart_id) => {
                    self.run_mutation(
                        queries::cart_discount_codes_update(),
                        json!({ "cartId": cart_id.as_str(), "discountCodes": codes }),
                        "cartDiscountCodesUpdate",
                    )
                    .await
                }
                None => {
                    self.run_mutation(
                        queries::cart_create(),
                        json!({ "input": { "discountCodes": codes } }),
                        "cartCreate",
                    )
                    .await
                }
            },
        }
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<Option<CartSnapshot>, ServiceError> {
        let Some(cart_id) = self.cart_id() else {
            return Ok(None);
        };

        let mut data = self
            .execute(queries::get_cart(), json!({ "cartId": cart_id.as_str() }))
            .await?;

        let cart_value = data["cart"].take();
        if cart_value.is_null() {
            // Cart expired or was completed at checkout
            return Ok(None);
        }

        let cart: WireCart = serde_json::from_value(cart_value)?;
        Ok(Some(convert_cart(cart)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ShopifyConfig {
        ShopifyConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("super_secret_private_token"),
        }
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let debug_output = format!("{:?}", config());
        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_private_token"));
    }

    #[test]
    fn test_cart_id_starts_unbound() {
        let service = ShopifyCartService::new(&config());
        assert!(service.cart_id().is_none());

        service.set_cart_id(CartId::new("gid://shopify/Cart/1"));
        assert_eq!(
            service.cart_id(),
            Some(CartId::new("gid://shopify/Cart/1"))
        );
    }
}
