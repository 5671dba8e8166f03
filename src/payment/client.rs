//! Checkout Provider Client
//!
//! Thin HTTP client for the hosted payment provider: price listing by
//! product, checkout-session creation, and session retrieval by id. The
//! provider consumes form-encoded requests and returns JSON.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::constants::network;
use crate::types::{Result, SessionId, TinteroError};

/// A created checkout session: the id names it, the URL hosts the flow
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: SessionId,
    pub url: String,
}

/// Session state as reported by the provider on retrieval
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub id: String,
    /// "paid", "unpaid", or "no_payment_required"
    pub payment_status: String,
    /// "open", "complete", or "expired"
    pub status: String,
}

/// Checkout provider HTTP client with secure key handling
pub struct CheckoutClient {
    secret_key: SecretString,
    api_base: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for CheckoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutClient")
            .field("secret_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CheckoutClient {
    pub fn new(api_base: impl Into<String>, secret_key: SecretString) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network::DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                TinteroError::transport("client setup", format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            secret_key,
            api_base: api_base.into(),
            client,
        })
    }

    /// Resolve a product's first active price id.
    pub async fn first_active_price(&self, product_id: &str) -> Result<String> {
        let url = format!("{}/prices", self.api_base);

        debug!("Listing active prices for product {}", product_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .query(&[("product", product_id), ("active", "true"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| TinteroError::from_reqwest("price listing", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TinteroError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let listing: PriceListing = response.json().await.map_err(|e| {
            TinteroError::MalformedResponse(format!("price listing is not valid JSON: {}", e))
        })?;

        listing
            .data
            .into_iter()
            .next()
            .map(|price| price.id)
            .ok_or_else(|| TinteroError::PriceNotFound {
                product: product_id.to_string(),
            })
    }

    /// Open a card checkout session for a fixed one-time charge.
    ///
    /// The success URL may carry the provider's session-id placeholder or a
    /// pre-minted signed token; the provider echoes it back on redirect.
    pub async fn create_session(
        &self,
        charge: &ResolvedCharge,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession> {
        let url = format!("{}/checkout/sessions", self.api_base);

        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("line_items[0][quantity]".into(), "1".into()),
            ("success_url".into(), success_url.into()),
            ("cancel_url".into(), cancel_url.into()),
        ];

        match charge {
            ResolvedCharge::PriceId(price_id) => {
                form.push(("line_items[0][price]".into(), price_id.clone()));
            }
            ResolvedCharge::Inline {
                product_name,
                currency,
                unit_amount,
            } => {
                form.push((
                    "line_items[0][price_data][currency]".into(),
                    currency.clone(),
                ));
                form.push((
                    "line_items[0][price_data][product_data][name]".into(),
                    product_name.clone(),
                ));
                form.push((
                    "line_items[0][price_data][unit_amount]".into(),
                    unit_amount.to_string(),
                ));
            }
        }

        debug!("Creating checkout session");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(|e| TinteroError::SessionCreation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TinteroError::SessionCreation(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let created: CreatedSession = response.json().await.map_err(|e| {
            TinteroError::SessionCreation(format!("session response is not valid JSON: {}", e))
        })?;

        Ok(CheckoutSession {
            id: SessionId::new(created.id),
            url: created.url,
        })
    }

    /// Retrieve a session by id for payment verification.
    pub async fn retrieve_session(&self, session_id: &SessionId) -> Result<ProviderSession> {
        let url = format!("{}/checkout/sessions/{}", self.api_base, session_id);

        debug!("Retrieving checkout session {}", session_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await
            .map_err(|e| TinteroError::from_reqwest("session retrieval", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TinteroError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| {
            TinteroError::MalformedResponse(format!("session is not valid JSON: {}", e))
        })
    }
}

/// Charge after price resolution: either a known price id or inline amounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCharge {
    PriceId(String),
    Inline {
        product_name: String,
        currency: String,
        unit_amount: u64,
    },
}

// Response types

#[derive(Debug, Deserialize)]
struct PriceListing {
    #[serde(default)]
    data: Vec<Price>,
}

#[derive(Debug, Deserialize)]
struct Price {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    id: String,
    url: String,
}
