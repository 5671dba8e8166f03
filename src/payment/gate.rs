//! Payment Gate
//!
//! Single-purchase state machine:
//! `NotStarted -> SessionCreated -> {Paid | Canceled | Expired}`.
//!
//! The access decision is re-evaluated on every request from the
//! request-scoped credential; a valid signed token unlocks access on a fresh
//! load with no server-side state. Verification fails closed: every error
//! path logs a diagnostic and denies.

use secrecy::SecretString;
use tracing::{info, warn};
use url::Url;

use super::client::{CheckoutClient, CheckoutSession, ProviderSession, ResolvedCharge};
use super::token::TokenSigner;
use crate::config::{ChargeConfig, PaymentConfig, RedirectCredential};
use crate::constants::payment::SESSION_ID_PLACEHOLDER;
use crate::types::{Result, SessionId, TinteroError};

// =============================================================================
// Payment Status
// =============================================================================

/// Where a checkout session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Canceled,
    Expired,
}

impl PaymentStatus {
    /// Map the provider's session fields onto the purchase state machine.
    pub fn from_provider(session: &ProviderSession) -> Self {
        if session.payment_status == "paid" {
            return Self::Paid;
        }
        match session.status.as_str() {
            "expired" => Self::Expired,
            // A finished session that never collected payment was abandoned
            "complete" => Self::Canceled,
            _ => Self::Pending,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

// =============================================================================
// Payment Credential
// =============================================================================

/// Request-scoped credential carried back on the success redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentCredential {
    /// Provider session id; verification is a remote lookup
    Session(SessionId),
    /// Signed access token; verification is local
    Token(String),
}

impl PaymentCredential {
    /// Derive the credential once from request parameters. A signed token
    /// takes precedence when both are present.
    pub fn from_request(token: Option<String>, session_id: Option<String>) -> Option<Self> {
        if let Some(token) = token {
            return Some(Self::Token(token));
        }
        session_id.map(|id| Self::Session(SessionId::new(id)))
    }
}

// =============================================================================
// Payment Gate
// =============================================================================

/// Creates checkout sessions and decides access, fail-closed
#[derive(Debug)]
pub struct PaymentGate {
    client: CheckoutClient,
    signer: Option<TokenSigner>,
    redirect: RedirectCredential,
    charge: ChargeConfig,
    app_url: String,
}

impl PaymentGate {
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let secret_key = config
            .secret_key
            .clone()
            .or_else(|| std::env::var("STRIPE_SECRET_KEY").ok())
            .ok_or_else(|| {
                TinteroError::MissingCredential(
                    "payment secret key not found. Set STRIPE_SECRET_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let signing_secret = config
            .signing_secret
            .clone()
            .or_else(|| std::env::var("TINTERO_SIGNING_SECRET").ok());

        let signer = match (config.redirect, signing_secret) {
            (_, Some(secret)) => Some(TokenSigner::new(
                SecretString::from(secret),
                config.token_ttl_mins,
            )),
            (RedirectCredential::SignedToken, None) => {
                return Err(TinteroError::MissingCredential(
                    "token signing secret not found. Set TINTERO_SIGNING_SECRET env var or provide in config"
                        .to_string(),
                ));
            }
            (RedirectCredential::SessionId, None) => None,
        };

        let app_url = Url::parse(&config.app_url)
            .map_err(|e| TinteroError::Config(format!("invalid payment app_url: {}", e)))?;

        Ok(Self {
            client: CheckoutClient::new(config.api_base.clone(), SecretString::from(secret_key))?,
            signer,
            redirect: config.redirect,
            charge: config.charge.clone(),
            app_url: app_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Success redirect URL for a new session. Session-id mode embeds the
    /// provider's placeholder literally (the provider substitutes it);
    /// token mode mints a fresh signed token here.
    pub fn success_url(&self) -> Result<String> {
        match self.redirect {
            RedirectCredential::SessionId => Ok(format!(
                "{}/?success=true&session_id={}",
                self.app_url, SESSION_ID_PLACEHOLDER
            )),
            RedirectCredential::SignedToken => {
                let signer = self.signer.as_ref().ok_or_else(|| {
                    TinteroError::MissingCredential("token signing secret not configured".into())
                })?;
                Ok(format!("{}/?token={}", self.app_url, signer.mint()?))
            }
        }
    }

    /// Cancel redirect URL
    pub fn cancel_url(&self) -> String {
        format!("{}/?canceled=true", self.app_url)
    }

    /// Open a checkout session for the configured one-time charge.
    pub async fn create_session(&self) -> Result<CheckoutSession> {
        let charge = match &self.charge {
            ChargeConfig::Amount {
                product_name,
                currency,
                unit_amount,
            } => ResolvedCharge::Inline {
                product_name: product_name.clone(),
                currency: currency.clone(),
                unit_amount: *unit_amount,
            },
            ChargeConfig::Price { product_id } => {
                ResolvedCharge::PriceId(self.client.first_active_price(product_id).await?)
            }
        };

        let session = self
            .client
            .create_session(&charge, &self.success_url()?, &self.cancel_url())
            .await?;

        info!("Created checkout session {}", session.id);
        Ok(session)
    }

    /// Decide access for the current request's credential.
    ///
    /// Fails closed: verification errors and unpaid sessions both deny, with
    /// a logged diagnostic - access is never granted on error.
    pub async fn verify(&self, credential: &PaymentCredential) -> bool {
        match self.check(credential).await {
            Ok(true) => true,
            Ok(false) => {
                warn!("Payment not completed for the presented credential");
                false
            }
            Err(e) => {
                warn!("Payment verification failed: {}", e);
                false
            }
        }
    }

    async fn check(&self, credential: &PaymentCredential) -> Result<bool> {
        match credential {
            PaymentCredential::Token(token) => {
                let signer = self.signer.as_ref().ok_or_else(|| {
                    TinteroError::PaymentRequired(
                        "signed-token credential received but no signing secret is configured"
                            .to_string(),
                    )
                })?;
                signer.verify(token)?;
                Ok(true)
            }
            PaymentCredential::Session(session_id) => {
                let session = self.client.retrieve_session(session_id).await?;
                Ok(PaymentStatus::from_provider(&session).is_paid())
            }
        }
    }
}
