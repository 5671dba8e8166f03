//! Payment Gate
//!
//! One-time purchase flow against a hosted checkout provider, plus local
//! verification of signed access tokens. Access is re-evaluated per request
//! from the credential alone; there is no server-side session store.
//!
//! ## Modules
//!
//! - `token`: signed, time-limited access token (mint + verify)
//! - `client`: checkout provider HTTP client (sessions, prices)
//! - `gate`: the state machine and fail-closed access decision

mod client;
mod gate;
mod token;

pub use client::{CheckoutClient, CheckoutSession, ProviderSession};
pub use gate::{PaymentCredential, PaymentGate, PaymentStatus};
pub use token::{AccessClaims, TokenSigner};
