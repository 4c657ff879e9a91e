//! External payment provider interface.
//!
//! The settlement flow only ever talks to [`PaymentProvider`]; the concrete
//! Stripe Checkout client lives in [`stripe`]. Provider answers are treated
//! as authoritative: local payment state is only advanced after the provider
//! confirms it.

pub mod stripe;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// What the provider reports for a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    /// The provider returned something we cannot interpret; treated as
    /// transient, never applied to local state.
    Unknown,
    Pending,
    Succeeded,
    Canceled,
    Failed,
}

/// Request to open a checkout session with the provider.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSession {
    pub amount_minor: i64,
    pub currency: String,
    pub description: String,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Our own payment id, carried as provider metadata for reconciliation.
    pub payment_id: Uuid,
}

/// A created checkout session: the payer gets redirected to `session_url`.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub session_id: String,
    pub session_url: String,
}

/// Authoritative session status as reported by the provider.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub status: ProviderStatus,
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Network failures and provider-side 5xx/429 are worth retrying with
    /// backoff; everything else is surfaced immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ProviderError::Api { status, .. } => *status >= 500 || *status == 429,
            ProviderError::Malformed(_) => false,
        }
    }
}

/// The external payment provider, as consumed by the settlement flow.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Provider name recorded on payment rows (e.g. "stripe").
    fn name(&self) -> &'static str;

    async fn create_checkout_session(
        &self,
        req: &CreateCheckoutSession,
    ) -> Result<CheckoutSession, ProviderError>;

    async fn get_session_status(&self, session_id: &str) -> Result<SessionStatus, ProviderError>;
}

/// Settlement configuration, read from the environment at startup the same
/// way the rest of the app config is.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub currency: String,
    /// Where the provider redirects the payer after a successful checkout;
    /// the session id placeholder is appended by the provider client.
    pub success_url: String,
    pub cancel_url: String,
    /// How often the background sweep looks at stale pending payments.
    pub sweep_interval_secs: u64,
    /// Age after which a pending payment is considered stale and re-polled.
    pub stale_after_secs: i64,
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into());

        Self {
            currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "RUB".into()),
            success_url: format!("{base_url}/api/payments/success"),
            cancel_url: format!("{base_url}/api/payments/cancel"),
            sweep_interval_secs: parse_env("PAYMENT_SWEEP_INTERVAL_SECS", 300),
            stale_after_secs: parse_env("PAYMENT_STALE_AFTER_SECS", 1800),
        }
    }
}

fn parse_env<T: std::str::FromStr + Copy>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
