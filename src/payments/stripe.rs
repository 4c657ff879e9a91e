//! Stripe Checkout client over the plain REST API (form-encoded, Bearer
//! secret key). Only the two calls the settlement flow needs are wrapped.

use async_trait::async_trait;
use serde::Deserialize;

use super::{
    CheckoutSession, CreateCheckoutSession, PaymentProvider, ProviderError, ProviderStatus,
    SessionStatus,
};

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

pub struct StripeCheckout {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeCheckout {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: secret_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let secret_key =
            std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set");
        let mut provider = Self::new(secret_key);
        if let Ok(base) = std::env::var("STRIPE_API_BASE") {
            provider.api_base = base;
        }
        provider
    }

    async fn read_error(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        ProviderError::Api { status, message }
    }
}

#[async_trait]
impl PaymentProvider for StripeCheckout {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_checkout_session(
        &self,
        req: &CreateCheckoutSession,
    ) -> Result<CheckoutSession, ProviderError> {
        // Stripe substitutes the placeholder with the real session id when
        // redirecting the payer back to us.
        let success_url = format!("{}?session_id={{CHECKOUT_SESSION_ID}}", req.success_url);

        let amount = req.amount_minor.to_string();
        let payment_id = req.payment_id.to_string();
        let form: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", &success_url),
            ("cancel_url", &req.cancel_url),
            ("customer_email", &req.customer_email),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", &req.currency),
            ("line_items[0][price_data][unit_amount]", &amount),
            (
                "line_items[0][price_data][product_data][name]",
                &req.description,
            ),
            ("metadata[payment_id]", &payment_id),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let session: StripeSession = response.json().await?;
        let session_url = session
            .url
            .ok_or_else(|| ProviderError::Malformed("checkout session has no url".into()))?;

        Ok(CheckoutSession {
            session_id: session.id,
            session_url,
        })
    }

    async fn get_session_status(&self, session_id: &str) -> Result<SessionStatus, ProviderError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/checkout/sessions/{session_id}",
                self.api_base
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let session: StripeSession = response.json().await?;
        Ok(SessionStatus {
            status: map_session_status(&session),
            payment_intent_id: session.payment_intent,
        })
    }
}

/// The subset of Stripe's checkout session object we care about.
#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    status: Option<String>,
    payment_status: Option<String>,
    payment_intent: Option<String>,
}

/// `payment_status` is authoritative for money having moved; `status` tells
/// us whether the session can still complete.
fn map_session_status(session: &StripeSession) -> ProviderStatus {
    match (session.payment_status.as_deref(), session.status.as_deref()) {
        (Some("paid"), _) => ProviderStatus::Succeeded,
        (_, Some("expired")) => ProviderStatus::Canceled,
        (Some("unpaid"), Some("complete")) => ProviderStatus::Failed,
        (_, Some("open")) => ProviderStatus::Pending,
        _ => ProviderStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(payment_status: Option<&str>, status: Option<&str>) -> StripeSession {
        StripeSession {
            id: "cs_test_123".into(),
            url: None,
            status: status.map(String::from),
            payment_status: payment_status.map(String::from),
            payment_intent: None,
        }
    }

    #[test]
    fn paid_sessions_are_succeeded() {
        assert_eq!(
            map_session_status(&session(Some("paid"), Some("complete"))),
            ProviderStatus::Succeeded
        );
        // Even a still-open session counts once the money moved.
        assert_eq!(
            map_session_status(&session(Some("paid"), Some("open"))),
            ProviderStatus::Succeeded
        );
    }

    #[test]
    fn expired_sessions_are_canceled() {
        assert_eq!(
            map_session_status(&session(Some("unpaid"), Some("expired"))),
            ProviderStatus::Canceled
        );
    }

    #[test]
    fn completed_but_unpaid_sessions_are_failed() {
        assert_eq!(
            map_session_status(&session(Some("unpaid"), Some("complete"))),
            ProviderStatus::Failed
        );
    }

    #[test]
    fn open_sessions_are_pending_and_everything_else_unknown() {
        assert_eq!(
            map_session_status(&session(Some("unpaid"), Some("open"))),
            ProviderStatus::Pending
        );
        assert_eq!(
            map_session_status(&session(None, None)),
            ProviderStatus::Unknown
        );
    }

    #[test]
    fn session_json_parses() {
        let body = r#"{
            "id": "cs_test_a1b2",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_a1b2",
            "status": "open",
            "payment_status": "unpaid",
            "payment_intent": null,
            "amount_total": 1999
        }"#;

        let session: StripeSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.id, "cs_test_a1b2");
        assert!(session.url.is_some());
        assert_eq!(map_session_status(&session), ProviderStatus::Pending);
    }
}
